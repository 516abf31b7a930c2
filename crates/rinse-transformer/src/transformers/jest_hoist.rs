use super::{Context, RootTransformer, Transformer};
use crate::error::TransformError;
use rinse_parser::TokenType;
use std::cell::RefCell;

const JEST_GLOBAL_NAME: &str = "jest";
const HOISTED_METHODS: [&str; 4] = ["mock", "unmock", "enableAutomock", "disableAutomock"];

/// Moves top-level `jest.mock(...)` and similar calls above the imports.
///
/// Each hoisted call is wrapped in place in a function declaration, and a
/// call to that function is emitted at the top of the file.
#[derive(Default)]
pub(crate) struct JestHoistTransformer {
    hoisted_function_names: RefCell<Vec<String>>,
}

impl Transformer for JestHoistTransformer {
    fn name(&self) -> &'static str {
        "jest"
    }

    fn process(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<bool, TransformError> {
        let is_jest_call = cx.tokens.current_token().scope_depth == 0
            && cx
                .tokens
                .matches4([TokenType::Name, TokenType::Dot, TokenType::Name, TokenType::ParenL])
            && cx.tokens.identifier_name() == JEST_GLOBAL_NAME;
        if !is_jest_call {
            return Ok(false);
        }
        // An imported `jest` is someone else's object.
        if cx
            .imports
            .as_ref()
            .is_some_and(|imports| imports.global_names().contains(JEST_GLOBAL_NAME))
        {
            return Ok(false);
        }
        self.extract_hoisted_calls(root, cx)?;
        Ok(true)
    }

    fn hoisted_code(&self, _cx: &Context<'_>) -> String {
        self.hoisted_function_names
            .borrow()
            .iter()
            .map(|name| format!("{name}();"))
            .collect()
    }
}

impl JestHoistTransformer {
    /// Walks the chain `jest.a(...).b(...)`, wrapping each hoisted call and
    /// keeping the others chained.
    fn extract_hoisted_calls(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<(), TransformError> {
        // Drop `jest`; every call below puts it back as needed.
        cx.tokens.remove_token();
        let mut follows_non_hoisted_call = false;

        while cx.tokens.matches3(TokenType::Dot, TokenType::Name, TokenType::ParenL) {
            let method_name = cx.tokens.identifier_name_at_relative_index(1);
            if HOISTED_METHODS.contains(&method_name) {
                let function_name = cx.names.claim_free_name("__jestHoist");
                cx.tokens
                    .replace_token(&format!("function {function_name}(){{{JEST_GLOBAL_NAME}."));
                self.hoisted_function_names.borrow_mut().push(function_name);
                cx.tokens.copy_token();
                cx.tokens.copy_token();
                root.process_balanced_code(cx)?;
                cx.tokens.copy_expected_token(TokenType::ParenR)?;
                cx.tokens.append_code(";}");
                follows_non_hoisted_call = false;
            } else {
                if follows_non_hoisted_call {
                    // Chain off the previous call's result as written.
                    cx.tokens.copy_token();
                } else {
                    // A hoisted call came before, so restart the chain at `jest`.
                    cx.tokens.replace_token(&format!("{JEST_GLOBAL_NAME}."));
                }
                cx.tokens.copy_token();
                cx.tokens.copy_token();
                root.process_balanced_code(cx)?;
                cx.tokens.copy_expected_token(TokenType::ParenR)?;
                follows_non_hoisted_call = true;
            }
        }
        tracing::trace!(
            hoisted = self.hoisted_function_names.borrow().len(),
            "extracted jest calls"
        );
        Ok(())
    }
}
