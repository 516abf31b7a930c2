use super::{Context, RootTransformer, Transformer};
use crate::error::TransformError;
use rinse_parser::{IdentifierRole, TokenType};

/// Adds `displayName` to `createReactClass({...})` and
/// `React.createClass({...})` calls, named after the variable, object key
/// or file the class is assigned to.
pub(crate) struct ReactDisplayNameTransformer {
    file_path: Option<String>,
}

impl ReactDisplayNameTransformer {
    pub(crate) fn new(file_path: Option<String>) -> Self {
        Self { file_path }
    }
}

impl Transformer for ReactDisplayNameTransformer {
    fn name(&self) -> &'static str {
        "react-display-name"
    }

    fn process(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<bool, TransformError> {
        if !cx.tokens.matches1(TokenType::Name) {
            return Ok(false);
        }
        let start_index = cx.tokens.current_index();
        if cx.tokens.identifier_name() == "createReactClass" {
            let replacement = cx
                .imports
                .as_ref()
                .and_then(|imports| imports.identifier_replacement("createReactClass"))
                .map(|name| format!("(0, {name})"));
            match replacement {
                Some(code) => cx.tokens.replace_token(&code),
                None => cx.tokens.copy_token(),
            }
            self.try_process_create_class_call(root, cx, start_index)?;
            return Ok(true);
        }
        if cx.tokens.matches3(TokenType::Name, TokenType::Dot, TokenType::Name)
            && cx.tokens.identifier_name() == "React"
            && cx.tokens.identifier_name_at_relative_index(2) == "createClass"
        {
            let replacement = cx
                .imports
                .as_ref()
                .and_then(|imports| imports.identifier_replacement("React"))
                .unwrap_or("React")
                .to_string();
            cx.tokens.replace_token(&replacement);
            cx.tokens.copy_token();
            cx.tokens.copy_token();
            self.try_process_create_class_call(root, cx, start_index)?;
            return Ok(true);
        }
        Ok(false)
    }
}

impl ReactDisplayNameTransformer {
    /// Called with the cursor on the `(` of the call.
    fn try_process_create_class_call(
        &self,
        root: &RootTransformer,
        cx: &mut Context<'_>,
        start_index: usize,
    ) -> Result<(), TransformError> {
        let Some(display_name) = self.find_display_name(cx, start_index) else {
            return Ok(());
        };
        if !class_needs_display_name(cx)? {
            return Ok(());
        }
        cx.tokens.copy_expected_token(TokenType::ParenL)?;
        cx.tokens.copy_expected_token(TokenType::BraceL)?;
        cx.tokens
            .append_code(&format!("displayName: '{display_name}',"));
        root.process_balanced_code(cx)?;
        cx.tokens.copy_expected_token(TokenType::BraceR)?;
        cx.tokens.copy_expected_token(TokenType::ParenR)
    }

    fn find_display_name(&self, cx: &Context<'_>, start_index: usize) -> Option<String> {
        if start_index < 2 {
            return None;
        }
        let tokens = &cx.tokens;
        if tokens.matches2_at_index(start_index - 2, TokenType::Name, TokenType::Eq) {
            // `x = ` or `a.x = `
            return Some(tokens.identifier_name_at_index(start_index - 2).to_string());
        }
        if tokens.token_at(start_index - 2).identifier_role == Some(IdentifierRole::ObjectKey) {
            // `{x: createReactClass(...)}`
            return Some(tokens.identifier_name_at_index(start_index - 2).to_string());
        }
        if tokens.matches2_at_index(start_index - 2, TokenType::Export, TokenType::Default) {
            return Some(self.display_name_from_file_name());
        }
        None
    }

    /// The file name without extension, or the directory name for an
    /// `index` file.
    fn display_name_from_file_name(&self) -> String {
        let file_path = self.file_path.as_deref().unwrap_or("unknown");
        let segments: Vec<&str> = file_path.split('/').collect();
        let file_name = segments.last().copied().unwrap_or(file_path);
        let base_name = match file_name.rfind('.') {
            Some(dot) => &file_name[..dot],
            None => file_name,
        };
        if base_name == "index" && segments.len() >= 2 && !segments[segments.len() - 2].is_empty() {
            return segments[segments.len() - 2].to_string();
        }
        base_name.to_string()
    }
}

/// Only a single object-literal argument without its own `displayName`
/// key gets one added.
fn class_needs_display_name(cx: &Context<'_>) -> Result<bool, TransformError> {
    let tokens = &cx.tokens;
    if !tokens.matches2(TokenType::ParenL, TokenType::BraceL) {
        return Ok(false);
    }
    let mut index = tokens.current_index();
    let object_context_id = tokens.token_at(index + 1).context_id;
    if object_context_id.is_none() {
        return Err(TransformError::structure(
            "Expected non-null context ID on object open-brace.",
        ));
    }
    let len = tokens.tokens().len();
    while index < len {
        let token = tokens.token_at(index);
        if token.kind == TokenType::BraceR && token.context_id == object_context_id {
            index += 1;
            break;
        }
        if token.context_id == object_context_id
            && token.identifier_role == Some(IdentifierRole::ObjectKey)
            && tokens.text_for_token(token) == "displayName"
        {
            return Ok(false);
        }
        index += 1;
    }
    if index >= len {
        return Err(TransformError::structure(
            "Unexpected end of input when processing React class.",
        ));
    }
    Ok(tokens.matches1_at_index(index, TokenType::ParenR)
        || tokens.matches2_at_index(index, TokenType::Comma, TokenType::ParenR))
}
