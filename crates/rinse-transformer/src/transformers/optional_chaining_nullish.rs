use super::{Context, RootTransformer, Transformer};
use crate::error::TransformError;
use crate::token_processor::TokenProcessor;
use rinse_parser::TokenType;

/// Lowers `a?.b` and `a ?? b` into helper calls.
///
/// The token processor opens and closes the helper calls around chain and
/// nullish boundaries; this transformer rewrites the operators in between,
/// turning every subscript into an `'access'`-style op and an arrow
/// function.
pub(crate) struct OptionalChainingNullishTransformer;

impl Transformer for OptionalChainingNullishTransformer {
    fn name(&self) -> &'static str {
        "optional-chaining-nullish"
    }

    fn process(&self, _root: &RootTransformer, cx: &mut Context<'_>) -> Result<bool, TransformError> {
        let tokens = &mut cx.tokens;
        if tokens.matches1(TokenType::NullishCoalescing) {
            let is_async = tokens
                .current_token()
                .nullish_start_index
                .is_some_and(|start| tokens.token_at(start).is_async_operation);
            if is_async {
                tokens.replace_token_trimming_left_whitespace(", async () => (");
            } else {
                tokens.replace_token_trimming_left_whitespace(", () => (");
            }
            return Ok(true);
        }
        if tokens.matches1(TokenType::Delete) && tokens.token_at_relative_index(1).is_optional_chain_start {
            tokens.remove_initial_token();
            return Ok(true);
        }

        let Some(chain_start) = tokens.current_token().subscript_start_index else {
            return Ok(false);
        };
        // `super` subscripts are never optional and must stay intact.
        if !tokens.token_at(chain_start).is_optional_chain_start
            || tokens.token_at_relative_index(-1).kind == TokenType::Super
        {
            return Ok(false);
        }

        let param = cx.names.claim_free_name("_");
        let is_delete = chain_start > 0
            && tokens.matches1_at_index(chain_start - 1, TokenType::Delete)
            && is_last_subscript_in_chain(tokens)?;
        let mut arrow_start = if is_delete {
            format!("{param} => delete {param}")
        } else {
            format!("{param} => {param}")
        };
        if tokens.token_at(chain_start).is_async_operation {
            arrow_start = format!("async {arrow_start}");
        }

        if tokens.matches2(TokenType::QuestionDot, TokenType::ParenL)
            || tokens.matches2(TokenType::QuestionDot, TokenType::LessThan)
        {
            if just_skipped_super(tokens)? {
                tokens.append_code(".bind(this)");
            }
            tokens.replace_token_trimming_left_whitespace(&format!(", 'optionalCall', {arrow_start}"));
        } else if tokens.matches2(TokenType::QuestionDot, TokenType::BracketL) {
            tokens.replace_token_trimming_left_whitespace(&format!(", 'optionalAccess', {arrow_start}"));
        } else if tokens.matches1(TokenType::QuestionDot) {
            tokens.replace_token_trimming_left_whitespace(&format!(", 'optionalAccess', {arrow_start}."));
        } else if tokens.matches1(TokenType::Dot) {
            tokens.replace_token_trimming_left_whitespace(&format!(", 'access', {arrow_start}."));
        } else if tokens.matches1(TokenType::BracketL) {
            tokens.replace_token_trimming_left_whitespace(&format!(", 'access', {arrow_start}["));
        } else if tokens.matches1(TokenType::ParenL) {
            if just_skipped_super(tokens)? {
                tokens.append_code(".bind(this)");
            }
            tokens.replace_token_trimming_left_whitespace(&format!(", 'call', {arrow_start}("));
        } else {
            return Err(TransformError::structure(
                "Unexpected subscript operator in optional chain.",
            ));
        }
        Ok(true)
    }
}

/// Whether no later subscript of the same chain follows the cursor, so a
/// `delete` can go here.
fn is_last_subscript_in_chain(tokens: &TokenProcessor<'_>) -> Result<bool, TransformError> {
    let mut depth = 0i64;
    for index in tokens.current_index() + 1..tokens.tokens().len() {
        let token = tokens.token_at(index);
        if token.is_optional_chain_start {
            depth += 1;
        } else if token.is_optional_chain_end {
            depth -= 1;
        }
        if depth < 0 {
            return Ok(true);
        }
        if depth == 0 && token.subscript_start_index.is_some() {
            return Ok(false);
        }
    }
    Err(TransformError::structure(
        "Reached the end of the code while finding the end of the access chain.",
    ))
}

/// Whether the previous subscript of this chain came right after `super`,
/// as in `super.a()?.b`; a call then needs `this` bound explicitly.
fn just_skipped_super(tokens: &TokenProcessor<'_>) -> Result<bool, TransformError> {
    let mut depth = 0i64;
    for index in (0..tokens.current_index()).rev() {
        let token = tokens.token_at(index);
        if token.is_optional_chain_start {
            depth -= 1;
        } else if token.is_optional_chain_end {
            depth += 1;
        }
        if depth < 0 {
            return Ok(false);
        }
        if depth == 0 && token.subscript_start_index.is_some() {
            return Ok(index > 0 && tokens.token_at(index - 1).kind == TokenType::Super);
        }
    }
    Err(TransformError::structure(
        "Reached the start of the code while finding the start of the access chain.",
    ))
}
