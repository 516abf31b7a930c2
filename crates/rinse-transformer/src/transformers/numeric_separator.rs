use super::{Context, RootTransformer, Transformer};
use crate::error::TransformError;
use rinse_parser::TokenType;

/// `1_000_000` → `1000000`.
pub(crate) struct NumericSeparatorTransformer;

impl Transformer for NumericSeparatorTransformer {
    fn name(&self) -> &'static str {
        "numeric-separator"
    }

    fn process(&self, _root: &RootTransformer, cx: &mut Context<'_>) -> Result<bool, TransformError> {
        if !(cx.tokens.matches1(TokenType::Num) || cx.tokens.matches1(TokenType::Bigint)) {
            return Ok(false);
        }
        let code = cx.tokens.current_token_code();
        if !code.contains('_') {
            return Ok(false);
        }
        cx.tokens.replace_token(&code.replace('_', ""));
        Ok(true)
    }
}
