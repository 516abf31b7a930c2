use super::{Context, RootTransformer, Transformer};
use crate::error::TransformError;
use rinse_parser::TokenType;

/// `catch {` → `catch (e) {`.
pub(crate) struct OptionalCatchBindingTransformer;

impl Transformer for OptionalCatchBindingTransformer {
    fn name(&self) -> &'static str {
        "optional-catch-binding"
    }

    fn process(&self, _root: &RootTransformer, cx: &mut Context<'_>) -> Result<bool, TransformError> {
        if !cx.tokens.matches2(TokenType::Catch, TokenType::BraceL) {
            return Ok(false);
        }
        cx.tokens.copy_token();
        let name = cx.names.claim_free_name("e");
        cx.tokens.append_code(&format!(" ({name})"));
        Ok(true)
    }
}
