use super::{Context, RootTransformer, Transformer};
use crate::error::TransformError;

/// Strips Flow annotations and declarations.
pub(crate) struct FlowTransformer;

impl Transformer for FlowTransformer {
    fn name(&self) -> &'static str {
        "flow"
    }

    fn process(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<bool, TransformError> {
        Ok(root.process_possible_arrow_param_end(cx)
            || root.process_possible_async_arrow_with_type_params(cx)?
            || root.process_possible_type_range(cx))
    }
}
