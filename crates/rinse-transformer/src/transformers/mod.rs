//! The root transformer and the feature transformers it consults.
//!
//! Every feature is a [`Transformer`]. At each token the root asks them in
//! registration order whether they want to handle it; the first one that
//! returns `true` has consumed at least one token and written its output.
//! When none does, the token is copied as is.

mod cjs_imports;
mod esm_imports;
mod flow;
mod jest_hoist;
mod jsx;
mod numeric_separator;
mod optional_catch_binding;
mod optional_chaining_nullish;
mod react_display_name;
mod react_hot_loader;
mod root;
mod typescript;

pub(crate) use root::RootTransformer;

use crate::cjs_import_processor::CjsImportProcessor;
use crate::error::TransformError;
use crate::name_manager::NameManager;
use crate::token_processor::TokenProcessor;

/// Mutable state shared by every transformer during one `transform` call.
#[derive(Debug)]
pub(crate) struct Context<'a> {
    pub tokens: TokenProcessor<'a>,
    pub names: NameManager,
    /// Present when imports are rewritten to CommonJS.
    pub imports: Option<CjsImportProcessor>,
    /// Declared with `var` at the top of the output.
    pub generated_variables: Vec<String>,
    /// The variable an `export default` expression was bound to, so the
    /// hot loader can register it.
    pub hot_loader_default_export: Option<String>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(tokens: TokenProcessor<'a>, names: NameManager, imports: Option<CjsImportProcessor>) -> Self {
        Self {
            tokens,
            names,
            imports,
            generated_variables: Vec::new(),
            hot_loader_default_export: None,
        }
    }
}

pub(crate) trait Transformer {
    fn name(&self) -> &'static str;

    /// Handles the token at the cursor, returning whether it did.
    fn process(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<bool, TransformError>;

    /// Code placed before the whole output.
    fn prefix_code(&self, _cx: &Context<'_>) -> String {
        String::new()
    }

    /// Code placed after the prefixes, helpers and generated variables.
    fn hoisted_code(&self, _cx: &Context<'_>) -> String {
        String::new()
    }

    fn suffix_code(&self, _cx: &Context<'_>) -> String {
        String::new()
    }
}
