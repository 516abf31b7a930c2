use super::{Context, RootTransformer, Transformer};
use crate::error::TransformError;
use indexmap::IndexSet;
use rinse_parser::IdentifierRole;

/// Wraps the module in `react-hot-loader`'s enter/leave calls and registers
/// every top-level binding under the file path.
pub(crate) struct ReactHotLoaderTransformer {
    file_path: String,
}

impl ReactHotLoaderTransformer {
    pub(crate) fn new(file_path: String) -> Self {
        Self { file_path }
    }
}

impl Transformer for ReactHotLoaderTransformer {
    fn name(&self) -> &'static str {
        "react-hot-loader"
    }

    fn process(&self, _root: &RootTransformer, _cx: &mut Context<'_>) -> Result<bool, TransformError> {
        Ok(false)
    }

    fn prefix_code(&self, _cx: &Context<'_>) -> String {
        "(function () { var enterModule = require('react-hot-loader').enterModule; \
         enterModule && enterModule(module); })();"
            .to_string()
    }

    fn suffix_code(&self, cx: &Context<'_>) -> String {
        let mut top_level_names: IndexSet<&str> = IndexSet::new();
        for token in cx.tokens.tokens() {
            if !token.is_type
                && token.is_top_level_declaration()
                && token.identifier_role != Some(IdentifierRole::ImportDeclaration)
            {
                top_level_names.insert(cx.tokens.text_for_token(token));
            }
        }
        let mut registrations: Vec<(&str, &str)> =
            top_level_names.into_iter().map(|name| (name, name)).collect();
        if let Some(default_name) = cx.hot_loader_default_export.as_deref() {
            registrations.push((default_name, "default"));
        }

        // A JSON string is also a valid JS string literal.
        let file_path = serde_json::to_string(&self.file_path).unwrap_or_else(|_| "\"\"".to_string());
        let mut suffix = String::from(
            "\n;(function () {\n  var reactHotLoader = require('react-hot-loader').default;\n  \
             var leaveModule = require('react-hot-loader').leaveModule;\n  \
             if (!reactHotLoader) {\n    return;\n  }\n",
        );
        for (variable_name, local_name) in registrations {
            suffix.push_str(&format!(
                "  reactHotLoader.register({variable_name}, \"{local_name}\", {file_path});\n"
            ));
        }
        suffix.push_str("  leaveModule(module);\n})();");
        suffix
    }
}
