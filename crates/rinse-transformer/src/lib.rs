//! Rewrites JavaScript with JSX, TypeScript or Flow syntax into plain
//! JavaScript in a single pass over the parser's tokens.
//!
//! Everything that is not rewritten keeps its original whitespace and
//! comments byte for byte, so output lines stay close to input lines. The
//! enabled transforms decide what gets rewritten:
//! - types are removed and TypeScript enums lowered
//! - JSX elements become calls of the element pragma
//! - ES module syntax becomes CommonJS with the `imports` transform
//! - class fields, optional chaining, nullish coalescing, numeric
//!   separators and optional catch bindings are lowered unless
//!   `disable_es_transforms` is set
//!
//! # Example
//!
//! ```
//! use rinse_transformer::{transform, Options, Transforms};
//!
//! let options = Options::new(Transforms::TYPESCRIPT);
//! let result = transform("const f = (a: number): number => a + 1;", &options).unwrap();
//! assert_eq!(result.code, "const f = (a) => a + 1;");
//! ```

mod cjs_import_processor;
mod error;
mod helpers;
mod name_manager;
mod options;
mod shadowed_globals;
mod token_processor;
mod transformers;
mod util;

pub use error::{ConfigError, TransformError};
pub use options::{Options, SourceMapOptions, Transforms};
pub use source_map::RawSourceMap;

use cjs_import_processor::CjsImportProcessor;
use helpers::HelperManager;
use name_manager::NameManager;
use rinse_parser::{parse_file, Dialect};
use shadowed_globals::identify_shadowed_globals;
use source_map::SourceMapBuilder;
use token_processor::TokenProcessor;
use transformers::{Context, RootTransformer};
use util::{get_ts_imported_names, JsxPragmaInfo};

/// The output of [`transform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    pub code: String,
    /// Set when [`Options::source_map_options`] is.
    pub source_map: Option<RawSourceMap>,
}

/// Transforms `code` with the transforms enabled in `options`.
///
/// When [`Options::file_path`] is set, errors are prefixed with
/// `Error transforming <path>: `.
pub fn transform(code: &str, options: &Options) -> Result<TransformResult, TransformError> {
    let result = transform_inner(code, options);
    match (&options.file_path, result) {
        (Some(path), Err(error)) => Err(error.in_file(path.as_str())),
        (_, result) => result,
    }
}

fn transform_inner(code: &str, options: &Options) -> Result<TransformResult, TransformError> {
    options.validate()?;
    let cx = create_context(code, options)?;
    let root = RootTransformer::new(options, &cx)?;
    let output = root.transform(cx)?;

    let source_map = options.source_map_options.as_ref().map(|source_map_options| {
        let mut builder = SourceMapBuilder::new();
        let line_count = output.split('\n').count();
        builder.add_identity_lines(u32::try_from(line_count).unwrap_or(u32::MAX));
        builder.build(
            source_map_options.compiled_filename.as_str(),
            options.file_path.as_deref().unwrap_or_default(),
        )
    });
    Ok(TransformResult {
        code: output,
        source_map,
    })
}

/// Parses `code` and runs the passes that annotate tokens before any
/// output is written.
fn create_context<'a>(code: &'a str, options: &Options) -> Result<Context<'a>, TransformError> {
    let transforms = options.transforms;
    let is_typescript_enabled = transforms.contains(Transforms::TYPESCRIPT);
    let is_flow_enabled = transforms.contains(Transforms::FLOW);
    let dialect = Dialect {
        jsx: transforms.contains(Transforms::JSX),
        typescript: is_typescript_enabled,
        flow: is_flow_enabled,
    };
    let file = parse_file(code, dialect)?;

    let mut names = NameManager::new(code, &file.tokens);
    let helpers = HelperManager::new(&mut names);
    let mut tokens = TokenProcessor::new(
        code,
        file.tokens,
        is_flow_enabled,
        options.disable_es_transforms,
        helpers,
    );

    let elides_type_imports = is_typescript_enabled && !options.keep_unused_imports;
    let imports = if transforms.contains(Transforms::IMPORTS) {
        let mut imports = CjsImportProcessor::new(
            options.enable_legacy_typescript_module_interop,
            is_typescript_enabled,
            options.keep_unused_imports,
            JsxPragmaInfo::new(options),
        );
        imports.preprocess_tokens(&mut tokens, &mut names)?;
        // Pruning looks at shadowing, so globals are marked in between.
        identify_shadowed_globals(code, tokens.tokens_mut(), &file.scopes, &imports.global_names());
        if elides_type_imports {
            imports.prune_type_only_imports(&tokens);
        }
        Some(imports)
    } else {
        if elides_type_imports {
            let imported_names = get_ts_imported_names(&tokens)?;
            identify_shadowed_globals(code, tokens.tokens_mut(), &file.scopes, &imported_names);
        }
        None
    };

    Ok(Context::new(tokens, names, imports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn transformer_names(code: &str, options: &Options) -> Vec<&'static str> {
        let cx = create_context(code, options).unwrap();
        RootTransformer::new(options, &cx).unwrap().transformer_names()
    }

    #[test]
    fn test_registration_order() {
        let options = Options {
            file_path: Some("App.js".to_string()),
            ..Options::new(
                Transforms::JSX
                    | Transforms::TYPESCRIPT
                    | Transforms::IMPORTS
                    | Transforms::REACT_HOT_LOADER
                    | Transforms::JEST,
            )
        };
        assert_eq!(
            transformer_names("let a;", &options),
            vec![
                "optional-chaining-nullish",
                "numeric-separator",
                "optional-catch-binding",
                "jsx",
                "react-display-name",
                "react-hot-loader",
                "cjs-imports",
                "typescript",
                "jest",
            ]
        );
    }

    #[test]
    fn test_registration_without_es_transforms() {
        let options = Options {
            disable_es_transforms: true,
            ..Options::new(Transforms::FLOW)
        };
        assert_eq!(transformer_names("let a;", &options), vec!["esm-imports", "flow"]);
    }

    #[test]
    fn test_imports_transform_needs_an_import_processor() {
        let cx = create_context("let a;", &Options::default()).unwrap();
        let error = RootTransformer::new(&Options::new(Transforms::IMPORTS), &cx).err().unwrap();
        assert!(error.to_string().contains("no import processor"), "{error}");
    }

    #[test]
    fn test_source_map_has_one_segment_per_line() {
        let options = Options {
            source_map_options: Some(SourceMapOptions {
                compiled_filename: "out.js".to_string(),
            }),
            file_path: Some("in.js".to_string()),
            ..Options::default()
        };
        let result = transform("a;\nb;\nc;", &options).unwrap();
        let map = result.source_map.unwrap();
        assert_eq!(map.file, "out.js");
        assert_eq!(map.sources, vec!["in.js".to_string()]);
        assert_eq!(map.mappings, "AAAA;AACA;AACA");
    }

    #[test]
    fn test_error_carries_file_path() {
        let options = Options {
            file_path: Some("bad.js".to_string()),
            ..Options::default()
        };
        let error = transform("let = ;", &options).unwrap_err();
        assert!(error.to_string().starts_with("Error transforming bad.js: "));
        assert!(matches!(error.root_cause(), TransformError::Syntax(_)));
    }
}
