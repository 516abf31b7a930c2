//! Turns arguments and an optional JSON config file into transform options.

use crate::cli::Args;
use camino::{Utf8Path, Utf8PathBuf};
use miette::Diagnostic;
use rinse_transformer::{ConfigError, Options, Transforms};
use std::fs;
use thiserror::Error;

/// Errors found before any file is transformed.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}")]
    #[diagnostic(code(rinse::config::read))]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}")]
    #[diagnostic(code(rinse::config::parse), help("keys use camelCase, e.g. `jsxPragma`"))]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(rinse::config::options))]
    Options(#[from] ConfigError),
}

/// Builds the options shared by every file. Flags override the config file;
/// `--transforms` replaces the configured list instead of extending it.
pub fn load_options(args: &Args) -> Result<Options, ConfigLoadError> {
    let mut options = match &args.config {
        Some(path) => read_config_file(path)?,
        None => Options::default(),
    };

    if !args.transforms.is_empty() {
        options.transforms = args
            .transforms
            .iter()
            .try_fold(Transforms::empty(), |acc, name| {
                Transforms::parse_name(name.trim()).map(|flag| acc | flag)
            })?;
    }
    if let Some(pragma) = &args.jsx_pragma {
        options.jsx_pragma = Some(pragma.clone());
    }
    if let Some(pragma) = &args.jsx_fragment_pragma {
        options.jsx_fragment_pragma = Some(pragma.clone());
    }
    options.production |= args.production;
    options.disable_es_transforms |= args.disable_es_transforms;
    options.enable_legacy_typescript_module_interop |= args.legacy_ts_interop;
    options.enable_legacy_babel5_module_interop |= args.legacy_babel5_interop;
    options.keep_unused_imports |= args.keep_unused_imports;
    options.preserve_dynamic_import |= args.preserve_dynamic_import;

    // The hot loader check needs a file path, which every file gets later.
    let mut checked = options.clone();
    checked.file_path.get_or_insert_with(String::new);
    checked.validate()?;
    Ok(options)
}

fn read_config_file(path: &Utf8Path) -> Result<Options, ConfigLoadError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigLoadError::Parse {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_flags_only() {
        let args = Args::parse_from(["rinse", "-t", "jsx,imports", "--production", "a.js"]);
        let options = load_options(&args).unwrap();
        assert_eq!(options.transforms, Transforms::JSX | Transforms::IMPORTS);
        assert!(options.production);
        assert!(!options.disable_es_transforms);
    }

    #[test]
    fn test_unknown_transform() {
        let args = Args::parse_from(["rinse", "-t", "coffee", "a.js"]);
        let error = load_options(&args).unwrap_err();
        assert_eq!(error.to_string(), "Unknown transform: \"coffee\"");
    }

    #[test]
    fn test_conflicting_dialects() {
        let args = Args::parse_from(["rinse", "-t", "typescript,flow", "a.js"]);
        assert!(matches!(
            load_options(&args),
            Err(ConfigLoadError::Options(ConfigError::ConflictingDialects))
        ));
    }

    #[test]
    fn test_config_file_with_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"transforms": ["typescript"], "jsxPragma": "h", "keepUnusedImports": true}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let args = Args::parse_from(["rinse", "--config", path, "--jsx-pragma", "preact.h", "a.ts"]);
        let options = load_options(&args).unwrap();
        assert_eq!(options.transforms, Transforms::TYPESCRIPT);
        assert_eq!(options.jsx_pragma.as_deref(), Some("preact.h"));
        assert!(options.keep_unused_imports);

        let args = Args::parse_from(["rinse", "--config", path, "-t", "flow", "a.ts"]);
        assert_eq!(load_options(&args).unwrap().transforms, Transforms::FLOW);
    }

    #[test]
    fn test_invalid_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"transforms": "jsx"}}"#).unwrap();
        let args = Args::parse_from(["rinse", "--config", file.path().to_str().unwrap(), "a.js"]);
        assert!(matches!(load_options(&args), Err(ConfigLoadError::Parse { .. })));
    }
}
