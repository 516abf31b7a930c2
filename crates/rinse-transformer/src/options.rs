//! Transform options.

use crate::error::ConfigError;
use bitflags::bitflags;
use rinse_parser::tokenizer::{is_identifier_char, is_identifier_start};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// The set of enabled transforms.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Transforms: u8 {
        const JSX = 1 << 0;
        const TYPESCRIPT = 1 << 1;
        const FLOW = 1 << 2;
        const IMPORTS = 1 << 3;
        const REACT_HOT_LOADER = 1 << 4;
        const JEST = 1 << 5;
    }
}

const TRANSFORM_NAMES: [(&str, Transforms); 6] = [
    ("jsx", Transforms::JSX),
    ("typescript", Transforms::TYPESCRIPT),
    ("flow", Transforms::FLOW),
    ("imports", Transforms::IMPORTS),
    ("react-hot-loader", Transforms::REACT_HOT_LOADER),
    ("jest", Transforms::JEST),
];

impl Transforms {
    /// Looks up a single transform by its name, e.g. `react-hot-loader`.
    pub fn parse_name(name: &str) -> Result<Self, ConfigError> {
        TRANSFORM_NAMES
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, flag)| *flag)
            .ok_or_else(|| ConfigError::UnknownTransform(name.to_string()))
    }

    /// Names of the enabled transforms, in canonical order.
    pub fn names(self) -> Vec<&'static str> {
        TRANSFORM_NAMES
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect()
    }
}

impl FromStr for Transforms {
    type Err = ConfigError;

    /// Parses a comma-separated list such as `jsx,typescript,imports`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .try_fold(Transforms::empty(), |acc, name| Ok(acc | Transforms::parse_name(name)?))
    }
}

impl fmt::Display for Transforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(","))
    }
}

impl Serialize for Transforms {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.names().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Transforms {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        names.iter().try_fold(Transforms::empty(), |acc, name| {
            Transforms::parse_name(name)
                .map(|flag| acc | flag)
                .map_err(serde::de::Error::custom)
        })
    }
}

/// Source map settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMapOptions {
    /// Written to the map's `file` field.
    pub compiled_filename: String,
}

/// Options for [`crate::transform`].
///
/// Deserializes from the camelCase JSON shape used by config files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    pub transforms: Transforms,
    /// Element factory, `React.createElement` when unset.
    pub jsx_pragma: Option<String>,
    /// Fragment component, `React.Fragment` when unset.
    pub jsx_fragment_pragma: Option<String>,
    /// Plain `require` for `import *` and no interop wrapper for default imports.
    #[serde(rename = "enableLegacyTypeScriptModuleInterop")]
    pub enable_legacy_typescript_module_interop: bool,
    /// Appends `module.exports = exports.default` when only a default is exported.
    pub enable_legacy_babel5_module_interop: bool,
    pub source_map_options: Option<SourceMapOptions>,
    /// Used in error messages, JSX dev metadata and display name inference.
    pub file_path: Option<String>,
    /// Leaves out JSX dev metadata.
    pub production: bool,
    /// Skips optional chaining, nullish coalescing, numeric separator and
    /// optional catch binding lowering.
    #[serde(rename = "disableESTransforms")]
    pub disable_es_transforms: bool,
    /// Keeps imports even when none of their bindings are used as values.
    pub keep_unused_imports: bool,
    /// Leaves `import()` alone in CommonJS output.
    pub preserve_dynamic_import: bool,
    /// ESM output: `import a = require('a')` uses `createRequire(import.meta.url)`.
    pub inject_create_require_for_import_require: bool,
}

pub(crate) const DEFAULT_JSX_PRAGMA: &str = "React.createElement";
pub(crate) const DEFAULT_JSX_FRAGMENT_PRAGMA: &str = "React.Fragment";

impl Options {
    pub fn new(transforms: Transforms) -> Self {
        Self {
            transforms,
            ..Self::default()
        }
    }

    pub fn jsx_pragma(&self) -> &str {
        self.jsx_pragma.as_deref().unwrap_or(DEFAULT_JSX_PRAGMA)
    }

    pub fn jsx_fragment_pragma(&self) -> &str {
        self.jsx_fragment_pragma
            .as_deref()
            .unwrap_or(DEFAULT_JSX_FRAGMENT_PRAGMA)
    }

    /// Checks option combinations that can be rejected up front.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transforms.contains(Transforms::TYPESCRIPT | Transforms::FLOW) {
            return Err(ConfigError::ConflictingDialects);
        }
        if self.transforms.contains(Transforms::REACT_HOT_LOADER)
            && !self.transforms.contains(Transforms::JSX)
        {
            return Err(ConfigError::HotLoaderWithoutJsx);
        }
        if self.transforms.contains(Transforms::REACT_HOT_LOADER) && self.file_path.is_none() {
            return Err(ConfigError::HotLoaderWithoutFilePath);
        }
        for pragma in [&self.jsx_pragma, &self.jsx_fragment_pragma].into_iter().flatten() {
            if !is_dotted_identifier(pragma) {
                return Err(ConfigError::InvalidPragma(pragma.clone()));
            }
        }
        Ok(())
    }
}

fn is_dotted_identifier(path: &str) -> bool {
    path.split('.').all(|segment| {
        let mut chars = segment.chars();
        chars.next().is_some_and(is_identifier_start) && chars.all(is_identifier_char)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_transform_list() {
        let transforms: Transforms = "jsx, typescript,imports".parse().unwrap();
        assert_eq!(
            transforms,
            Transforms::JSX | Transforms::TYPESCRIPT | Transforms::IMPORTS
        );
        assert_eq!(transforms.to_string(), "jsx,typescript,imports");
        assert_eq!(
            "jsx,coffee".parse::<Transforms>(),
            Err(ConfigError::UnknownTransform("coffee".to_string()))
        );
    }

    #[test]
    fn test_parse_single_name() {
        assert_eq!(
            Transforms::parse_name("react-hot-loader"),
            Ok(Transforms::REACT_HOT_LOADER)
        );
        // Names are the dashed spellings, not the flag identifiers.
        assert_eq!(
            Transforms::parse_name("REACT_HOT_LOADER"),
            Err(ConfigError::UnknownTransform("REACT_HOT_LOADER".to_string()))
        );
    }

    #[test]
    fn test_deserialize_camel_case() {
        let options: Options = serde_json::from_str(
            r#"{
                "transforms": ["typescript", "imports"],
                "jsxPragma": "h",
                "enableLegacyTypeScriptModuleInterop": true,
                "disableESTransforms": true,
                "sourceMapOptions": {"compiledFilename": "out.js"}
            }"#,
        )
        .unwrap();
        assert_eq!(options.transforms, Transforms::TYPESCRIPT | Transforms::IMPORTS);
        assert_eq!(options.jsx_pragma(), "h");
        assert_eq!(options.jsx_fragment_pragma(), "React.Fragment");
        assert!(options.enable_legacy_typescript_module_interop);
        assert!(options.disable_es_transforms);
        assert_eq!(
            options.source_map_options,
            Some(SourceMapOptions {
                compiled_filename: "out.js".to_string()
            })
        );
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            Options::new(Transforms::TYPESCRIPT | Transforms::FLOW).validate(),
            Err(ConfigError::ConflictingDialects)
        );
        assert_eq!(
            Options::new(Transforms::REACT_HOT_LOADER).validate(),
            Err(ConfigError::HotLoaderWithoutJsx)
        );
        assert_eq!(
            Options::new(Transforms::REACT_HOT_LOADER | Transforms::JSX).validate(),
            Err(ConfigError::HotLoaderWithoutFilePath)
        );
        let options = Options {
            jsx_pragma: Some("preact.h-x".to_string()),
            ..Options::new(Transforms::JSX)
        };
        assert_eq!(
            options.validate(),
            Err(ConfigError::InvalidPragma("preact.h-x".to_string()))
        );
        let options = Options {
            jsx_pragma: Some("preact.h".to_string()),
            ..Options::new(Transforms::JSX)
        };
        assert_eq!(options.validate(), Ok(()));
    }
}
