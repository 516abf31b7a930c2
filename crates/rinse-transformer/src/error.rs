//! Transformation errors.

use rinse_parser::ParseError;
use thiserror::Error;

/// Invalid option combinations, rejected before any scanning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Both `typescript` and `flow` were requested.
    #[error("Cannot combine flow and typescript plugins.")]
    ConflictingDialects,

    /// `react-hot-loader` needs the JSX transform to find components.
    #[error("The react-hot-loader transform requires the jsx transform.")]
    HotLoaderWithoutJsx,

    /// `react-hot-loader` registers components under the file path.
    #[error("filePath is required when using the react-hot-loader transform.")]
    HotLoaderWithoutFilePath,

    /// A JSX pragma that is not a dotted identifier path.
    #[error("Invalid JSX pragma: {0:?}")]
    InvalidPragma(String),

    /// A transform name outside the known set.
    #[error("Unknown transform: {0:?}")]
    UnknownTransform(String),
}

/// An error from [`crate::transform`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The input failed to tokenize or parse.
    #[error(transparent)]
    Syntax(#[from] ParseError),

    /// The token stream did not have a shape a transformer relies on.
    #[error("{message}")]
    Structure { message: String },

    /// Any of the above, for a named file.
    #[error("Error transforming {path}: {source}")]
    InFile {
        path: String,
        #[source]
        source: Box<TransformError>,
    },
}

impl TransformError {
    pub(crate) fn structure(message: impl Into<String>) -> Self {
        TransformError::Structure {
            message: message.into(),
        }
    }

    /// Attaches a file path to the message.
    pub fn in_file(self, path: impl Into<String>) -> Self {
        TransformError::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// The error without any file path wrapper.
    pub fn root_cause(&self) -> &TransformError {
        match self {
            TransformError::InFile { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_in_file_prefix() {
        let error = TransformError::structure("Expected identifier for exported function name.")
            .in_file("src/a.ts");
        assert_eq!(
            error.to_string(),
            "Error transforming src/a.ts: Expected identifier for exported function name."
        );
        assert!(matches!(error.root_cause(), TransformError::Structure { .. }));
    }

    #[test]
    fn test_config_message_is_transparent() {
        let error = TransformError::from(ConfigError::ConflictingDialects);
        assert_eq!(error.to_string(), "Cannot combine flow and typescript plugins.");
    }
}
