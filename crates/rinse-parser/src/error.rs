//! Parse error types.

use crate::tokenizer::TokenType;
use source_map::LineIndex;
use thiserror::Error;

/// The kind of syntax error recorded by the tokenizer or parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("Unexpected token")]
    UnexpectedToken,

    #[error("Unexpected token, expected \"{0}\"")]
    Expected(TokenType),

    #[error("Unexpected token, expected \";\"")]
    ExpectedSemicolon,

    #[error("Unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("Unterminated string constant")]
    UnterminatedString,

    #[error("Unterminated template")]
    UnterminatedTemplate,

    #[error("Unterminated comment")]
    UnterminatedComment,

    #[error("Unterminated regular expression")]
    UnterminatedRegexp,

    #[error("Unterminated JSX contents")]
    UnterminatedJsxContents,

    #[error("Unexpectedly reached the end of input.")]
    UnexpectedEof,

    #[error("{0}")]
    Message(&'static str),
}

/// The sticky error slot of a parse: a kind and the byte offset it points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub pos: usize,
}

/// An error returned from [`crate::parse_file`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Cannot combine flow and typescript plugins.")]
    ConflictingDialects,

    /// A syntax error with its 1-based line and column.
    #[error("{kind} ({line}:{column})")]
    Syntax {
        kind: SyntaxErrorKind,
        pos: usize,
        line: u32,
        column: u32,
    },
}

impl ParseError {
    /// Attaches a line/column location to a recorded syntax error.
    pub fn from_syntax_error(error: SyntaxError, source: &str) -> Self {
        let pos = error.pos.min(source.len());
        let loc = LineIndex::new(source)
            .line_col((pos as u32).into())
            .unwrap_or_default();
        ParseError::Syntax {
            kind: error.kind,
            pos,
            line: loc.line + 1,
            column: loc.col + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ParseError::from_syntax_error(
            SyntaxError {
                kind: SyntaxErrorKind::Expected(TokenType::ParenR),
                pos: 9,
            },
            "let a;\nf(a b",
        );
        assert_eq!(error.to_string(), "Unexpected token, expected \")\" (2:3)");
    }

    #[test]
    fn test_conflicting_dialects_message() {
        assert_eq!(
            ParseError::ConflictingDialects.to_string(),
            "Cannot combine flow and typescript plugins."
        );
    }
}
