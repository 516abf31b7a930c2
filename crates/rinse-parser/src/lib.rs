//! Tokenizer and minimal parser for JavaScript with JSX, TypeScript and Flow.
//!
//! The parser never builds a syntax tree. It walks the grammar once and
//! leaves behind a flat token list where each token carries what later
//! transforms need: whether it belongs to a type, what role an identifier
//! plays, which tokens pair up, and the scopes that were closed.
//!
//! # Example
//!
//! ```
//! use rinse_parser::{parse_file, Dialect, IdentifierRole};
//!
//! let source = "import a from 'a';\nconst b: number = a;";
//! let dialect = Dialect { typescript: true, ..Dialect::default() };
//! let file = parse_file(source, dialect).unwrap();
//!
//! assert_eq!(file.tokens[1].identifier_role, Some(IdentifierRole::ImportDeclaration));
//! assert!(file.tokens.iter().any(|token| token.is_type && token.text(source) == "number"));
//! ```

mod error;
mod parser;
mod plugins;
mod state;
pub mod tokenizer;

pub use error::{ParseError, SyntaxErrorKind};
pub use state::Scope;
pub use tokenizer::{ContextualKeyword, IdentifierRole, Token, TokenType};

use parser::Parser;

/// Which syntax extensions are enabled for a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dialect {
    pub jsx: bool,
    pub typescript: bool,
    pub flow: bool,
}

/// The annotated tokens and closed scopes of a file.
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    /// Every token in order, ending with `Eof`.
    pub tokens: Vec<Token>,
    /// Scopes in the order they closed; the last one is the whole file.
    pub scopes: Vec<Scope>,
}

/// Tokenizes and parses `source`.
///
/// Parsing stops at the first syntax error, which is reported with its
/// 1-based line and column.
pub fn parse_file(source: &str, dialect: Dialect) -> Result<ParsedFile, ParseError> {
    if dialect.typescript && dialect.flow {
        return Err(ParseError::ConflictingDialects);
    }

    let mut parser = Parser::new(source, dialect);
    parser.parse_top_level();
    let state = parser.into_state();
    if let Some(error) = state.error {
        let error = ParseError::from_syntax_error(error, source);
        tracing::debug!(%error, "parse failed");
        return Err(error);
    }

    tracing::debug!(
        tokens = state.tokens.len(),
        scopes = state.scopes.len(),
        "parsed file"
    );
    Ok(ParsedFile {
        tokens: state.tokens,
        scopes: state.scopes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_empty() {
        let file = parse_file("", Dialect::default()).unwrap();
        assert_eq!(file.tokens.len(), 1);
        assert_eq!(file.tokens[0].kind, TokenType::Eof);
        assert_eq!(file.scopes, vec![Scope::new(0, 1, true)]);
    }

    #[test]
    fn test_conflicting_dialects() {
        let dialect = Dialect {
            typescript: true,
            flow: true,
            ..Dialect::default()
        };
        assert_eq!(parse_file("a;", dialect).unwrap_err(), ParseError::ConflictingDialects);
    }

    #[test]
    fn test_first_error_is_reported() {
        let error = parse_file("let x = ;\nlet y = ;", Dialect::default()).unwrap_err();
        assert_eq!(error.to_string(), "Unexpected token (1:9)");
    }
}
