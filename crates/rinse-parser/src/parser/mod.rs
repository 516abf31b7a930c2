//! Recursive descent traversal that annotates tokens instead of building a tree.
//!
//! The grammar is split across `impl Parser` blocks: statements, expressions,
//! binding patterns, and one block per syntax extension under `plugins`.

mod expression;
mod lval;
mod statement;

use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::state::{Scope, State};
use crate::tokenizer::{ContextualKeyword, IdentifierRole, TokenType};
use crate::Dialect;

/// The parser for one file.
pub struct Parser<'src> {
    /// The source being parsed.
    pub(crate) input: &'src str,
    pub(crate) state: State,
    pub(crate) is_jsx_enabled: bool,
    pub(crate) is_typescript_enabled: bool,
    pub(crate) is_flow_enabled: bool,
    next_context_id: u32,
}

impl<'src> Parser<'src> {
    pub fn new(input: &'src str, dialect: Dialect) -> Self {
        Self {
            input,
            state: State::default(),
            is_jsx_enabled: dialect.jsx,
            is_typescript_enabled: dialect.typescript,
            is_flow_enabled: dialect.flow,
            next_context_id: 1,
        }
    }

    /// Parses the whole file, leaving tokens and scopes in the state.
    pub(crate) fn parse_top_level(&mut self) {
        self.next_token();
        self.parse_block_body(TokenType::Eof);
        let end = self.state.tokens.len();
        self.state.scopes.push(Scope::new(0, end, true));
    }

    pub(crate) fn into_state(self) -> State {
        self.state
    }

    // === Errors ===

    /// Records an "Unexpected token" error at the current token.
    pub(crate) fn unexpected(&mut self) {
        self.unexpected_with(SyntaxErrorKind::UnexpectedToken, self.state.start);
    }

    /// Records the first syntax error and forces the token stream to end.
    pub(crate) fn unexpected_with(&mut self, kind: SyntaxErrorKind, pos: usize) {
        if self.state.error.is_some() {
            return;
        }
        self.state.error = Some(SyntaxError { kind, pos });
        self.state.pos = self.input.len();
        self.finish_token(TokenType::Eof);
    }

    pub(crate) fn unexpected_message(&mut self, message: &'static str) {
        self.unexpected_with(SyntaxErrorKind::Message(message), self.state.start);
    }

    #[inline]
    pub(crate) fn has_error(&self) -> bool {
        self.state.error.is_some()
    }

    // === Token helpers ===

    pub(crate) fn next_context_id(&mut self) -> u32 {
        let id = self.next_context_id;
        self.next_context_id += 1;
        id
    }

    #[inline]
    pub(crate) fn is_contextual(&self, keyword: ContextualKeyword) -> bool {
        self.state.contextual_keyword == keyword
    }

    pub(crate) fn is_lookahead_contextual(&mut self, keyword: ContextualKeyword) -> bool {
        let lookahead = self.lookahead_type_and_keyword();
        lookahead.kind == TokenType::Name && lookahead.contextual_keyword == keyword
    }

    pub(crate) fn eat_contextual(&mut self, keyword: ContextualKeyword) -> bool {
        self.state.contextual_keyword == keyword && self.eat(TokenType::Name)
    }

    pub(crate) fn expect_contextual(&mut self, keyword: ContextualKeyword) {
        if !self.eat_contextual(keyword) {
            self.unexpected();
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenType) {
        if !self.eat(kind) {
            self.unexpected_with(SyntaxErrorKind::Expected(kind), self.state.start);
        }
    }

    pub(crate) fn can_insert_semicolon(&self) -> bool {
        self.is(TokenType::Eof) || self.is(TokenType::BraceR) || self.has_preceding_line_break()
    }

    pub(crate) fn has_preceding_line_break(&self) -> bool {
        let last_end = self.state.last_token().map_or(0, |token| token.end);
        self.contains_line_break(last_end, self.state.start)
    }

    pub(crate) fn has_following_line_break(&self) -> bool {
        let next_start = self.next_token_start();
        self.contains_line_break(self.state.end, next_start)
    }

    fn contains_line_break(&self, from: usize, to: usize) -> bool {
        self.input
            .get(from..to)
            .is_some_and(|text| text.chars().any(crate::tokenizer::is_line_terminator))
    }

    pub(crate) fn is_line_terminator(&mut self) -> bool {
        self.eat(TokenType::Semi) || self.can_insert_semicolon()
    }

    pub(crate) fn semicolon(&mut self) {
        if !self.is_line_terminator() {
            self.unexpected_with(SyntaxErrorKind::ExpectedSemicolon, self.state.start);
        }
    }

    /// Index the next consumed token will get.
    #[inline]
    pub(crate) fn token_index(&self) -> usize {
        self.state.tokens.len()
    }

    pub(crate) fn set_last_context_id(&mut self, context_id: u32) {
        if let Some(token) = self.state.last_token_mut() {
            token.context_id = Some(context_id);
        }
    }

    pub(crate) fn set_last_role(&mut self, role: IdentifierRole) {
        if let Some(token) = self.state.last_token_mut() {
            token.identifier_role = Some(role);
        }
    }

    /// Retypes the last consumed token once the parser knows what it is.
    pub(crate) fn set_last_kind(&mut self, kind: TokenType) {
        if let Some(token) = self.state.last_token_mut() {
            token.kind = kind;
        }
    }

    pub(crate) fn set_context_id_at(&mut self, index: usize, context_id: u32) {
        if let Some(token) = self.state.tokens.get_mut(index) {
            token.context_id = Some(context_id);
        }
    }

    /// Records on the `=` at `eq_index` that its right-hand side ends here.
    pub(crate) fn mark_rhs_end(&mut self, eq_index: usize) {
        let end = self.state.tokens.len();
        if let Some(token) = self.state.tokens.get_mut(eq_index) {
            token.rhs_end_index = Some(end);
        }
    }

    pub(crate) fn push_scope(&mut self, start: usize, is_function_scope: bool) {
        let end = self.state.tokens.len();
        self.state.scopes.push(Scope::new(start, end, is_function_scope));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_wins() {
        let mut parser = Parser::new("a b c", Dialect::default());
        parser.next_token();
        parser.unexpected_with(SyntaxErrorKind::UnexpectedToken, 2);
        parser.unexpected_with(SyntaxErrorKind::UnexpectedEof, 4);
        assert_eq!(parser.state.error.map(|error| error.pos), Some(2));
        assert!(parser.is(TokenType::Eof));
    }

    #[test]
    fn test_preceding_line_break() {
        let mut parser = Parser::new("a\nb", Dialect::default());
        parser.next_token();
        parser.next();
        assert!(parser.has_preceding_line_break());
        assert!(parser.can_insert_semicolon());
    }
}
