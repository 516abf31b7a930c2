//! Mutable parser state and snapshots for backtracking.

use crate::error::SyntaxError;
use crate::tokenizer::{ContextualKeyword, Token, TokenType};

/// A lexical region closed during parsing.
///
/// Scopes are stored flat in the order they close, so a child always appears
/// before its ancestors and its token range is contained in theirs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub start_token_index: usize,
    pub end_token_index: usize,
    pub is_function_scope: bool,
}

impl Scope {
    pub fn new(start_token_index: usize, end_token_index: usize, is_function_scope: bool) -> Self {
        Self {
            start_token_index,
            end_token_index,
            is_function_scope,
        }
    }
}

/// Everything needed to rewind the parser to an earlier point.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    potential_arrow_at: Option<usize>,
    no_anon_function_type: bool,
    in_disallow_conditional_types_context: bool,
    tokens_len: usize,
    scopes_len: usize,
    pos: usize,
    kind: TokenType,
    contextual_keyword: ContextualKeyword,
    start: usize,
    end: usize,
    is_type: bool,
    scope_depth: u32,
    error: Option<SyntaxError>,
}

/// Shared state of one parse.
///
/// `kind`, `start`, `end` and `contextual_keyword` describe the current
/// (lookahead) token, which is only pushed onto `tokens` once the parser
/// consumes it.
#[derive(Debug, Default)]
pub struct State {
    /// Start offset of an expression that may turn out to be arrow parameters.
    pub potential_arrow_at: Option<usize>,
    /// Flow: disallows `A => B` function types in the current position.
    pub no_anon_function_type: bool,
    /// TypeScript: disallows conditional types while parsing an `extends` constraint.
    pub in_disallow_conditional_types_context: bool,
    pub tokens: Vec<Token>,
    pub scopes: Vec<Scope>,
    pub pos: usize,
    pub kind: TokenType,
    pub contextual_keyword: ContextualKeyword,
    pub start: usize,
    pub end: usize,
    pub is_type: bool,
    pub scope_depth: u32,
    /// First syntax error, if any. Once set, the current token is always `Eof`.
    pub error: Option<SyntaxError>,
}

impl State {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            potential_arrow_at: self.potential_arrow_at,
            no_anon_function_type: self.no_anon_function_type,
            in_disallow_conditional_types_context: self.in_disallow_conditional_types_context,
            tokens_len: self.tokens.len(),
            scopes_len: self.scopes.len(),
            pos: self.pos,
            kind: self.kind,
            contextual_keyword: self.contextual_keyword,
            start: self.start,
            end: self.end,
            is_type: self.is_type,
            scope_depth: self.scope_depth,
            error: self.error,
        }
    }

    pub fn restore_from_snapshot(&mut self, snapshot: Snapshot) {
        self.potential_arrow_at = snapshot.potential_arrow_at;
        self.no_anon_function_type = snapshot.no_anon_function_type;
        self.in_disallow_conditional_types_context = snapshot.in_disallow_conditional_types_context;
        self.tokens.truncate(snapshot.tokens_len);
        self.scopes.truncate(snapshot.scopes_len);
        self.pos = snapshot.pos;
        self.kind = snapshot.kind;
        self.contextual_keyword = snapshot.contextual_keyword;
        self.start = snapshot.start;
        self.end = snapshot.end;
        self.is_type = snapshot.is_type;
        self.scope_depth = snapshot.scope_depth;
        self.error = snapshot.error;
    }

    /// The most recently consumed token.
    #[inline]
    pub fn last_token_mut(&mut self) -> Option<&mut Token> {
        self.tokens.last_mut()
    }

    #[inline]
    pub fn last_token(&self) -> Option<&Token> {
        self.tokens.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_truncates_tokens_and_scopes() {
        let mut state = State::default();
        state.tokens.push(Token::default());
        let snapshot = state.snapshot();
        state.tokens.push(Token::default());
        state.scopes.push(Scope::new(0, 2, false));
        state.scope_depth = 3;
        state.restore_from_snapshot(snapshot);
        assert_eq!(state.tokens.len(), 1);
        assert!(state.scopes.is_empty());
        assert_eq!(state.scope_depth, 0);
    }
}
