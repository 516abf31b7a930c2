//! The output cursor: walks the token list once, copying, replacing or
//! removing each token while carrying over the whitespace and comments
//! between them.

use crate::error::TransformError;
use crate::helpers::{HelperManager, Helpers};
use rinse_parser::{ContextualKeyword, Token, TokenType};

/// A point to rewind the cursor and output to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    code_len: usize,
    token_index: usize,
}

#[derive(Debug)]
pub struct TokenProcessor<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    /// Returned for reads past the last token.
    eof: Token,
    is_flow_enabled: bool,
    disable_es_transforms: bool,
    pub helpers: HelperManager,
    result_code: String,
    token_index: usize,
}

impl<'a> TokenProcessor<'a> {
    /// Takes the parser's tokens, dropping the trailing `Eof`.
    pub fn new(
        source: &'a str,
        mut tokens: Vec<Token>,
        is_flow_enabled: bool,
        disable_es_transforms: bool,
        helpers: HelperManager,
    ) -> Self {
        if tokens.last().is_some_and(|token| token.kind == TokenType::Eof) {
            tokens.pop();
        }
        let eof = Token {
            kind: TokenType::Eof,
            start: source.len(),
            end: source.len(),
            ..Token::default()
        };
        Self {
            source,
            tokens,
            eof,
            is_flow_enabled,
            disable_es_transforms,
            helpers,
            result_code: String::with_capacity(source.len()),
            token_index: 0,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// For passes that annotate tokens before any output is written.
    pub fn tokens_mut(&mut self) -> &mut [Token] {
        &mut self.tokens
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            code_len: self.result_code.len(),
            token_index: self.token_index,
        }
    }

    pub fn restore_to_snapshot(&mut self, snapshot: Snapshot) {
        self.result_code.truncate(snapshot.code_len);
        self.token_index = snapshot.token_index;
    }

    // === Queries ===

    pub fn token_at(&self, index: usize) -> &Token {
        self.tokens.get(index).unwrap_or(&self.eof)
    }

    pub fn current_token(&self) -> &Token {
        self.token_at(self.token_index)
    }

    /// The token `offset` positions away from the cursor; out of range reads
    /// return an `Eof` token.
    pub fn token_at_relative_index(&self, offset: isize) -> &Token {
        match self.token_index.checked_add_signed(offset) {
            Some(index) => self.token_at(index),
            None => &self.eof,
        }
    }

    pub fn current_index(&self) -> usize {
        self.token_index
    }

    pub fn is_at_end(&self) -> bool {
        self.token_index >= self.tokens.len()
    }

    pub fn text_for_token(&self, token: &Token) -> &'a str {
        token.text(self.source)
    }

    pub fn current_token_code(&self) -> &'a str {
        self.text_for_token(self.current_token())
    }

    pub fn identifier_name(&self) -> &'a str {
        self.current_token_code()
    }

    pub fn identifier_name_at_index(&self, index: usize) -> &'a str {
        self.text_for_token(self.token_at(index))
    }

    pub fn identifier_name_at_relative_index(&self, offset: isize) -> &'a str {
        self.text_for_token(self.token_at_relative_index(offset))
    }

    /// The contents of a string literal token, without its quotes.
    pub fn string_value_for_token(&self, token: &Token) -> &'a str {
        if token.end < token.start + 2 {
            return "";
        }
        self.source.get(token.start + 1..token.end - 1).unwrap_or("")
    }

    pub fn string_value(&self) -> &'a str {
        self.string_value_for_token(self.current_token())
    }

    pub fn string_value_at_index(&self, index: usize) -> &'a str {
        self.string_value_for_token(self.token_at(index))
    }

    pub fn matches1_at_index(&self, index: usize, kind: TokenType) -> bool {
        self.token_at(index).kind == kind
    }

    pub fn matches2_at_index(&self, index: usize, first: TokenType, second: TokenType) -> bool {
        self.matches1_at_index(index, first) && self.matches1_at_index(index + 1, second)
    }

    pub fn matches3_at_index(
        &self,
        index: usize,
        first: TokenType,
        second: TokenType,
        third: TokenType,
    ) -> bool {
        self.matches2_at_index(index, first, second) && self.matches1_at_index(index + 2, third)
    }

    pub fn matches1(&self, kind: TokenType) -> bool {
        self.matches1_at_index(self.token_index, kind)
    }

    pub fn matches2(&self, first: TokenType, second: TokenType) -> bool {
        self.matches2_at_index(self.token_index, first, second)
    }

    pub fn matches3(&self, first: TokenType, second: TokenType, third: TokenType) -> bool {
        self.matches3_at_index(self.token_index, first, second, third)
    }

    pub fn matches4(&self, kinds: [TokenType; 4]) -> bool {
        self.matches_sequence(&kinds)
    }

    pub fn matches5(&self, kinds: [TokenType; 5]) -> bool {
        self.matches_sequence(&kinds)
    }

    fn matches_sequence(&self, kinds: &[TokenType]) -> bool {
        kinds
            .iter()
            .enumerate()
            .all(|(offset, kind)| self.matches1_at_index(self.token_index + offset, *kind))
    }

    pub fn matches_contextual_at_index(&self, index: usize, keyword: ContextualKeyword) -> bool {
        self.token_at(index).is_contextual(keyword)
    }

    pub fn matches_contextual(&self, keyword: ContextualKeyword) -> bool {
        self.matches_contextual_at_index(self.token_index, keyword)
    }

    pub fn matches_context_id_and_label(&self, kind: TokenType, context_id: Option<u32>) -> bool {
        self.matches1(kind) && self.current_token().context_id == context_id
    }

    // === Emission ===

    /// Source text between the previous token and the current one. Flow
    /// pragmas are dropped from comments when Flow is stripped.
    pub fn previous_whitespace_and_comments(&self) -> String {
        let start = match self.token_index {
            0 => 0,
            index => self.token_at(index - 1).end,
        };
        let end = self.current_token().start.max(start);
        let text = self.source.get(start..end).unwrap_or("");
        if self.is_flow_enabled {
            text.replace("@flow", "")
        } else {
            text.to_string()
        }
    }

    pub fn replace_token(&mut self, new_code: &str) {
        let whitespace = self.previous_whitespace_and_comments();
        self.result_code.push_str(&whitespace);
        self.emit_current(None, new_code);
    }

    /// Like [`Self::replace_token`], but keeps only the newlines of the
    /// preceding whitespace so that line numbers stay aligned.
    pub fn replace_token_trimming_left_whitespace(&mut self, new_code: &str) {
        let whitespace = self.previous_whitespace_and_comments();
        self.result_code
            .extend(whitespace.chars().filter(|ch| matches!(ch, '\r' | '\n')));
        self.emit_current(None, new_code);
    }

    pub fn remove_initial_token(&mut self) {
        self.replace_token("");
    }

    pub fn remove_token(&mut self) {
        self.replace_token_trimming_left_whitespace("");
    }

    /// Removes tokens up to, but not including, the `}` that closes the
    /// current brace depth.
    pub fn remove_balanced_code(&mut self) {
        let mut brace_depth = 0usize;
        while !self.is_at_end() {
            if self.matches1(TokenType::BraceL) {
                brace_depth += 1;
            } else if self.matches1(TokenType::BraceR) {
                if brace_depth == 0 {
                    return;
                }
                brace_depth -= 1;
            }
            self.remove_token();
        }
    }

    pub fn copy_expected_token(&mut self, kind: TokenType) -> Result<(), TransformError> {
        if !self.matches1(kind) {
            return Err(TransformError::structure(format!(
                "Expected token {}",
                kind.label()
            )));
        }
        self.copy_token();
        Ok(())
    }

    pub fn copy_token(&mut self) {
        let whitespace = self.previous_whitespace_and_comments();
        self.result_code.push_str(&whitespace);
        let code = self.current_token_code();
        self.emit_current(None, code);
    }

    pub fn copy_token_with_prefix(&mut self, prefix: &str) {
        let whitespace = self.previous_whitespace_and_comments();
        self.result_code.push_str(&whitespace);
        let code = self.current_token_code();
        self.emit_current(Some(prefix), code);
    }

    pub fn append_code(&mut self, code: &str) {
        self.result_code.push_str(code);
    }

    fn emit_current(&mut self, prefix: Option<&str>, code: &str) {
        self.append_token_prefix();
        if let Some(prefix) = prefix {
            self.result_code.push_str(prefix);
        }
        self.result_code.push_str(code);
        self.append_token_suffix();
        self.token_index += 1;
    }

    /// Opens the helper calls for optional chains and nullish coalescing
    /// that start at the current token.
    fn append_token_prefix(&mut self) {
        let index = self.token_index;
        let Some(token) = self.tokens.get(index) else {
            return;
        };
        if token.num_nullish_coalesce_starts == 0 && !token.is_optional_chain_start {
            return;
        }
        let is_async = is_async_operation(&self.tokens, index);
        let (nullish_starts, is_chain_start) = match self.tokens.get_mut(index) {
            Some(token) => {
                token.is_async_operation = is_async;
                (token.num_nullish_coalesce_starts, token.is_optional_chain_start)
            }
            None => return,
        };
        if self.disable_es_transforms {
            return;
        }

        for _ in 0..nullish_starts {
            if is_async {
                self.result_code.push_str("await ");
                let name = self.helpers.get_helper_name(Helpers::ASYNC_NULLISH_COALESCE);
                self.result_code.push_str(name);
            } else {
                let name = self.helpers.get_helper_name(Helpers::NULLISH_COALESCE);
                self.result_code.push_str(name);
            }
            self.result_code.push('(');
        }
        if is_chain_start {
            if is_async {
                self.result_code.push_str("await ");
            }
            let after_delete = index > 0 && self.token_at(index - 1).kind == TokenType::Delete;
            let helper = match (after_delete, is_async) {
                (true, true) => Helpers::ASYNC_OPTIONAL_CHAIN_DELETE,
                (true, false) => Helpers::OPTIONAL_CHAIN_DELETE,
                (false, true) => Helpers::ASYNC_OPTIONAL_CHAIN,
                (false, false) => Helpers::OPTIONAL_CHAIN,
            };
            let name = self.helpers.get_helper_name(helper);
            self.result_code.push_str(name);
            self.result_code.push_str("([");
        }
    }

    fn append_token_suffix(&mut self) {
        if self.disable_es_transforms {
            return;
        }
        let Some(token) = self.tokens.get(self.token_index) else {
            return;
        };
        let (chain_end, nullish_ends) = (token.is_optional_chain_end, token.num_nullish_coalesce_ends);
        if chain_end {
            self.result_code.push_str("])");
        }
        for _ in 0..nullish_ends {
            self.result_code.push_str("))");
        }
    }

    pub fn next_token(&mut self) -> Result<(), TransformError> {
        if self.is_at_end() {
            return Err(TransformError::structure("Unexpectedly reached end of input."));
        }
        self.token_index += 1;
        Ok(())
    }

    pub fn previous_token(&mut self) {
        self.token_index = self.token_index.saturating_sub(1);
    }

    /// Appends the trailing whitespace and returns the output.
    pub fn finish(mut self) -> Result<(String, HelperManager), TransformError> {
        if !self.is_at_end() {
            return Err(TransformError::structure(
                "Tried to finish processing tokens before reaching the end.",
            ));
        }
        let whitespace = self.previous_whitespace_and_comments();
        self.result_code.push_str(&whitespace);
        Ok((self.result_code, self.helpers))
    }
}

/// Whether the optional chain or nullish expression starting at `start`
/// contains an `await` at its own scope depth.
fn is_async_operation(tokens: &[Token], start: usize) -> bool {
    let Some(start_token) = tokens.get(start) else {
        return false;
    };
    let mut depth: i64 = 0;
    for token in &tokens[start..] {
        if token.is_optional_chain_start {
            depth += 1;
        }
        if token.is_optional_chain_end {
            depth -= 1;
        }
        depth += i64::from(token.num_nullish_coalesce_starts);
        depth -= i64::from(token.num_nullish_coalesce_ends);
        if token.contextual_keyword == ContextualKeyword::Await
            && token.identifier_role.is_none()
            && token.scope_depth == start_token.scope_depth
        {
            return true;
        }
        if depth <= 0 {
            break;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name_manager::NameManager;
    use pretty_assertions::assert_eq;
    use rinse_parser::{parse_file, Dialect};

    fn processor(source: &str, flow: bool) -> TokenProcessor<'_> {
        let dialect = Dialect {
            flow,
            ..Dialect::default()
        };
        let file = parse_file(source, dialect).unwrap();
        let mut names = NameManager::new(source, &file.tokens);
        let helpers = HelperManager::new(&mut names);
        TokenProcessor::new(source, file.tokens, flow, false, helpers)
    }

    #[test]
    fn test_copy_all_reproduces_source() {
        let source = "// lead\nlet a = /* b */ 1;\n\n";
        let mut tokens = processor(source, false);
        while !tokens.is_at_end() {
            tokens.copy_token();
        }
        let (code, _) = tokens.finish().unwrap();
        assert_eq!(code, source);
    }

    #[test]
    fn test_remove_token_keeps_newlines() {
        let source = "a\n  /* c */ b;";
        let mut tokens = processor(source, false);
        tokens.copy_token();
        tokens.remove_token();
        tokens.copy_token();
        let (code, _) = tokens.finish().unwrap();
        assert_eq!(code, "a\n;");
    }

    #[test]
    fn test_flow_pragma_is_dropped() {
        let source = "// @flow\nx;";
        let mut tokens = processor(source, true);
        tokens.copy_token();
        tokens.copy_token();
        let (code, _) = tokens.finish().unwrap();
        assert_eq!(code, "// \nx;");
    }

    #[test]
    fn test_snapshot_restore() {
        let source = "a; b;";
        let mut tokens = processor(source, false);
        let snapshot = tokens.snapshot();
        tokens.copy_token();
        tokens.copy_token();
        tokens.restore_to_snapshot(snapshot);
        assert_eq!(tokens.current_index(), 0);
        tokens.replace_token("c");
        assert_eq!(tokens.current_index(), 1);
    }

    #[test]
    fn test_out_of_range_reads_are_eof() {
        let tokens = processor("a", false);
        assert_eq!(tokens.tokens().len(), 1);
        assert_eq!(tokens.token_at(5).kind, TokenType::Eof);
        assert_eq!(tokens.token_at_relative_index(-1).kind, TokenType::Eof);
        assert!(!tokens.matches2(TokenType::Name, TokenType::Name));
    }
}
