//! Tokenizer driven one token at a time by the parser.
//!
//! Tokens are not produced up front: the parser asks for the next token and
//! may change how it is read (type context, JSX, templates, regular
//! expressions), so the tokenizer is a set of methods on [`Parser`].

mod keywords;
mod punct;
mod types;

pub use keywords::{classify_word, ContextualKeyword, Word};
pub use types::TokenType;

use crate::error::SyntaxErrorKind;
use crate::parser::Parser;
use punct::read_punct;

/// How an identifier token is used, as far as module rewriting cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierRole {
    Access,
    ExportAccess,
    TopLevelDeclaration,
    FunctionScopedDeclaration,
    BlockScopedDeclaration,
    ObjectShorthandTopLevelDeclaration,
    ObjectShorthandFunctionScopedDeclaration,
    ObjectShorthandBlockScopedDeclaration,
    ObjectShorthand,
    /// Any identifier bound by an import, as well as `import x = require()`.
    ImportDeclaration,
    ObjectKey,
    /// The local name in an import or export specifier, e.g. `a` in `export {a as b}`.
    ImportAccess,
}

/// A scanned token plus the annotations later passes attach to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenType,
    pub contextual_keyword: ContextualKeyword,
    pub start: usize,
    pub end: usize,
    pub scope_depth: u32,
    pub is_type: bool,
    pub identifier_role: Option<IdentifierRole>,
    /// Set by the shadowed-globals pass for identifiers that refer to a local
    /// binding hiding a module-level import or export.
    pub shadows_global: bool,
    /// Whether an optional chain or nullish expression starting here contains
    /// an `await`. Computed lazily while emitting.
    pub is_async_operation: bool,
    /// Shared by structurally paired tokens (class keyword and braces, call parens).
    pub context_id: Option<u32>,
    /// On `=` tokens: one past the last token of the right-hand side.
    pub rhs_end_index: Option<usize>,
    /// On `class` tokens: whether the class is an expression rather than a declaration.
    pub is_expression: bool,
    pub num_nullish_coalesce_starts: u32,
    pub num_nullish_coalesce_ends: u32,
    pub is_optional_chain_start: bool,
    pub is_optional_chain_end: bool,
    pub subscript_start_index: Option<usize>,
    pub nullish_start_index: Option<usize>,
}

impl Token {
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        source.get(self.start..self.end).unwrap_or("")
    }

    #[inline]
    pub fn is_name(&self) -> bool {
        self.kind == TokenType::Name
    }

    #[inline]
    pub fn is_contextual(&self, keyword: ContextualKeyword) -> bool {
        self.kind == TokenType::Name && self.contextual_keyword == keyword
    }

    pub fn is_declaration(&self) -> bool {
        matches!(
            self.identifier_role,
            Some(
                IdentifierRole::TopLevelDeclaration
                    | IdentifierRole::FunctionScopedDeclaration
                    | IdentifierRole::BlockScopedDeclaration
                    | IdentifierRole::ObjectShorthandTopLevelDeclaration
                    | IdentifierRole::ObjectShorthandFunctionScopedDeclaration
                    | IdentifierRole::ObjectShorthandBlockScopedDeclaration
            )
        )
    }

    pub fn is_non_top_level_declaration(&self) -> bool {
        matches!(
            self.identifier_role,
            Some(
                IdentifierRole::FunctionScopedDeclaration
                    | IdentifierRole::BlockScopedDeclaration
                    | IdentifierRole::ObjectShorthandFunctionScopedDeclaration
                    | IdentifierRole::ObjectShorthandBlockScopedDeclaration
            )
        )
    }

    pub fn is_top_level_declaration(&self) -> bool {
        matches!(
            self.identifier_role,
            Some(
                IdentifierRole::TopLevelDeclaration
                    | IdentifierRole::ObjectShorthandTopLevelDeclaration
                    | IdentifierRole::ImportDeclaration
            )
        )
    }

    /// Top-level declarations count as block scoped; the distinction does not
    /// matter for shadowing.
    pub fn is_block_scoped_declaration(&self) -> bool {
        matches!(
            self.identifier_role,
            Some(
                IdentifierRole::TopLevelDeclaration
                    | IdentifierRole::BlockScopedDeclaration
                    | IdentifierRole::ObjectShorthandTopLevelDeclaration
                    | IdentifierRole::ObjectShorthandBlockScopedDeclaration
            )
        )
    }

    pub fn is_function_scoped_declaration(&self) -> bool {
        matches!(
            self.identifier_role,
            Some(
                IdentifierRole::FunctionScopedDeclaration
                    | IdentifierRole::ObjectShorthandFunctionScopedDeclaration
            )
        )
    }

    pub fn is_object_shorthand_declaration(&self) -> bool {
        matches!(
            self.identifier_role,
            Some(
                IdentifierRole::ObjectShorthandTopLevelDeclaration
                    | IdentifierRole::ObjectShorthandFunctionScopedDeclaration
                    | IdentifierRole::ObjectShorthandBlockScopedDeclaration
            )
        )
    }
}

/// Type and contextual keyword of a token read ahead without consuming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeAndKeyword {
    pub kind: TokenType,
    pub contextual_keyword: ContextualKeyword,
}

// === Character classes ===

pub(crate) fn is_whitespace(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\u{0b}'
            | '\u{0c}'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
                | '\u{202f}'
                | '\u{205f}'
                | '\u{3000}'
                | '\u{feff}'
    )
}

pub(crate) fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

pub fn is_identifier_start(ch: char) -> bool {
    if ch.is_ascii() {
        ch.is_ascii_alphabetic() || ch == '$' || ch == '_'
    } else {
        !is_whitespace(ch) && !is_line_terminator(ch)
    }
}

pub fn is_identifier_char(ch: char) -> bool {
    is_identifier_start(ch) || ch.is_ascii_digit()
}

/// Returns the offset of the first non-whitespace, non-comment character at
/// or after `pos`.
pub(crate) fn skip_whitespace_and_comments(input: &str, mut pos: usize) -> usize {
    let bytes = input.as_bytes();
    while pos < bytes.len() {
        match bytes[pos] {
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                pos += 2;
                while let Some(ch) = input.get(pos..).and_then(|rest| rest.chars().next()) {
                    if is_line_terminator(ch) {
                        break;
                    }
                    pos += ch.len_utf8();
                }
            }
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                match input.get(pos + 2..).and_then(|rest| rest.find("*/")) {
                    Some(offset) => pos += offset + 4,
                    None => return pos,
                }
            }
            _ => match input.get(pos..).and_then(|rest| rest.chars().next()) {
                Some(ch) if is_whitespace(ch) || is_line_terminator(ch) => pos += ch.len_utf8(),
                _ => return pos,
            },
        }
    }
    pos
}

impl<'src> Parser<'src> {
    // === Character access ===

    /// Byte at `pos`, or 0 past the end of input.
    #[inline]
    pub(crate) fn byte_at(&self, pos: usize) -> u8 {
        self.input.as_bytes().get(pos).copied().unwrap_or(0)
    }

    #[inline]
    pub(crate) fn char_at(&self, pos: usize) -> Option<char> {
        self.input.get(pos..).and_then(|rest| rest.chars().next())
    }

    // === Token stream ===

    /// Snapshot of the current token, as pushed onto the token list.
    pub(crate) fn current_token(&self) -> Token {
        Token {
            kind: self.state.kind,
            contextual_keyword: self.state.contextual_keyword,
            start: self.state.start,
            end: self.state.end,
            scope_depth: self.state.scope_depth,
            is_type: self.state.is_type,
            ..Token::default()
        }
    }

    /// Consumes the current token and reads the next one.
    pub(crate) fn next(&mut self) {
        let token = self.current_token();
        self.state.tokens.push(token);
        self.next_token();
    }

    #[inline]
    pub(crate) fn is(&self, kind: TokenType) -> bool {
        self.state.kind == kind
    }

    pub(crate) fn eat(&mut self, kind: TokenType) -> bool {
        if self.is(kind) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Eats a token while forcing type context, so it is marked as a type token.
    pub(crate) fn eat_type_token(&mut self, kind: TokenType) {
        let old_is_type = self.state.is_type;
        self.state.is_type = true;
        self.eat(kind);
        self.state.is_type = old_is_type;
    }

    /// Enters type context, retroactively marking the last
    /// `existing_tokens_in_type` consumed tokens as types.
    pub(crate) fn push_type_context(&mut self, existing_tokens_in_type: usize) -> bool {
        let len = self.state.tokens.len();
        for token in &mut self.state.tokens[len.saturating_sub(existing_tokens_in_type)..] {
            token.is_type = true;
        }
        std::mem::replace(&mut self.state.is_type, true)
    }

    pub(crate) fn pop_type_context(&mut self, old_is_type: bool) {
        self.state.is_type = old_is_type;
    }

    pub(crate) fn lookahead_type(&mut self) -> TokenType {
        self.lookahead_type_and_keyword().kind
    }

    pub(crate) fn lookahead_type_and_keyword(&mut self) -> TypeAndKeyword {
        let snapshot = self.state.snapshot();
        self.next();
        let result = TypeAndKeyword {
            kind: self.state.kind,
            contextual_keyword: self.state.contextual_keyword,
        };
        self.state.restore_from_snapshot(snapshot);
        result
    }

    /// Offset where the token after the current one starts.
    pub(crate) fn next_token_start(&self) -> usize {
        skip_whitespace_and_comments(self.input, self.state.pos)
    }

    pub(crate) fn next_token_start_since(&self, pos: usize) -> usize {
        skip_whitespace_and_comments(self.input, pos)
    }

    pub(crate) fn lookahead_byte(&self) -> u8 {
        self.byte_at(self.next_token_start())
    }

    /// Reads the token starting at the current position into the state.
    pub(crate) fn next_token(&mut self) {
        self.skip_space();
        self.state.start = self.state.pos;
        if self.state.pos >= self.input.len() {
            let tokens = &self.state.tokens;
            let len = tokens.len();
            if len >= 2
                && tokens[len - 1].start >= self.input.len()
                && tokens[len - 2].start >= self.input.len()
            {
                self.unexpected_with(SyntaxErrorKind::UnexpectedEof, self.state.start);
            }
            self.finish_token(TokenType::Eof);
            return;
        }
        let code = self.byte_at(self.state.pos);
        let starts_word = match self.char_at(self.state.pos) {
            Some(ch) => is_identifier_start(ch) || ch == '\\',
            None => false,
        };
        if starts_word {
            self.read_word();
        } else {
            self.get_token_from_code(code);
        }
    }

    pub(crate) fn finish_token(&mut self, kind: TokenType) {
        self.finish_token_with_keyword(kind, ContextualKeyword::None);
    }

    fn finish_token_with_keyword(&mut self, kind: TokenType, keyword: ContextualKeyword) {
        self.state.end = self.state.pos;
        self.state.kind = kind;
        self.state.contextual_keyword = keyword;
    }

    pub(crate) fn finish_op(&mut self, kind: TokenType, size: usize) {
        self.state.pos += size;
        self.finish_token(kind);
    }

    // === Whitespace and comments ===

    pub(crate) fn skip_space(&mut self) {
        while self.state.pos < self.input.len() {
            match self.byte_at(self.state.pos) {
                b'/' => match self.byte_at(self.state.pos + 1) {
                    b'*' => {
                        self.state.pos += 2;
                        self.skip_block_comment();
                    }
                    b'/' => self.skip_line_comment(2),
                    _ => return,
                },
                // Only a shebang on the very first line.
                b'#' if self.state.pos == 0 && self.byte_at(1) == b'!' => self.skip_line_comment(2),
                _ => match self.char_at(self.state.pos) {
                    Some(ch) if is_whitespace(ch) || is_line_terminator(ch) => {
                        self.state.pos += ch.len_utf8();
                    }
                    _ => return,
                },
            }
        }
    }

    fn skip_block_comment(&mut self) {
        let start = self.state.pos - 2;
        match self.input[self.state.pos..].find("*/") {
            Some(offset) => self.state.pos += offset + 2,
            None => self.unexpected_with(SyntaxErrorKind::UnterminatedComment, start),
        }
    }

    fn skip_line_comment(&mut self, start_skip: usize) {
        self.state.pos += start_skip;
        while let Some(ch) = self.char_at(self.state.pos) {
            if is_line_terminator(ch) {
                break;
            }
            self.state.pos += ch.len_utf8();
        }
    }

    // === Words ===

    /// Advances over identifier characters, including `\u` escapes.
    pub(crate) fn skip_word(&mut self) {
        while let Some(ch) = self.char_at(self.state.pos) {
            if is_identifier_char(ch) {
                self.state.pos += ch.len_utf8();
            } else if ch == '\\' {
                self.state.pos += 2;
                if self.byte_at(self.state.pos) == b'{' {
                    while self.state.pos < self.input.len() && self.byte_at(self.state.pos) != b'}'
                    {
                        self.state.pos += 1;
                    }
                    self.state.pos += 1;
                }
            } else {
                break;
            }
        }
        self.state.pos = self.state.pos.min(self.input.len());
    }

    fn read_word(&mut self) {
        let start = self.state.pos;
        self.skip_word();
        match classify_word(&self.input[start..self.state.pos]) {
            Word::Keyword(kind) => self.finish_token(kind),
            Word::Name(keyword) => self.finish_token_with_keyword(TokenType::Name, keyword),
        }
    }

    // === Punctuation ===

    pub(crate) fn get_token_from_code(&mut self, code: u8) {
        let pos = self.state.pos;
        let next = self.byte_at(pos + 1);
        match code {
            b'.' if next.is_ascii_digit() => return self.read_number(true),
            b'0' if matches!(next, b'x' | b'X' | b'o' | b'O' | b'b' | b'B') => {
                return self.read_radix_number()
            }
            b'0'..=b'9' => return self.read_number(false),
            b'"' | b'\'' => return self.read_string(code),
            b'{' if self.is_flow_enabled && next == b'|' => {
                return self.finish_op(TokenType::BraceBarL, 2)
            }
            b'|' if self.is_flow_enabled && next == b'}' => {
                return self.finish_op(TokenType::BraceBarR, 2)
            }
            // `Array<<T>() => void>` holds two `<` tokens, but `<<=` is still an assignment.
            b'<' if self.state.is_type && next == b'<' && self.byte_at(pos + 2) != b'=' => {
                return self.finish_op(TokenType::LessThan, 1)
            }
            // `Array<Array<T>>` and `let a: Array<T>=[]`.
            b'>' if self.state.is_type => return self.finish_op(TokenType::GreaterThan, 1),
            b'?' if next == b'?' && self.is_flow_enabled && self.state.is_type => {
                return self.finish_op(TokenType::Question, 1)
            }
            b'?' if next == b'.' && self.byte_at(pos + 2).is_ascii_digit() => {
                return self.finish_op(TokenType::Question, 1)
            }
            // `*=>` can appear in Flow function types.
            b'*' if next == b'=' && self.byte_at(pos + 2) == b'>' => {
                return self.finish_op(TokenType::Star, 1)
            }
            b'%' if next == b'=' && self.byte_at(pos + 2) == b'>' => {
                return self.finish_op(TokenType::Modulo, 1)
            }
            _ => {}
        }
        match read_punct(&self.input[pos..]) {
            Some((kind, len)) => self.finish_op(kind, len),
            None => {
                let ch = self.char_at(pos).unwrap_or('\0');
                self.unexpected_with(SyntaxErrorKind::UnexpectedCharacter(ch), pos);
            }
        }
    }

    /// Re-reads a `>` token outside of type context, e.g. after `x as T>`.
    pub(crate) fn rescan_gt(&mut self) {
        if self.is(TokenType::GreaterThan) {
            self.state.pos -= 1;
            let pos = self.state.pos;
            match read_punct(&self.input[pos..]) {
                Some((kind, len)) => self.finish_op(kind, len),
                None => self.finish_op(TokenType::GreaterThan, 1),
            }
        }
    }

    /// Splits a `<<` token into its first `<`, for type arguments like `f<<T>() => T>()`.
    pub(crate) fn split_bit_shift_l(&mut self) {
        if self.is(TokenType::BitShiftL) {
            self.state.pos = self.state.start + 1;
            self.finish_token(TokenType::LessThan);
        }
    }

    // === Literals ===

    fn read_int(&mut self) {
        while matches!(self.byte_at(self.state.pos), b'0'..=b'9' | b'_') {
            self.state.pos += 1;
        }
    }

    fn read_radix_number(&mut self) {
        self.state.pos += 2;
        while matches!(
            self.byte_at(self.state.pos),
            b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F' | b'_'
        ) {
            self.state.pos += 1;
        }
        if self.byte_at(self.state.pos) == b'n' {
            self.state.pos += 1;
            self.finish_token(TokenType::Bigint);
        } else {
            self.finish_token(TokenType::Num);
        }
    }

    fn read_number(&mut self, starts_with_dot: bool) {
        if !starts_with_dot {
            self.read_int();
        }
        let mut next = self.byte_at(self.state.pos);
        if next == b'.' {
            self.state.pos += 1;
            self.read_int();
            next = self.byte_at(self.state.pos);
        }
        if next == b'e' || next == b'E' {
            self.state.pos += 1;
            if matches!(self.byte_at(self.state.pos), b'+' | b'-') {
                self.state.pos += 1;
            }
            self.read_int();
            next = self.byte_at(self.state.pos);
        }
        match next {
            b'n' => {
                self.state.pos += 1;
                self.finish_token(TokenType::Bigint);
            }
            b'm' => {
                self.state.pos += 1;
                self.finish_token(TokenType::Decimal);
            }
            _ => self.finish_token(TokenType::Num),
        }
    }

    fn read_string(&mut self, quote: u8) {
        self.state.pos += 1;
        loop {
            if self.state.pos >= self.input.len() {
                self.unexpected_with(SyntaxErrorKind::UnterminatedString, self.state.start);
                return;
            }
            let ch = self.byte_at(self.state.pos);
            if ch == b'\\' {
                self.state.pos += 1;
            } else if ch == quote {
                break;
            }
            self.state.pos += 1;
        }
        self.state.pos += 1;
        self.finish_token(TokenType::String);
    }

    /// Reads the next piece of a template literal: a quasi, `${` or the closing backquote.
    fn read_template_token(&mut self) {
        loop {
            if self.state.pos >= self.input.len() {
                self.unexpected_with(SyntaxErrorKind::UnterminatedTemplate, self.state.start);
                return;
            }
            let ch = self.byte_at(self.state.pos);
            if ch == b'`' || (ch == b'$' && self.byte_at(self.state.pos + 1) == b'{') {
                if self.state.pos == self.state.start && self.is(TokenType::Template) {
                    if ch == b'$' {
                        self.finish_op(TokenType::DollarBraceL, 2);
                    } else {
                        self.finish_op(TokenType::BackQuote, 1);
                    }
                    return;
                }
                self.finish_token(TokenType::Template);
                return;
            }
            if ch == b'\\' {
                self.state.pos += 1;
            }
            self.state.pos += 1;
        }
    }

    pub(crate) fn next_template_token(&mut self) {
        let token = self.current_token();
        self.state.tokens.push(token);
        self.state.start = self.state.pos;
        self.read_template_token();
    }

    /// Re-reads the current `/` or `/=` token as a regular expression literal.
    pub(crate) fn retokenize_slash_as_regex(&mut self) {
        if self.is(TokenType::Assign) {
            self.state.pos -= 1;
        }
        let start = self.state.start;
        let mut escaped = false;
        let mut in_class = false;
        loop {
            if self.state.pos >= self.input.len() {
                self.unexpected_with(SyntaxErrorKind::UnterminatedRegexp, start);
                return;
            }
            let ch = self.byte_at(self.state.pos);
            if escaped {
                escaped = false;
            } else {
                match ch {
                    b'[' => in_class = true,
                    b']' if in_class => in_class = false,
                    b'/' if !in_class => break,
                    b'\n' | b'\r' => {
                        self.unexpected_with(SyntaxErrorKind::UnterminatedRegexp, start);
                        return;
                    }
                    _ => {}
                }
                escaped = ch == b'\\';
            }
            self.state.pos += 1;
        }
        self.state.pos += 1;
        self.skip_word();
        self.finish_token(TokenType::Regexp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dialect;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str, dialect: Dialect) -> Vec<TokenType> {
        let mut parser = Parser::new(source, dialect);
        let mut kinds = Vec::new();
        parser.next_token();
        while !parser.is(TokenType::Eof) {
            kinds.push(parser.state.kind);
            parser.next();
        }
        kinds
    }

    #[test]
    fn test_words_and_keywords() {
        assert_eq!(
            kinds("let x = async", Dialect::default()),
            vec![TokenType::Let, TokenType::Name, TokenType::Eq, TokenType::Name]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("1_000 0x1F 10n .5 1e-3 2m", Dialect::default()),
            vec![
                TokenType::Num,
                TokenType::Num,
                TokenType::Bigint,
                TokenType::Num,
                TokenType::Num,
                TokenType::Decimal,
            ]
        );
    }

    #[test]
    fn test_optional_chain_before_digit() {
        assert_eq!(
            kinds("a?.5:1", Dialect::default()),
            vec![
                TokenType::Name,
                TokenType::Question,
                TokenType::Num,
                TokenType::Colon,
                TokenType::Num,
            ]
        );
    }

    #[test]
    fn test_comments_and_shebang_are_skipped() {
        assert_eq!(
            kinds("#!/usr/bin/env node\n// hi\n/* x */ a", Dialect::default()),
            vec![TokenType::Name]
        );
    }

    #[test]
    fn test_flow_exact_object_braces() {
        let flow = Dialect {
            flow: true,
            ..Dialect::default()
        };
        assert_eq!(
            kinds("{| |}", flow),
            vec![TokenType::BraceBarL, TokenType::BraceBarR]
        );
        assert_eq!(
            kinds("{| |}", Dialect::default()),
            vec![TokenType::BraceL, TokenType::BitwiseOr, TokenType::BitwiseOr, TokenType::BraceR]
        );
    }

    #[test]
    fn test_unterminated_string_sets_error() {
        let mut parser = Parser::new("'abc", Dialect::default());
        parser.next_token();
        assert!(parser.is(TokenType::Eof));
        assert_eq!(
            parser.state.error.map(|error| error.kind),
            Some(SyntaxErrorKind::UnterminatedString)
        );
    }

    #[test]
    fn test_skip_whitespace_and_comments() {
        assert_eq!(skip_whitespace_and_comments("  /* a */ // b\n x", 0), 16);
        assert_eq!(skip_whitespace_and_comments("x", 0), 0);
    }
}
