//! JSX elements. Inside tags and children the tokenizer switches to JSX
//! rules; attribute values and `{...}` children re-enter normal parsing.

use crate::error::SyntaxErrorKind;
use crate::parser::Parser;
use crate::tokenizer::{is_identifier_char, is_identifier_start, IdentifierRole, TokenType};

impl<'src> Parser<'src> {
    /// Reads JSX child text up to the next `<` or `{`.
    fn jsx_read_token(&mut self) {
        let mut saw_newline = false;
        let mut saw_non_whitespace = false;
        loop {
            if self.state.pos >= self.input.len() {
                self.unexpected_with(SyntaxErrorKind::UnterminatedJsxContents, self.state.start);
                return;
            }
            let ch = self.byte_at(self.state.pos);
            if ch == b'<' || ch == b'{' {
                if self.state.pos == self.state.start {
                    if ch == b'<' {
                        self.finish_op(TokenType::JsxTagStart, 1);
                    } else {
                        self.get_token_from_code(ch);
                    }
                    return;
                }
                // Whitespace-only text spanning lines is dropped by JSX semantics.
                if saw_newline && !saw_non_whitespace {
                    self.finish_token(TokenType::JsxEmptyText);
                } else {
                    self.finish_token(TokenType::JsxText);
                }
                return;
            }
            match ch {
                b'\n' => saw_newline = true,
                b' ' | b'\r' | b'\t' => {}
                _ => saw_non_whitespace = true,
            }
            self.state.pos += 1;
        }
    }

    /// Attribute strings have no escapes.
    fn jsx_read_string(&mut self, quote: u8) {
        self.state.pos += 1;
        loop {
            if self.state.pos >= self.input.len() {
                self.unexpected_with(SyntaxErrorKind::UnterminatedString, self.state.start);
                return;
            }
            let ch = self.byte_at(self.state.pos);
            self.state.pos += 1;
            if ch == quote {
                break;
            }
        }
        self.finish_token(TokenType::String);
    }

    /// Tag and attribute names, which may contain `-`.
    fn jsx_read_word(&mut self) {
        while let Some(ch) = self.char_at(self.state.pos) {
            if is_identifier_char(ch) || ch == '-' {
                self.state.pos += ch.len_utf8();
            } else {
                break;
            }
        }
        self.finish_token(TokenType::JsxName);
    }

    /// Consumes the current token and reads the next one in tag mode.
    pub(crate) fn next_jsx_tag_token(&mut self) {
        let token = self.current_token();
        self.state.tokens.push(token);
        self.skip_space();
        self.state.start = self.state.pos;
        if self.state.pos >= self.input.len() {
            self.unexpected_with(SyntaxErrorKind::UnexpectedEof, self.state.start);
            return;
        }

        let code = self.byte_at(self.state.pos);
        match self.char_at(self.state.pos) {
            Some(ch) if is_identifier_start(ch) => return self.jsx_read_word(),
            _ => {}
        }
        let kind = match code {
            b'"' | b'\'' => return self.jsx_read_string(code),
            b'>' => TokenType::JsxTagEnd,
            b'<' => TokenType::JsxTagStart,
            b'/' => TokenType::Slash,
            b'=' => TokenType::Eq,
            b'{' => TokenType::BraceL,
            b'.' => TokenType::Dot,
            b':' => TokenType::Colon,
            _ => {
                self.unexpected();
                return;
            }
        };
        self.finish_op(kind, 1);
    }

    /// Consumes the current token and reads child text.
    fn next_jsx_expr_token(&mut self) {
        let token = self.current_token();
        self.state.tokens.push(token);
        self.state.start = self.state.pos;
        self.jsx_read_token();
    }

    /// `a` or `a:b`; a plain name gets `role`. Both halves of `a:b` are
    /// read in tag mode so they come out as `JsxName`.
    fn jsx_parse_namespaced_name(&mut self, role: IdentifierRole) {
        self.next_jsx_tag_token();
        if !self.is(TokenType::Colon) {
            self.set_last_role(role);
            return;
        }
        self.next_jsx_tag_token();
        self.next_jsx_tag_token();
    }

    fn jsx_parse_element_name(&mut self) {
        let first_token_index = self.token_index();
        self.jsx_parse_namespaced_name(IdentifierRole::Access);
        let mut had_dot = false;
        while self.is(TokenType::Dot) {
            had_dot = true;
            self.next_jsx_tag_token();
            self.next_jsx_tag_token();
        }
        // A lowercase tag like `<div>` names an intrinsic element, not a variable.
        if !had_dot {
            let start = self.state.tokens.get(first_token_index).map(|token| token.start);
            if let Some(start) = start {
                if self.byte_at(start).is_ascii_lowercase() {
                    if let Some(token) = self.state.tokens.get_mut(first_token_index) {
                        token.identifier_role = None;
                    }
                }
            }
        }
    }

    fn jsx_parse_attribute_value(&mut self) {
        match self.state.kind {
            TokenType::BraceL => {
                self.next();
                self.parse_expression(false);
                self.next_jsx_tag_token();
            }
            TokenType::JsxTagStart => {
                self.jsx_parse_element();
                self.next_jsx_tag_token();
            }
            TokenType::String => self.next_jsx_tag_token(),
            _ => self.unexpected_message("JSX value should be either an expression or a quoted JSX text"),
        }
    }

    /// Opening tag after `<`, up to but not including `>` or `/>`'s `>`.
    /// Returns whether the tag is self-closing.
    fn jsx_parse_opening_element(&mut self) -> bool {
        if self.is(TokenType::JsxTagEnd) {
            // Fragment.
            return false;
        }
        self.jsx_parse_element_name();
        if self.is_typescript_enabled {
            self.ts_try_parse_jsx_type_argument();
        }
        while !self.is(TokenType::Slash) && !self.is(TokenType::JsxTagEnd) && !self.has_error() {
            if self.eat(TokenType::BraceL) {
                // Spread attribute.
                self.expect(TokenType::Ellipsis);
                self.parse_maybe_assign(false);
                self.next_jsx_tag_token();
                continue;
            }
            self.jsx_parse_namespaced_name(IdentifierRole::ObjectKey);
            if self.is(TokenType::Eq) {
                self.next_jsx_tag_token();
                self.jsx_parse_attribute_value();
            }
        }
        let is_self_closing = self.is(TokenType::Slash);
        if is_self_closing {
            self.next_jsx_tag_token();
        }
        is_self_closing
    }

    fn jsx_parse_closing_element(&mut self) {
        if !self.is(TokenType::JsxTagEnd) {
            self.jsx_parse_element_name();
        }
    }

    /// Parses an element whose `<` has been consumed, leaving the final `>`
    /// as the current token.
    fn jsx_parse_element_at(&mut self) {
        if self.jsx_parse_opening_element() {
            return;
        }
        self.next_jsx_expr_token();
        loop {
            if self.has_error() {
                return;
            }
            match self.state.kind {
                TokenType::JsxTagStart => {
                    self.next_jsx_tag_token();
                    if self.is(TokenType::Slash) {
                        self.next_jsx_tag_token();
                        self.jsx_parse_closing_element();
                        return;
                    }
                    self.jsx_parse_element_at();
                    self.next_jsx_expr_token();
                }
                TokenType::JsxText | TokenType::JsxEmptyText => self.next_jsx_expr_token(),
                TokenType::BraceL => {
                    self.next();
                    if self.is(TokenType::Ellipsis) {
                        self.expect(TokenType::Ellipsis);
                        self.parse_expression(false);
                    } else if !self.is(TokenType::BraceR) {
                        // `{}` is an empty placeholder, not a child.
                        self.parse_expression(false);
                    }
                    self.next_jsx_expr_token();
                }
                _ => {
                    self.unexpected();
                    return;
                }
            }
        }
    }

    /// Parses a whole element from its `<`, leaving the last `>` current.
    pub(crate) fn jsx_parse_element(&mut self) {
        self.next_jsx_tag_token();
        self.jsx_parse_element_at();
    }
}

#[cfg(test)]
mod tests {
    use crate::tokenizer::{IdentifierRole, TokenType};
    use crate::{parse_file, Dialect};
    use pretty_assertions::assert_eq;

    fn jsx() -> Dialect {
        Dialect {
            jsx: true,
            ..Dialect::default()
        }
    }

    #[test]
    fn test_element_token_kinds() {
        let source = "<div className=\"a\">hi {name}</div>;";
        let file = parse_file(source, jsx()).unwrap();
        let kinds: Vec<_> = file.tokens.iter().map(|token| token.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenType::JsxTagStart,
                TokenType::JsxName,
                TokenType::JsxName,
                TokenType::Eq,
                TokenType::String,
                TokenType::JsxTagEnd,
                TokenType::JsxText,
                TokenType::BraceL,
                TokenType::Name,
                TokenType::BraceR,
                TokenType::JsxTagStart,
                TokenType::Slash,
                TokenType::JsxName,
                TokenType::JsxTagEnd,
                TokenType::Semi,
                TokenType::Eof,
            ]
        );
        // Intrinsic tag names are not variable accesses; attribute names are keys.
        assert_eq!(file.tokens[1].identifier_role, None);
        assert_eq!(file.tokens[2].identifier_role, Some(IdentifierRole::ObjectKey));
    }

    #[test]
    fn test_component_and_member_tags() {
        let source = "<Foo.Bar><App /></Foo.Bar>";
        let file = parse_file(source, jsx()).unwrap();
        assert_eq!(file.tokens[1].identifier_role, Some(IdentifierRole::Access));
        let app = file
            .tokens
            .iter()
            .find(|token| token.text(source) == "App")
            .and_then(|token| token.identifier_role);
        assert_eq!(app, Some(IdentifierRole::Access));
    }

    #[test]
    fn test_namespaced_tag_and_attribute_names() {
        let source = "<svg:circle xlink:href=\"x\" />";
        let file = parse_file(source, jsx()).unwrap();
        let kinds: Vec<_> = file.tokens.iter().map(|token| token.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenType::JsxTagStart,
                TokenType::JsxName,
                TokenType::Colon,
                TokenType::JsxName,
                TokenType::JsxName,
                TokenType::Colon,
                TokenType::JsxName,
                TokenType::Eq,
                TokenType::String,
                TokenType::Slash,
                TokenType::JsxTagEnd,
                TokenType::Eof,
            ]
        );
        assert_eq!(file.tokens[1].identifier_role, None);
        assert_eq!(file.tokens[4].identifier_role, None);
    }

    #[test]
    fn test_whitespace_only_multiline_text_is_empty() {
        let source = "<a>\n  <b />\n</a>";
        let file = parse_file(source, jsx()).unwrap();
        assert_eq!(file.tokens[3].kind, TokenType::JsxEmptyText);
    }

    #[test]
    fn test_unterminated_contents() {
        let error = parse_file("<a>text", jsx()).unwrap_err();
        assert_eq!(error.to_string(), "Unterminated JSX contents (1:4)");
    }
}
