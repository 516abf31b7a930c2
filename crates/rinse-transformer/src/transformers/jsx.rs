use super::{Context, RootTransformer, Transformer};
use crate::error::TransformError;
use crate::options::Options;
use crate::util::jsx_entities::lookup_entity;
use crate::util::JsxPragmaInfo;
use rinse_parser::TokenType;
use std::cell::{Cell, RefCell};

/// Lowers JSX elements to calls of the element pragma
/// (`React.createElement` unless configured otherwise).
pub(crate) struct JsxTransformer {
    pragma: JsxPragmaInfo,
    production: bool,
    file_path: Option<String>,
    /// Declared in the prefix once the first element needs dev metadata.
    filename_var_name: RefCell<Option<String>>,
    // Line numbers are computed incrementally, so elements must be visited
    // in source order.
    last_line_number: Cell<usize>,
    last_index: Cell<usize>,
}

impl JsxTransformer {
    pub(crate) fn new(options: &Options) -> Self {
        Self {
            pragma: JsxPragmaInfo::new(options),
            production: options.production,
            file_path: options.file_path.clone(),
            filename_var_name: RefCell::new(None),
            last_line_number: Cell::new(1),
            last_index: Cell::new(0),
        }
    }
}

impl Transformer for JsxTransformer {
    fn name(&self) -> &'static str {
        "jsx"
    }

    fn process(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<bool, TransformError> {
        if cx.tokens.matches1(TokenType::JsxTagStart) {
            self.process_jsx_tag(root, cx)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn prefix_code(&self, _cx: &Context<'_>) -> String {
        match self.filename_var_name.borrow().as_deref() {
            Some(name) => {
                let file_path = self.file_path.as_deref().unwrap_or_default();
                format!("const {name} = {};", json_string(file_path))
            }
            None => String::new(),
        }
    }
}

impl JsxTransformer {
    fn process_jsx_tag(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<(), TransformError> {
        // Taken before anything else so lines are counted in token order.
        let line_number = if self.production {
            None
        } else {
            Some(self.line_number_for_index(cx.tokens.source(), cx.tokens.current_token().start))
        };

        // <
        let invocation = self.create_element_invocation_code(cx);
        cx.tokens.replace_token(&invocation);

        if cx.tokens.matches1(TokenType::JsxTagEnd) {
            // <>
            let fragment = self.fragment_code(cx);
            cx.tokens.replace_token(&format!("{fragment}, null"));
            self.process_children(root, cx, true)?;
        } else {
            self.process_tag_intro(root, cx)?;
            self.process_props_object_with_dev_info(root, cx, line_number)?;
            if cx.tokens.matches2(TokenType::Slash, TokenType::JsxTagEnd) {
                // Self-closing, so there are no children.
            } else if cx.tokens.matches1(TokenType::JsxTagEnd) {
                cx.tokens.remove_token();
                self.process_children(root, cx, true)?;
            } else {
                return Err(TransformError::structure(
                    "Expected either /> or > at the end of the tag.",
                ));
            }
        }

        // The rest of the self-closing or closing tag closes the call.
        cx.tokens.remove_initial_token();
        while !cx.tokens.matches1(TokenType::JsxTagEnd) {
            if cx.tokens.is_at_end() {
                return Err(TransformError::structure("Unexpected end of JSX closing tag."));
            }
            cx.tokens.remove_token();
        }
        cx.tokens.replace_token(")");
        Ok(())
    }

    fn line_number_for_index(&self, source: &str, index: usize) -> usize {
        let bytes = source.as_bytes();
        let mut last_index = self.last_index.get();
        let mut line = self.last_line_number.get();
        while last_index < index && last_index < bytes.len() {
            if bytes[last_index] == b'\n' {
                line += 1;
            }
            last_index += 1;
        }
        self.last_index.set(last_index);
        self.last_line_number.set(line);
        line
    }

    fn create_element_invocation_code(&self, cx: &Context<'_>) -> String {
        let base = resolve_pragma_base(cx, &self.pragma.base);
        format!("{base}{}(", self.pragma.suffix)
    }

    fn fragment_code(&self, cx: &Context<'_>) -> String {
        let base = resolve_pragma_base(cx, &self.pragma.fragment_base);
        format!("{base}{}", self.pragma.fragment_suffix)
    }

    fn filename_var_name(&self, cx: &mut Context<'_>) -> String {
        self.filename_var_name
            .borrow_mut()
            .get_or_insert_with(|| cx.names.claim_free_name("_jsxFileName"))
            .clone()
    }

    /// Processes the tag name, which may be `a.b.c`, `a:b` or carry type
    /// arguments. A lowercase single-word name becomes a string.
    fn process_tag_intro(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<(), TransformError> {
        let tokens = &cx.tokens;
        let len = tokens.tokens().len();
        let mut intro_end = tokens.current_index() + 1;
        while intro_end < len
            && (tokens.token_at(intro_end).is_type
                || (!tokens.matches2_at_index(intro_end - 1, TokenType::JsxName, TokenType::JsxName)
                    && !tokens.matches2_at_index(intro_end - 1, TokenType::GreaterThan, TokenType::JsxName)
                    && !tokens.matches1_at_index(intro_end, TokenType::BraceL)
                    && !tokens.matches1_at_index(intro_end, TokenType::JsxTagEnd)
                    && !tokens.matches2_at_index(intro_end, TokenType::Slash, TokenType::JsxTagEnd)))
        {
            intro_end += 1;
        }
        if intro_end == tokens.current_index() + 1 {
            let tag_name = tokens.identifier_name();
            if starts_with_lowercase(tag_name) {
                cx.tokens.replace_token(&format!("'{tag_name}'"));
            }
        } else if intro_end == tokens.current_index() + 3
            && tokens.matches3(TokenType::JsxName, TokenType::Colon, TokenType::JsxName)
        {
            // `svg:circle` is always an intrinsic element.
            let tag_name = format!(
                "{}:{}",
                tokens.identifier_name(),
                tokens.identifier_name_at_relative_index(2)
            );
            cx.tokens.replace_token(&format!("'{tag_name}'"));
            cx.tokens.remove_token();
            cx.tokens.remove_token();
        }
        while cx.tokens.current_index() < intro_end {
            root.process_token(cx)?;
        }
        Ok(())
    }

    fn process_props_object_with_dev_info(
        &self,
        root: &RootTransformer,
        cx: &mut Context<'_>,
        line_number: Option<usize>,
    ) -> Result<(), TransformError> {
        let dev_props = match line_number {
            Some(line_number) => {
                let file_name = self.filename_var_name(cx);
                format!("__self: this, __source: {{fileName: {file_name}, lineNumber: {line_number}}}")
            }
            None => String::new(),
        };
        if !cx.tokens.matches1(TokenType::JsxName) && !cx.tokens.matches1(TokenType::BraceL) {
            if dev_props.is_empty() {
                cx.tokens.append_code(", null");
            } else {
                cx.tokens.append_code(&format!(", {{{dev_props}}}"));
            }
            return Ok(());
        }
        cx.tokens.append_code(", {");
        self.process_props(root, cx)?;
        if dev_props.is_empty() {
            cx.tokens.append_code("}");
        } else {
            cx.tokens.append_code(&format!(" {dev_props}}}"));
        }
        Ok(())
    }

    /// Attributes become object entries: `a="b"` → `a: "b",`, a bare `a`
    /// → `a: true,`, and `{...c}` stays a spread.
    fn process_props(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<(), TransformError> {
        loop {
            if cx.tokens.matches3(TokenType::JsxName, TokenType::Colon, TokenType::JsxName) {
                // Namespaced attribute.
                let name = format!(
                    "{}:{}",
                    cx.tokens.identifier_name(),
                    cx.tokens.identifier_name_at_relative_index(2)
                );
                cx.tokens.replace_token(&format!("'{name}'"));
                cx.tokens.remove_token();
                cx.tokens.remove_token();
                if cx.tokens.matches1(TokenType::Eq) {
                    cx.tokens.replace_token(": ");
                    self.process_prop_value(root, cx)?;
                } else {
                    cx.tokens.append_code(": true");
                }
            } else if cx.tokens.matches2(TokenType::JsxName, TokenType::Eq) {
                self.process_prop_name(cx);
                cx.tokens.replace_token(": ");
                self.process_prop_value(root, cx)?;
            } else if cx.tokens.matches1(TokenType::JsxName) {
                self.process_prop_name(cx);
                cx.tokens.append_code(": true");
            } else if cx.tokens.matches1(TokenType::BraceL) {
                // {...props} is already a valid object spread once unwrapped.
                cx.tokens.replace_token("");
                root.process_balanced_code(cx)?;
                cx.tokens.replace_token("");
            } else {
                break;
            }
            cx.tokens.append_code(",");
        }
        Ok(())
    }

    fn process_prop_name(&self, cx: &mut Context<'_>) {
        let name = cx.tokens.identifier_name();
        if name.contains('-') {
            cx.tokens.replace_token(&format!("'{name}'"));
        } else {
            cx.tokens.copy_token();
        }
    }

    fn process_prop_value(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<(), TransformError> {
        if cx.tokens.matches1(TokenType::BraceL) {
            cx.tokens.replace_token("");
            root.process_balanced_code(cx)?;
            cx.tokens.replace_token("");
        } else if cx.tokens.matches1(TokenType::JsxTagStart) {
            self.process_jsx_tag(root, cx)?;
        } else {
            let token = cx.tokens.current_token();
            let source = cx.tokens.source();
            let value = &source[token.start + 1..token.end - 1];
            let code = format!(
                "{}{}",
                format_string_value_literal(value),
                format_text_replacement(value)
            );
            cx.tokens.replace_token(&code);
        }
        Ok(())
    }

    /// Emits each child as one more argument, stopping at the closing tag.
    fn process_children(
        &self,
        root: &RootTransformer,
        cx: &mut Context<'_>,
        needs_initial_comma: bool,
    ) -> Result<(), TransformError> {
        let mut needs_comma = needs_initial_comma;
        loop {
            if cx.tokens.matches2(TokenType::JsxTagStart, TokenType::Slash) {
                return Ok(());
            }
            let mut did_emit_element = false;
            if cx.tokens.matches2(TokenType::BraceL, TokenType::BraceR) {
                // `{}` and `{/* comment */}` are not children.
                cx.tokens.replace_token("");
                cx.tokens.replace_token("");
            } else if cx.tokens.matches1(TokenType::BraceL) {
                cx.tokens.replace_token(if needs_comma { ", " } else { "" });
                root.process_balanced_code(cx)?;
                cx.tokens.replace_token("");
                did_emit_element = true;
            } else if cx.tokens.matches1(TokenType::JsxTagStart) {
                cx.tokens.append_code(if needs_comma { ", " } else { "" });
                self.process_jsx_tag(root, cx)?;
                did_emit_element = true;
            } else if cx.tokens.matches1(TokenType::JsxText) || cx.tokens.matches1(TokenType::JsxEmptyText) {
                did_emit_element = self.process_child_text_element(cx, needs_comma);
            } else {
                return Err(TransformError::structure(
                    "Unexpected token when processing JSX children.",
                ));
            }
            if did_emit_element {
                needs_comma = true;
            }
        }
    }

    /// Returns whether the text produced an argument, which it does not
    /// when it is only layout whitespace.
    fn process_child_text_element(&self, cx: &mut Context<'_>, needs_comma: bool) -> bool {
        let text = cx.tokens.current_token_code();
        let replacement = format_text_replacement(text);
        let literal = format_text_literal(text);
        if literal == "\"\"" {
            cx.tokens.replace_token(&replacement);
            false
        } else {
            let comma = if needs_comma { ", " } else { "" };
            cx.tokens.replace_token(&format!("{comma}{literal}{replacement}"));
            true
        }
    }
}

fn resolve_pragma_base<'c>(cx: &'c Context<'_>, base: &'c str) -> &'c str {
    cx.imports
        .as_ref()
        .and_then(|imports| imports.identifier_replacement(base))
        .unwrap_or(base)
}

fn starts_with_lowercase(name: &str) -> bool {
    name.as_bytes().first().is_some_and(u8::is_ascii_lowercase)
}

/// A JSON string is also a valid JS string literal.
fn json_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// JSX child text as a string literal. Whitespace around line breaks is
/// dropped, blank lines vanish, and the remaining lines are joined with
/// single spaces. Whitespace on the first and last line is kept.
fn format_text_literal(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::new();
    let mut whitespace = String::new();
    let mut is_in_initial_line_whitespace = false;
    let mut seen_non_whitespace = false;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\r' => {
                if !is_in_initial_line_whitespace {
                    whitespace.push(c);
                }
            }
            '\n' => {
                whitespace.clear();
                is_in_initial_line_whitespace = true;
            }
            _ => {
                if seen_non_whitespace && is_in_initial_line_whitespace {
                    result.push(' ');
                }
                result.push_str(&whitespace);
                whitespace.clear();
                if c == '&' {
                    let (entity, next) = process_entity(&chars, i + 1);
                    result.push_str(&entity);
                    i = next;
                    seen_non_whitespace = true;
                    is_in_initial_line_whitespace = false;
                    continue;
                }
                result.push(c);
                seen_non_whitespace = true;
                is_in_initial_line_whitespace = false;
            }
        }
        i += 1;
    }
    if !is_in_initial_line_whitespace {
        result.push_str(&whitespace);
    }
    json_string(&result)
}

/// What is left of removed text: its newlines, then the spaces after the
/// last one, so later tokens keep their lines.
fn format_text_replacement(text: &str) -> String {
    let mut num_newlines = 0;
    let mut num_spaces = 0;
    for c in text.chars() {
        if c == '\n' {
            num_newlines += 1;
            num_spaces = 0;
        } else if c == ' ' {
            num_spaces += 1;
        }
    }
    format!("{}{}", "\n".repeat(num_newlines), " ".repeat(num_spaces))
}

/// An attribute string value as a literal. A line break followed by
/// indentation collapses to one space.
fn format_string_value_literal(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\n' {
            if chars.get(i + 1).is_some_and(|next| next.is_whitespace()) {
                result.push(' ');
                while chars.get(i + 1).is_some_and(|next| next.is_whitespace()) {
                    i += 1;
                }
            } else {
                result.push('\n');
            }
        } else if c == '&' {
            let (entity, next) = process_entity(&chars, i + 1);
            result.push_str(&entity);
            i = next;
            continue;
        } else {
            result.push(c);
        }
        i += 1;
    }
    json_string(&result)
}

/// Decodes `&name;`, `&#123;` or `&#x7b;` starting after the `&`. Returns
/// the decoded text and the index to continue from; anything else decodes
/// to a literal `&`.
fn process_entity(chars: &[char], index_after_ampersand: usize) -> (String, usize) {
    let mut i = index_after_ampersand;
    let mut entity = None;

    if chars.get(i) == Some(&'#') {
        i += 1;
        let radix = if chars.get(i) == Some(&'x') {
            i += 1;
            16
        } else {
            10
        };
        let num_start = i;
        while chars.get(i).is_some_and(|c| c.is_digit(radix)) {
            i += 1;
        }
        if chars.get(i) == Some(&';') && i > num_start {
            let digits: String = chars[num_start..i].iter().collect();
            i += 1;
            entity = u32::from_str_radix(&digits, radix)
                .ok()
                .and_then(char::from_u32)
                .map(String::from);
        }
    } else {
        let mut name = String::new();
        let mut count = 0;
        while i < chars.len() && count < 10 {
            count += 1;
            let c = chars[i];
            i += 1;
            if c == ';' {
                entity = lookup_entity(&name).map(String::from);
                break;
            }
            name.push(c);
        }
    }

    match entity {
        Some(entity) => (entity, i),
        None => ("&".to_string(), index_after_ampersand),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_literal_trims_lines() {
        assert_eq!(format_text_literal("\n  Hello\n  world  \n"), "\"Hello world\"");
        assert_eq!(format_text_literal(" a b "), "\" a b \"");
        assert_eq!(format_text_literal("\n   \n"), "\"\"");
    }

    #[test]
    fn test_text_literal_decodes_entities() {
        assert_eq!(format_text_literal("a &amp; b"), "\"a & b\"");
        assert_eq!(format_text_literal("&#65;&#x42;"), "\"AB\"");
        assert_eq!(format_text_literal("&unknown; &"), "\"&unknown; &\"");
    }

    #[test]
    fn test_text_replacement_keeps_newlines() {
        assert_eq!(format_text_replacement("\n  a\n   "), "\n\n   ");
        assert_eq!(format_text_replacement("abc"), "");
    }

    #[test]
    fn test_string_value_collapses_line_breaks() {
        assert_eq!(format_string_value_literal("a\n    b"), "\"a b\"");
        assert_eq!(format_string_value_literal("&quot;q&quot;"), "\"\\\"q\\\"\"");
    }
}
