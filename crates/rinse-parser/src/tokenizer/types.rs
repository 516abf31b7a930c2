//! Token kinds and their operator metadata.

use std::fmt;

/// The kind of a token.
///
/// Operator tokens carry their precedence and fixity through the methods on
/// this type rather than through packed flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenType {
    // === Literals and names ===
    Num,
    Bigint,
    Decimal,
    Regexp,
    String,
    Name,
    #[default]
    Eof,

    // === Punctuation ===
    BracketL,
    BracketR,
    BraceL,
    /// `{|` (Flow exact object)
    BraceBarL,
    BraceR,
    /// `|}` (Flow exact object)
    BraceBarR,
    ParenL,
    ParenR,
    Comma,
    Semi,
    Colon,
    DoubleColon,
    Dot,
    Question,
    QuestionDot,
    Arrow,
    /// A template literal chunk between `` ` ``, `${` and `}`.
    Template,
    Ellipsis,
    BackQuote,
    DollarBraceL,
    At,
    Hash,

    // === Operators ===
    Eq,
    /// Compound assignment such as `+=` or `??=`.
    Assign,
    PreIncDec,
    PostIncDec,
    Bang,
    Tilde,
    Pipeline,
    NullishCoalescing,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    LessThan,
    GreaterThan,
    RelationalOrEqual,
    BitShiftL,
    BitShiftR,
    Plus,
    Minus,
    Modulo,
    Star,
    Slash,
    Exponent,

    // === JSX ===
    JsxName,
    JsxText,
    JsxEmptyText,
    JsxTagStart,
    JsxTagEnd,

    // === Type syntax markers ===
    TypeParameterStart,
    NonNullAssertion,

    // === Keywords ===
    Break,
    Case,
    Catch,
    Continue,
    Debugger,
    Default,
    Do,
    Else,
    Finally,
    For,
    Function,
    If,
    Return,
    Switch,
    Throw,
    Try,
    Var,
    Let,
    Const,
    While,
    With,
    New,
    This,
    Super,
    Class,
    Extends,
    Export,
    Import,
    Yield,
    Null,
    True,
    False,
    In,
    Instanceof,
    Typeof,
    Void,
    Delete,
    Enum,

    // === Words retyped by the parser once their role is known ===
    Async,
    Get,
    Set,
    Declare,
    Readonly,
    Abstract,
    Static,
    Public,
    Private,
    Protected,
    Override,
    As,
    Type,
    Implements,
}

impl TokenType {
    /// Binary operator precedence, or 0 for non-binary tokens.
    pub fn binop_precedence(self) -> u8 {
        match self {
            TokenType::NullishCoalescing | TokenType::LogicalOr => 1,
            TokenType::LogicalAnd => 2,
            TokenType::BitwiseOr => 3,
            TokenType::BitwiseXor => 4,
            TokenType::BitwiseAnd => 5,
            TokenType::Equality => 6,
            TokenType::LessThan
            | TokenType::GreaterThan
            | TokenType::RelationalOrEqual
            | TokenType::Instanceof
            | TokenType::In => 7,
            TokenType::BitShiftL | TokenType::BitShiftR => 8,
            TokenType::Plus | TokenType::Minus => 9,
            TokenType::Modulo | TokenType::Star | TokenType::Slash => 10,
            TokenType::Exponent => 11,
            _ => 0,
        }
    }

    #[inline]
    pub fn is_right_associative(self) -> bool {
        self == TokenType::Exponent
    }

    /// Plain `=` and compound assignment operators.
    #[inline]
    pub fn is_assign(self) -> bool {
        matches!(self, TokenType::Eq | TokenType::Assign)
    }

    /// Tokens that can start a unary prefix expression.
    pub fn is_prefix(self) -> bool {
        matches!(
            self,
            TokenType::PreIncDec
                | TokenType::Bang
                | TokenType::Tilde
                | TokenType::Plus
                | TokenType::Minus
                | TokenType::Typeof
                | TokenType::Void
                | TokenType::Delete
        )
    }

    /// `++`/`--`, which the tokenizer always reads as prefix first.
    #[inline]
    pub fn is_postfix(self) -> bool {
        matches!(self, TokenType::PreIncDec | TokenType::PostIncDec)
    }

    /// Reserved words, which are still valid as property names.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenType::Break
                | TokenType::Case
                | TokenType::Catch
                | TokenType::Continue
                | TokenType::Debugger
                | TokenType::Default
                | TokenType::Do
                | TokenType::Else
                | TokenType::Finally
                | TokenType::For
                | TokenType::Function
                | TokenType::If
                | TokenType::Return
                | TokenType::Switch
                | TokenType::Throw
                | TokenType::Try
                | TokenType::Var
                | TokenType::Let
                | TokenType::Const
                | TokenType::While
                | TokenType::With
                | TokenType::New
                | TokenType::This
                | TokenType::Super
                | TokenType::Class
                | TokenType::Extends
                | TokenType::Export
                | TokenType::Import
                | TokenType::Yield
                | TokenType::Null
                | TokenType::True
                | TokenType::False
                | TokenType::In
                | TokenType::Instanceof
                | TokenType::Typeof
                | TokenType::Void
                | TokenType::Delete
                | TokenType::Enum
        )
    }

    /// Human-readable label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            TokenType::Num => "num",
            TokenType::Bigint => "bigint",
            TokenType::Decimal => "decimal",
            TokenType::Regexp => "regexp",
            TokenType::String => "string",
            TokenType::Name => "name",
            TokenType::Eof => "eof",
            TokenType::BracketL => "[",
            TokenType::BracketR => "]",
            TokenType::BraceL => "{",
            TokenType::BraceBarL => "{|",
            TokenType::BraceR => "}",
            TokenType::BraceBarR => "|}",
            TokenType::ParenL => "(",
            TokenType::ParenR => ")",
            TokenType::Comma => ",",
            TokenType::Semi => ";",
            TokenType::Colon => ":",
            TokenType::DoubleColon => "::",
            TokenType::Dot => ".",
            TokenType::Question => "?",
            TokenType::QuestionDot => "?.",
            TokenType::Arrow => "=>",
            TokenType::Template => "template",
            TokenType::Ellipsis => "...",
            TokenType::BackQuote => "`",
            TokenType::DollarBraceL => "${",
            TokenType::At => "@",
            TokenType::Hash => "#",
            TokenType::Eq => "=",
            TokenType::Assign => "_=",
            TokenType::PreIncDec | TokenType::PostIncDec => "++/--",
            TokenType::Bang => "!",
            TokenType::Tilde => "~",
            TokenType::Pipeline => "|>",
            TokenType::NullishCoalescing => "??",
            TokenType::LogicalOr => "||",
            TokenType::LogicalAnd => "&&",
            TokenType::BitwiseOr => "|",
            TokenType::BitwiseXor => "^",
            TokenType::BitwiseAnd => "&",
            TokenType::Equality => "==/!=/===/!==",
            TokenType::LessThan => "<",
            TokenType::GreaterThan => ">",
            TokenType::RelationalOrEqual => "<=/>=",
            TokenType::BitShiftL => "<<",
            TokenType::BitShiftR => ">>/>>>",
            TokenType::Plus => "+",
            TokenType::Minus => "-",
            TokenType::Modulo => "%",
            TokenType::Star => "*",
            TokenType::Slash => "/",
            TokenType::Exponent => "**",
            TokenType::JsxName => "jsxName",
            TokenType::JsxText => "jsxText",
            TokenType::JsxEmptyText => "jsxEmptyText",
            TokenType::JsxTagStart => "jsxTagStart",
            TokenType::JsxTagEnd => "jsxTagEnd",
            TokenType::TypeParameterStart => "typeParameterStart",
            TokenType::NonNullAssertion => "nonNullAssertion",
            TokenType::Break => "break",
            TokenType::Case => "case",
            TokenType::Catch => "catch",
            TokenType::Continue => "continue",
            TokenType::Debugger => "debugger",
            TokenType::Default => "default",
            TokenType::Do => "do",
            TokenType::Else => "else",
            TokenType::Finally => "finally",
            TokenType::For => "for",
            TokenType::Function => "function",
            TokenType::If => "if",
            TokenType::Return => "return",
            TokenType::Switch => "switch",
            TokenType::Throw => "throw",
            TokenType::Try => "try",
            TokenType::Var => "var",
            TokenType::Let => "let",
            TokenType::Const => "const",
            TokenType::While => "while",
            TokenType::With => "with",
            TokenType::New => "new",
            TokenType::This => "this",
            TokenType::Super => "super",
            TokenType::Class => "class",
            TokenType::Extends => "extends",
            TokenType::Export => "export",
            TokenType::Import => "import",
            TokenType::Yield => "yield",
            TokenType::Null => "null",
            TokenType::True => "true",
            TokenType::False => "false",
            TokenType::In => "in",
            TokenType::Instanceof => "instanceof",
            TokenType::Typeof => "typeof",
            TokenType::Void => "void",
            TokenType::Delete => "delete",
            TokenType::Enum => "enum",
            TokenType::Async => "async",
            TokenType::Get => "get",
            TokenType::Set => "set",
            TokenType::Declare => "declare",
            TokenType::Readonly => "readonly",
            TokenType::Abstract => "abstract",
            TokenType::Static => "static",
            TokenType::Public => "public",
            TokenType::Private => "private",
            TokenType::Protected => "protected",
            TokenType::Override => "override",
            TokenType::As => "as",
            TokenType::Type => "type",
            TokenType::Implements => "implements",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        assert!(TokenType::Star.binop_precedence() > TokenType::Plus.binop_precedence());
        assert!(TokenType::LogicalAnd.binop_precedence() > TokenType::LogicalOr.binop_precedence());
        assert_eq!(
            TokenType::NullishCoalescing.binop_precedence(),
            TokenType::LogicalOr.binop_precedence()
        );
        assert_eq!(TokenType::Comma.binop_precedence(), 0);
    }

    #[test]
    fn test_labels_used_in_error_messages() {
        let labels: Vec<&str> = [
            TokenType::QuestionDot,
            TokenType::NullishCoalescing,
            TokenType::Equality,
            TokenType::JsxTagStart,
            TokenType::Function,
            TokenType::Eof,
        ]
        .into_iter()
        .map(TokenType::label)
        .collect();
        insta::assert_snapshot!(labels.join(" "), @"?. ?? ==/!=/===/!== jsxTagStart function eof");
    }

    #[test]
    fn test_only_exponent_is_right_associative() {
        assert!(TokenType::Exponent.is_right_associative());
        assert!(!TokenType::Minus.is_right_associative());
    }

    #[test]
    fn test_increment_is_both_prefix_and_postfix() {
        assert!(TokenType::PreIncDec.is_prefix());
        assert!(TokenType::PreIncDec.is_postfix());
        assert!(!TokenType::PostIncDec.is_prefix());
    }

    #[test]
    fn test_keyword_flag() {
        assert!(TokenType::Class.is_keyword());
        assert!(!TokenType::Async.is_keyword());
        assert!(!TokenType::Name.is_keyword());
    }
}
