//! Punctuator recognition using logos.
//!
//! The tokenizer is driven by the parser one token at a time, so this lexer is
//! only ever asked for the single longest punctuator at the current position.
//! Context-dependent splits (`>>` inside types, Flow's `{|`, `?.` before a
//! digit) are applied by the caller.

use super::types::TokenType;
use logos::Logos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Logos)]
pub(crate) enum Punct {
    #[token("{")]
    BraceL,
    #[token("}")]
    BraceR,
    #[token("(")]
    ParenL,
    #[token(")")]
    ParenR,
    #[token("[")]
    BracketL,
    #[token("]")]
    BracketR,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("::")]
    DoubleColon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("?")]
    Question,
    #[token("?.")]
    QuestionDot,
    #[token("??")]
    NullishCoalescing,
    #[token("=>")]
    Arrow,
    #[token("@")]
    At,
    #[token("#")]
    Hash,
    #[token("`")]
    BackQuote,
    #[token("=")]
    Eq,
    #[token("==")]
    #[token("===")]
    #[token("!=")]
    #[token("!==")]
    Equality,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("++")]
    #[token("--")]
    IncDec,
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("**=")]
    #[token("<<=")]
    #[token(">>=")]
    #[token(">>>=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("&&=")]
    #[token("||=")]
    #[token("??=")]
    Assign,
    #[token("*")]
    Star,
    #[token("**")]
    Exponent,
    #[token("/")]
    Slash,
    #[token("%")]
    Modulo,
    #[token("<")]
    LessThan,
    #[token(">")]
    GreaterThan,
    #[token("<=")]
    #[token(">=")]
    RelationalOrEqual,
    #[token("<<")]
    BitShiftL,
    #[token(">>")]
    #[token(">>>")]
    BitShiftR,
    #[token("&")]
    BitwiseAnd,
    #[token("&&")]
    LogicalAnd,
    #[token("|")]
    BitwiseOr,
    #[token("||")]
    LogicalOr,
    #[token("|>")]
    Pipeline,
    #[token("^")]
    BitwiseXor,
}

impl Punct {
    pub(crate) fn token_type(self) -> TokenType {
        match self {
            Punct::BraceL => TokenType::BraceL,
            Punct::BraceR => TokenType::BraceR,
            Punct::ParenL => TokenType::ParenL,
            Punct::ParenR => TokenType::ParenR,
            Punct::BracketL => TokenType::BracketL,
            Punct::BracketR => TokenType::BracketR,
            Punct::Semi => TokenType::Semi,
            Punct::Comma => TokenType::Comma,
            Punct::Colon => TokenType::Colon,
            Punct::DoubleColon => TokenType::DoubleColon,
            Punct::Dot => TokenType::Dot,
            Punct::Ellipsis => TokenType::Ellipsis,
            Punct::Question => TokenType::Question,
            Punct::QuestionDot => TokenType::QuestionDot,
            Punct::NullishCoalescing => TokenType::NullishCoalescing,
            Punct::Arrow => TokenType::Arrow,
            Punct::At => TokenType::At,
            Punct::Hash => TokenType::Hash,
            Punct::BackQuote => TokenType::BackQuote,
            Punct::Eq => TokenType::Eq,
            Punct::Equality => TokenType::Equality,
            Punct::Bang => TokenType::Bang,
            Punct::Tilde => TokenType::Tilde,
            Punct::Plus => TokenType::Plus,
            Punct::Minus => TokenType::Minus,
            Punct::IncDec => TokenType::PreIncDec,
            Punct::Assign => TokenType::Assign,
            Punct::Star => TokenType::Star,
            Punct::Exponent => TokenType::Exponent,
            Punct::Slash => TokenType::Slash,
            Punct::Modulo => TokenType::Modulo,
            Punct::LessThan => TokenType::LessThan,
            Punct::GreaterThan => TokenType::GreaterThan,
            Punct::RelationalOrEqual => TokenType::RelationalOrEqual,
            Punct::BitShiftL => TokenType::BitShiftL,
            Punct::BitShiftR => TokenType::BitShiftR,
            Punct::BitwiseAnd => TokenType::BitwiseAnd,
            Punct::LogicalAnd => TokenType::LogicalAnd,
            Punct::BitwiseOr => TokenType::BitwiseOr,
            Punct::LogicalOr => TokenType::LogicalOr,
            Punct::Pipeline => TokenType::Pipeline,
            Punct::BitwiseXor => TokenType::BitwiseXor,
        }
    }
}

/// Reads the longest punctuator at the start of `rest`, returning its type and byte length.
pub(crate) fn read_punct(rest: &str) -> Option<(TokenType, usize)> {
    let mut lexer = Punct::lexer(rest);
    match lexer.next() {
        Some(Ok(punct)) => Some((punct.token_type(), lexer.span().end)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_match() {
        assert_eq!(read_punct(">>>= 1"), Some((TokenType::Assign, 4)));
        assert_eq!(read_punct("=== b"), Some((TokenType::Equality, 3)));
        assert_eq!(read_punct("=> {}"), Some((TokenType::Arrow, 2)));
        assert_eq!(read_punct("?.b"), Some((TokenType::QuestionDot, 2)));
        assert_eq!(read_punct("...rest"), Some((TokenType::Ellipsis, 3)));
    }

    #[test]
    fn test_partial_ellipsis_backs_off() {
        assert_eq!(read_punct("..x"), Some((TokenType::Dot, 1)));
    }

    #[test]
    fn test_non_punctuator() {
        assert_eq!(read_punct("abc"), None);
        assert_eq!(read_punct(""), None);
    }
}
