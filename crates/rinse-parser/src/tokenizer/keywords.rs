//! Keyword and contextual keyword recognition.

use super::types::TokenType;

/// Identifier-like words with a reserved meaning in specific positions.
///
/// A token whose type is [`TokenType::Name`] carries one of these to tell the
/// parser which word it is without comparing source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContextualKeyword {
    #[default]
    None,
    Abstract,
    Accessor,
    As,
    Assert,
    Asserts,
    Async,
    Await,
    Checks,
    Constructor,
    Declare,
    Exports,
    From,
    Get,
    Global,
    Implements,
    Infer,
    Interface,
    Is,
    Keyof,
    Mixins,
    Module,
    Namespace,
    Of,
    Opaque,
    Out,
    Override,
    Private,
    Protected,
    Proto,
    Public,
    Readonly,
    Require,
    Satisfies,
    Set,
    Static,
    Symbol,
    Type,
    Unique,
    Using,
}

/// What a scanned word turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Word {
    Keyword(TokenType),
    Name(ContextualKeyword),
}

/// Classifies an identifier spelling.
pub fn classify_word(word: &str) -> Word {
    let keyword = match word {
        "break" => TokenType::Break,
        "case" => TokenType::Case,
        "catch" => TokenType::Catch,
        "class" => TokenType::Class,
        "const" => TokenType::Const,
        "continue" => TokenType::Continue,
        "debugger" => TokenType::Debugger,
        "default" => TokenType::Default,
        "delete" => TokenType::Delete,
        "do" => TokenType::Do,
        "else" => TokenType::Else,
        "enum" => TokenType::Enum,
        "export" => TokenType::Export,
        "extends" => TokenType::Extends,
        "false" => TokenType::False,
        "finally" => TokenType::Finally,
        "for" => TokenType::For,
        "function" => TokenType::Function,
        "if" => TokenType::If,
        "import" => TokenType::Import,
        "in" => TokenType::In,
        "instanceof" => TokenType::Instanceof,
        "let" => TokenType::Let,
        "new" => TokenType::New,
        "null" => TokenType::Null,
        "return" => TokenType::Return,
        "super" => TokenType::Super,
        "switch" => TokenType::Switch,
        "this" => TokenType::This,
        "throw" => TokenType::Throw,
        "true" => TokenType::True,
        "try" => TokenType::Try,
        "typeof" => TokenType::Typeof,
        "var" => TokenType::Var,
        "void" => TokenType::Void,
        "while" => TokenType::While,
        "with" => TokenType::With,
        "yield" => TokenType::Yield,
        _ => return Word::Name(contextual_keyword(word)),
    };
    Word::Keyword(keyword)
}

fn contextual_keyword(word: &str) -> ContextualKeyword {
    match word {
        "abstract" => ContextualKeyword::Abstract,
        "accessor" => ContextualKeyword::Accessor,
        "as" => ContextualKeyword::As,
        "assert" => ContextualKeyword::Assert,
        "asserts" => ContextualKeyword::Asserts,
        "async" => ContextualKeyword::Async,
        "await" => ContextualKeyword::Await,
        "checks" => ContextualKeyword::Checks,
        "constructor" => ContextualKeyword::Constructor,
        "declare" => ContextualKeyword::Declare,
        "exports" => ContextualKeyword::Exports,
        "from" => ContextualKeyword::From,
        "get" => ContextualKeyword::Get,
        "global" => ContextualKeyword::Global,
        "implements" => ContextualKeyword::Implements,
        "infer" => ContextualKeyword::Infer,
        "interface" => ContextualKeyword::Interface,
        "is" => ContextualKeyword::Is,
        "keyof" => ContextualKeyword::Keyof,
        "mixins" => ContextualKeyword::Mixins,
        "module" => ContextualKeyword::Module,
        "namespace" => ContextualKeyword::Namespace,
        "of" => ContextualKeyword::Of,
        "opaque" => ContextualKeyword::Opaque,
        "out" => ContextualKeyword::Out,
        "override" => ContextualKeyword::Override,
        "private" => ContextualKeyword::Private,
        "protected" => ContextualKeyword::Protected,
        "proto" => ContextualKeyword::Proto,
        "public" => ContextualKeyword::Public,
        "readonly" => ContextualKeyword::Readonly,
        "require" => ContextualKeyword::Require,
        "satisfies" => ContextualKeyword::Satisfies,
        "set" => ContextualKeyword::Set,
        "static" => ContextualKeyword::Static,
        "symbol" => ContextualKeyword::Symbol,
        "type" => ContextualKeyword::Type,
        "unique" => ContextualKeyword::Unique,
        "using" => ContextualKeyword::Using,
        _ => ContextualKeyword::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_words() {
        assert_eq!(classify_word("class"), Word::Keyword(TokenType::Class));
        assert_eq!(classify_word("enum"), Word::Keyword(TokenType::Enum));
    }

    #[test]
    fn test_contextual_words() {
        assert_eq!(classify_word("async"), Word::Name(ContextualKeyword::Async));
        assert_eq!(classify_word("of"), Word::Name(ContextualKeyword::Of));
        assert_eq!(classify_word("classy"), Word::Name(ContextualKeyword::None));
    }
}
