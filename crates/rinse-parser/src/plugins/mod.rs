//! Grammar extensions for JSX, TypeScript and Flow.

mod flow;
mod jsx;
mod typescript;

use crate::parser::Parser;
use crate::tokenizer::{IdentifierRole, TokenType};

/// Whether the specifier being parsed sits in an import or an export clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpecifierKind {
    Import,
    Export,
}

impl<'src> Parser<'src> {
    /// Parses one `{ ... }` specifier that may carry a `type` (or Flow
    /// `typeof`) prefix: `a`, `type a`, `a as b` or `type a as b`.
    ///
    /// Prefixed specifiers are marked as type tokens so they get erased.
    pub(crate) fn parse_typed_specifier(&mut self, kind: SpecifierKind) {
        let start = self.token_index();
        self.parse_identifier();
        let mut words = 1;
        while words < 4
            && !self.is(TokenType::Comma)
            && !self.is(TokenType::BraceR)
            && !self.has_error()
        {
            self.parse_identifier();
            words += 1;
        }

        let (access_index, declaration_index, is_type) = match words {
            1 => (start, start, false),
            2 => (start + 1, start + 1, true),
            3 => (start, start + 2, false),
            _ => (start + 1, start + 3, true),
        };
        let (access_role, declaration_role) = match kind {
            SpecifierKind::Import => (IdentifierRole::ImportAccess, Some(IdentifierRole::ImportDeclaration)),
            SpecifierKind::Export => (IdentifierRole::ExportAccess, None),
        };
        let end = self.token_index();
        for (index, token) in self.state.tokens[start..end].iter_mut().enumerate() {
            let index = start + index;
            if is_type {
                token.is_type = true;
            }
            if index == declaration_index {
                if let Some(role) = declaration_role {
                    token.identifier_role = Some(role);
                    continue;
                }
            }
            if index == access_index {
                token.identifier_role = Some(access_role);
            }
        }
    }

    /// Whether the current token could start an expression.
    pub(crate) fn starts_expression(&self) -> bool {
        matches!(
            self.state.kind,
            TokenType::Num
                | TokenType::Bigint
                | TokenType::Decimal
                | TokenType::Regexp
                | TokenType::String
                | TokenType::Name
                | TokenType::BracketL
                | TokenType::BraceL
                | TokenType::ParenL
                | TokenType::BackQuote
                | TokenType::At
                | TokenType::Hash
                | TokenType::PreIncDec
                | TokenType::Bang
                | TokenType::Tilde
                | TokenType::Plus
                | TokenType::Minus
                | TokenType::LessThan
                | TokenType::JsxTagStart
                | TokenType::Function
                | TokenType::Class
                | TokenType::New
                | TokenType::This
                | TokenType::Super
                | TokenType::Import
                | TokenType::Yield
                | TokenType::Null
                | TokenType::True
                | TokenType::False
                | TokenType::Typeof
                | TokenType::Void
                | TokenType::Delete
        )
    }

    /// A token usable as a property name: identifiers, keywords and literals.
    pub(crate) fn is_literal_property_name(&self) -> bool {
        matches!(
            self.state.kind,
            TokenType::Name
                | TokenType::String
                | TokenType::Num
                | TokenType::Bigint
                | TokenType::Decimal
        ) || self.state.kind.is_keyword()
    }
}

#[cfg(test)]
mod tests {
    use crate::tokenizer::IdentifierRole;
    use crate::{parse_file, Dialect};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_typed_import_specifiers() {
        let dialect = Dialect {
            typescript: true,
            ..Dialect::default()
        };
        let file = parse_file("import {a, type b, c as d, type e as f} from 'x';", dialect).unwrap();
        let summary: Vec<_> = file.tokens[2..16]
            .iter()
            .map(|token| (token.is_type, token.identifier_role))
            .collect();
        assert_eq!(
            summary,
            vec![
                (false, Some(IdentifierRole::ImportDeclaration)),
                (false, None),
                (true, None),
                (true, Some(IdentifierRole::ImportDeclaration)),
                (false, None),
                (false, Some(IdentifierRole::ImportAccess)),
                (false, None),
                (false, Some(IdentifierRole::ImportDeclaration)),
                (false, None),
                (true, None),
                (true, Some(IdentifierRole::ImportAccess)),
                (true, None),
                (true, Some(IdentifierRole::ImportDeclaration)),
                (false, None),
            ]
        );
    }
}
