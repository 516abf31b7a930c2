//! Binding patterns: identifiers, destructuring, defaults and rest elements.

use super::Parser;
use crate::tokenizer::{ContextualKeyword, IdentifierRole, TokenType};

impl<'src> Parser<'src> {
    pub(crate) fn parse_spread(&mut self) {
        self.next();
        self.parse_maybe_assign(false);
    }

    pub(crate) fn parse_rest(&mut self, is_block_scope: bool) {
        self.next();
        self.parse_binding_atom(is_block_scope);
    }

    /// Consumes any token as an identifier.
    pub(crate) fn parse_identifier(&mut self) {
        self.next();
        self.set_last_kind(TokenType::Name);
    }

    pub(crate) fn parse_binding_identifier(&mut self, is_block_scope: bool) {
        self.parse_identifier();
        self.mark_prior_binding_identifier(is_block_scope);
    }

    pub(crate) fn parse_imported_identifier(&mut self) {
        self.parse_identifier();
        self.set_last_role(IdentifierRole::ImportDeclaration);
    }

    pub(crate) fn mark_prior_binding_identifier(&mut self, is_block_scope: bool) {
        let role = if self.state.scope_depth == 0 {
            IdentifierRole::TopLevelDeclaration
        } else if is_block_scope {
            IdentifierRole::BlockScopedDeclaration
        } else {
            IdentifierRole::FunctionScopedDeclaration
        };
        self.set_last_role(role);
    }

    pub(crate) fn parse_binding_atom(&mut self, is_block_scope: bool) {
        match self.state.kind {
            TokenType::This => {
                // TypeScript `this` parameter.
                let old_is_type = self.push_type_context(0);
                self.next();
                self.pop_type_context(old_is_type);
            }
            TokenType::Yield | TokenType::Name | TokenType::Let => {
                self.state.kind = TokenType::Name;
                self.parse_binding_identifier(is_block_scope);
            }
            TokenType::BracketL => {
                self.next();
                self.parse_binding_list(TokenType::BracketR, is_block_scope, true, false, 0);
            }
            TokenType::BraceL => self.parse_obj(true, is_block_scope),
            _ => self.unexpected(),
        }
    }

    pub(crate) fn parse_binding_list(
        &mut self,
        close: TokenType,
        is_block_scope: bool,
        allow_empty: bool,
        allow_modifiers: bool,
        context_id: u32,
    ) {
        let mut first = true;
        let mut has_removed_comma = false;
        let first_item_token_index = self.token_index();
        while !self.eat(close) && !self.has_error() {
            if first {
                first = false;
            } else {
                self.expect(TokenType::Comma);
                if context_id != 0 {
                    self.set_last_context_id(context_id);
                }
                // The comma after a TypeScript `this` parameter goes with it.
                let first_is_type = self
                    .state
                    .tokens
                    .get(first_item_token_index)
                    .is_some_and(|token| token.is_type);
                if !has_removed_comma && first_is_type {
                    if let Some(token) = self.state.last_token_mut() {
                        token.is_type = true;
                    }
                    has_removed_comma = true;
                }
            }
            if allow_empty && self.is(TokenType::Comma) {
                // Hole.
            } else if self.eat(close) {
                break;
            } else if self.is(TokenType::Ellipsis) {
                self.parse_rest(is_block_scope);
                self.parse_assignable_list_item_types();
                // TypeScript allowed a trailing comma after rest elements.
                self.eat(TokenType::Comma);
                self.expect(close);
                break;
            } else {
                self.parse_assignable_list_item(allow_modifiers, is_block_scope);
            }
        }
    }

    fn parse_assignable_list_item(&mut self, allow_modifiers: bool, is_block_scope: bool) {
        if allow_modifiers {
            self.ts_parse_modifiers(&[
                ContextualKeyword::Public,
                ContextualKeyword::Protected,
                ContextualKeyword::Private,
                ContextualKeyword::Readonly,
                ContextualKeyword::Override,
            ]);
        }
        self.parse_maybe_default(is_block_scope, false);
        self.parse_assignable_list_item_types();
        self.parse_maybe_default(is_block_scope, true);
    }

    fn parse_assignable_list_item_types(&mut self) {
        if self.is_flow_enabled {
            self.flow_parse_assignable_list_item_types();
        } else if self.is_typescript_enabled {
            self.ts_parse_assignable_list_item_types();
        }
    }

    /// Parses `= default` after a binding, recording where the default ends.
    pub(crate) fn parse_maybe_default(&mut self, is_block_scope: bool, left_already_parsed: bool) {
        if !left_already_parsed {
            self.parse_binding_atom(is_block_scope);
        }
        if !self.eat(TokenType::Eq) {
            return;
        }
        let eq_index = self.token_index() - 1;
        self.parse_maybe_assign(false);
        self.mark_rhs_end(eq_index);
    }
}
