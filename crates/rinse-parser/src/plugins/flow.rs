//! Flow syntax. Like TypeScript, types are only walked so their tokens can
//! be marked for removal.

use super::SpecifierKind;
use crate::parser::Parser;
use crate::tokenizer::{ContextualKeyword, TokenType, TypeAndKeyword};

fn is_maybe_default_import(lookahead: TypeAndKeyword) -> bool {
    (lookahead.kind == TokenType::Name || lookahead.kind.is_keyword())
        && lookahead.contextual_keyword != ContextualKeyword::From
}

impl<'src> Parser<'src> {
    fn flow_parse_type_initialiser(&mut self, kind: TokenType) {
        let old_is_type = self.push_type_context(0);
        self.expect(kind);
        self.flow_parse_type();
        self.pop_type_context(old_is_type);
    }

    /// `%checks` or `%checks(expr)`.
    fn flow_parse_predicate(&mut self) {
        self.expect(TokenType::Modulo);
        self.expect_contextual(ContextualKeyword::Checks);
        if self.eat(TokenType::ParenL) {
            self.parse_expression(false);
            self.expect(TokenType::ParenR);
        }
    }

    fn flow_parse_type_and_predicate_initialiser(&mut self) {
        let old_is_type = self.push_type_context(0);
        self.expect(TokenType::Colon);
        if self.is(TokenType::Modulo) {
            self.flow_parse_predicate();
        } else {
            self.flow_parse_type();
            if self.is(TokenType::Modulo) {
                self.flow_parse_predicate();
            }
        }
        self.pop_type_context(old_is_type);
    }

    fn flow_parse_declare_function(&mut self) {
        self.next();
        self.parse_identifier();
        if self.is(TokenType::LessThan) {
            self.flow_parse_type_parameter_declaration();
        }
        self.expect(TokenType::ParenL);
        self.flow_parse_function_type_params();
        self.expect(TokenType::ParenR);
        self.flow_parse_type_and_predicate_initialiser();
        self.semicolon();
    }

    /// The declaration after `declare`, already in type context.
    fn flow_parse_declare(&mut self) {
        if self.is(TokenType::Class) {
            self.next();
            self.flow_parse_interfaceish(true);
        } else if self.is(TokenType::Function) {
            self.flow_parse_declare_function();
        } else if self.is(TokenType::Var) {
            self.next();
            self.flow_parse_type_annotatable_identifier();
            self.semicolon();
        } else if self.eat_contextual(ContextualKeyword::Module) {
            if self.eat(TokenType::Dot) {
                // declare module.exports: T
                self.expect_contextual(ContextualKeyword::Exports);
                self.flow_parse_type_annotation();
                self.semicolon();
            } else {
                self.flow_parse_declare_module();
            }
        } else if self.is_contextual(ContextualKeyword::Type) {
            self.next();
            self.flow_parse_type_alias();
        } else if self.is_contextual(ContextualKeyword::Opaque) {
            self.next();
            self.flow_parse_opaque_type(true);
        } else if self.is_contextual(ContextualKeyword::Interface) {
            self.next();
            self.flow_parse_interfaceish(false);
        } else if self.is(TokenType::Export) {
            self.flow_parse_declare_export_declaration();
        } else {
            self.unexpected();
        }
    }

    fn flow_parse_declare_module(&mut self) {
        if self.is(TokenType::String) {
            self.parse_expr_atom();
        } else {
            self.parse_identifier();
        }
        self.expect(TokenType::BraceL);
        while !self.is(TokenType::BraceR) && !self.has_error() {
            if self.is(TokenType::Import) {
                self.next();
                self.parse_import();
            } else {
                self.expect_contextual(ContextualKeyword::Declare);
                self.flow_parse_declare();
            }
        }
        self.expect(TokenType::BraceR);
    }

    fn flow_parse_declare_export_declaration(&mut self) {
        self.expect(TokenType::Export);
        if self.eat(TokenType::Default) {
            if self.is(TokenType::Function) || self.is(TokenType::Class) {
                self.flow_parse_declare();
            } else {
                // declare export default T;
                self.flow_parse_type();
                self.semicolon();
            }
        } else if self.is(TokenType::Var)
            || self.is(TokenType::Function)
            || self.is(TokenType::Class)
            || self.is_contextual(ContextualKeyword::Opaque)
        {
            self.flow_parse_declare();
        } else if self.is(TokenType::Star)
            || self.is(TokenType::BraceL)
            || self.is_contextual(ContextualKeyword::Interface)
            || self.is_contextual(ContextualKeyword::Type)
        {
            self.parse_export();
        } else {
            self.unexpected();
        }
    }

    /// Interfaces and declared classes, from the name on.
    fn flow_parse_interfaceish(&mut self, is_class: bool) {
        self.parse_identifier();
        if self.is(TokenType::LessThan) {
            self.flow_parse_type_parameter_declaration();
        }
        if self.eat(TokenType::Extends) {
            loop {
                self.flow_parse_interface_extends();
                if is_class || !self.eat(TokenType::Comma) {
                    break;
                }
            }
        }
        for keyword in [ContextualKeyword::Mixins, ContextualKeyword::Implements] {
            if self.is_contextual(keyword) {
                self.next();
                loop {
                    self.flow_parse_interface_extends();
                    if !self.eat(TokenType::Comma) {
                        break;
                    }
                }
            }
        }
        self.flow_parse_object_type(is_class, false, is_class);
    }

    fn flow_parse_interface_extends(&mut self) {
        self.flow_parse_qualified_type_identifier(false);
        if self.is(TokenType::LessThan) {
            self.flow_parse_type_parameter_instantiation();
        }
    }

    fn flow_parse_type_alias(&mut self) {
        self.parse_identifier();
        if self.is(TokenType::LessThan) {
            self.flow_parse_type_parameter_declaration();
        }
        self.flow_parse_type_initialiser(TokenType::Eq);
        self.semicolon();
    }

    fn flow_parse_opaque_type(&mut self, declare: bool) {
        self.expect_contextual(ContextualKeyword::Type);
        self.parse_identifier();
        if self.is(TokenType::LessThan) {
            self.flow_parse_type_parameter_declaration();
        }
        // Supertype.
        if self.is(TokenType::Colon) {
            self.flow_parse_type_initialiser(TokenType::Colon);
        }
        if !declare {
            self.flow_parse_type_initialiser(TokenType::Eq);
        }
        self.semicolon();
    }

    fn flow_parse_type_parameter(&mut self) {
        self.flow_parse_variance();
        self.flow_parse_type_annotatable_identifier();
        if self.eat(TokenType::Eq) {
            self.flow_parse_type();
        }
    }

    pub(crate) fn flow_parse_type_parameter_declaration(&mut self) {
        let old_is_type = self.push_type_context(0);
        if self.is(TokenType::LessThan) || self.is(TokenType::TypeParameterStart) {
            self.next();
        } else {
            self.unexpected();
        }
        loop {
            self.flow_parse_type_parameter();
            if !self.is(TokenType::GreaterThan) {
                self.expect(TokenType::Comma);
            }
            if self.is(TokenType::GreaterThan) || self.has_error() {
                break;
            }
        }
        self.expect(TokenType::GreaterThan);
        self.pop_type_context(old_is_type);
    }

    fn flow_parse_type_parameter_instantiation(&mut self) {
        let old_is_type = self.push_type_context(0);
        self.expect(TokenType::LessThan);
        while !self.is(TokenType::GreaterThan) && !self.has_error() {
            self.flow_parse_type();
            if !self.is(TokenType::GreaterThan) {
                self.expect(TokenType::Comma);
            }
        }
        self.expect(TokenType::GreaterThan);
        self.pop_type_context(old_is_type);
    }

    fn flow_parse_interface_type(&mut self) {
        self.expect_contextual(ContextualKeyword::Interface);
        if self.eat(TokenType::Extends) {
            loop {
                self.flow_parse_interface_extends();
                if !self.eat(TokenType::Comma) {
                    break;
                }
            }
        }
        self.flow_parse_object_type(false, false, false);
    }

    fn flow_parse_object_property_key(&mut self) {
        if self.is(TokenType::Num) || self.is(TokenType::String) {
            self.parse_expr_atom();
        } else {
            self.parse_identifier();
        }
    }

    /// `[K]: V` or `[name: K]: V`, after the `[`.
    fn flow_parse_object_type_indexer(&mut self) {
        if self.lookahead_type() == TokenType::Colon {
            self.flow_parse_object_property_key();
            self.flow_parse_type_initialiser(TokenType::Colon);
        } else {
            self.flow_parse_type();
        }
        self.expect(TokenType::BracketR);
        self.flow_parse_type_initialiser(TokenType::Colon);
    }

    /// `[[slot]]`, after both `[`.
    fn flow_parse_object_type_internal_slot(&mut self) {
        self.flow_parse_object_property_key();
        self.expect(TokenType::BracketR);
        self.expect(TokenType::BracketR);
        if self.is(TokenType::LessThan) || self.is(TokenType::ParenL) {
            self.flow_parse_object_type_methodish();
        } else {
            self.eat(TokenType::Question);
            self.flow_parse_type_initialiser(TokenType::Colon);
        }
    }

    fn flow_parse_object_type_methodish(&mut self) {
        if self.is(TokenType::LessThan) {
            self.flow_parse_type_parameter_declaration();
        }
        self.expect(TokenType::ParenL);
        self.flow_parse_function_type_params();
        self.expect(TokenType::ParenR);
        self.flow_parse_type_initialiser(TokenType::Colon);
    }

    fn flow_parse_object_type(&mut self, mut allow_static: bool, allow_exact: bool, allow_proto: bool) {
        let end = if allow_exact && self.is(TokenType::BraceBarL) {
            self.expect(TokenType::BraceBarL);
            TokenType::BraceBarR
        } else {
            self.expect(TokenType::BraceL);
            TokenType::BraceR
        };

        while !self.is(end) && !self.has_error() {
            if allow_proto && self.is_contextual(ContextualKeyword::Proto) {
                let lookahead = self.lookahead_type();
                if lookahead != TokenType::Colon && lookahead != TokenType::Question {
                    self.next();
                    allow_static = false;
                }
            }
            if allow_static && self.is_contextual(ContextualKeyword::Static) {
                let lookahead = self.lookahead_type();
                if lookahead != TokenType::Colon && lookahead != TokenType::Question {
                    self.next();
                }
            }

            self.flow_parse_variance();

            if self.eat(TokenType::BracketL) {
                if self.eat(TokenType::BracketL) {
                    self.flow_parse_object_type_internal_slot();
                } else {
                    self.flow_parse_object_type_indexer();
                }
            } else if self.is(TokenType::ParenL) || self.is(TokenType::LessThan) {
                // Call property.
                self.flow_parse_object_type_methodish();
            } else {
                if self.is_contextual(ContextualKeyword::Get) || self.is_contextual(ContextualKeyword::Set) {
                    let lookahead = self.lookahead_type();
                    if matches!(lookahead, TokenType::Name | TokenType::String | TokenType::Num) {
                        self.next();
                    }
                }
                self.flow_parse_object_type_property();
            }

            if !self.eat(TokenType::Semi)
                && !self.eat(TokenType::Comma)
                && !self.is(TokenType::BraceR)
                && !self.is(TokenType::BraceBarR)
            {
                self.unexpected();
            }
        }
        self.expect(end);
    }

    fn flow_parse_object_type_property(&mut self) {
        if self.eat(TokenType::Ellipsis) {
            if !self.eat(TokenType::Comma) {
                self.eat(TokenType::Semi);
            }
            // Explicit inexact object `{...}`.
            if self.is(TokenType::BraceR) {
                return;
            }
            self.flow_parse_type();
        } else {
            self.flow_parse_object_property_key();
            if self.is(TokenType::LessThan) || self.is(TokenType::ParenL) {
                self.flow_parse_object_type_methodish();
            } else {
                self.eat(TokenType::Question);
                self.flow_parse_type_initialiser(TokenType::Colon);
            }
        }
    }

    fn flow_parse_qualified_type_identifier(&mut self, initial_id_already_parsed: bool) {
        if !initial_id_already_parsed {
            self.parse_identifier();
        }
        while self.eat(TokenType::Dot) {
            self.parse_identifier();
        }
    }

    fn flow_parse_tuple_type(&mut self) {
        self.expect(TokenType::BracketL);
        while self.state.pos < self.input.len() && !self.is(TokenType::BracketR) && !self.has_error() {
            self.flow_parse_type();
            if self.is(TokenType::BracketR) {
                break;
            }
            self.expect(TokenType::Comma);
        }
        self.expect(TokenType::BracketR);
    }

    fn flow_parse_function_type_param(&mut self) {
        let lookahead = self.lookahead_type();
        if lookahead == TokenType::Colon || lookahead == TokenType::Question {
            self.parse_identifier();
            self.eat(TokenType::Question);
            self.flow_parse_type_initialiser(TokenType::Colon);
        } else {
            self.flow_parse_type();
        }
    }

    fn flow_parse_function_type_params(&mut self) {
        while !self.is(TokenType::ParenR) && !self.is(TokenType::Ellipsis) && !self.has_error() {
            self.flow_parse_function_type_param();
            if !self.is(TokenType::ParenR) {
                self.expect(TokenType::Comma);
            }
        }
        if self.eat(TokenType::Ellipsis) {
            self.flow_parse_function_type_param();
        }
    }

    fn flow_parse_primary_type(&mut self) {
        match self.state.kind {
            TokenType::Name => {
                if self.is_contextual(ContextualKeyword::Interface) {
                    self.flow_parse_interface_type();
                    return;
                }
                self.parse_identifier();
                self.flow_parse_qualified_type_identifier(true);
                if self.is(TokenType::LessThan) {
                    self.flow_parse_type_parameter_instantiation();
                }
                return;
            }
            TokenType::BraceL => {
                self.flow_parse_object_type(false, false, false);
                return;
            }
            TokenType::BraceBarL => {
                self.flow_parse_object_type(false, true, false);
                return;
            }
            TokenType::BracketL => {
                self.flow_parse_tuple_type();
                return;
            }
            TokenType::LessThan => {
                // Generic function type.
                self.flow_parse_type_parameter_declaration();
                self.expect(TokenType::ParenL);
                self.flow_parse_function_type_params();
                self.expect(TokenType::ParenR);
                self.expect(TokenType::Arrow);
                self.flow_parse_type();
                return;
            }
            TokenType::ParenL => {
                self.flow_parse_parenthesized_type();
                return;
            }
            TokenType::Minus => {
                self.next();
                self.next();
                return;
            }
            TokenType::String
            | TokenType::Num
            | TokenType::True
            | TokenType::False
            | TokenType::Null
            | TokenType::This
            | TokenType::Void
            | TokenType::Star => {
                self.next();
                return;
            }
            TokenType::Typeof => {
                self.expect(TokenType::Typeof);
                self.flow_parse_primary_type();
                return;
            }
            kind if kind.is_keyword() => {
                self.next();
                self.set_last_kind(TokenType::Name);
                return;
            }
            _ => {}
        }
        self.unexpected();
    }

    /// `(T)` grouping or a function type `(x: A, B) => C`.
    fn flow_parse_parenthesized_type(&mut self) {
        self.next();
        let mut is_grouped_type = false;
        if !self.is(TokenType::ParenR) && !self.is(TokenType::Ellipsis) {
            if self.is(TokenType::Name) {
                let token = self.lookahead_type();
                is_grouped_type = token != TokenType::Question && token != TokenType::Colon;
            } else {
                is_grouped_type = true;
            }
        }

        if is_grouped_type {
            let old_no_anon = std::mem::replace(&mut self.state.no_anon_function_type, false);
            self.flow_parse_type();
            self.state.no_anon_function_type = old_no_anon;

            // `,` or `) =>` means this was the first parameter of a function type.
            let is_function_type = self.is(TokenType::Comma)
                || (self.is(TokenType::ParenR) && self.lookahead_type() == TokenType::Arrow);
            if self.state.no_anon_function_type || !is_function_type {
                self.expect(TokenType::ParenR);
                return;
            }
            self.eat(TokenType::Comma);
        }

        self.flow_parse_function_type_params();
        self.expect(TokenType::ParenR);
        self.expect(TokenType::Arrow);
        self.flow_parse_type();
    }

    fn flow_parse_postfix_type(&mut self) {
        self.flow_parse_primary_type();
        while !self.can_insert_semicolon()
            && (self.is(TokenType::BracketL) || self.is(TokenType::QuestionDot))
            && !self.has_error()
        {
            self.eat(TokenType::QuestionDot);
            self.expect(TokenType::BracketL);
            // `T[]` is an array type, `T[K]` an indexed access.
            if !self.eat(TokenType::BracketR) {
                self.flow_parse_type();
                self.expect(TokenType::BracketR);
            }
        }
    }

    fn flow_parse_prefix_type(&mut self) {
        if self.eat(TokenType::Question) {
            self.flow_parse_prefix_type();
        } else {
            self.flow_parse_postfix_type();
        }
    }

    fn flow_parse_anon_function_without_parens(&mut self) {
        self.flow_parse_prefix_type();
        if !self.state.no_anon_function_type && self.eat(TokenType::Arrow) {
            self.flow_parse_type();
        }
    }

    fn flow_parse_intersection_type(&mut self) {
        self.eat(TokenType::BitwiseAnd);
        self.flow_parse_anon_function_without_parens();
        while self.eat(TokenType::BitwiseAnd) {
            self.flow_parse_anon_function_without_parens();
        }
    }

    fn flow_parse_type(&mut self) {
        self.eat(TokenType::BitwiseOr);
        self.flow_parse_intersection_type();
        while self.eat(TokenType::BitwiseOr) {
            self.flow_parse_intersection_type();
        }
    }

    pub(crate) fn flow_parse_type_annotation(&mut self) {
        self.flow_parse_type_initialiser(TokenType::Colon);
    }

    fn flow_parse_type_annotatable_identifier(&mut self) {
        self.parse_identifier();
        if self.is(TokenType::Colon) {
            self.flow_parse_type_annotation();
        }
    }

    /// `+` / `-` variance sigils on properties and type parameters.
    pub(crate) fn flow_parse_variance(&mut self) {
        if self.is(TokenType::Plus) || self.is(TokenType::Minus) {
            self.eat_type_token(self.state.kind);
        }
    }

    // === Hooks called from the base grammar ===

    pub(crate) fn flow_parse_function_body_and_finish(&mut self, func_context_id: u32) {
        if self.is(TokenType::Colon) {
            self.flow_parse_type_and_predicate_initialiser();
        }
        self.parse_function_body(false, func_context_id);
    }

    pub(crate) fn flow_parse_subscript(&mut self, start_token_index: usize, no_calls: bool, stop: &mut bool) {
        if self.is(TokenType::QuestionDot) && self.lookahead_type() == TokenType::LessThan {
            if no_calls {
                *stop = true;
                return;
            }
            self.next();
            self.flow_parse_type_parameter_instantiation();
            self.expect(TokenType::ParenL);
            self.parse_call_expression_arguments();
            return;
        } else if !no_calls && self.is(TokenType::LessThan) {
            let snapshot = self.state.snapshot();
            self.flow_parse_type_parameter_instantiation();
            self.expect(TokenType::ParenL);
            self.parse_call_expression_arguments();
            if self.has_error() {
                self.state.restore_from_snapshot(snapshot);
            } else {
                return;
            }
        }
        self.base_parse_subscript(start_token_index, no_calls, stop);
    }

    /// `async <T>(x) => ...` is tried before plain subscripts.
    pub(crate) fn flow_parse_subscripts(&mut self, start_token_index: usize, no_calls: bool) {
        let after_async = self
            .state
            .last_token()
            .is_some_and(|token| token.is_contextual(ContextualKeyword::Async));
        if after_async && self.is(TokenType::LessThan) {
            let snapshot = self.state.snapshot();
            if self.flow_parse_async_arrow_with_type_parameters() && !self.has_error() {
                return;
            }
            self.state.restore_from_snapshot(snapshot);
        }
        self.base_parse_subscripts(start_token_index, no_calls);
    }

    fn flow_parse_async_arrow_with_type_parameters(&mut self) -> bool {
        self.state.scope_depth += 1;
        let start_token_index = self.token_index();
        self.parse_function_params(false, 0);
        if !self.parse_arrow() {
            return false;
        }
        self.parse_arrow_expression(start_token_index);
        true
    }

    pub(crate) fn flow_start_parse_new_arguments(&mut self) {
        if self.is(TokenType::LessThan) {
            let snapshot = self.state.snapshot();
            self.flow_parse_type_parameter_instantiation();
            if self.has_error() {
                self.state.restore_from_snapshot(snapshot);
            }
        }
    }

    /// `interface` statements.
    pub(crate) fn flow_try_parse_statement(&mut self) -> bool {
        if self.is(TokenType::Name) && self.is_contextual(ContextualKeyword::Interface) {
            let is_declaration = matches!(self.lookahead_type(), TokenType::Name);
            if !is_declaration {
                return false;
            }
            let old_is_type = self.push_type_context(0);
            self.next();
            self.flow_parse_interfaceish(false);
            self.pop_type_context(old_is_type);
            return true;
        }
        false
    }

    pub(crate) fn flow_try_parse_export_default_expression(&mut self) -> bool {
        false
    }

    /// `declare ...`, `interface`, `type` and `opaque type` statements, whose
    /// first word has already been parsed as an identifier expression.
    fn flow_parse_expression_statement(&mut self, keyword: ContextualKeyword) -> bool {
        let matched = match keyword {
            ContextualKeyword::Declare => matches!(
                self.state.kind,
                TokenType::Class | TokenType::Name | TokenType::Function | TokenType::Var | TokenType::Export
            ),
            ContextualKeyword::Interface | ContextualKeyword::Type | ContextualKeyword::Opaque => {
                self.is(TokenType::Name)
            }
            _ => false,
        };
        if !matched {
            return false;
        }
        let old_is_type = self.push_type_context(1);
        match keyword {
            ContextualKeyword::Declare => self.flow_parse_declare(),
            ContextualKeyword::Interface => self.flow_parse_interfaceish(false),
            ContextualKeyword::Type => self.flow_parse_type_alias(),
            _ => self.flow_parse_opaque_type(false),
        }
        self.pop_type_context(old_is_type);
        true
    }

    pub(crate) fn flow_parse_identifier_statement(&mut self, keyword: ContextualKeyword) {
        if !self.flow_parse_expression_statement(keyword) {
            self.semicolon();
        }
    }

    pub(crate) fn flow_should_parse_export_declaration(&self) -> bool {
        self.is(TokenType::Name)
            && matches!(
                self.state.contextual_keyword,
                ContextualKeyword::Type | ContextualKeyword::Interface | ContextualKeyword::Opaque
            )
    }

    pub(crate) fn flow_should_disallow_export_default_specifier(&self) -> bool {
        self.flow_should_parse_export_declaration()
    }

    pub(crate) fn flow_parse_export_declaration(&mut self) {
        if self.is_contextual(ContextualKeyword::Type) {
            let old_is_type = self.push_type_context(1);
            self.next();
            if self.is(TokenType::BraceL) {
                // export type { A, B } from 'mod';
                self.parse_export_specifiers();
                self.parse_export_from();
            } else {
                self.flow_parse_type_alias();
            }
            self.pop_type_context(old_is_type);
        } else if self.is_contextual(ContextualKeyword::Opaque) {
            let old_is_type = self.push_type_context(1);
            self.next();
            self.flow_parse_opaque_type(false);
            self.pop_type_context(old_is_type);
        } else if self.is_contextual(ContextualKeyword::Interface) {
            let old_is_type = self.push_type_context(1);
            self.next();
            self.flow_parse_interfaceish(false);
            self.pop_type_context(old_is_type);
        } else {
            self.parse_statement(true);
        }
    }

    pub(crate) fn flow_should_parse_export_star(&mut self) -> bool {
        self.is(TokenType::Star)
            || (self.is_contextual(ContextualKeyword::Type) && self.lookahead_type() == TokenType::Star)
    }

    pub(crate) fn flow_parse_export_star(&mut self) {
        if self.eat_contextual(ContextualKeyword::Type) {
            let old_is_type = self.push_type_context(2);
            self.base_parse_export_star();
            self.pop_type_context(old_is_type);
        } else {
            self.base_parse_export_star();
        }
    }

    pub(crate) fn flow_after_parse_class_super(&mut self, has_super: bool) {
        if has_super && self.is(TokenType::LessThan) {
            self.flow_parse_type_parameter_instantiation();
        }
        if self.is_contextual(ContextualKeyword::Implements) {
            let old_is_type = self.push_type_context(0);
            self.next();
            self.set_last_kind(TokenType::Implements);
            loop {
                self.parse_identifier();
                if self.is(TokenType::LessThan) {
                    self.flow_parse_type_parameter_instantiation();
                }
                if !self.eat(TokenType::Comma) {
                    break;
                }
            }
            self.pop_type_context(old_is_type);
        }
    }

    /// Type parameters on object method shorthand.
    pub(crate) fn flow_start_parse_obj_prop_value(&mut self) {
        if self.is(TokenType::LessThan) {
            self.flow_parse_type_parameter_declaration();
            if !self.is(TokenType::ParenL) {
                self.unexpected();
            }
        }
    }

    pub(crate) fn flow_parse_assignable_list_item_types(&mut self) {
        let old_is_type = self.push_type_context(0);
        self.eat(TokenType::Question);
        if self.is(TokenType::Colon) {
            self.flow_parse_type_annotation();
        }
        self.pop_type_context(old_is_type);
    }

    /// `let x: T`.
    pub(crate) fn flow_after_parse_var_head(&mut self) {
        if self.is(TokenType::Colon) {
            self.flow_parse_type_annotation();
        }
    }

    pub(crate) fn flow_start_parse_async_arrow_from_call_expression(&mut self) {
        if self.is(TokenType::Colon) {
            let old_no_anon = std::mem::replace(&mut self.state.no_anon_function_type, true);
            self.flow_parse_type_annotation();
            self.state.no_anon_function_type = old_no_anon;
        }
    }

    /// Flow generic arrows `<T>(x: T) => x`, tried after an ordinary
    /// expression fails.
    pub(crate) fn flow_parse_maybe_assign(&mut self, no_in: bool, is_within_parens: bool) -> bool {
        if self.is(TokenType::LessThan) {
            let snapshot = self.state.snapshot();
            let was_arrow = self.base_parse_maybe_assign(no_in, is_within_parens);
            if !self.has_error() {
                return was_arrow;
            }
            self.state.restore_from_snapshot(snapshot);
            self.state.kind = TokenType::TypeParameterStart;

            self.flow_parse_type_parameter_declaration();
            let was_arrow = self.base_parse_maybe_assign(no_in, is_within_parens);
            if !was_arrow {
                self.unexpected();
            }
            return was_arrow;
        }
        self.base_parse_maybe_assign(no_in, is_within_parens)
    }

    /// Return type annotation on an arrow.
    pub(crate) fn flow_parse_arrow(&mut self) -> bool {
        if self.is(TokenType::Colon) {
            let old_is_type = self.push_type_context(0);
            let snapshot = self.state.snapshot();
            let old_no_anon = std::mem::replace(&mut self.state.no_anon_function_type, true);
            self.flow_parse_type_and_predicate_initialiser();
            self.state.no_anon_function_type = old_no_anon;
            if self.can_insert_semicolon() || !self.is(TokenType::Arrow) {
                self.unexpected();
            }
            if self.has_error() {
                self.state.restore_from_snapshot(snapshot);
            }
            self.pop_type_context(old_is_type);
        }
        self.eat(TokenType::Arrow)
    }

    /// `import type ...` and `import typeof ...`: the keyword belongs to the
    /// whole clause and is retyped to `Type`.
    pub(crate) fn flow_start_parse_import_specifiers(&mut self) {
        if self.is(TokenType::Typeof) || (self.is(TokenType::Name) && self.is_contextual(ContextualKeyword::Type)) {
            let lookahead = self.lookahead_type_and_keyword();
            if is_maybe_default_import(lookahead)
                || lookahead.kind == TokenType::BraceL
                || lookahead.kind == TokenType::Star
            {
                self.next();
                self.set_last_kind(TokenType::Type);
            }
        }
    }

    pub(crate) fn flow_parse_import_specifier(&mut self) {
        self.parse_typed_specifier(SpecifierKind::Import);
    }
}

#[cfg(test)]
mod tests {
    use crate::tokenizer::TokenType;
    use crate::{parse_file, Dialect};
    use pretty_assertions::assert_eq;

    fn value_text(source: &str) -> String {
        let file = parse_file(
            source,
            Dialect {
                flow: true,
                ..Dialect::default()
            },
        )
        .unwrap();
        file.tokens
            .iter()
            .filter(|token| !token.is_type && token.kind != TokenType::Eof)
            .map(|token| token.text(source))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_annotations_and_aliases() {
        assert_eq!(
            value_text("type A = {| a: ?number |};\nfunction f(x: A): string %checks { return ''; }"),
            "function f ( x ) { return '' ; }"
        );
    }

    #[test]
    fn test_declarations_are_erased() {
        assert_eq!(
            value_text("declare var x: number;\ninterface I { m(): void }\nopaque type O = string;\nlet y;"),
            "let y ;"
        );
    }

    #[test]
    fn test_export_type_is_erased() {
        assert_eq!(value_text("export type T = number; export const a = 1;"), "export const a = 1 ;");
    }

    #[test]
    fn test_generic_arrow_and_cast() {
        assert_eq!(
            value_text("const f = <T>(x: T): T => x; const n = (f: any);"),
            "const f = ( x ) => x ; const n = ( f ) ;"
        );
    }

    #[test]
    fn test_typed_import_specifier() {
        assert_eq!(value_text("import {type A, B} from 'm';"), "import { , B } from 'm' ;");
    }
}
