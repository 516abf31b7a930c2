//! Statements, functions, classes and module declarations.

use super::Parser;
use crate::tokenizer::{ContextualKeyword, IdentifierRole, TokenType};

impl<'src> Parser<'src> {
    pub(crate) fn parse_statement(&mut self, declaration: bool) {
        if self.is_flow_enabled && self.flow_try_parse_statement() {
            return;
        }
        if self.is(TokenType::At) {
            self.parse_decorators();
        }
        self.parse_statement_content(declaration);
    }

    fn parse_statement_content(&mut self, declaration: bool) {
        if self.is_typescript_enabled && self.ts_try_parse_statement_content() {
            return;
        }

        let start_type = self.state.kind;
        match start_type {
            TokenType::Break | TokenType::Continue => {
                self.next();
                if !self.is_line_terminator() {
                    self.parse_identifier();
                    self.semicolon();
                }
                return;
            }
            TokenType::Debugger => {
                self.next();
                self.semicolon();
                return;
            }
            TokenType::Do => {
                self.next();
                self.parse_statement(false);
                self.expect(TokenType::While);
                self.parse_paren_expression();
                self.eat(TokenType::Semi);
                return;
            }
            TokenType::For => {
                self.parse_for_statement();
                return;
            }
            TokenType::Function if self.lookahead_type() != TokenType::Dot => {
                if !declaration {
                    self.unexpected();
                }
                let function_start = self.state.start;
                self.next();
                self.parse_function(function_start, true, false);
                return;
            }
            TokenType::Class => {
                if !declaration {
                    self.unexpected();
                }
                self.parse_class(true, false);
                return;
            }
            TokenType::If => {
                self.next();
                self.parse_paren_expression();
                self.parse_statement(false);
                if self.eat(TokenType::Else) {
                    self.parse_statement(false);
                }
                return;
            }
            TokenType::Return => {
                self.next();
                if !self.is_line_terminator() {
                    self.parse_expression(false);
                    self.semicolon();
                }
                return;
            }
            TokenType::Switch => {
                self.parse_switch_statement();
                return;
            }
            TokenType::Throw => {
                self.next();
                self.parse_expression(false);
                self.semicolon();
                return;
            }
            TokenType::Try => {
                self.parse_try_statement();
                return;
            }
            TokenType::Let | TokenType::Const | TokenType::Var => {
                if start_type != TokenType::Var && !declaration {
                    self.unexpected();
                }
                self.parse_var_statement(start_type != TokenType::Var);
                return;
            }
            TokenType::While => {
                self.next();
                self.parse_paren_expression();
                self.parse_statement(false);
                return;
            }
            TokenType::BraceL => {
                self.parse_block(false, 0);
                return;
            }
            TokenType::Semi => {
                self.next();
                return;
            }
            TokenType::Export | TokenType::Import => {
                let next_type = self.lookahead_type();
                if next_type != TokenType::ParenL && next_type != TokenType::Dot {
                    self.next();
                    if start_type == TokenType::Import {
                        self.parse_import();
                    } else {
                        self.parse_export();
                    }
                    return;
                }
            }
            TokenType::Name => {
                if self.is_contextual(ContextualKeyword::Async) {
                    let function_start = self.state.start;
                    let snapshot = self.state.snapshot();
                    self.next();
                    if self.is(TokenType::Function) && !self.can_insert_semicolon() {
                        self.expect(TokenType::Function);
                        self.parse_function(function_start, true, false);
                        return;
                    }
                    self.state.restore_from_snapshot(snapshot);
                } else if self.is_contextual(ContextualKeyword::Using)
                    && !self.has_following_line_break()
                    && self.lookahead_type() == TokenType::Name
                {
                    self.parse_var_statement(true);
                    return;
                } else if self.starts_await_using() {
                    self.expect_contextual(ContextualKeyword::Await);
                    self.parse_var_statement(true);
                    return;
                }
            }
            _ => {}
        }

        // Expression statement, or a label if the expression is a lone identifier.
        let initial_tokens_length = self.token_index();
        self.parse_expression(false);
        let simple_name = if self.token_index() == initial_tokens_length + 1 {
            self.state
                .last_token()
                .filter(|token| token.kind == TokenType::Name)
                .map(|token| token.contextual_keyword)
        } else {
            None
        };
        let Some(simple_name) = simple_name else {
            self.semicolon();
            return;
        };
        if self.eat(TokenType::Colon) {
            self.parse_statement(true);
        } else if self.is_typescript_enabled {
            self.ts_parse_identifier_statement(simple_name);
        } else if self.is_flow_enabled {
            self.flow_parse_identifier_statement(simple_name);
        } else {
            self.semicolon();
        }
    }

    /// `await using x = ...`, including inside a `for` head.
    fn starts_await_using(&mut self) -> bool {
        if !self.is_contextual(ContextualKeyword::Await) || !self.is(TokenType::Name) {
            return false;
        }
        let snapshot = self.state.snapshot();
        self.next();
        if !self.is_contextual(ContextualKeyword::Using) || self.has_preceding_line_break() {
            self.state.restore_from_snapshot(snapshot);
            return false;
        }
        self.next();
        let result = self.is(TokenType::Name) && !self.has_preceding_line_break();
        self.state.restore_from_snapshot(snapshot);
        result
    }

    pub(crate) fn parse_decorators(&mut self) {
        while self.is(TokenType::At) {
            self.parse_decorator();
        }
    }

    fn parse_decorator(&mut self) {
        self.next();
        if self.eat(TokenType::ParenL) {
            self.parse_expression(false);
            self.expect(TokenType::ParenR);
        } else {
            self.parse_identifier();
            while self.eat(TokenType::Dot) {
                self.parse_identifier();
            }
            if self.is_typescript_enabled {
                self.ts_parse_maybe_decorator_arguments();
            } else if self.eat(TokenType::ParenL) {
                self.parse_call_expression_arguments();
            }
        }
    }

    fn parse_for_statement(&mut self) {
        self.state.scope_depth += 1;
        let start_token_index = self.token_index();
        self.parse_ambiguous_for_statement();
        self.push_scope(start_token_index, false);
        self.state.scope_depth -= 1;
    }

    /// `for (using of ...)` declares a variable named `using`.
    fn is_using_in_loop(&mut self) -> bool {
        self.is_contextual(ContextualKeyword::Using)
            && self.is(TokenType::Name)
            && !self.is_lookahead_contextual(ContextualKeyword::Of)
    }

    fn parse_ambiguous_for_statement(&mut self) {
        self.next();
        let mut for_await = false;
        if self.is_contextual(ContextualKeyword::Await) && self.is(TokenType::Name) {
            for_await = true;
            self.next();
        }
        self.expect(TokenType::ParenL);

        if self.is(TokenType::Semi) {
            if for_await {
                self.unexpected();
            }
            self.parse_for();
            return;
        }

        let is_await_using = self.starts_await_using();
        if is_await_using
            || matches!(self.state.kind, TokenType::Var | TokenType::Let | TokenType::Const)
            || self.is_using_in_loop()
        {
            if is_await_using {
                self.expect_contextual(ContextualKeyword::Await);
            }
            let is_block_scope = !self.is(TokenType::Var);
            self.next();
            self.parse_var(true, is_block_scope);
            if self.is(TokenType::In) || self.is_contextual(ContextualKeyword::Of) {
                self.parse_for_in(for_await);
            } else {
                self.parse_for();
            }
            return;
        }

        self.parse_expression(true);
        if self.is(TokenType::In) || self.is_contextual(ContextualKeyword::Of) {
            self.parse_for_in(for_await);
            return;
        }
        if for_await {
            self.unexpected();
        }
        self.parse_for();
    }

    fn parse_for(&mut self) {
        self.expect(TokenType::Semi);
        if !self.is(TokenType::Semi) {
            self.parse_expression(false);
        }
        self.expect(TokenType::Semi);
        if !self.is(TokenType::ParenR) {
            self.parse_expression(false);
        }
        self.expect(TokenType::ParenR);
        self.parse_statement(false);
    }

    fn parse_for_in(&mut self, for_await: bool) {
        if for_await {
            self.eat_contextual(ContextualKeyword::Of);
        } else {
            self.next();
        }
        self.parse_expression(false);
        self.expect(TokenType::ParenR);
        self.parse_statement(false);
    }

    fn parse_switch_statement(&mut self) {
        self.next();
        self.parse_paren_expression();
        self.state.scope_depth += 1;
        let start_token_index = self.token_index();
        self.expect(TokenType::BraceL);
        while !self.is(TokenType::BraceR) && !self.has_error() {
            if self.is(TokenType::Case) || self.is(TokenType::Default) {
                let is_case = self.is(TokenType::Case);
                self.next();
                if is_case {
                    self.parse_expression(false);
                }
                self.expect(TokenType::Colon);
            } else {
                self.parse_statement(true);
            }
        }
        self.next();
        self.push_scope(start_token_index, false);
        self.state.scope_depth -= 1;
    }

    fn parse_try_statement(&mut self) {
        self.next();
        self.parse_block(false, 0);
        if self.is(TokenType::Catch) {
            self.next();
            let mut catch_binding_start = None;
            if self.is(TokenType::ParenL) {
                self.state.scope_depth += 1;
                catch_binding_start = Some(self.token_index());
                self.expect(TokenType::ParenL);
                self.parse_binding_atom(true);
                if self.is_typescript_enabled {
                    self.ts_try_parse_type_annotation();
                }
                self.expect(TokenType::ParenR);
            }
            self.parse_block(false, 0);
            // The binding gets its own scope covering the catch body.
            if let Some(start) = catch_binding_start {
                self.push_scope(start, false);
                self.state.scope_depth -= 1;
            }
        }
        if self.eat(TokenType::Finally) {
            self.parse_block(false, 0);
        }
    }

    pub(crate) fn parse_var_statement(&mut self, is_block_scope: bool) {
        self.next();
        self.parse_var(false, is_block_scope);
        self.semicolon();
    }

    pub(crate) fn parse_block(&mut self, is_function_scope: bool, context_id: u32) {
        let start_token_index = self.token_index();
        self.state.scope_depth += 1;
        self.expect(TokenType::BraceL);
        if context_id != 0 {
            self.set_last_context_id(context_id);
        }
        self.parse_block_body(TokenType::BraceR);
        if context_id != 0 {
            self.set_last_context_id(context_id);
        }
        self.push_scope(start_token_index, is_function_scope);
        self.state.scope_depth -= 1;
    }

    pub(crate) fn parse_block_body(&mut self, end: TokenType) {
        while !self.eat(end) && !self.has_error() {
            self.parse_statement(true);
        }
    }

    fn parse_var(&mut self, is_for: bool, is_block_scope: bool) {
        loop {
            self.parse_binding_atom(is_block_scope);
            if self.is_typescript_enabled {
                self.ts_after_parse_var_head();
            } else if self.is_flow_enabled {
                self.flow_after_parse_var_head();
            }
            if self.eat(TokenType::Eq) {
                let eq_index = self.token_index() - 1;
                self.parse_maybe_assign(is_for);
                self.mark_rhs_end(eq_index);
            }
            if !self.eat(TokenType::Comma) {
                break;
            }
        }
    }

    /// Parses a function from after the `function` keyword.
    ///
    /// Function expressions get an extra scope for their own name, which is
    /// visible inside the function only.
    pub(crate) fn parse_function(&mut self, function_start: usize, is_statement: bool, optional_id: bool) {
        if self.is(TokenType::Star) {
            self.next();
        }
        if is_statement && !optional_id && !self.is(TokenType::Name) && !self.is(TokenType::Yield) {
            self.unexpected();
        }

        let mut name_scope_start = None;
        if self.is(TokenType::Name) {
            if !is_statement {
                name_scope_start = Some(self.token_index());
                self.state.scope_depth += 1;
            }
            self.parse_binding_identifier(false);
        }

        let start_token_index = self.token_index();
        self.state.scope_depth += 1;
        self.parse_function_params(false, 0);
        self.parse_function_body_and_finish(function_start, 0);
        self.push_scope(start_token_index, true);
        self.state.scope_depth -= 1;
        if let Some(start) = name_scope_start {
            self.push_scope(start, true);
            self.state.scope_depth -= 1;
        }
    }

    pub(crate) fn parse_function_params(&mut self, allow_modifiers: bool, func_context_id: u32) {
        if self.is_typescript_enabled {
            self.ts_try_parse_type_parameters();
        } else if self.is_flow_enabled && self.is(TokenType::LessThan) {
            let old_is_type = self.push_type_context(0);
            self.flow_parse_type_parameter_declaration();
            self.pop_type_context(old_is_type);
        }
        self.expect(TokenType::ParenL);
        if func_context_id != 0 {
            self.set_last_context_id(func_context_id);
        }
        self.parse_binding_list(TokenType::ParenR, false, false, allow_modifiers, func_context_id);
        if func_context_id != 0 {
            self.set_last_context_id(func_context_id);
        }
    }

    /// Parses a class declaration or expression. The `class` keyword and the
    /// body braces share a context id.
    pub(crate) fn parse_class(&mut self, is_statement: bool, optional_id: bool) {
        let context_id = self.next_context_id();
        self.next();
        if let Some(token) = self.state.last_token_mut() {
            token.context_id = Some(context_id);
            token.is_expression = !is_statement;
        }

        // Class expressions get a scope for their name, visible to the body only.
        let mut name_scope_start = None;
        if !is_statement {
            name_scope_start = Some(self.token_index());
            self.state.scope_depth += 1;
        }
        self.parse_class_id(is_statement, optional_id);
        self.parse_class_super();
        let open_brace_index = self.token_index();
        self.parse_class_body(context_id);
        if self.has_error() {
            return;
        }
        self.set_context_id_at(open_brace_index, context_id);
        self.set_last_context_id(context_id);
        if let Some(start) = name_scope_start {
            self.push_scope(start, false);
            self.state.scope_depth -= 1;
        }
    }

    fn is_class_property(&self) -> bool {
        matches!(
            self.state.kind,
            TokenType::Eq | TokenType::Semi | TokenType::BraceR | TokenType::Bang | TokenType::Colon
        )
    }

    fn is_class_method(&self) -> bool {
        self.is(TokenType::ParenL) || self.is(TokenType::LessThan)
    }

    fn parse_class_body(&mut self, class_context_id: u32) {
        self.expect(TokenType::BraceL);
        while !self.eat(TokenType::BraceR) && !self.has_error() {
            if self.eat(TokenType::Semi) {
                continue;
            }
            if self.is(TokenType::At) {
                self.parse_decorator();
                continue;
            }
            let member_start = self.state.start;
            self.parse_class_member(member_start, class_context_id);
        }
    }

    fn parse_class_member(&mut self, member_start: usize, class_context_id: u32) {
        if self.is_typescript_enabled {
            self.ts_parse_modifiers(&[
                ContextualKeyword::Declare,
                ContextualKeyword::Public,
                ContextualKeyword::Protected,
                ContextualKeyword::Private,
                ContextualKeyword::Override,
            ]);
        }
        let mut is_static = false;
        if self.is(TokenType::Name) && self.is_contextual(ContextualKeyword::Static) {
            self.parse_identifier();
            if self.is_class_method() {
                // A method named `static`.
                self.parse_class_method(member_start, false);
                return;
            } else if self.is_class_property() {
                self.parse_class_property();
                return;
            }
            self.set_last_kind(TokenType::Static);
            is_static = true;

            if self.is(TokenType::BraceL) {
                // Static block; the context id on `static` marks it as a class element.
                self.set_last_context_id(class_context_id);
                self.parse_block(false, 0);
                return;
            }
        }
        self.parse_class_member_with_is_static(member_start, is_static, class_context_id);
    }

    fn parse_class_member_with_is_static(
        &mut self,
        member_start: usize,
        is_static: bool,
        class_context_id: u32,
    ) {
        if self.is_typescript_enabled && self.ts_try_parse_class_member_with_is_static(is_static) {
            return;
        }
        if self.eat(TokenType::Star) {
            // Generator method.
            self.parse_property_name(class_context_id);
            self.parse_class_method(member_start, false);
            return;
        }

        // The name may turn out to be `async`, `get`, `set` or `accessor`.
        self.parse_property_name(class_context_id);
        let keyword = self
            .state
            .last_token()
            .map_or(ContextualKeyword::None, |token| token.contextual_keyword);
        let is_constructor = keyword == ContextualKeyword::Constructor;
        self.parse_post_member_name_modifiers();

        if self.is_class_method() {
            self.parse_class_method(member_start, is_constructor);
        } else if self.is_class_property() {
            self.parse_class_property();
        } else if keyword == ContextualKeyword::Async && !self.is_line_terminator() {
            self.set_last_kind(TokenType::Async);
            if self.is(TokenType::Star) {
                self.next();
            }
            self.parse_property_name(class_context_id);
            self.parse_post_member_name_modifiers();
            self.parse_class_method(member_start, false);
        } else if matches!(keyword, ContextualKeyword::Get | ContextualKeyword::Set)
            && !(self.is_line_terminator() && self.is(TokenType::Star))
        {
            if keyword == ContextualKeyword::Get {
                self.set_last_kind(TokenType::Get);
            } else {
                self.set_last_kind(TokenType::Set);
            }
            self.parse_property_name(class_context_id);
            self.parse_class_method(member_start, false);
        } else if keyword == ContextualKeyword::Accessor && !self.is_line_terminator() {
            self.parse_property_name(class_context_id);
            self.parse_class_property();
        } else if self.is_line_terminator() {
            // Uninitialized field ended by ASI.
            self.parse_class_property();
        } else {
            self.unexpected();
        }
    }

    fn parse_class_method(&mut self, function_start: usize, is_constructor: bool) {
        if self.is_typescript_enabled {
            self.ts_try_parse_type_parameters();
        } else if self.is_flow_enabled && self.is(TokenType::LessThan) {
            self.flow_parse_type_parameter_declaration();
        }
        self.parse_method(function_start, is_constructor);
    }

    pub(crate) fn parse_post_member_name_modifiers(&mut self) {
        if self.is_typescript_enabled {
            self.eat_type_token(TokenType::Question);
        }
    }

    pub(crate) fn parse_class_property(&mut self) {
        if self.is_typescript_enabled {
            self.eat_type_token(TokenType::Bang);
            self.ts_try_parse_type_annotation();
        } else if self.is_flow_enabled && self.is(TokenType::Colon) {
            self.flow_parse_type_annotation();
        }

        if self.is(TokenType::Eq) {
            let equals_token_index = self.token_index();
            self.next();
            self.parse_maybe_assign(false);
            self.mark_rhs_end(equals_token_index);
        }
        self.semicolon();
    }

    fn parse_class_id(&mut self, is_statement: bool, optional_id: bool) {
        if self.is_typescript_enabled
            && (!is_statement || optional_id)
            && self.is_contextual(ContextualKeyword::Implements)
        {
            return;
        }
        if self.is(TokenType::Name) {
            self.parse_binding_identifier(true);
        }
        if self.is_typescript_enabled {
            self.ts_try_parse_type_parameters();
        } else if self.is_flow_enabled && self.is(TokenType::LessThan) {
            self.flow_parse_type_parameter_declaration();
        }
    }

    fn parse_class_super(&mut self) {
        let has_super = self.eat(TokenType::Extends);
        if has_super {
            self.parse_expr_subscripts();
        }
        if self.is_typescript_enabled {
            self.ts_after_parse_class_super(has_super);
        } else if self.is_flow_enabled {
            self.flow_after_parse_class_super(has_super);
        }
    }

    // === Exports ===

    /// Parses an export after its `export` token, recording on that token
    /// where the statement ends.
    pub(crate) fn parse_export(&mut self) {
        let export_index = self.token_index().saturating_sub(1);
        self.parse_export_body();
        self.mark_rhs_end(export_index);
    }

    fn parse_export_body(&mut self) {
        if self.is_typescript_enabled && self.ts_try_parse_export() {
            return;
        }
        if self.should_parse_export_star() {
            if self.is_flow_enabled {
                self.flow_parse_export_star();
            } else {
                self.base_parse_export_star();
            }
        } else if self.is_export_default_specifier() {
            // export v from 'mod'
            self.parse_identifier();
            if self.is(TokenType::Comma) && self.lookahead_type() == TokenType::Star {
                self.expect(TokenType::Comma);
                self.expect(TokenType::Star);
                self.expect_contextual(ContextualKeyword::As);
                self.parse_identifier();
            } else if self.eat(TokenType::Comma) {
                self.parse_export_specifiers();
            }
            self.parse_export_from();
        } else if self.eat(TokenType::Default) {
            self.parse_export_default_expression();
        } else if self.should_parse_export_declaration() {
            if self.is_typescript_enabled {
                self.ts_parse_export_declaration();
            } else if self.is_flow_enabled {
                self.flow_parse_export_declaration();
            } else {
                self.parse_statement(true);
            }
        } else {
            self.parse_export_specifiers();
            self.parse_export_from();
        }
    }

    fn parse_export_default_expression(&mut self) {
        if self.is_typescript_enabled && self.ts_try_parse_export_default_expression() {
            return;
        }
        if self.is_flow_enabled && self.flow_try_parse_export_default_expression() {
            return;
        }
        let function_start = self.state.start;
        if self.eat(TokenType::Function) {
            self.parse_function(function_start, true, true);
        } else if self.is_contextual(ContextualKeyword::Async)
            && self.lookahead_type() == TokenType::Function
        {
            self.eat_contextual(ContextualKeyword::Async);
            self.eat(TokenType::Function);
            self.parse_function(function_start, true, true);
        } else if self.is(TokenType::Class) {
            self.parse_class(true, true);
        } else if self.is(TokenType::At) {
            self.parse_decorators();
            self.parse_class(true, true);
        } else {
            self.parse_maybe_assign(false);
            self.semicolon();
        }
    }

    fn is_export_default_specifier(&mut self) -> bool {
        if self.is_typescript_enabled && self.ts_is_declaration_start() {
            return false;
        }
        if self.is_flow_enabled && self.flow_should_disallow_export_default_specifier() {
            return false;
        }
        if self.is(TokenType::Name) {
            return !self.is_contextual(ContextualKeyword::Async);
        }
        if !self.is(TokenType::Default) {
            return false;
        }

        let next_start = self.next_token_start();
        let lookahead = self.lookahead_type_and_keyword();
        if lookahead.kind == TokenType::Comma {
            return true;
        }
        // `export default from 'x'` re-exports a default named `default`.
        if lookahead.kind == TokenType::Name && lookahead.contextual_keyword == ContextualKeyword::From {
            let after_from = self.next_token_start_since(next_start + "from".len());
            return matches!(self.byte_at(after_from), b'"' | b'\'');
        }
        false
    }

    pub(crate) fn parse_export_from(&mut self) {
        if self.eat_contextual(ContextualKeyword::From) {
            self.parse_expr_atom();
            self.maybe_parse_import_attributes();
        }
        self.semicolon();
    }

    fn should_parse_export_star(&mut self) -> bool {
        if self.is_flow_enabled {
            self.flow_should_parse_export_star()
        } else {
            self.is(TokenType::Star)
        }
    }

    pub(crate) fn base_parse_export_star(&mut self) {
        self.expect(TokenType::Star);
        if self.is_contextual(ContextualKeyword::As) && self.is(TokenType::Name) {
            // export * as ns from 'mod'
            self.next();
            self.set_last_kind(TokenType::As);
            self.parse_identifier();
            if self.eat(TokenType::Comma) {
                self.parse_export_specifiers();
            }
            self.parse_export_from();
        } else {
            self.parse_export_from();
        }
    }

    fn should_parse_export_declaration(&mut self) -> bool {
        (self.is_typescript_enabled && self.ts_is_declaration_start())
            || (self.is_flow_enabled && self.flow_should_parse_export_declaration())
            || matches!(
                self.state.kind,
                TokenType::Var | TokenType::Const | TokenType::Let | TokenType::Function | TokenType::Class | TokenType::At
            )
            || (self.is(TokenType::Name) && self.is_contextual(ContextualKeyword::Async))
    }

    pub(crate) fn parse_export_specifiers(&mut self) {
        let mut first = true;
        self.expect(TokenType::BraceL);
        while !self.eat(TokenType::BraceR) && !self.has_error() {
            if first {
                first = false;
            } else {
                self.expect(TokenType::Comma);
                if self.eat(TokenType::BraceR) {
                    break;
                }
            }
            if self.is_typescript_enabled {
                self.ts_parse_export_specifier();
            } else {
                self.parse_export_specifier();
            }
        }
    }

    pub(crate) fn parse_export_specifier(&mut self) {
        self.parse_identifier();
        self.set_last_role(IdentifierRole::ExportAccess);
        if self.eat_contextual(ContextualKeyword::As) {
            self.parse_identifier();
        }
    }

    // === Imports ===

    /// `import module foo from "foo"` (import reflection) versus a default
    /// import named `module`.
    fn is_import_reflection(&mut self) -> bool {
        let snapshot = self.state.snapshot();
        self.expect_contextual(ContextualKeyword::Module);
        let result = if self.eat_contextual(ContextualKeyword::From) {
            self.is_contextual(ContextualKeyword::From)
        } else {
            !self.is(TokenType::Comma)
        };
        self.state.restore_from_snapshot(snapshot);
        result
    }

    pub(crate) fn parse_import(&mut self) {
        if self.is_typescript_enabled
            && self.is(TokenType::Name)
            && self.lookahead_type() == TokenType::Eq
        {
            self.ts_parse_import_equals_declaration();
            return;
        }
        if self.is_typescript_enabled && self.is_contextual(ContextualKeyword::Type) {
            let lookahead = self.lookahead_type_and_keyword();
            if lookahead.kind == TokenType::Name && lookahead.contextual_keyword != ContextualKeyword::From {
                // import type A from 'a'; import type A = require('a');
                self.expect_contextual(ContextualKeyword::Type);
                self.set_last_kind(TokenType::Type);
                if self.lookahead_type() == TokenType::Eq {
                    self.ts_parse_import_equals_declaration();
                    return;
                }
            } else if lookahead.kind == TokenType::Star || lookahead.kind == TokenType::BraceL {
                // import type * as A from 'a'; import type {A} from 'a';
                self.expect_contextual(ContextualKeyword::Type);
                self.set_last_kind(TokenType::Type);
            }
        }

        if self.is(TokenType::String) {
            // import 'mod'
            self.parse_expr_atom();
        } else {
            if self.is_contextual(ContextualKeyword::Module)
                && self.is(TokenType::Name)
                && self.is_import_reflection()
            {
                self.next();
            }
            self.parse_import_specifiers();
            self.expect_contextual(ContextualKeyword::From);
            self.parse_expr_atom();
        }
        self.maybe_parse_import_attributes();
        self.semicolon();
    }

    fn parse_import_specifiers(&mut self) {
        if self.is_flow_enabled {
            self.flow_start_parse_import_specifiers();
        }

        if self.is(TokenType::Name) {
            // import defaultObj, { x, y as z } from 'mod'
            self.parse_imported_identifier();
            if !self.eat(TokenType::Comma) {
                return;
            }
        }

        if self.is(TokenType::Star) {
            self.next();
            self.expect_contextual(ContextualKeyword::As);
            self.parse_imported_identifier();
            return;
        }

        let mut first = true;
        self.expect(TokenType::BraceL);
        while !self.eat(TokenType::BraceR) && !self.has_error() {
            if first {
                first = false;
            } else {
                if self.eat(TokenType::Colon) {
                    self.unexpected_message(
                        "ES2015 named imports do not support destructuring (use ES5 syntax instead)",
                    );
                }
                self.expect(TokenType::Comma);
                if self.eat(TokenType::BraceR) {
                    break;
                }
            }
            if self.is_typescript_enabled {
                self.ts_parse_import_specifier();
            } else if self.is_flow_enabled {
                self.flow_parse_import_specifier();
            } else {
                self.parse_import_specifier();
            }
        }
    }

    fn parse_import_specifier(&mut self) {
        self.parse_imported_identifier();
        if self.is_contextual(ContextualKeyword::As) && self.is(TokenType::Name) {
            self.set_last_role(IdentifierRole::ImportAccess);
            self.next();
            self.parse_imported_identifier();
        }
    }

    /// `with { type: "json" }` or the older `assert { ... }`, parsed as an object.
    pub(crate) fn maybe_parse_import_attributes(&mut self) {
        if self.is(TokenType::With)
            || (self.is_contextual(ContextualKeyword::Assert)
                && self.is(TokenType::Name)
                && !self.has_preceding_line_break())
        {
            self.next();
            self.parse_obj(false, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::state::Scope;
    use crate::tokenizer::{IdentifierRole, TokenType};
    use crate::{parse_file, Dialect};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scopes_close_children_first() {
        let file = parse_file("function f(a) { { let b; } }", Dialect::default()).unwrap();
        // f ( a ) { { let b ; } } eof
        assert_eq!(
            file.scopes,
            vec![
                Scope::new(6, 11, false),
                Scope::new(5, 12, true),
                Scope::new(2, 12, true),
                Scope::new(0, 13, true),
            ]
        );
    }

    #[test]
    fn test_declaration_roles() {
        let source = "var a; function f() { let b; var c; }";
        let file = parse_file(source, Dialect::default()).unwrap();
        let role = |text: &str| {
            file.tokens
                .iter()
                .find(|token| token.kind == TokenType::Name && token.text(source) == text)
                .and_then(|token| token.identifier_role)
        };
        assert_eq!(role("a"), Some(IdentifierRole::TopLevelDeclaration));
        assert_eq!(role("f"), Some(IdentifierRole::TopLevelDeclaration));
        assert_eq!(role("b"), Some(IdentifierRole::BlockScopedDeclaration));
        assert_eq!(role("c"), Some(IdentifierRole::FunctionScopedDeclaration));
    }

    #[test]
    fn test_import_roles() {
        let file = parse_file("import d, {a as b, c} from 'x';", Dialect::default()).unwrap();
        let roles: Vec<_> = file
            .tokens
            .iter()
            .filter_map(|token| token.identifier_role)
            .collect();
        assert_eq!(
            roles,
            vec![
                IdentifierRole::ImportDeclaration,
                IdentifierRole::ImportAccess,
                IdentifierRole::ImportDeclaration,
                IdentifierRole::ImportDeclaration,
            ]
        );
    }

    #[test]
    fn test_class_context_ids_and_field_rhs() {
        let file = parse_file("class A { x = 1; }", Dialect::default()).unwrap();
        let class_id = file.tokens[0].context_id;
        assert!(class_id.is_some());
        assert_eq!(file.tokens[2].context_id, class_id);
        // Closing brace; index 8 is the end of file.
        assert_eq!(file.tokens[7].context_id, class_id);
        // `=` of the field covers `1`.
        assert_eq!(file.tokens[4].rhs_end_index, Some(6));
    }

    #[test]
    fn test_missing_semicolon_reports_position() {
        let error = parse_file("let a = 1\nlet b = 2 3", Dialect::default()).unwrap_err();
        assert_eq!(error.to_string(), "Unexpected token, expected \";\" (2:11)");
    }
}
