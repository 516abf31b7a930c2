//! Expression grammar.
//!
//! Functions returning `bool` report whether the expression they parsed was
//! an arrow function, which stops the caller from treating what follows as
//! an operator or subscript.

use super::Parser;
use crate::tokenizer::{is_identifier_start, ContextualKeyword, IdentifierRole, TokenType};

impl<'src> Parser<'src> {
    pub(crate) fn parse_expression(&mut self, no_in: bool) {
        self.parse_maybe_assign(no_in);
        while self.eat(TokenType::Comma) {
            self.parse_maybe_assign(no_in);
        }
    }

    pub(crate) fn parse_maybe_assign(&mut self, no_in: bool) -> bool {
        self.parse_maybe_assign_within(no_in, false)
    }

    /// `is_within_parens` allows `:` and `?:` after the left side, for arrow
    /// parameters and Flow casts inside a parenthesized list.
    pub(crate) fn parse_maybe_assign_within(&mut self, no_in: bool, is_within_parens: bool) -> bool {
        if self.is_typescript_enabled {
            self.ts_parse_maybe_assign(no_in, is_within_parens)
        } else if self.is_flow_enabled {
            self.flow_parse_maybe_assign(no_in, is_within_parens)
        } else {
            self.base_parse_maybe_assign(no_in, is_within_parens)
        }
    }

    pub(crate) fn base_parse_maybe_assign(&mut self, no_in: bool, is_within_parens: bool) -> bool {
        if self.is(TokenType::Yield) {
            self.parse_yield();
            return false;
        }
        if self.is(TokenType::ParenL) || self.is(TokenType::Name) {
            self.state.potential_arrow_at = Some(self.state.start);
        }
        let was_arrow = self.parse_maybe_conditional(no_in);
        if is_within_parens {
            self.parse_paren_item();
        }
        if self.state.kind.is_assign() {
            self.next();
            self.parse_maybe_assign(no_in);
            return false;
        }
        was_arrow
    }

    fn parse_maybe_conditional(&mut self, no_in: bool) -> bool {
        if self.parse_expr_ops(no_in) {
            return true;
        }
        if self.is_typescript_enabled || self.is_flow_enabled {
            self.typed_parse_conditional(no_in);
        } else {
            self.base_parse_conditional(no_in);
        }
        false
    }

    pub(crate) fn base_parse_conditional(&mut self, no_in: bool) {
        if self.eat(TokenType::Question) {
            self.parse_maybe_assign(false);
            self.expect(TokenType::Colon);
            self.parse_maybe_assign(no_in);
        }
    }

    /// A bare `?` followed by `:`, `,` or `)` is an optional arrow parameter,
    /// not a conditional.
    fn typed_parse_conditional(&mut self, no_in: bool) {
        if self.is(TokenType::Question) {
            let next = self.lookahead_type();
            if matches!(next, TokenType::Colon | TokenType::Comma | TokenType::ParenR) {
                return;
            }
        }
        self.base_parse_conditional(no_in);
    }

    /// Type annotations on items that may turn out to be arrow parameters.
    pub(crate) fn parse_paren_item(&mut self) {
        if !(self.is_typescript_enabled || self.is_flow_enabled) {
            return;
        }
        self.eat_type_token(TokenType::Question);
        if self.is(TokenType::Colon) {
            if self.is_typescript_enabled {
                self.ts_parse_type_annotation();
            } else {
                self.flow_parse_type_annotation();
            }
        }
    }

    fn parse_expr_ops(&mut self, no_in: bool) -> bool {
        let start_token_index = self.token_index();
        if self.parse_maybe_unary() {
            return true;
        }
        self.parse_expr_op(start_token_index, -1, no_in);
        false
    }

    /// Precedence climbing over binary operators.
    fn parse_expr_op(&mut self, start_token_index: usize, min_prec: i8, no_in: bool) {
        let in_prec = TokenType::In.binop_precedence() as i8;
        if self.is_typescript_enabled
            && in_prec > min_prec
            && !self.has_preceding_line_break()
            && (self.eat_contextual(ContextualKeyword::As)
                || self.eat_contextual(ContextualKeyword::Satisfies))
        {
            let old_is_type = self.push_type_context(1);
            self.ts_parse_type();
            self.pop_type_context(old_is_type);
            self.rescan_gt();
            self.parse_expr_op(start_token_index, min_prec, no_in);
            return;
        }

        let prec = self.state.kind.binop_precedence() as i8;
        if prec > 0 && (!no_in || !self.is(TokenType::In)) && prec > min_prec {
            let op = self.state.kind;
            self.next();
            if op == TokenType::NullishCoalescing {
                if let Some(token) = self.state.last_token_mut() {
                    token.nullish_start_index = Some(start_token_index);
                }
            }
            let rhs_start_token_index = self.token_index();
            self.parse_maybe_unary();
            let next_prec = if op.is_right_associative() { prec - 1 } else { prec };
            self.parse_expr_op(rhs_start_token_index, next_prec, no_in);
            if op == TokenType::NullishCoalescing {
                if let Some(token) = self.state.tokens.get_mut(start_token_index) {
                    token.num_nullish_coalesce_starts += 1;
                }
                if let Some(token) = self.state.last_token_mut() {
                    token.num_nullish_coalesce_ends += 1;
                }
            }
            self.parse_expr_op(start_token_index, min_prec, no_in);
        }
    }

    pub(crate) fn parse_maybe_unary(&mut self) -> bool {
        if self.is_typescript_enabled && !self.is_jsx_enabled && self.eat(TokenType::LessThan) {
            self.ts_parse_type_assertion();
            return false;
        }
        if self.is_contextual(ContextualKeyword::Module)
            && self.is(TokenType::Name)
            && self.lookahead_byte() == b'{'
            && !self.has_following_line_break()
        {
            self.parse_module_expression();
            return false;
        }
        if self.state.kind.is_prefix() {
            self.next();
            self.parse_maybe_unary();
            return false;
        }

        if self.parse_expr_subscripts() {
            return true;
        }
        while self.state.kind.is_postfix() && !self.can_insert_semicolon() {
            // The tokenizer reads every `++`/`--` as prefix.
            if self.is(TokenType::PreIncDec) {
                self.state.kind = TokenType::PostIncDec;
            }
            self.next();
        }
        false
    }

    pub(crate) fn parse_expr_subscripts(&mut self) -> bool {
        let start_token_index = self.token_index();
        if self.parse_expr_atom() {
            return true;
        }
        self.parse_subscripts(start_token_index, false);
        let is_chain = self
            .state
            .tokens
            .get(start_token_index)
            .is_some_and(|token| token.is_optional_chain_start);
        if is_chain {
            if let Some(token) = self.state.last_token_mut() {
                token.is_optional_chain_end = true;
            }
        }
        false
    }

    pub(crate) fn parse_subscripts(&mut self, start_token_index: usize, no_calls: bool) {
        if self.is_flow_enabled {
            self.flow_parse_subscripts(start_token_index, no_calls);
        } else {
            self.base_parse_subscripts(start_token_index, no_calls);
        }
    }

    pub(crate) fn base_parse_subscripts(&mut self, start_token_index: usize, no_calls: bool) {
        let mut stop = false;
        while !stop && !self.has_error() {
            self.parse_subscript(start_token_index, no_calls, &mut stop);
        }
    }

    fn parse_subscript(&mut self, start_token_index: usize, no_calls: bool, stop: &mut bool) {
        if self.is_typescript_enabled {
            self.ts_parse_subscript(start_token_index, no_calls, stop);
        } else if self.is_flow_enabled {
            self.flow_parse_subscript(start_token_index, no_calls, stop);
        } else {
            self.base_parse_subscript(start_token_index, no_calls, stop);
        }
    }

    pub(crate) fn mark_subscript_start(&mut self, start_token_index: usize) {
        if let Some(token) = self.state.last_token_mut() {
            token.subscript_start_index = Some(start_token_index);
        }
    }

    pub(crate) fn base_parse_subscript(
        &mut self,
        start_token_index: usize,
        no_calls: bool,
        stop: &mut bool,
    ) {
        if !no_calls && self.eat(TokenType::DoubleColon) {
            self.parse_no_call_expr();
            *stop = true;
            self.parse_subscripts(start_token_index, no_calls);
        } else if self.is(TokenType::QuestionDot) {
            if let Some(token) = self.state.tokens.get_mut(start_token_index) {
                token.is_optional_chain_start = true;
            }
            if no_calls && self.lookahead_type() == TokenType::ParenL {
                *stop = true;
                return;
            }
            self.next();
            self.mark_subscript_start(start_token_index);
            if self.eat(TokenType::BracketL) {
                self.parse_expression(false);
                self.expect(TokenType::BracketR);
            } else if self.eat(TokenType::ParenL) {
                self.parse_call_expression_arguments();
            } else {
                self.parse_maybe_private_name();
            }
        } else if self.eat(TokenType::Dot) {
            self.mark_subscript_start(start_token_index);
            self.parse_maybe_private_name();
        } else if self.eat(TokenType::BracketL) {
            self.mark_subscript_start(start_token_index);
            self.parse_expression(false);
            self.expect(TokenType::BracketR);
        } else if !no_calls && self.is(TokenType::ParenL) {
            if self.at_possible_async() {
                // `async(...)` may be a call or the parameters of an async arrow.
                let snapshot = self.state.snapshot();
                let async_start_token_index = self.token_index();
                self.next();
                self.mark_subscript_start(start_token_index);
                let call_context_id = self.next_context_id();
                self.set_last_context_id(call_context_id);
                self.parse_call_expression_arguments();
                self.set_last_context_id(call_context_id);

                if self.is(TokenType::Colon) || self.is(TokenType::Arrow) {
                    self.state.restore_from_snapshot(snapshot);
                    *stop = true;
                    self.state.scope_depth += 1;
                    self.parse_function_params(false, 0);
                    self.parse_async_arrow_from_call_expression(async_start_token_index);
                }
            } else {
                self.next();
                self.mark_subscript_start(start_token_index);
                let call_context_id = self.next_context_id();
                self.set_last_context_id(call_context_id);
                self.parse_call_expression_arguments();
                self.set_last_context_id(call_context_id);
            }
        } else if self.is(TokenType::BackQuote) {
            // Tagged template.
            self.parse_template();
        } else {
            *stop = true;
        }
    }

    pub(crate) fn at_possible_async(&self) -> bool {
        self.state
            .last_token()
            .is_some_and(|token| token.contextual_keyword == ContextualKeyword::Async)
            && !self.can_insert_semicolon()
    }

    pub(crate) fn parse_call_expression_arguments(&mut self) {
        let mut first = true;
        while !self.eat(TokenType::ParenR) && !self.has_error() {
            if first {
                first = false;
            } else {
                self.expect(TokenType::Comma);
                if self.eat(TokenType::ParenR) {
                    break;
                }
            }
            self.parse_expr_list_item(false);
        }
    }

    fn parse_async_arrow_from_call_expression(&mut self, start_token_index: usize) {
        if self.is_typescript_enabled {
            self.ts_start_parse_async_arrow_from_call_expression();
        } else if self.is_flow_enabled {
            self.flow_start_parse_async_arrow_from_call_expression();
        }
        self.expect(TokenType::Arrow);
        self.parse_arrow_expression(start_token_index);
    }

    /// The callee of `new` or `::`, which cannot itself contain a call.
    fn parse_no_call_expr(&mut self) {
        let start_token_index = self.token_index();
        self.parse_expr_atom();
        self.parse_subscripts(start_token_index, true);
    }

    pub(crate) fn parse_expr_atom(&mut self) -> bool {
        if self.eat(TokenType::Modulo) {
            // V8 intrinsic, e.g. `%DebugPrint(x)`.
            self.parse_identifier();
            return false;
        }

        if self.is(TokenType::JsxText) || self.is(TokenType::JsxEmptyText) {
            self.next();
            return false;
        } else if self.is(TokenType::LessThan) && self.is_jsx_enabled {
            self.state.kind = TokenType::JsxTagStart;
            self.jsx_parse_element();
            self.next();
            return false;
        }

        let can_be_arrow = self.state.potential_arrow_at == Some(self.state.start);
        match self.state.kind {
            TokenType::Slash | TokenType::Assign if self.byte_at(self.state.start) == b'/' => {
                self.retokenize_slash_as_regex();
                self.next();
                false
            }
            TokenType::Super
            | TokenType::This
            | TokenType::Regexp
            | TokenType::Num
            | TokenType::Bigint
            | TokenType::Decimal
            | TokenType::String
            | TokenType::Null
            | TokenType::True
            | TokenType::False => {
                self.next();
                false
            }
            TokenType::Import => {
                self.next();
                if self.is(TokenType::Dot) {
                    // import.meta
                    self.set_last_kind(TokenType::Name);
                    self.next();
                    self.parse_identifier();
                }
                false
            }
            TokenType::Name => self.parse_name_atom(can_be_arrow),
            TokenType::Do => {
                self.next();
                self.parse_block(false, 0);
                false
            }
            TokenType::ParenL => self.parse_paren_and_distinguish_expression(can_be_arrow),
            TokenType::BracketL => {
                self.next();
                self.parse_expr_list(TokenType::BracketR, true);
                false
            }
            TokenType::BraceL => {
                self.parse_obj(false, false);
                false
            }
            TokenType::Function => {
                self.parse_function_expression();
                false
            }
            TokenType::At | TokenType::Class => {
                if self.is(TokenType::At) {
                    self.parse_decorators();
                }
                self.parse_class(false, false);
                false
            }
            TokenType::New => {
                self.parse_new();
                false
            }
            TokenType::BackQuote => {
                self.parse_template();
                false
            }
            TokenType::DoubleColon => {
                self.next();
                self.parse_no_call_expr();
                false
            }
            TokenType::Hash => {
                let next_is_name = self
                    .char_at(self.next_token_start())
                    .is_some_and(|ch| is_identifier_start(ch) || ch == '\\');
                if next_is_name {
                    self.parse_maybe_private_name();
                } else {
                    self.next();
                }
                false
            }
            _ => {
                self.unexpected();
                false
            }
        }
    }

    fn parse_name_atom(&mut self, can_be_arrow: bool) -> bool {
        let start_token_index = self.token_index();
        let function_start = self.state.start;
        let contextual_keyword = self.state.contextual_keyword;
        self.parse_identifier();
        if contextual_keyword == ContextualKeyword::Await {
            self.parse_maybe_unary();
            return false;
        }
        if contextual_keyword == ContextualKeyword::Async
            && self.is(TokenType::Function)
            && !self.can_insert_semicolon()
        {
            self.next();
            self.parse_function(function_start, false, false);
            return false;
        }
        if can_be_arrow
            && contextual_keyword == ContextualKeyword::Async
            && !self.can_insert_semicolon()
            && self.is(TokenType::Name)
        {
            // async x => ...
            self.state.scope_depth += 1;
            self.parse_binding_identifier(false);
            self.expect(TokenType::Arrow);
            self.parse_arrow_expression(start_token_index);
            return true;
        }
        if self.is(TokenType::Do) && !self.can_insert_semicolon() {
            self.next();
            self.parse_block(false, 0);
            return false;
        }
        if can_be_arrow && !self.can_insert_semicolon() && self.is(TokenType::Arrow) {
            self.state.scope_depth += 1;
            self.mark_prior_binding_identifier(false);
            self.expect(TokenType::Arrow);
            self.parse_arrow_expression(start_token_index);
            return true;
        }
        self.set_last_role(IdentifierRole::Access);
        false
    }

    pub(crate) fn parse_maybe_private_name(&mut self) {
        self.eat(TokenType::Hash);
        self.parse_identifier();
    }

    fn parse_function_expression(&mut self) {
        let function_start = self.state.start;
        self.parse_identifier();
        if self.eat(TokenType::Dot) {
            // function.sent
            self.parse_identifier();
        }
        self.parse_function(function_start, false, false);
    }

    pub(crate) fn parse_paren_expression(&mut self) {
        self.expect(TokenType::ParenL);
        self.parse_expression(false);
        self.expect(TokenType::ParenR);
    }

    /// Parses a parenthesized expression, re-parsing it as arrow parameters if
    /// an arrow follows.
    fn parse_paren_and_distinguish_expression(&mut self, can_be_arrow: bool) -> bool {
        let snapshot = self.state.snapshot();
        let start_token_index = self.token_index();
        self.expect(TokenType::ParenL);

        let mut first = true;
        while !self.is(TokenType::ParenR) && !self.has_error() {
            if first {
                first = false;
            } else {
                self.expect(TokenType::Comma);
                if self.is(TokenType::ParenR) {
                    break;
                }
            }
            if self.is(TokenType::Ellipsis) {
                self.parse_rest(false);
                self.parse_paren_item();
                break;
            } else {
                self.parse_maybe_assign_within(false, true);
            }
        }
        self.expect(TokenType::ParenR);

        if can_be_arrow && (self.is(TokenType::Colon) || !self.can_insert_semicolon()) && self.parse_arrow()
        {
            self.state.restore_from_snapshot(snapshot);
            self.state.scope_depth += 1;
            self.parse_function_params(false, 0);
            self.parse_arrow();
            self.parse_arrow_expression(start_token_index);
            if self.has_error() {
                // Looked like arrow parameters but was not a valid parameter list.
                self.state.restore_from_snapshot(snapshot);
                self.parse_paren_and_distinguish_expression(false);
                return false;
            }
            return true;
        }
        false
    }

    /// Consumes the arrow, with any return type annotation before it.
    pub(crate) fn parse_arrow(&mut self) -> bool {
        if self.is_typescript_enabled {
            self.ts_parse_arrow()
        } else if self.is_flow_enabled {
            self.flow_parse_arrow()
        } else {
            self.eat(TokenType::Arrow)
        }
    }

    fn parse_new(&mut self) {
        self.expect(TokenType::New);
        if self.eat(TokenType::Dot) {
            // new.target
            self.parse_identifier();
            return;
        }
        self.parse_no_call_expr();
        self.eat(TokenType::QuestionDot);
        if self.is_typescript_enabled {
            self.ts_start_parse_new_arguments();
        } else if self.is_flow_enabled {
            self.flow_start_parse_new_arguments();
        }
        if self.eat(TokenType::ParenL) {
            self.parse_expr_list(TokenType::ParenR, false);
        }
    }

    pub(crate) fn parse_template(&mut self) {
        // Finish `, read quasi.
        self.next_template_token();
        // Finish quasi, read ${ or `.
        self.next_template_token();
        while !self.is(TokenType::BackQuote) && !self.has_error() {
            self.expect(TokenType::DollarBraceL);
            self.parse_expression(false);
            // Finish }, read quasi.
            self.next_template_token();
            // Finish quasi, read ${ or `.
            self.next_template_token();
        }
        self.next();
    }

    /// Parses an object literal or object pattern. The braces and every key
    /// share one context id.
    pub(crate) fn parse_obj(&mut self, is_pattern: bool, is_block_scope: bool) {
        let context_id = self.next_context_id();
        let mut first = true;
        self.next();
        self.set_last_context_id(context_id);

        while !self.eat(TokenType::BraceR) && !self.has_error() {
            if first {
                first = false;
            } else {
                self.expect(TokenType::Comma);
                if self.eat(TokenType::BraceR) {
                    break;
                }
            }

            if self.is(TokenType::Ellipsis) {
                let previous_index = self.token_index();
                self.parse_spread();
                if is_pattern {
                    // `...rest` where the rest target is a plain identifier.
                    if self.token_index() == previous_index + 2 {
                        self.mark_prior_binding_identifier(is_block_scope);
                    }
                    if self.eat(TokenType::BraceR) {
                        break;
                    }
                }
                continue;
            }

            let mut is_generator = false;
            if !is_pattern {
                is_generator = self.eat(TokenType::Star);
            }

            if !is_pattern && self.is_contextual(ContextualKeyword::Async) && self.is(TokenType::Name) {
                if is_generator {
                    self.unexpected();
                }
                self.parse_identifier();
                let is_key = matches!(
                    self.state.kind,
                    TokenType::Colon
                        | TokenType::ParenL
                        | TokenType::BraceR
                        | TokenType::Eq
                        | TokenType::Comma
                );
                if !is_key {
                    if self.is(TokenType::Star) {
                        self.next();
                    }
                    self.parse_property_name(context_id);
                }
            } else {
                self.parse_property_name(context_id);
            }

            self.parse_obj_prop_value(is_pattern, is_block_scope, context_id);
        }
        self.set_last_context_id(context_id);
    }

    fn is_getter_or_setter_method(&self, is_pattern: bool) -> bool {
        !is_pattern
            && (matches!(
                self.state.kind,
                TokenType::String | TokenType::Num | TokenType::BracketL | TokenType::Name
            ) || self.state.kind.is_keyword())
    }

    fn parse_object_method(&mut self, is_pattern: bool, object_context_id: u32) -> bool {
        let function_start = self.state.start;
        if self.is(TokenType::ParenL) {
            if is_pattern {
                self.unexpected();
            }
            self.parse_method(function_start, false);
            return true;
        }
        if self.is_getter_or_setter_method(is_pattern) {
            self.parse_property_name(object_context_id);
            self.parse_method(function_start, false);
            return true;
        }
        false
    }

    fn parse_object_property(&mut self, is_pattern: bool, is_block_scope: bool) {
        if self.eat(TokenType::Colon) {
            if is_pattern {
                self.parse_maybe_default(is_block_scope, false);
            } else {
                self.parse_maybe_assign(false);
            }
            return;
        }

        // Shorthand: in a pattern the key is also the declared binding.
        let role = if !is_pattern {
            IdentifierRole::ObjectShorthand
        } else if self.state.scope_depth == 0 {
            IdentifierRole::ObjectShorthandTopLevelDeclaration
        } else if is_block_scope {
            IdentifierRole::ObjectShorthandBlockScopedDeclaration
        } else {
            IdentifierRole::ObjectShorthandFunctionScopedDeclaration
        };
        self.set_last_role(role);
        self.parse_maybe_default(is_block_scope, true);
    }

    fn parse_obj_prop_value(&mut self, is_pattern: bool, is_block_scope: bool, context_id: u32) {
        if self.is_typescript_enabled {
            self.ts_start_parse_obj_prop_value();
        } else if self.is_flow_enabled {
            self.flow_start_parse_obj_prop_value();
        }
        if !self.parse_object_method(is_pattern, context_id) {
            self.parse_object_property(is_pattern, is_block_scope);
        }
    }

    pub(crate) fn parse_property_name(&mut self, object_context_id: u32) {
        if self.is_flow_enabled {
            self.flow_parse_variance();
        }
        if self.eat(TokenType::BracketL) {
            self.set_last_context_id(object_context_id);
            self.parse_maybe_assign(false);
            self.expect(TokenType::BracketR);
            self.set_last_context_id(object_context_id);
        } else {
            if matches!(
                self.state.kind,
                TokenType::Num | TokenType::String | TokenType::Bigint | TokenType::Decimal
            ) {
                self.next();
            } else {
                self.parse_maybe_private_name();
            }
            self.set_last_role(IdentifierRole::ObjectKey);
            if object_context_id != 0 {
                self.set_last_context_id(object_context_id);
            }
        }
    }

    /// Parses an object or class method from its parameter list on.
    pub(crate) fn parse_method(&mut self, function_start: usize, is_constructor: bool) {
        let func_context_id = self.next_context_id();
        self.state.scope_depth += 1;
        let start_token_index = self.token_index();
        // Constructors accept TypeScript parameter properties.
        self.parse_function_params(is_constructor, func_context_id);
        self.parse_function_body_and_finish(function_start, func_context_id);
        self.push_scope(start_token_index, true);
        self.state.scope_depth -= 1;
    }

    /// Parses an arrow body; the caller has already entered the function scope.
    pub(crate) fn parse_arrow_expression(&mut self, start_token_index: usize) {
        self.parse_function_body(true, 0);
        self.push_scope(start_token_index, true);
        self.state.scope_depth -= 1;
    }

    pub(crate) fn parse_function_body_and_finish(&mut self, function_start: usize, func_context_id: u32) {
        if self.is_typescript_enabled {
            self.ts_parse_function_body_and_finish(function_start, func_context_id);
        } else if self.is_flow_enabled {
            self.flow_parse_function_body_and_finish(func_context_id);
        } else {
            self.parse_function_body(false, func_context_id);
        }
    }

    pub(crate) fn parse_function_body(&mut self, allow_expression: bool, func_context_id: u32) {
        if allow_expression && !self.is(TokenType::BraceL) {
            self.parse_maybe_assign(false);
        } else {
            self.parse_block(true, func_context_id);
        }
    }

    fn parse_expr_list(&mut self, close: TokenType, allow_empty: bool) {
        let mut first = true;
        while !self.eat(close) && !self.has_error() {
            if first {
                first = false;
            } else {
                self.expect(TokenType::Comma);
                if self.eat(close) {
                    break;
                }
            }
            self.parse_expr_list_item(allow_empty);
        }
    }

    fn parse_expr_list_item(&mut self, allow_empty: bool) {
        if allow_empty && self.is(TokenType::Comma) {
            // Hole.
        } else if self.is(TokenType::Ellipsis) {
            self.parse_spread();
            self.parse_paren_item();
        } else if self.is(TokenType::Question) {
            // Partial application placeholder.
            self.next();
        } else {
            self.parse_maybe_assign_within(false, true);
        }
    }

    fn parse_yield(&mut self) {
        self.next();
        if !self.is(TokenType::Semi) && !self.can_insert_semicolon() {
            self.eat(TokenType::Star);
            self.parse_maybe_assign(false);
        }
    }

    fn parse_module_expression(&mut self) {
        self.expect_contextual(ContextualKeyword::Module);
        self.expect(TokenType::BraceL);
        self.parse_block_body(TokenType::BraceR);
    }
}

#[cfg(test)]
mod tests {
    use crate::tokenizer::{IdentifierRole, TokenType};
    use crate::{parse_file, Dialect};

    #[test]
    fn test_arrow_parameters_are_declarations() {
        let file = parse_file("(a, b) => a + b;", Dialect::default()).unwrap();
        let roles: Vec<_> = file
            .tokens
            .iter()
            .filter(|token| token.kind == TokenType::Name)
            .map(|token| token.identifier_role)
            .collect();
        assert_eq!(
            roles,
            vec![
                Some(IdentifierRole::FunctionScopedDeclaration),
                Some(IdentifierRole::FunctionScopedDeclaration),
                Some(IdentifierRole::Access),
                Some(IdentifierRole::Access),
            ]
        );
    }

    #[test]
    fn test_parenthesized_expression_is_not_arrow() {
        let file = parse_file("(a, b);", Dialect::default()).unwrap();
        assert!(file
            .tokens
            .iter()
            .filter(|token| token.kind == TokenType::Name)
            .all(|token| token.identifier_role == Some(IdentifierRole::Access)));
    }

    #[test]
    fn test_optional_chain_markers() {
        let file = parse_file("a?.b.c();", Dialect::default()).unwrap();
        assert!(file.tokens[0].is_optional_chain_start);
        // `a ?. b . c ( )` then `;`
        assert!(file.tokens[6].is_optional_chain_end);
        assert_eq!(file.tokens[1].subscript_start_index, Some(0));
    }

    #[test]
    fn test_nullish_markers() {
        let file = parse_file("x = a ?? b;", Dialect::default()).unwrap();
        assert_eq!(file.tokens[2].num_nullish_coalesce_starts, 1);
        assert_eq!(file.tokens[3].nullish_start_index, Some(2));
        assert_eq!(file.tokens[4].num_nullish_coalesce_ends, 1);
    }

    #[test]
    fn test_regex_in_expression_position() {
        let file = parse_file("x = /a[/]b/g.test(y);", Dialect::default()).unwrap();
        assert_eq!(file.tokens[2].kind, TokenType::Regexp);
    }

    #[test]
    fn test_template_tokens() {
        let file = parse_file("`a${b}c`;", Dialect::default()).unwrap();
        let kinds: Vec<_> = file.tokens.iter().map(|token| token.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenType::BackQuote,
                TokenType::Template,
                TokenType::DollarBraceL,
                TokenType::Name,
                TokenType::BraceR,
                TokenType::Template,
                TokenType::BackQuote,
                TokenType::Semi,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_object_shorthand_roles() {
        let file = parse_file("const {a} = b; f({c});", Dialect::default()).unwrap();
        assert_eq!(
            file.tokens[2].identifier_role,
            Some(IdentifierRole::ObjectShorthandTopLevelDeclaration)
        );
        assert_eq!(file.tokens[10].identifier_role, Some(IdentifierRole::ObjectShorthand));
    }
}
