//! TypeScript syntax: types are parsed only far enough to mark their tokens
//! for removal.

use super::SpecifierKind;
use crate::error::SyntaxErrorKind;
use crate::parser::Parser;
use crate::tokenizer::{ContextualKeyword, TokenType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionTypeKind {
    Function,
    Constructor,
    AbstractConstructor,
}

impl<'src> Parser<'src> {
    /// Retypes an allowed modifier word, consuming it when the next token can
    /// follow a modifier.
    fn ts_parse_modifier(&mut self, allowed: &[ContextualKeyword]) -> Option<ContextualKeyword> {
        if !self.is(TokenType::Name) {
            return None;
        }
        let modifier = self.state.contextual_keyword;
        if !allowed.contains(&modifier) || !self.ts_next_token_can_follow_modifier() {
            return None;
        }
        let kind = match modifier {
            ContextualKeyword::Readonly => Some(TokenType::Readonly),
            ContextualKeyword::Abstract => Some(TokenType::Abstract),
            ContextualKeyword::Static => Some(TokenType::Static),
            ContextualKeyword::Public => Some(TokenType::Public),
            ContextualKeyword::Private => Some(TokenType::Private),
            ContextualKeyword::Protected => Some(TokenType::Protected),
            ContextualKeyword::Override => Some(TokenType::Override),
            ContextualKeyword::Declare => Some(TokenType::Declare),
            _ => None,
        };
        if let Some(kind) = kind {
            self.set_last_kind(kind);
        }
        Some(modifier)
    }

    pub(crate) fn ts_parse_modifiers(&mut self, allowed: &[ContextualKeyword]) {
        while self.ts_parse_modifier(allowed).is_some() {}
    }

    /// Consumes the current token and keeps it consumed only if a modifier
    /// may be followed by the next one.
    fn ts_next_token_can_follow_modifier(&mut self) -> bool {
        let snapshot = self.state.snapshot();
        self.next();
        let can_follow = (self.is(TokenType::BracketL)
            || self.is(TokenType::BraceL)
            || self.is(TokenType::Star)
            || self.is(TokenType::Ellipsis)
            || self.is(TokenType::Hash)
            || self.is_literal_property_name())
            && !self.has_preceding_line_break();
        if !can_follow {
            self.state.restore_from_snapshot(snapshot);
        }
        can_follow
    }

    fn ts_parse_entity_name(&mut self) {
        self.parse_identifier();
        while self.eat(TokenType::Dot) {
            self.parse_identifier();
        }
    }

    fn ts_parse_type_reference(&mut self) {
        self.ts_parse_entity_name();
        if !self.has_preceding_line_break() && self.is(TokenType::LessThan) {
            self.ts_parse_type_arguments();
        }
    }

    fn ts_parse_type_query(&mut self) {
        self.expect(TokenType::Typeof);
        if self.is(TokenType::Import) {
            self.ts_parse_import_type();
        } else {
            self.ts_parse_entity_name();
        }
        if !self.has_preceding_line_break() && self.is(TokenType::LessThan) {
            self.ts_parse_type_arguments();
        }
    }

    fn ts_parse_import_type(&mut self) {
        self.expect(TokenType::Import);
        self.expect(TokenType::ParenL);
        self.expect(TokenType::String);
        self.expect(TokenType::ParenR);
        if self.eat(TokenType::Dot) {
            self.ts_parse_entity_name();
        }
        if self.is(TokenType::LessThan) {
            self.ts_parse_type_arguments();
        }
    }

    fn ts_parse_type_parameter(&mut self) {
        self.eat(TokenType::Const);
        let had_in = self.eat(TokenType::In);
        let had_out = self.eat_contextual(ContextualKeyword::Out);
        self.eat(TokenType::Const);
        if (had_in || had_out) && !self.is(TokenType::Name) {
            // `in` or `out` was the parameter name itself.
            self.set_last_kind(TokenType::Name);
        } else {
            self.parse_identifier();
        }
        if self.eat(TokenType::Extends) {
            self.ts_parse_type();
        }
        if self.eat(TokenType::Eq) {
            self.ts_parse_type();
        }
    }

    pub(crate) fn ts_try_parse_type_parameters(&mut self) {
        if self.is(TokenType::LessThan) {
            self.ts_parse_type_parameters();
        }
    }

    fn ts_parse_type_parameters(&mut self) {
        let old_is_type = self.push_type_context(0);
        if self.is(TokenType::LessThan) || self.is(TokenType::TypeParameterStart) {
            self.next();
        } else {
            self.unexpected();
        }
        while !self.eat(TokenType::GreaterThan) && !self.has_error() {
            self.ts_parse_type_parameter();
            self.eat(TokenType::Comma);
        }
        self.pop_type_context(old_is_type);
    }

    /// Parameters and return type of a signature; `=>` is required for
    /// function types, `:` is optional for call signatures.
    fn ts_fill_signature(&mut self, return_token: TokenType) {
        let return_token_required = return_token == TokenType::Arrow;
        self.ts_try_parse_type_parameters();
        self.expect(TokenType::ParenL);
        // Parameters of a signature are never top-level bindings.
        self.state.scope_depth += 1;
        self.parse_binding_list(TokenType::ParenR, false, false, false, 0);
        self.state.scope_depth -= 1;
        if return_token_required || self.is(return_token) {
            self.ts_parse_type_or_type_predicate_annotation(return_token);
        }
    }

    fn ts_parse_type_member_semicolon(&mut self) {
        if !self.eat(TokenType::Comma) {
            self.semicolon();
        }
    }

    fn ts_parse_signature_member(&mut self) {
        self.ts_fill_signature(TokenType::Colon);
        self.ts_parse_type_member_semicolon();
    }

    fn ts_is_unambiguously_index_signature(&mut self) -> bool {
        let snapshot = self.state.snapshot();
        self.next();
        let is_index_signature = self.eat(TokenType::Name) && self.is(TokenType::Colon);
        self.state.restore_from_snapshot(snapshot);
        is_index_signature
    }

    fn ts_try_parse_index_signature(&mut self) -> bool {
        if !(self.is(TokenType::BracketL) && self.ts_is_unambiguously_index_signature()) {
            return false;
        }
        let old_is_type = self.push_type_context(0);
        self.expect(TokenType::BracketL);
        self.parse_identifier();
        self.ts_parse_type_annotation();
        self.expect(TokenType::BracketR);
        self.ts_try_parse_type_annotation();
        self.ts_parse_type_member_semicolon();
        self.pop_type_context(old_is_type);
        true
    }

    fn ts_parse_property_or_method_signature(&mut self, is_readonly: bool) {
        self.eat(TokenType::Question);
        if !is_readonly && (self.is(TokenType::ParenL) || self.is(TokenType::LessThan)) {
            self.ts_fill_signature(TokenType::Colon);
        } else {
            self.ts_try_parse_type_annotation();
        }
        self.ts_parse_type_member_semicolon();
    }

    fn ts_parse_type_member(&mut self) {
        if self.is(TokenType::ParenL) || self.is(TokenType::LessThan) {
            // Call signature.
            self.ts_parse_signature_member();
            return;
        }
        if self.is(TokenType::New) {
            self.next();
            if self.is(TokenType::ParenL) || self.is(TokenType::LessThan) {
                // Construct signature.
                self.ts_parse_signature_member();
            } else {
                self.ts_parse_property_or_method_signature(false);
            }
            return;
        }
        let is_readonly = self.ts_parse_modifier(&[ContextualKeyword::Readonly]).is_some();
        if self.ts_try_parse_index_signature() {
            return;
        }
        if self.is_contextual(ContextualKeyword::Get) || self.is_contextual(ContextualKeyword::Set) {
            // Accessor signature; the lookahead consumes `get`/`set` when it applies.
            self.ts_next_token_can_follow_modifier();
        }
        self.parse_property_name(0);
        self.ts_parse_property_or_method_signature(is_readonly);
    }

    fn ts_parse_object_type_members(&mut self) {
        self.expect(TokenType::BraceL);
        while !self.eat(TokenType::BraceR) && !self.has_error() {
            self.ts_parse_type_member();
        }
    }

    fn ts_lookahead_is_start_of_mapped_type(&mut self) -> bool {
        let snapshot = self.state.snapshot();
        let is_mapped_type = self.ts_is_start_of_mapped_type();
        self.state.restore_from_snapshot(snapshot);
        is_mapped_type
    }

    fn ts_is_start_of_mapped_type(&mut self) -> bool {
        self.next();
        if self.eat(TokenType::Plus) || self.eat(TokenType::Minus) {
            return self.is_contextual(ContextualKeyword::Readonly);
        }
        if self.is_contextual(ContextualKeyword::Readonly) {
            self.next();
        }
        if !self.is(TokenType::BracketL) {
            return false;
        }
        self.next();
        if !self.is(TokenType::Name) {
            return false;
        }
        self.next();
        self.is(TokenType::In)
    }

    fn ts_parse_mapped_type(&mut self) {
        self.expect(TokenType::BraceL);
        if self.is(TokenType::Plus) || self.is(TokenType::Minus) {
            self.next();
            self.expect_contextual(ContextualKeyword::Readonly);
        } else {
            self.eat_contextual(ContextualKeyword::Readonly);
        }
        self.expect(TokenType::BracketL);
        self.parse_identifier();
        self.expect(TokenType::In);
        self.ts_parse_type();
        if self.eat_contextual(ContextualKeyword::As) {
            self.ts_parse_type();
        }
        self.expect(TokenType::BracketR);
        if self.is(TokenType::Plus) || self.is(TokenType::Minus) {
            self.next();
            self.expect(TokenType::Question);
        } else {
            self.eat(TokenType::Question);
        }
        if self.eat(TokenType::Colon) {
            self.ts_parse_type();
        }
        self.semicolon();
        self.expect(TokenType::BraceR);
    }

    fn ts_parse_tuple_type(&mut self) {
        self.expect(TokenType::BracketL);
        while !self.is(TokenType::BracketR) && !self.has_error() {
            self.ts_parse_tuple_element_type();
            if !self.eat(TokenType::Comma) && !self.is(TokenType::BracketR) {
                self.expect(TokenType::Comma);
            }
        }
        self.expect(TokenType::BracketR);
    }

    fn ts_parse_tuple_element_type(&mut self) {
        if self.eat(TokenType::Ellipsis) {
            self.ts_parse_type();
        } else {
            self.ts_parse_type();
            self.eat(TokenType::Question);
        }
        // What was parsed so far was a label.
        if self.eat(TokenType::Colon) {
            self.ts_parse_type();
        }
    }

    fn ts_parse_template_literal_type(&mut self) {
        self.next_template_token();
        self.next_template_token();
        while !self.is(TokenType::BackQuote) && !self.has_error() {
            self.expect(TokenType::DollarBraceL);
            self.ts_parse_type();
            self.next_template_token();
            self.next_template_token();
        }
        self.next();
    }

    fn ts_parse_function_or_constructor_type(&mut self, kind: FunctionTypeKind) {
        if kind == FunctionTypeKind::AbstractConstructor {
            self.expect_contextual(ContextualKeyword::Abstract);
        }
        if kind != FunctionTypeKind::Function {
            self.expect(TokenType::New);
        }
        let old = std::mem::replace(&mut self.state.in_disallow_conditional_types_context, false);
        self.ts_fill_signature(TokenType::Arrow);
        self.state.in_disallow_conditional_types_context = old;
    }

    fn ts_parse_non_array_type(&mut self) {
        match self.state.kind {
            TokenType::Name => {
                self.ts_parse_type_reference();
                return;
            }
            TokenType::Void | TokenType::Null => {
                self.next();
                return;
            }
            TokenType::String
            | TokenType::Num
            | TokenType::Bigint
            | TokenType::Decimal
            | TokenType::True
            | TokenType::False => {
                self.next();
                return;
            }
            TokenType::Minus => {
                // Negative number literal type.
                self.next();
                if !self.is(TokenType::Num) && !self.is(TokenType::Bigint) {
                    self.unexpected();
                    return;
                }
                self.next();
                return;
            }
            TokenType::This => {
                self.next();
                if self.is_contextual(ContextualKeyword::Is) && !self.has_preceding_line_break() {
                    // `this is T`
                    self.next();
                    self.ts_parse_type();
                }
                return;
            }
            TokenType::Typeof => {
                self.ts_parse_type_query();
                return;
            }
            TokenType::Import => {
                self.ts_parse_import_type();
                return;
            }
            TokenType::BraceL => {
                if self.ts_lookahead_is_start_of_mapped_type() {
                    self.ts_parse_mapped_type();
                } else {
                    self.ts_parse_object_type_members();
                }
                return;
            }
            TokenType::BracketL => {
                self.ts_parse_tuple_type();
                return;
            }
            TokenType::ParenL => {
                self.expect(TokenType::ParenL);
                self.ts_parse_type();
                self.expect(TokenType::ParenR);
                return;
            }
            TokenType::BackQuote => {
                self.ts_parse_template_literal_type();
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

    fn ts_parse_array_type_or_higher(&mut self) {
        self.ts_parse_non_array_type();
        while !self.has_preceding_line_break() && self.eat(TokenType::BracketL) {
            // `T[]` is an array type, `T[K]` an indexed access.
            if !self.eat(TokenType::BracketR) {
                self.ts_parse_type();
                self.expect(TokenType::BracketR);
            }
        }
    }

    fn ts_parse_infer_type(&mut self) {
        self.expect_contextual(ContextualKeyword::Infer);
        self.parse_identifier();
        if self.is(TokenType::Extends) {
            // `infer U extends X ? ...` may be a constraint or a conditional type.
            let snapshot = self.state.snapshot();
            self.expect(TokenType::Extends);
            let old = std::mem::replace(&mut self.state.in_disallow_conditional_types_context, true);
            self.ts_parse_type();
            self.state.in_disallow_conditional_types_context = old;
            if self.has_error()
                || (!self.state.in_disallow_conditional_types_context && self.is(TokenType::Question))
            {
                self.state.restore_from_snapshot(snapshot);
            }
        }
    }

    fn ts_parse_type_operator_or_higher(&mut self) {
        if self.is(TokenType::Name)
            && matches!(
                self.state.contextual_keyword,
                ContextualKeyword::Keyof | ContextualKeyword::Unique | ContextualKeyword::Readonly
            )
        {
            self.next();
            self.ts_parse_type_operator_or_higher();
        } else if self.is(TokenType::Name) && self.is_contextual(ContextualKeyword::Infer) {
            self.ts_parse_infer_type();
        } else {
            let old = std::mem::replace(&mut self.state.in_disallow_conditional_types_context, false);
            self.ts_parse_array_type_or_higher();
            self.state.in_disallow_conditional_types_context = old;
        }
    }

    fn ts_parse_intersection_type_or_higher(&mut self) {
        self.eat(TokenType::BitwiseAnd);
        self.ts_parse_type_operator_or_higher();
        while self.eat(TokenType::BitwiseAnd) {
            self.ts_parse_type_operator_or_higher();
        }
    }

    fn ts_parse_union_type_or_higher(&mut self) {
        self.eat(TokenType::BitwiseOr);
        self.ts_parse_intersection_type_or_higher();
        while self.eat(TokenType::BitwiseOr) {
            self.ts_parse_intersection_type_or_higher();
        }
    }

    fn ts_is_start_of_function_type(&mut self) -> bool {
        if self.is(TokenType::LessThan) {
            return true;
        }
        self.is(TokenType::ParenL) && self.ts_lookahead_is_unambiguously_start_of_function_type()
    }

    fn ts_skip_parameter_start(&mut self) -> bool {
        if self.is(TokenType::Name) || self.is(TokenType::This) {
            self.next();
            return true;
        }
        // A destructuring parameter: skip to the matching close.
        if self.is(TokenType::BraceL) || self.is(TokenType::BracketL) {
            let mut depth = 1;
            self.next();
            while depth > 0 && !self.has_error() {
                if self.is(TokenType::BraceL) || self.is(TokenType::BracketL) {
                    depth += 1;
                } else if self.is(TokenType::BraceR) || self.is(TokenType::BracketR) {
                    depth -= 1;
                }
                self.next();
            }
            return true;
        }
        false
    }

    fn ts_lookahead_is_unambiguously_start_of_function_type(&mut self) -> bool {
        let snapshot = self.state.snapshot();
        let result = self.ts_is_unambiguously_start_of_function_type();
        self.state.restore_from_snapshot(snapshot);
        result
    }

    fn ts_is_unambiguously_start_of_function_type(&mut self) -> bool {
        self.next();
        if self.is(TokenType::ParenR) || self.is(TokenType::Ellipsis) {
            // `( )` or `( ...`
            return true;
        }
        if self.ts_skip_parameter_start() {
            if matches!(
                self.state.kind,
                TokenType::Colon | TokenType::Comma | TokenType::Question | TokenType::Eq
            ) {
                return true;
            }
            if self.is(TokenType::ParenR) {
                self.next();
                if self.is(TokenType::Arrow) {
                    return true;
                }
            }
        }
        false
    }

    fn ts_parse_type_or_type_predicate_annotation(&mut self, return_token: TokenType) {
        let old_is_type = self.push_type_context(0);
        self.expect(return_token);
        if !self.ts_parse_type_predicate_or_asserts_prefix() {
            self.ts_parse_type();
        }
        self.pop_type_context(old_is_type);
    }

    fn ts_try_parse_type_or_type_predicate_annotation(&mut self) {
        if self.is(TokenType::Colon) {
            self.ts_parse_type_or_type_predicate_annotation(TokenType::Colon);
        }
    }

    pub(crate) fn ts_try_parse_type_annotation(&mut self) {
        if self.is(TokenType::Colon) {
            self.ts_parse_type_annotation();
        }
    }

    /// Handles `x is T`, `asserts x`, `asserts x is T` and `asserts this`.
    /// Returns whether the whole return type was consumed.
    fn ts_parse_type_predicate_or_asserts_prefix(&mut self) -> bool {
        let snapshot = self.state.snapshot();
        if self.is(TokenType::Name) && self.is_contextual(ContextualKeyword::Asserts) {
            self.next();
            if self.eat_contextual(ContextualKeyword::Is) {
                // `asserts is T`: a guard on a parameter named `asserts`.
                self.ts_parse_type();
                return true;
            } else if self.is(TokenType::Name) || self.is(TokenType::This) {
                self.next();
                if self.eat_contextual(ContextualKeyword::Is) {
                    self.ts_parse_type();
                }
                return true;
            }
            self.state.restore_from_snapshot(snapshot);
            return false;
        } else if self.is(TokenType::Name) || self.is(TokenType::This) {
            self.next();
            if self.is_contextual(ContextualKeyword::Is) && !self.has_preceding_line_break() {
                self.next();
                self.ts_parse_type();
                return true;
            }
            self.state.restore_from_snapshot(snapshot);
            return false;
        }
        false
    }

    pub(crate) fn ts_parse_type_annotation(&mut self) {
        let old_is_type = self.push_type_context(0);
        self.expect(TokenType::Colon);
        self.ts_parse_type();
        self.pop_type_context(old_is_type);
    }

    pub(crate) fn ts_parse_type(&mut self) {
        self.ts_parse_non_conditional_type();
        if self.state.in_disallow_conditional_types_context
            || self.has_preceding_line_break()
            || !self.eat(TokenType::Extends)
        {
            return;
        }
        let old = std::mem::replace(&mut self.state.in_disallow_conditional_types_context, true);
        self.ts_parse_non_conditional_type();
        self.state.in_disallow_conditional_types_context = old;

        self.expect(TokenType::Question);
        self.ts_parse_type();
        self.expect(TokenType::Colon);
        self.ts_parse_type();
    }

    fn ts_parse_non_conditional_type(&mut self) {
        if self.ts_is_start_of_function_type() {
            self.ts_parse_function_or_constructor_type(FunctionTypeKind::Function);
        } else if self.is(TokenType::New) {
            self.ts_parse_function_or_constructor_type(FunctionTypeKind::Constructor);
        } else if self.is(TokenType::Name)
            && self.is_contextual(ContextualKeyword::Abstract)
            && self.lookahead_type() == TokenType::New
        {
            self.ts_parse_function_or_constructor_type(FunctionTypeKind::AbstractConstructor);
        } else {
            self.ts_parse_union_type_or_higher();
        }
    }

    /// `<T>expr`, after the `<` has been consumed.
    pub(crate) fn ts_parse_type_assertion(&mut self) {
        let old_is_type = self.push_type_context(1);
        self.ts_parse_type();
        self.expect(TokenType::GreaterThan);
        self.pop_type_context(old_is_type);
        self.parse_maybe_unary();
    }

    /// Type arguments on a JSX tag name, as in `<Foo<string> />`.
    pub(crate) fn ts_try_parse_jsx_type_argument(&mut self) {
        if self.eat(TokenType::JsxTagStart) {
            self.set_last_kind(TokenType::TypeParameterStart);
            let old_is_type = self.push_type_context(1);
            while !self.is(TokenType::GreaterThan) && !self.has_error() {
                self.ts_parse_type();
                self.eat(TokenType::Comma);
            }
            // The token after `>` is read in tag mode again.
            self.next_jsx_tag_token();
            self.pop_type_context(old_is_type);
        }
    }

    fn ts_parse_heritage_clause(&mut self) {
        while !self.is(TokenType::BraceL) && !self.has_error() {
            self.ts_parse_entity_name();
            if self.is(TokenType::LessThan) {
                self.ts_parse_type_arguments();
            }
            self.eat(TokenType::Comma);
        }
    }

    fn ts_parse_interface_declaration(&mut self) {
        self.parse_binding_identifier(false);
        self.ts_try_parse_type_parameters();
        if self.eat(TokenType::Extends) {
            self.ts_parse_heritage_clause();
        }
        self.ts_parse_object_type_members();
    }

    fn ts_parse_type_alias_declaration(&mut self) {
        self.parse_binding_identifier(false);
        self.ts_try_parse_type_parameters();
        self.expect(TokenType::Eq);
        self.ts_parse_type();
        self.semicolon();
    }

    fn ts_parse_enum_member(&mut self) {
        // Only identifiers and string literals are valid member names.
        if self.is(TokenType::String) {
            self.next();
        } else {
            self.parse_identifier();
        }
        if self.eat(TokenType::Eq) {
            let eq_index = self.token_index() - 1;
            self.parse_maybe_assign(false);
            self.mark_rhs_end(eq_index);
        }
    }

    /// Parses an enum from its name on; the `enum` token is already consumed.
    fn ts_parse_enum_declaration(&mut self) {
        self.parse_binding_identifier(false);
        self.expect(TokenType::BraceL);
        while !self.eat(TokenType::BraceR) && !self.has_error() {
            self.ts_parse_enum_member();
            self.eat(TokenType::Comma);
        }
    }

    /// Parses a namespace body. Ambient bodies are types throughout. A body
    /// outside a type context may only hold declarations that are erased.
    fn ts_parse_module_block(&mut self, namespace_start: usize) {
        self.expect(TokenType::BraceL);
        let old_is_type = self.state.is_type;
        if old_is_type && namespace_start == usize::MAX {
            self.parse_block_body(TokenType::BraceR);
            return;
        }
        self.state.is_type = false;
        let body_start = self.token_index();
        self.parse_block_body(TokenType::BraceR);
        self.state.is_type = old_is_type;
        let body_end = self.token_index().saturating_sub(1);
        let has_values = self.state.tokens[body_start..body_end.max(body_start)]
            .iter()
            .any(|token| !token.is_type && token.kind != TokenType::Semi);
        for token in &mut self.state.tokens[body_start..] {
            token.is_type = true;
        }
        if has_values {
            self.unexpected_with(
                SyntaxErrorKind::Message("Non-declare namespaces with values are not supported"),
                namespace_start,
            );
        }
    }

    fn ts_parse_module_or_namespace_declaration(&mut self, namespace_start: usize) {
        self.parse_binding_identifier(false);
        if self.eat(TokenType::Dot) {
            self.ts_parse_module_or_namespace_declaration(namespace_start);
        } else {
            self.ts_parse_module_block(namespace_start);
        }
    }

    fn ts_parse_ambient_external_module_declaration(&mut self) {
        if self.is_contextual(ContextualKeyword::Global) {
            self.parse_identifier();
        } else if self.is(TokenType::String) {
            self.parse_expr_atom();
        } else {
            self.unexpected();
        }
        if self.is(TokenType::BraceL) {
            self.ts_parse_module_block(usize::MAX);
        } else {
            self.semicolon();
        }
    }

    /// `import A = B.C;` or `import A = require('a');` after `import`.
    pub(crate) fn ts_parse_import_equals_declaration(&mut self) {
        self.parse_imported_identifier();
        self.expect(TokenType::Eq);
        if self.is_contextual(ContextualKeyword::Require) && self.lookahead_type() == TokenType::ParenL {
            self.expect_contextual(ContextualKeyword::Require);
            self.expect(TokenType::ParenL);
            if !self.is(TokenType::String) {
                self.unexpected();
            }
            self.next();
            self.expect(TokenType::ParenR);
        } else {
            self.ts_parse_entity_name();
        }
        self.semicolon();
    }

    /// Parses the declaration after `declare`. Returns whether one matched.
    fn ts_try_parse_declare(&mut self) -> bool {
        if self.is_line_terminator() {
            return false;
        }
        let kind = self.state.kind;
        match kind {
            TokenType::Function => {
                let old_is_type = self.push_type_context(1);
                self.next();
                let function_start = self.state.start;
                self.parse_function(function_start, true, false);
                self.pop_type_context(old_is_type);
                true
            }
            TokenType::Class => {
                let old_is_type = self.push_type_context(1);
                self.parse_class(true, false);
                self.pop_type_context(old_is_type);
                true
            }
            TokenType::Enum => {
                let old_is_type = self.push_type_context(1);
                self.next();
                self.ts_parse_enum_declaration();
                self.pop_type_context(old_is_type);
                true
            }
            TokenType::Const if self.lookahead_type() == TokenType::Enum => {
                let old_is_type = self.push_type_context(1);
                self.expect(TokenType::Const);
                self.expect(TokenType::Enum);
                self.ts_parse_enum_declaration();
                self.pop_type_context(old_is_type);
                true
            }
            TokenType::Const | TokenType::Var | TokenType::Let => {
                let old_is_type = self.push_type_context(1);
                let is_block_scope = !self.is(TokenType::Var);
                self.parse_var_statement(is_block_scope);
                self.pop_type_context(old_is_type);
                true
            }
            TokenType::Name => {
                let old_is_type = self.push_type_context(1);
                let keyword = self.state.contextual_keyword;
                let matched = if keyword == ContextualKeyword::Global {
                    self.ts_parse_ambient_external_module_declaration();
                    true
                } else {
                    self.ts_parse_declaration(keyword, true)
                };
                self.pop_type_context(old_is_type);
                matched
            }
            _ => false,
        }
    }

    /// Statements starting with a contextual word that turned out to be a
    /// lone identifier expression. Returns whether a declaration matched.
    fn ts_parse_expression_statement(&mut self, keyword: ContextualKeyword) -> bool {
        match keyword {
            ContextualKeyword::Declare => {
                let declare_token_index = self.token_index() - 1;
                let matched = self.ts_try_parse_declare();
                if matched {
                    if let Some(token) = self.state.tokens.get_mut(declare_token_index) {
                        token.kind = TokenType::Declare;
                    }
                }
                matched
            }
            ContextualKeyword::Global if self.is(TokenType::BraceL) => {
                // `global { }` inside an ambient module.
                self.ts_parse_module_block(usize::MAX);
                true
            }
            _ => self.ts_parse_declaration(keyword, false),
        }
    }

    /// Parses an `abstract class`, `interface`, `module`, `namespace` or
    /// `type` declaration.
    ///
    /// With `is_before_token`, the keyword is still the current token and may
    /// be preceded by an `export` token that belongs to the erased range.
    fn ts_parse_declaration(&mut self, keyword: ContextualKeyword, is_before_token: bool) -> bool {
        let existing_tokens = if is_before_token { 2 } else { 1 };
        let keyword_start = if is_before_token {
            self.state.start
        } else {
            self.state.last_token().map_or(self.state.start, |token| token.start)
        };
        match keyword {
            ContextualKeyword::Abstract => {
                if self.ts_check_line_terminator(is_before_token) && self.is(TokenType::Class) {
                    self.set_last_kind(TokenType::Abstract);
                    self.parse_class(true, false);
                    return true;
                }
            }
            ContextualKeyword::Interface => {
                if self.ts_check_line_terminator(is_before_token) && self.is(TokenType::Name) {
                    let old_is_type = self.push_type_context(existing_tokens);
                    self.ts_parse_interface_declaration();
                    self.pop_type_context(old_is_type);
                    return true;
                }
            }
            ContextualKeyword::Module | ContextualKeyword::Namespace => {
                let is_ambient = self.state.is_type;
                if self.ts_check_line_terminator(is_before_token) {
                    if keyword == ContextualKeyword::Module && self.is(TokenType::String) {
                        let old_is_type = self.push_type_context(existing_tokens);
                        self.ts_parse_ambient_external_module_declaration();
                        self.pop_type_context(old_is_type);
                        return true;
                    } else if self.is(TokenType::Name) {
                        let old_is_type = self.push_type_context(existing_tokens);
                        let namespace_start = if is_ambient { usize::MAX } else { keyword_start };
                        self.ts_parse_module_or_namespace_declaration(namespace_start);
                        self.pop_type_context(old_is_type);
                        return true;
                    }
                }
            }
            ContextualKeyword::Type => {
                if self.ts_check_line_terminator(is_before_token) && self.is(TokenType::Name) {
                    let old_is_type = self.push_type_context(existing_tokens);
                    self.ts_parse_type_alias_declaration();
                    self.pop_type_context(old_is_type);
                    return true;
                }
            }
            _ => {}
        }
        false
    }

    fn ts_check_line_terminator(&mut self, is_before_token: bool) -> bool {
        if is_before_token {
            self.next();
            true
        } else {
            !self.is_line_terminator()
        }
    }

    /// `f<T>` type arguments, splitting a leading `<<` when needed.
    fn ts_parse_type_arguments_with_possible_bitshift(&mut self) {
        self.split_bit_shift_l();
        self.ts_parse_type_arguments();
    }

    fn ts_parse_type_arguments(&mut self) {
        let old_is_type = self.push_type_context(0);
        self.expect(TokenType::LessThan);
        while !self.is(TokenType::GreaterThan) && !self.has_error() {
            self.ts_parse_type();
            self.eat(TokenType::Comma);
        }
        if old_is_type {
            self.expect(TokenType::GreaterThan);
            self.pop_type_context(old_is_type);
        } else {
            // In expression context `>` is re-read as a value token, so
            // `f(a < b, c >= d)` fails here and falls back to comparisons.
            // The closing `>` is still erased.
            self.pop_type_context(old_is_type);
            self.rescan_gt();
            self.expect(TokenType::GreaterThan);
            if let Some(token) = self.state.last_token_mut() {
                token.is_type = true;
            }
        }
    }

    pub(crate) fn ts_is_declaration_start(&self) -> bool {
        self.is(TokenType::Enum)
            || (self.is(TokenType::Name)
                && matches!(
                    self.state.contextual_keyword,
                    ContextualKeyword::Abstract
                        | ContextualKeyword::Declare
                        | ContextualKeyword::Interface
                        | ContextualKeyword::Module
                        | ContextualKeyword::Namespace
                        | ContextualKeyword::Type
                ))
    }

    // === Hooks called from the base grammar ===

    /// Return type, then either a body or a bodiless overload signature,
    /// which is erased along with any `export default` before it.
    pub(crate) fn ts_parse_function_body_and_finish(&mut self, function_start: usize, func_context_id: u32) {
        if self.is(TokenType::Colon) {
            self.ts_parse_type_or_type_predicate_annotation(TokenType::Colon);
        }
        if !self.is(TokenType::BraceL) && self.is_line_terminator() {
            for token in self.state.tokens.iter_mut().rev() {
                if token.start >= function_start
                    || token.kind == TokenType::Default
                    || token.kind == TokenType::Export
                {
                    token.is_type = true;
                } else {
                    break;
                }
            }
            return;
        }
        self.parse_function_body(false, func_context_id);
    }

    pub(crate) fn ts_parse_subscript(&mut self, start_token_index: usize, no_calls: bool, stop: &mut bool) {
        if !self.has_preceding_line_break() && self.is(TokenType::Bang) {
            self.state.kind = TokenType::NonNullAssertion;
            self.eat_type_token(TokenType::NonNullAssertion);
            return;
        }

        if self.is(TokenType::LessThan) || self.is(TokenType::BitShiftL) {
            // Type arguments on a call, tagged template or instantiation
            // expression; fall back to comparison when that fails.
            let snapshot = self.state.snapshot();
            if !no_calls && self.at_possible_async() && self.ts_try_parse_generic_async_arrow_function() {
                return;
            }
            self.ts_parse_type_arguments_with_possible_bitshift();
            if !no_calls && self.eat(TokenType::ParenL) {
                // With `f<T>()`, the subscript start marker is on the `(`.
                self.mark_subscript_start(start_token_index);
                self.parse_call_expression_arguments();
            } else if self.is(TokenType::BackQuote) {
                self.parse_template();
            } else if self.is(TokenType::GreaterThan)
                || (!self.is(TokenType::ParenL) && self.starts_expression() && !self.has_preceding_line_break())
            {
                // `a < b > c` is a comparison.
                self.unexpected();
            }
            if self.has_error() {
                self.state.restore_from_snapshot(snapshot);
            } else {
                return;
            }
        } else if !no_calls && self.is(TokenType::QuestionDot) && self.lookahead_type() == TokenType::LessThan {
            // `f?.<T>()`
            self.next();
            if let Some(token) = self.state.tokens.get_mut(start_token_index) {
                token.is_optional_chain_start = true;
            }
            self.mark_subscript_start(start_token_index);
            self.ts_parse_type_arguments();
            self.expect(TokenType::ParenL);
            self.parse_call_expression_arguments();
        }
        self.base_parse_subscript(start_token_index, no_calls, stop);
    }

    /// `async <T>(x: T) => x`; returns false (restored) if it is a call.
    fn ts_try_parse_generic_async_arrow_function(&mut self) -> bool {
        let snapshot = self.state.snapshot();
        let start_token_index = self.token_index();
        self.state.scope_depth += 1;
        self.ts_parse_type_parameters();
        self.parse_function_params(false, 0);
        self.ts_try_parse_type_or_type_predicate_annotation();
        self.expect(TokenType::Arrow);
        if self.has_error() {
            self.state.restore_from_snapshot(snapshot);
            return false;
        }
        self.parse_arrow_expression(start_token_index);
        true
    }

    pub(crate) fn ts_start_parse_new_arguments(&mut self) {
        if self.is(TokenType::LessThan) || self.is(TokenType::BitShiftL) {
            let snapshot = self.state.snapshot();
            self.ts_parse_type_arguments_with_possible_bitshift();
            if !self.is(TokenType::ParenL) {
                self.unexpected();
            }
            if self.has_error() {
                self.state.restore_from_snapshot(snapshot);
            }
        }
    }

    /// With JSX on, `<` prefers an element and falls back to a generic arrow;
    /// without, it prefers a generic arrow and falls back to a type assertion.
    pub(crate) fn ts_parse_maybe_assign(&mut self, no_in: bool, is_within_parens: bool) -> bool {
        if !self.is(TokenType::LessThan) {
            return self.base_parse_maybe_assign(no_in, is_within_parens);
        }
        let snapshot = self.state.snapshot();
        if self.is_jsx_enabled {
            let was_arrow = self.base_parse_maybe_assign(no_in, is_within_parens);
            if !self.has_error() {
                return was_arrow;
            }
            self.state.restore_from_snapshot(snapshot);
            self.state.kind = TokenType::TypeParameterStart;
            self.ts_parse_type_parameters();
            let was_arrow = self.base_parse_maybe_assign(no_in, is_within_parens);
            if !was_arrow {
                self.unexpected();
            }
            was_arrow
        } else {
            self.ts_parse_type_parameters();
            let was_arrow = self.base_parse_maybe_assign(no_in, is_within_parens);
            if !was_arrow {
                self.unexpected();
            }
            if !self.has_error() {
                return was_arrow;
            }
            self.state.restore_from_snapshot(snapshot);
            self.base_parse_maybe_assign(no_in, is_within_parens)
        }
    }

    /// Return type annotation of a parenthesized arrow.
    pub(crate) fn ts_parse_arrow(&mut self) -> bool {
        if self.is(TokenType::Colon) {
            let snapshot = self.state.snapshot();
            self.ts_parse_type_or_type_predicate_annotation(TokenType::Colon);
            if self.can_insert_semicolon() || !self.is(TokenType::Arrow) {
                self.unexpected();
            }
            if self.has_error() {
                self.state.restore_from_snapshot(snapshot);
            }
        }
        self.eat(TokenType::Arrow)
    }

    pub(crate) fn ts_parse_assignable_list_item_types(&mut self) {
        let old_is_type = self.push_type_context(0);
        self.eat(TokenType::Question);
        self.ts_try_parse_type_annotation();
        self.pop_type_context(old_is_type);
    }

    pub(crate) fn ts_parse_maybe_decorator_arguments(&mut self) {
        if self.is(TokenType::LessThan) || self.is(TokenType::BitShiftL) {
            self.ts_parse_type_arguments_with_possible_bitshift();
        }
        if self.eat(TokenType::ParenL) {
            self.parse_call_expression_arguments();
        }
    }

    pub(crate) fn ts_start_parse_async_arrow_from_call_expression(&mut self) {
        if self.is(TokenType::Colon) {
            self.ts_parse_type_annotation();
        }
    }

    pub(crate) fn ts_start_parse_obj_prop_value(&mut self) {
        self.ts_try_parse_type_parameters();
    }

    /// `let x!: T` and `let x: T`.
    pub(crate) fn ts_after_parse_var_head(&mut self) {
        let old_is_type = self.push_type_context(0);
        if !self.has_preceding_line_break() {
            self.eat(TokenType::Bang);
        }
        self.ts_try_parse_type_annotation();
        self.pop_type_context(old_is_type);
    }

    pub(crate) fn ts_after_parse_class_super(&mut self, has_super: bool) {
        if has_super && (self.is(TokenType::LessThan) || self.is(TokenType::BitShiftL)) {
            self.ts_parse_type_arguments_with_possible_bitshift();
        }
        if self.eat_contextual(ContextualKeyword::Implements) {
            self.set_last_kind(TokenType::Implements);
            let old_is_type = self.push_type_context(1);
            self.ts_parse_heritage_clause();
            self.pop_type_context(old_is_type);
        }
    }

    /// Modifiers after `static`, and index signatures, in a class body.
    pub(crate) fn ts_try_parse_class_member_with_is_static(&mut self, is_static: bool) -> bool {
        let member_start_after_static = self.token_index();
        self.ts_parse_modifiers(&[
            ContextualKeyword::Abstract,
            ContextualKeyword::Readonly,
            ContextualKeyword::Declare,
            ContextualKeyword::Static,
            ContextualKeyword::Override,
        ]);
        let modifiers_end = self.token_index();
        if self.ts_try_parse_index_signature() {
            // Index signatures are types, and so are the modifiers before them.
            let member_start = if is_static {
                member_start_after_static.saturating_sub(1)
            } else {
                member_start_after_static
            };
            for token in &mut self.state.tokens[member_start..modifiers_end] {
                token.is_type = true;
            }
            return true;
        }
        false
    }

    pub(crate) fn ts_try_parse_statement_content(&mut self) -> bool {
        if self.is(TokenType::Enum) {
            self.next();
            self.ts_parse_enum_declaration();
            return true;
        }
        if self.is(TokenType::Const) && self.lookahead_type() == TokenType::Enum {
            self.expect(TokenType::Const);
            self.expect(TokenType::Enum);
            self.ts_parse_enum_declaration();
            return true;
        }
        false
    }

    pub(crate) fn ts_parse_identifier_statement(&mut self, keyword: ContextualKeyword) {
        if !self.ts_parse_expression_statement(keyword) {
            self.semicolon();
        }
    }

    /// `export import A = B`, `export =`, `export as namespace`, and eating
    /// `type` in `export type {..}` / `export type *`.
    pub(crate) fn ts_try_parse_export(&mut self) -> bool {
        if self.eat(TokenType::Import) {
            if self.is_contextual(ContextualKeyword::Type) && self.lookahead_type() != TokenType::Eq {
                self.expect_contextual(ContextualKeyword::Type);
            }
            self.ts_parse_import_equals_declaration();
            return true;
        }
        if self.eat(TokenType::Eq) {
            self.parse_expression(false);
            self.semicolon();
            return true;
        }
        if self.eat_contextual(ContextualKeyword::As) {
            self.expect_contextual(ContextualKeyword::Namespace);
            self.parse_identifier();
            self.semicolon();
            return true;
        }
        if self.is_contextual(ContextualKeyword::Type) && self.is(TokenType::Name) {
            let next_type = self.lookahead_type();
            if next_type == TokenType::BraceL || next_type == TokenType::Star {
                self.next();
            }
        }
        false
    }

    pub(crate) fn ts_parse_export_declaration(&mut self) {
        // `export declare` is equivalent to `export` followed by an erased declaration.
        let is_declare = self.eat_contextual(ContextualKeyword::Declare);
        if is_declare {
            self.set_last_kind(TokenType::Declare);
        }
        let mut matched = false;
        if self.is(TokenType::Name) {
            let keyword = self.state.contextual_keyword;
            if is_declare {
                let old_is_type = self.push_type_context(2);
                matched = self.ts_parse_declaration(keyword, true);
                self.pop_type_context(old_is_type);
            } else {
                matched = self.ts_parse_declaration(keyword, true);
            }
        }
        if !matched {
            if is_declare {
                let old_is_type = self.push_type_context(2);
                self.parse_statement(true);
                self.pop_type_context(old_is_type);
            } else {
                self.parse_statement(true);
            }
        }
    }

    pub(crate) fn ts_try_parse_export_default_expression(&mut self) -> bool {
        if self.is_contextual(ContextualKeyword::Abstract) && self.lookahead_type() == TokenType::Class {
            self.state.kind = TokenType::Abstract;
            self.next();
            self.parse_class(true, true);
            return true;
        }
        if self.is_contextual(ContextualKeyword::Interface) {
            // `export default` goes with the erased interface.
            let old_is_type = self.push_type_context(2);
            self.ts_parse_declaration(ContextualKeyword::Interface, true);
            self.pop_type_context(old_is_type);
            return true;
        }
        false
    }

    pub(crate) fn ts_parse_import_specifier(&mut self) {
        self.parse_typed_specifier(SpecifierKind::Import);
    }

    pub(crate) fn ts_parse_export_specifier(&mut self) {
        self.parse_typed_specifier(SpecifierKind::Export);
    }
}

#[cfg(test)]
mod tests {
    use crate::tokenizer::TokenType;
    use crate::{parse_file, Dialect, ParseError, ParsedFile};
    use pretty_assertions::assert_eq;

    fn parse_ts(source: &str) -> Result<ParsedFile, ParseError> {
        parse_file(
            source,
            Dialect {
                typescript: true,
                ..Dialect::default()
            },
        )
    }

    /// The source with every type token blanked out.
    fn value_text(source: &str) -> String {
        let file = parse_ts(source).unwrap();
        file.tokens
            .iter()
            .filter(|token| !token.is_type && token.kind != TokenType::Eof)
            .map(|token| token.text(source))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_annotations_are_types() {
        assert_eq!(
            value_text("let x: Array<number> = [];"),
            "let x = [ ] ;"
        );
        assert_eq!(
            value_text("function f<T>(a: T, b?: string): T | null { return a; }"),
            "function f ( a , b ) { return a ; }"
        );
    }

    #[test]
    fn test_type_declarations_are_erased() {
        assert_eq!(
            value_text("interface A { x: number } type B = A | string; export type C = B; let y = 1;"),
            "let y = 1 ;"
        );
    }

    #[test]
    fn test_overload_is_erased_with_export() {
        assert_eq!(
            value_text("export function f(a: string): void;\nexport function f(a) {}"),
            "export function f ( a ) { }"
        );
    }

    #[test]
    fn test_generic_call_and_comparison() {
        assert_eq!(value_text("f<string>(x);"), "f ( x ) ;");
        assert_eq!(value_text("a < b > c;"), "a < b > c ;");
    }

    #[test]
    fn test_as_and_non_null() {
        assert_eq!(value_text("const v = (x as any)!.y;"), "const v = ( x ) . y ;");
    }

    #[test]
    fn test_arrow_return_type() {
        assert_eq!(
            value_text("const f = (a: number): number => a;"),
            "const f = ( a ) => a ;"
        );
    }

    #[test]
    fn test_enum_tokens_are_values() {
        let source = "enum E { A = 1, B }";
        let file = parse_ts(source).unwrap();
        assert_eq!(file.tokens[0].kind, TokenType::Enum);
        assert!(file.tokens.iter().all(|token| !token.is_type));
        assert_eq!(file.tokens[4].rhs_end_index, Some(6));
    }

    #[test]
    fn test_declare_enum_is_erased() {
        assert_eq!(value_text("declare const enum E { A } let z;"), "let z ;");
    }

    #[test]
    fn test_class_members() {
        assert_eq!(
            value_text(
                "class A<T> implements I { private readonly x: T; declare y: number; [k: string]: any; constructor(public z: string) { super(); } }"
            ),
            "class A { private readonly x ; declare y ; constructor ( public z ) { super ( ) ; } }"
        );
    }

    #[test]
    fn test_type_only_namespace_is_erased() {
        assert_eq!(value_text("namespace N { export type T = string; } let a;"), "let a ;");
    }

    #[test]
    fn test_namespace_with_values_is_rejected() {
        let error = parse_ts("let a;\nnamespace N { export const x = 1; }").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Non-declare namespaces with values are not supported (2:1)"
        );
    }

    #[test]
    fn test_import_equals() {
        let source = "import fs = require('fs');";
        let file = parse_ts(source).unwrap();
        assert_eq!(file.tokens[1].kind, TokenType::Name);
        assert_eq!(file.tokens[2].kind, TokenType::Eq);
    }
}
