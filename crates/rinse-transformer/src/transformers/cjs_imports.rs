use super::{Context, RootTransformer, Transformer};
use crate::error::TransformError;
use crate::helpers::Helpers;
use crate::options::{Options, Transforms};
use crate::token_processor::TokenProcessor;
use crate::util::{
    elide_import_equals, get_declaration_info, get_import_export_specifier_info, is_export_from,
    remove_maybe_import_attributes, should_elide_default_export, DeclarationInfo,
};
use rinse_parser::{ContextualKeyword, IdentifierRole, TokenType};
use std::cell::Cell;

/// Rewrites `import` and `export` into `require` calls and assignments to
/// `exports`, and redirects every use of an imported or exported binding.
pub(crate) struct CjsImportTransformer {
    is_react_hot_loader_enabled: bool,
    enable_legacy_babel5_module_interop: bool,
    enable_legacy_typescript_module_interop: bool,
    is_typescript_transform_enabled: bool,
    is_flow_transform_enabled: bool,
    preserve_dynamic_import: bool,
    keep_unused_imports: bool,
    declaration_info: DeclarationInfo,
    had_export: Cell<bool>,
    had_named_export: Cell<bool>,
    had_default_export: Cell<bool>,
}

impl CjsImportTransformer {
    pub(crate) fn new(tokens: &TokenProcessor<'_>, options: &Options, is_react_hot_loader_enabled: bool) -> Self {
        let is_typescript_transform_enabled = options.transforms.contains(Transforms::TYPESCRIPT);
        let declaration_info = if is_typescript_transform_enabled {
            get_declaration_info(tokens)
        } else {
            DeclarationInfo::default()
        };
        Self {
            is_react_hot_loader_enabled,
            enable_legacy_babel5_module_interop: options.enable_legacy_babel5_module_interop,
            enable_legacy_typescript_module_interop: options.enable_legacy_typescript_module_interop,
            is_typescript_transform_enabled,
            is_flow_transform_enabled: options.transforms.contains(Transforms::FLOW),
            preserve_dynamic_import: options.preserve_dynamic_import,
            keep_unused_imports: options.keep_unused_imports,
            declaration_info,
            had_export: Cell::new(false),
            had_named_export: Cell::new(false),
            had_default_export: Cell::new(false),
        }
    }
}

impl Transformer for CjsImportTransformer {
    fn name(&self) -> &'static str {
        "cjs-imports"
    }

    fn process(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<bool, TransformError> {
        let tokens = &cx.tokens;
        if tokens.matches3(TokenType::Import, TokenType::Name, TokenType::Eq) {
            return self.process_import_equals(cx);
        }
        if tokens.matches4([TokenType::Import, TokenType::Type, TokenType::Name, TokenType::Eq]) {
            remove_import_type_equals(&mut cx.tokens);
            return Ok(true);
        }
        if tokens.matches1(TokenType::Import) {
            self.process_import(root, cx)?;
            return Ok(true);
        }
        if tokens.matches2(TokenType::Export, TokenType::Eq) {
            cx.tokens.replace_token("module.exports");
            return Ok(true);
        }
        if tokens.matches1(TokenType::Export) && !tokens.current_token().is_type {
            self.had_export.set(true);
            return self.process_export(root, cx);
        }
        if tokens.matches2(TokenType::Name, TokenType::PostIncDec) && self.process_post_inc_dec(cx)? {
            return Ok(true);
        }
        let tokens = &cx.tokens;
        if tokens.matches1(TokenType::Name) || tokens.matches1(TokenType::JsxName) {
            return self.process_identifier(root, cx);
        }
        if tokens.matches1(TokenType::Eq) {
            return Ok(self.process_assignment(cx));
        }
        if tokens.matches1(TokenType::Assign) {
            return Ok(self.process_complex_assignment(cx));
        }
        if tokens.matches1(TokenType::PreIncDec) {
            return Ok(self.process_pre_inc_dec(cx));
        }
        Ok(false)
    }

    fn prefix_code(&self, _cx: &Context<'_>) -> String {
        if self.had_export.get() {
            "Object.defineProperty(exports, \"__esModule\", {value: true});".to_string()
        } else {
            String::new()
        }
    }

    fn suffix_code(&self, _cx: &Context<'_>) -> String {
        if self.enable_legacy_babel5_module_interop
            && self.had_default_export.get()
            && !self.had_named_export.get()
        {
            "\nmodule.exports = exports.default;\n".to_string()
        } else {
            String::new()
        }
    }
}

/// `import type T = require('t')` has no runtime part at all.
pub(super) fn remove_import_type_equals(tokens: &mut TokenProcessor<'_>) {
    // import
    tokens.remove_initial_token();
    // type
    tokens.remove_token();
    elide_import_equals_after_import(tokens);
}

/// Removes `A = require('a')` or `A = B.C` after a removed `import`.
fn elide_import_equals_after_import(tokens: &mut TokenProcessor<'_>) {
    // name, =, require or first name
    tokens.remove_token();
    tokens.remove_token();
    tokens.remove_token();
    if tokens.matches1(TokenType::ParenL) {
        tokens.remove_token();
        tokens.remove_token();
        tokens.remove_token();
    } else {
        while tokens.matches1(TokenType::Dot) {
            tokens.remove_token();
            tokens.remove_token();
        }
    }
}

impl CjsImportTransformer {
    fn imports<'c>(cx: &'c Context<'_>) -> Result<&'c crate::cjs_import_processor::CjsImportProcessor, TransformError> {
        cx.imports
            .as_ref()
            .ok_or_else(|| TransformError::structure("Expected an import processor for CommonJS output."))
    }

    fn process_import_equals(&self, cx: &mut Context<'_>) -> Result<bool, TransformError> {
        let import_name = cx.tokens.identifier_name_at_relative_index(1);
        if Self::imports(cx)?.should_automatically_elide_imported_name(import_name) {
            elide_import_equals(&mut cx.tokens);
        } else {
            cx.tokens.replace_token("const");
        }
        Ok(true)
    }

    /// `import a, {b} from 'c';` becomes the `require` code worked out
    /// ahead of time for `'c'`; a dynamic `import()` becomes a promise of
    /// a `require`.
    fn process_import(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<(), TransformError> {
        if cx.tokens.matches2(TokenType::Import, TokenType::ParenL) {
            if self.preserve_dynamic_import {
                cx.tokens.copy_token();
                return Ok(());
            }
            let require_wrapper = if self.enable_legacy_typescript_module_interop {
                String::new()
            } else {
                let helper = cx.tokens.helpers.get_helper_name(Helpers::INTEROP_REQUIRE_WILDCARD);
                format!("{helper}(")
            };
            cx.tokens
                .replace_token(&format!("Promise.resolve().then(() => {require_wrapper}require"));
            let Some(context_id) = cx.tokens.current_token().context_id else {
                return Err(TransformError::structure(
                    "Expected context ID on dynamic import invocation.",
                ));
            };
            cx.tokens.copy_token();
            while !cx.tokens.matches_context_id_and_label(TokenType::ParenR, Some(context_id)) {
                if cx.tokens.is_at_end() {
                    return Err(TransformError::structure("Unexpected end of dynamic import."));
                }
                root.process_token(cx)?;
            }
            cx.tokens
                .replace_token(if require_wrapper.is_empty() { "))" } else { ")))" });
            return Ok(());
        }

        if self.remove_import_and_detect_if_should_elide(cx) {
            cx.tokens.remove_token();
        } else {
            let path = cx.tokens.string_value();
            let imports = cx
                .imports
                .as_mut()
                .ok_or_else(|| TransformError::structure("Expected an import processor for CommonJS output."))?;
            let code = imports.claim_import_code(path);
            // Any later import of the same path was folded into this one.
            let rest = imports.claim_import_code(path);
            cx.tokens.replace_token_trimming_left_whitespace(&code);
            cx.tokens.append_code(&rest);
        }
        remove_maybe_import_attributes(&mut cx.tokens);
        if cx.tokens.matches1(TokenType::Semi) {
            cx.tokens.remove_token();
        }
        Ok(())
    }

    /// Removes the import clause, leaving the cursor on the path string.
    /// Returns whether the whole statement goes because it only imports
    /// types.
    fn remove_import_and_detect_if_should_elide(&self, cx: &mut Context<'_>) -> bool {
        let tokens = &mut cx.tokens;
        tokens.remove_initial_token();
        if tokens.matches1(TokenType::Type)
            || (tokens.matches_contextual(ContextualKeyword::Type)
                && !tokens.matches1_at_index(tokens.current_index() + 1, TokenType::Comma)
                && !tokens.matches_contextual_at_index(tokens.current_index() + 1, ContextualKeyword::From))
        {
            remove_remaining_import(tokens);
            return true;
        }
        if tokens.matches1(TokenType::Name) || tokens.matches1(TokenType::Star) {
            // A default or namespace import is always a value import.
            remove_remaining_import(tokens);
            return false;
        }
        if tokens.matches1(TokenType::String) {
            // import 'a'
            return false;
        }

        let mut found_non_type_import = false;
        let mut found_any_named_import = false;
        while !tokens.matches1(TokenType::String) && !tokens.is_at_end() {
            // A specifier without a leading `type` is `a` or `a as b`.
            if (!found_non_type_import && tokens.matches1(TokenType::BraceL)) || tokens.matches1(TokenType::Comma) {
                tokens.remove_token();
                if !tokens.matches1(TokenType::BraceR) {
                    found_any_named_import = true;
                }
                if tokens.matches2(TokenType::Name, TokenType::Comma)
                    || tokens.matches2(TokenType::Name, TokenType::BraceR)
                    || tokens.matches4([TokenType::Name, TokenType::Name, TokenType::Name, TokenType::Comma])
                    || tokens.matches4([TokenType::Name, TokenType::Name, TokenType::Name, TokenType::BraceR])
                {
                    found_non_type_import = true;
                }
            }
            tokens.remove_token();
        }
        if self.keep_unused_imports {
            false
        } else if self.is_typescript_transform_enabled {
            !found_non_type_import
        } else if self.is_flow_transform_enabled {
            // Unlike TypeScript, Flow keeps `import {} from 'a'`.
            found_any_named_import && !found_non_type_import
        } else {
            false
        }
    }

    fn process_identifier(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<bool, TransformError> {
        let token = cx.tokens.current_token();
        if token.shadows_global {
            return Ok(false);
        }
        if token.identifier_role == Some(IdentifierRole::ObjectShorthand) {
            return self.process_object_shorthand(cx);
        }
        if token.identifier_role != Some(IdentifierRole::Access) {
            return Ok(false);
        }
        let name = cx.tokens.identifier_name();
        let Some(replacement) = Self::imports(cx)?.identifier_replacement(name).map(str::to_string) else {
            return Ok(false);
        };

        // Skip any closing parens to find out whether this is a callee.
        let mut possible_open_paren_index = cx.tokens.current_index() + 1;
        while cx.tokens.matches1_at_index(possible_open_paren_index, TokenType::ParenR) {
            possible_open_paren_index += 1;
        }
        if cx.tokens.matches1_at_index(possible_open_paren_index, TokenType::ParenL) {
            if cx.tokens.token_at_relative_index(1).kind == TokenType::ParenL
                && cx.tokens.token_at_relative_index(-1).kind != TokenType::New
            {
                // A direct call: call without `exports` as `this`.
                cx.tokens
                    .replace_token(&format!("{replacement}.call(void 0, "));
                cx.tokens.remove_token();
                root.process_balanced_code(cx)?;
                cx.tokens.copy_expected_token(TokenType::ParenR)?;
            } else {
                // Inside parens the comma expression drops the `this` binding.
                cx.tokens.replace_token(&format!("(0, {replacement})"));
            }
        } else {
            cx.tokens.replace_token(&replacement);
        }
        Ok(true)
    }

    fn process_object_shorthand(&self, cx: &mut Context<'_>) -> Result<bool, TransformError> {
        let name = cx.tokens.identifier_name();
        let Some(replacement) = Self::imports(cx)?.identifier_replacement(name) else {
            return Ok(false);
        };
        let code = format!("{name}: {replacement}");
        cx.tokens.replace_token(&code);
        Ok(true)
    }

    fn process_export(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<bool, TransformError> {
        let tokens = &cx.tokens;
        if tokens.matches2(TokenType::Export, TokenType::Enum)
            || tokens.matches3(TokenType::Export, TokenType::Const, TokenType::Enum)
        {
            // Lowered by the TypeScript transformer.
            self.had_named_export.set(true);
            return Ok(false);
        }
        if tokens.matches2(TokenType::Export, TokenType::Default) {
            self.process_export_default(root, cx)?;
            self.had_default_export.set(true);
            return Ok(true);
        }
        if tokens.matches2(TokenType::Export, TokenType::BraceL) {
            self.process_export_bindings(cx)?;
            return Ok(true);
        }
        if tokens.matches2(TokenType::Export, TokenType::Name)
            && tokens.matches_contextual_at_index(tokens.current_index() + 1, ContextualKeyword::Type)
        {
            remove_export_type(&mut cx.tokens);
            return Ok(true);
        }
        if tokens.matches4([TokenType::Export, TokenType::Import, TokenType::Name, TokenType::Eq]) {
            self.process_export_import_equals(root, cx)?;
            return Ok(true);
        }

        self.had_named_export.set(true);
        let next = tokens.token_at_relative_index(1).kind;
        if matches!(next, TokenType::Var | TokenType::Let | TokenType::Const) {
            self.process_export_var(root, cx)?;
        } else if next == TokenType::Function
            || (is_async_word(tokens, tokens.current_index() + 1)
                && tokens.matches1_at_index(tokens.current_index() + 2, TokenType::Function))
        {
            // export function, export async function
            cx.tokens.remove_initial_token();
            let name = process_named_function(root, cx)?;
            cx.tokens.append_code(&format!(" exports.{name} = {name};"));
        } else if matches!(next, TokenType::Class | TokenType::At)
            || tokens.matches3(TokenType::Export, TokenType::Abstract, TokenType::Class)
        {
            cx.tokens.remove_initial_token();
            copy_decorators(root, cx)?;
            if cx.tokens.matches1(TokenType::Abstract) {
                cx.tokens.remove_token();
            }
            let name = root.process_named_class(cx)?;
            cx.tokens.append_code(&format!(" exports.{name} = {name};"));
        } else if next == TokenType::Star {
            self.process_export_star(cx)?;
        } else {
            return Err(TransformError::structure("Unrecognized export syntax."));
        }
        Ok(true)
    }

    /// `export import A = B.C;` → `const A = B.C; exports.A = A;`
    fn process_export_import_equals(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<(), TransformError> {
        let Some(end) = cx.tokens.current_token().rhs_end_index else {
            return Err(TransformError::structure("Expected non-null rhsEndIndex on export token."));
        };
        let name = cx.tokens.identifier_name_at_relative_index(2);
        cx.tokens.remove_initial_token();
        cx.tokens.replace_token("const");
        while cx.tokens.current_index() < end {
            root.process_token(cx)?;
        }
        cx.tokens.append_code(&format!(" exports.{name} = {name};"));
        Ok(())
    }

    fn process_export_default(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<(), TransformError> {
        let tokens = &cx.tokens;
        let is_named_function = tokens.matches4([TokenType::Export, TokenType::Default, TokenType::Function, TokenType::Name])
            || (is_async_word(tokens, tokens.current_index() + 2)
                && tokens.matches1_at_index(tokens.current_index() + 3, TokenType::Function)
                && tokens.matches1_at_index(tokens.current_index() + 4, TokenType::Name));
        let is_named_class = tokens.matches4([TokenType::Export, TokenType::Default, TokenType::Class, TokenType::Name])
            || tokens.matches5([
                TokenType::Export,
                TokenType::Default,
                TokenType::Abstract,
                TokenType::Class,
                TokenType::Name,
            ])
            || tokens.matches3(TokenType::Export, TokenType::Default, TokenType::At);

        if is_named_function {
            cx.tokens.remove_initial_token();
            cx.tokens.remove_token();
            let name = process_named_function(root, cx)?;
            cx.tokens.append_code(&format!(" exports.default = {name};"));
        } else if is_named_class {
            cx.tokens.remove_initial_token();
            cx.tokens.remove_token();
            copy_decorators(root, cx)?;
            if cx.tokens.matches1(TokenType::Abstract) {
                cx.tokens.remove_token();
            }
            let name = root.process_named_class(cx)?;
            cx.tokens.append_code(&format!(" exports.default = {name};"));
        } else if should_elide_default_export(
            self.is_typescript_transform_enabled,
            self.keep_unused_imports,
            &cx.tokens,
            &self.declaration_info,
        )? {
            // `export default T;` where `T` is only a type.
            cx.tokens.remove_initial_token();
            cx.tokens.remove_token();
            cx.tokens.remove_token();
            return Ok(());
        } else if self.is_react_hot_loader_enabled {
            // `let _default; exports. default = _default = E;`
            let default_name = cx.names.claim_free_name("_default");
            cx.tokens
                .replace_token(&format!("let {default_name}; exports."));
            cx.tokens.copy_token();
            cx.tokens.append_code(&format!(" = {default_name} ="));
            cx.hot_loader_default_export = Some(default_name);
        } else {
            cx.tokens.replace_token("exports.");
            cx.tokens.copy_token();
            cx.tokens.append_code(" =");
        }
        Ok(())
    }

    fn process_export_var(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<(), TransformError> {
        if is_simple_export_var(&cx.tokens) {
            process_simple_export_var(root, cx)
        } else {
            self.process_complex_export_var(root, cx)
        }
    }

    /// `export const {x: [a = 2, b], c} = d;` →
    /// `({x: [exports.a = 2, exports.b], c: exports.c} = d);`
    fn process_complex_export_var(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<(), TransformError> {
        cx.tokens.remove_initial_token();
        cx.tokens.remove_token();
        let needs_parens = cx.tokens.matches1(TokenType::BraceL);
        if needs_parens {
            cx.tokens.append_code("(");
        }

        let mut depth = 0usize;
        loop {
            if cx.tokens.is_at_end() {
                return Err(TransformError::structure("Unexpected end of export declaration."));
            }
            let token = cx.tokens.current_token();
            match token.kind {
                TokenType::BraceL | TokenType::DollarBraceL | TokenType::BracketL => {
                    depth += 1;
                    cx.tokens.copy_token();
                }
                TokenType::BraceR | TokenType::BracketR => {
                    depth = depth.saturating_sub(1);
                    cx.tokens.copy_token();
                }
                kind if depth == 0 && kind != TokenType::Name && !token.is_type => break,
                TokenType::Eq => {
                    // Skip default values, which may contain their own assignments.
                    let Some(end) = token.rhs_end_index else {
                        return Err(TransformError::structure("Expected = token with an end index."));
                    };
                    while cx.tokens.current_index() < end {
                        root.process_token(cx)?;
                    }
                }
                _ if token.is_declaration() => {
                    let is_shorthand = token.is_object_shorthand_declaration();
                    let name = cx.tokens.identifier_name();
                    let Some(replacement) = Self::imports(cx)?.identifier_replacement(name) else {
                        return Err(TransformError::structure(format!(
                            "Expected a replacement for {name} in `export var` syntax."
                        )));
                    };
                    let code = if is_shorthand {
                        format!("{name}: {replacement}")
                    } else {
                        replacement.to_string()
                    };
                    cx.tokens.replace_token(&code);
                }
                _ => root.process_token(cx)?,
            }
        }

        if needs_parens {
            let Some(end) = cx.tokens.current_token().rhs_end_index else {
                return Err(TransformError::structure("Expected = token with an end index."));
            };
            while cx.tokens.current_index() < end {
                root.process_token(cx)?;
            }
            cx.tokens.append_code(")");
        }
        Ok(())
    }

    /// `export {a, b as c};` → `exports.a = a; exports.c = b;`, or the
    /// prepared `require` code for `export {...} from '...'`.
    fn process_export_bindings(&self, cx: &mut Context<'_>) -> Result<(), TransformError> {
        cx.tokens.remove_initial_token();
        cx.tokens.remove_token();
        let is_re_export = is_export_from(&cx.tokens);

        let mut export_statements = Vec::new();
        loop {
            if cx.tokens.matches1(TokenType::BraceR) {
                cx.tokens.remove_token();
                break;
            }
            let specifier = get_import_export_specifier_info(&cx.tokens, cx.tokens.current_index())?;
            while cx.tokens.current_index() < specifier.end_index {
                cx.tokens.remove_token();
            }
            if let (false, Some(local_name), Some(exported_name)) =
                (specifier.is_type, &specifier.left_name, &specifier.right_name)
            {
                if is_re_export || !self.should_elide_exported_identifier(local_name) {
                    if exported_name == "default" {
                        self.had_default_export.set(true);
                    } else {
                        self.had_named_export.set(true);
                    }
                    let new_local_name = Self::imports(cx)?
                        .identifier_replacement(local_name)
                        .unwrap_or(local_name.as_str());
                    export_statements.push(format!("exports.{exported_name} = {new_local_name};"));
                }
            }

            if cx.tokens.matches1(TokenType::BraceR) {
                cx.tokens.remove_token();
                break;
            }
            if cx.tokens.matches2(TokenType::Comma, TokenType::BraceR) {
                cx.tokens.remove_token();
                cx.tokens.remove_token();
                break;
            } else if cx.tokens.matches1(TokenType::Comma) {
                cx.tokens.remove_token();
            } else {
                return Err(TransformError::structure(format!(
                    "Unexpected token: {}",
                    cx.tokens.current_token().kind.label()
                )));
            }
        }

        if cx.tokens.matches_contextual(ContextualKeyword::From) {
            // Re-exports use the code prepared with the imports instead.
            cx.tokens.remove_token();
            let path = cx.tokens.string_value();
            let code = claim_import_code(cx, path)?;
            cx.tokens.replace_token_trimming_left_whitespace(&code);
            remove_maybe_import_attributes(&mut cx.tokens);
        } else {
            cx.tokens.append_code(&export_statements.join(" "));
        }
        if cx.tokens.matches1(TokenType::Semi) {
            cx.tokens.remove_token();
        }
        Ok(())
    }

    fn process_export_star(&self, cx: &mut Context<'_>) -> Result<(), TransformError> {
        cx.tokens.remove_initial_token();
        while !cx.tokens.matches1(TokenType::String) {
            if cx.tokens.is_at_end() {
                return Err(TransformError::structure(
                    "Expected string token at the end of star export statement.",
                ));
            }
            cx.tokens.remove_token();
        }
        let path = cx.tokens.string_value();
        let code = claim_import_code(cx, path)?;
        cx.tokens.replace_token_trimming_left_whitespace(&code);
        remove_maybe_import_attributes(&mut cx.tokens);
        if cx.tokens.matches1(TokenType::Semi) {
            cx.tokens.remove_token();
        }
        Ok(())
    }

    fn should_elide_exported_identifier(&self, name: &str) -> bool {
        self.is_typescript_transform_enabled
            && !self.keep_unused_imports
            && !self.declaration_info.value_declarations.contains(name)
    }

    /// `a = 1` where `a` is exported becomes `a = exports.a = 1`.
    fn process_assignment(&self, cx: &mut Context<'_>) -> bool {
        let index = cx.tokens.current_index();
        if index == 0 {
            return false;
        }
        let identifier = cx.tokens.token_at(index - 1);
        // In `let a: b = c`, the token before `=` is a type.
        if identifier.is_type || identifier.kind != TokenType::Name || identifier.shadows_global {
            return false;
        }
        if index >= 2
            && matches!(
                cx.tokens.token_at(index - 2).kind,
                TokenType::Dot | TokenType::Var | TokenType::Let | TokenType::Const
            )
        {
            // Member assignments and declarations need nothing extra.
            return false;
        }
        let name = cx.tokens.text_for_token(identifier);
        let Some(snippet) = cx.imports.as_ref().and_then(|imports| imports.resolve_export_binding(name)) else {
            return false;
        };
        cx.tokens.copy_token();
        cx.tokens.append_code(&format!(" {snippet} ="));
        true
    }

    /// `a += 3` → `a = exports.a += 3`.
    fn process_complex_assignment(&self, cx: &mut Context<'_>) -> bool {
        let index = cx.tokens.current_index();
        if index == 0 {
            return false;
        }
        let identifier = cx.tokens.token_at(index - 1);
        if identifier.kind != TokenType::Name || identifier.shadows_global {
            return false;
        }
        if index >= 2 && cx.tokens.matches1_at_index(index - 2, TokenType::Dot) {
            return false;
        }
        let name = cx.tokens.text_for_token(identifier);
        let Some(snippet) = cx.imports.as_ref().and_then(|imports| imports.resolve_export_binding(name)) else {
            return false;
        };
        cx.tokens.append_code(&format!(" = {snippet}"));
        cx.tokens.copy_token();
        true
    }

    /// `++a` → `exports.a = ++a`.
    fn process_pre_inc_dec(&self, cx: &mut Context<'_>) -> bool {
        let index = cx.tokens.current_index();
        let identifier = cx.tokens.token_at(index + 1);
        if identifier.kind != TokenType::Name || identifier.shadows_global {
            return false;
        }
        // `++a.b`, `++a[b]` and `++a().b` are not bindings.
        if matches!(
            cx.tokens.token_at(index + 2).kind,
            TokenType::Dot | TokenType::BracketL | TokenType::ParenL
        ) {
            return false;
        }
        let name = cx.tokens.text_for_token(identifier);
        let Some(snippet) = cx.imports.as_ref().and_then(|imports| imports.resolve_export_binding(name)) else {
            return false;
        };
        cx.tokens.append_code(&format!("{snippet} = "));
        cx.tokens.copy_token();
        true
    }

    /// `a++` → `(a = exports.a = a + 1, a - 1)`, starting at `a`.
    fn process_post_inc_dec(&self, cx: &mut Context<'_>) -> Result<bool, TransformError> {
        let index = cx.tokens.current_index();
        let identifier = cx.tokens.current_token();
        if identifier.kind != TokenType::Name || identifier.shadows_global {
            return Ok(false);
        }
        if index >= 1 && cx.tokens.matches1_at_index(index - 1, TokenType::Dot) {
            return Ok(false);
        }
        let name = cx.tokens.identifier_name();
        let Some(imports) = cx.imports.as_ref() else {
            return Ok(false);
        };
        let Some(snippet) = imports.resolve_export_binding(name) else {
            return Ok(false);
        };
        let base = imports.identifier_replacement(name).unwrap_or(name).to_string();
        let code = match cx.tokens.identifier_name_at_relative_index(1) {
            "++" => format!("({base} = {snippet} = {base} + 1, {base} - 1)"),
            "--" => format!("({base} = {snippet} = {base} - 1, {base} + 1)"),
            operator => {
                return Err(TransformError::structure(format!("Unexpected operator: {operator}")));
            }
        };
        cx.tokens.replace_token(&code);
        cx.tokens.remove_token();
        Ok(true)
    }
}

fn claim_import_code(cx: &mut Context<'_>, path: &str) -> Result<String, TransformError> {
    let imports = cx
        .imports
        .as_mut()
        .ok_or_else(|| TransformError::structure("Expected an import processor for CommonJS output."))?;
    Ok(imports.claim_import_code(path))
}

fn remove_remaining_import(tokens: &mut TokenProcessor<'_>) {
    while !tokens.matches1(TokenType::String) && !tokens.is_at_end() {
        tokens.remove_token();
    }
}

fn is_async_word(tokens: &TokenProcessor<'_>, index: usize) -> bool {
    tokens.matches1_at_index(index, TokenType::Async)
        || tokens.matches_contextual_at_index(index, ContextualKeyword::Async)
}

/// Removes `export type {a}`, `export type {a} from 'b'`,
/// `export type * from 'b'` and `export type * as ns from 'b'`.
pub(super) fn remove_export_type(tokens: &mut TokenProcessor<'_>) {
    tokens.remove_initial_token();
    tokens.remove_token();
    if tokens.matches1(TokenType::BraceL) {
        while !tokens.matches1(TokenType::BraceR) && !tokens.is_at_end() {
            tokens.remove_token();
        }
        tokens.remove_token();
    } else {
        // *
        tokens.remove_token();
        if tokens.matches1(TokenType::As) || tokens.matches_contextual(ContextualKeyword::As) {
            // as ns
            tokens.remove_token();
            tokens.remove_token();
        }
    }
    if tokens.matches_contextual(ContextualKeyword::From)
        && tokens.matches1_at_index(tokens.current_index() + 1, TokenType::String)
    {
        tokens.remove_token();
        tokens.remove_token();
        remove_maybe_import_attributes(tokens);
    }
}

/// Whether this is `export var a = ...` with a single plain name, where
/// the function name inference of `a` has to be kept.
fn is_simple_export_var(tokens: &TokenProcessor<'_>) -> bool {
    // export, var/let/const
    let mut index = tokens.current_index() + 2;
    if !tokens.matches1_at_index(index, TokenType::Name) {
        return false;
    }
    index += 1;
    while index < tokens.tokens().len() && tokens.token_at(index).is_type {
        index += 1;
    }
    tokens.matches1_at_index(index, TokenType::Eq)
}

/// `export const f = () => {};` → `const f = () => {}; exports.f = f;`
fn process_simple_export_var(root: &RootTransformer, cx: &mut Context<'_>) -> Result<(), TransformError> {
    cx.tokens.remove_initial_token();
    cx.tokens.copy_token();
    let name = cx.tokens.identifier_name();
    // `x: number` → `x`
    while !cx.tokens.matches1(TokenType::Eq) {
        if cx.tokens.is_at_end() {
            return Err(TransformError::structure("Expected = in export declaration."));
        }
        root.process_token(cx)?;
    }
    let Some(end) = cx.tokens.current_token().rhs_end_index else {
        return Err(TransformError::structure("Expected = token with an end index."));
    };
    while cx.tokens.current_index() < end {
        root.process_token(cx)?;
    }
    cx.tokens.append_code(&format!("; exports.{name} = {name}"));
    Ok(())
}

/// Copies a named function declaration and returns its name.
pub(super) fn process_named_function(root: &RootTransformer, cx: &mut Context<'_>) -> Result<String, TransformError> {
    if cx.tokens.matches1(TokenType::Function) {
        cx.tokens.copy_token();
    } else if is_async_word(&cx.tokens, cx.tokens.current_index())
        && cx.tokens.matches1_at_index(cx.tokens.current_index() + 1, TokenType::Function)
    {
        cx.tokens.copy_token();
        cx.tokens.copy_token();
    }
    if cx.tokens.matches1(TokenType::Star) {
        cx.tokens.copy_token();
    }
    if !cx.tokens.matches1(TokenType::Name) {
        return Err(TransformError::structure(
            "Expected identifier for exported function name.",
        ));
    }
    let name = cx.tokens.identifier_name().to_string();
    cx.tokens.copy_token();
    // Type parameters.
    root.process_possible_type_range(cx);
    cx.tokens.copy_expected_token(TokenType::ParenL)?;
    root.process_balanced_code(cx)?;
    cx.tokens.copy_expected_token(TokenType::ParenR)?;
    root.process_possible_type_range(cx);
    cx.tokens.copy_expected_token(TokenType::BraceL)?;
    root.process_balanced_code(cx)?;
    cx.tokens.copy_expected_token(TokenType::BraceR)?;
    Ok(name)
}

/// Copies `@a.b(...)` decorators, processing their arguments.
pub(super) fn copy_decorators(root: &RootTransformer, cx: &mut Context<'_>) -> Result<(), TransformError> {
    while cx.tokens.matches1(TokenType::At) {
        cx.tokens.copy_token();
        if cx.tokens.matches1(TokenType::ParenL) {
            cx.tokens.copy_expected_token(TokenType::ParenL)?;
            root.process_balanced_code(cx)?;
            cx.tokens.copy_expected_token(TokenType::ParenR)?;
            continue;
        }
        cx.tokens.copy_expected_token(TokenType::Name)?;
        while cx.tokens.matches1(TokenType::Dot) {
            cx.tokens.copy_expected_token(TokenType::Dot)?;
            cx.tokens.copy_expected_token(TokenType::Name)?;
        }
        if cx.tokens.matches1(TokenType::ParenL) {
            cx.tokens.copy_expected_token(TokenType::ParenL)?;
            root.process_balanced_code(cx)?;
            cx.tokens.copy_expected_token(TokenType::ParenR)?;
        }
    }
    Ok(())
}
