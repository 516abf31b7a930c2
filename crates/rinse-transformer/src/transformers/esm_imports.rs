use super::cjs_imports::{remove_export_type, remove_import_type_equals};
use super::{Context, RootTransformer, Transformer};
use crate::error::TransformError;
use crate::helpers::Helpers;
use crate::options::{Options, Transforms};
use crate::token_processor::TokenProcessor;
use crate::util::{
    elide_import_equals, get_declaration_info, get_import_export_specifier_info, get_non_type_identifiers,
    is_export_from, remove_maybe_import_attributes, should_elide_default_export, DeclarationInfo, JsxPragmaInfo,
};
use rinse_parser::{ContextualKeyword, TokenType};
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// Keeps ES module syntax, dropping only what refers to types.
pub(crate) struct EsmImportTransformer {
    is_react_hot_loader_enabled: bool,
    is_typescript_transform_enabled: bool,
    is_flow_transform_enabled: bool,
    keep_unused_imports: bool,
    inject_create_require_for_import_require: bool,
    non_type_identifiers: FxHashSet<SmolStr>,
    declaration_info: DeclarationInfo,
}

impl EsmImportTransformer {
    pub(crate) fn new(
        tokens: &TokenProcessor<'_>,
        options: &Options,
        is_react_hot_loader_enabled: bool,
    ) -> Self {
        let is_typescript_transform_enabled = options.transforms.contains(Transforms::TYPESCRIPT);
        let elides_unused = is_typescript_transform_enabled && !options.keep_unused_imports;
        let (non_type_identifiers, declaration_info) = if elides_unused {
            (
                get_non_type_identifiers(tokens, &JsxPragmaInfo::new(options)),
                get_declaration_info(tokens),
            )
        } else {
            (FxHashSet::default(), DeclarationInfo::default())
        };
        Self {
            is_react_hot_loader_enabled,
            is_typescript_transform_enabled,
            is_flow_transform_enabled: options.transforms.contains(Transforms::FLOW),
            keep_unused_imports: options.keep_unused_imports,
            inject_create_require_for_import_require: options.inject_create_require_for_import_require,
            non_type_identifiers,
            declaration_info,
        }
    }
}

impl Transformer for EsmImportTransformer {
    fn name(&self) -> &'static str {
        "esm-imports"
    }

    fn process(&self, _root: &RootTransformer, cx: &mut Context<'_>) -> Result<bool, TransformError> {
        let tokens = &mut cx.tokens;
        if tokens.matches3(TokenType::Import, TokenType::Name, TokenType::Eq) {
            self.process_import_equals(tokens);
            return Ok(true);
        }
        if tokens.matches4([TokenType::Import, TokenType::Type, TokenType::Name, TokenType::Eq]) {
            remove_import_type_equals(tokens);
            return Ok(true);
        }
        if tokens.matches2(TokenType::Export, TokenType::Eq) {
            tokens.replace_token("module.exports");
            return Ok(true);
        }
        if tokens.matches5([
            TokenType::Export,
            TokenType::Import,
            TokenType::Type,
            TokenType::Name,
            TokenType::Eq,
        ]) {
            // export import type T = require('t')
            tokens.remove_initial_token();
            remove_import_type_equals_without_initial(tokens);
            return Ok(true);
        }
        if tokens.matches1(TokenType::Import) {
            return self.process_import(tokens);
        }
        if tokens.matches2(TokenType::Export, TokenType::Default) {
            return self.process_export_default(cx);
        }
        if tokens.matches2(TokenType::Export, TokenType::BraceL) {
            return self.process_named_exports(tokens);
        }
        if tokens.matches2(TokenType::Export, TokenType::Name)
            && tokens.matches_contextual_at_index(tokens.current_index() + 1, ContextualKeyword::Type)
        {
            remove_export_type(tokens);
            return Ok(true);
        }
        Ok(false)
    }
}

/// The `import` of an `export import type` was already removed as the
/// initial token.
fn remove_import_type_equals_without_initial(tokens: &mut TokenProcessor<'_>) {
    // import
    tokens.remove_token();
    // type
    tokens.remove_token();
    // T = require ( 't' )
    for _ in 0..6 {
        tokens.remove_token();
    }
}

impl EsmImportTransformer {
    /// `import a = require('a')` becomes a `const`, through `createRequire`
    /// when `require` is not otherwise available.
    fn process_import_equals(&self, tokens: &mut TokenProcessor<'_>) {
        let import_name = tokens.identifier_name_at_relative_index(1);
        // An exported binding is part of the module's interface.
        let is_exported = tokens.token_at_relative_index(-1).kind == TokenType::Export;
        if !is_exported && self.should_automatically_elide_imported_name(import_name) {
            elide_import_equals(tokens);
        } else if self.inject_create_require_for_import_require {
            tokens.replace_token("const");
            // name, =
            tokens.copy_token();
            tokens.copy_token();
            let require_name = tokens.helpers.get_helper_name(Helpers::REQUIRE).to_string();
            tokens.replace_token(&require_name);
        } else {
            tokens.replace_token("const");
        }
    }

    fn process_import(&self, tokens: &mut TokenProcessor<'_>) -> Result<bool, TransformError> {
        if tokens.matches2(TokenType::Import, TokenType::ParenL) {
            // Dynamic imports stay as they are.
            return Ok(false);
        }
        let snapshot = tokens.snapshot();
        let all_imports_removed = self.remove_import_type_bindings(tokens)?;
        if all_imports_removed {
            tokens.restore_to_snapshot(snapshot);
            while !tokens.matches1(TokenType::String) {
                if tokens.is_at_end() {
                    return Err(TransformError::structure("Expected import path."));
                }
                tokens.remove_token();
            }
            tokens.remove_token();
            remove_maybe_import_attributes(tokens);
            if tokens.matches1(TokenType::Semi) {
                tokens.remove_token();
            }
        }
        Ok(true)
    }

    /// Removes the type bindings of the import at the cursor and copies the
    /// rest up to the path. Returns whether nothing but types was imported.
    fn remove_import_type_bindings(&self, tokens: &mut TokenProcessor<'_>) -> Result<bool, TransformError> {
        tokens.copy_expected_token(TokenType::Import)?;
        if tokens.matches1(TokenType::Type)
            || (tokens.matches_contextual(ContextualKeyword::Type)
                && !tokens.matches1_at_index(tokens.current_index() + 1, TokenType::Comma)
                && !tokens.matches_contextual_at_index(tokens.current_index() + 1, ContextualKeyword::From))
        {
            // import type
            return Ok(true);
        }
        if tokens.matches1(TokenType::String) {
            // import 'a'
            tokens.copy_token();
            return Ok(false);
        }
        // import module m from 'a'
        if tokens.matches_contextual(ContextualKeyword::Module)
            && tokens.matches_contextual_at_index(tokens.current_index() + 2, ContextualKeyword::From)
        {
            tokens.copy_token();
        }

        let mut found_non_type_import = false;
        let mut found_any_named_import = false;
        let mut needs_comma = false;

        if tokens.matches1(TokenType::Name) {
            if self.should_automatically_elide_imported_name(tokens.identifier_name()) {
                tokens.remove_token();
                if tokens.matches1(TokenType::Comma) {
                    tokens.remove_token();
                }
            } else {
                found_non_type_import = true;
                tokens.copy_token();
                if tokens.matches1(TokenType::Comma) {
                    // Put back below only if something follows.
                    needs_comma = true;
                    tokens.remove_token();
                }
            }
        }

        if tokens.matches1(TokenType::Star) {
            if self.should_automatically_elide_imported_name(tokens.identifier_name_at_relative_index(2)) {
                // * as ns
                tokens.remove_token();
                tokens.remove_token();
                tokens.remove_token();
            } else {
                if needs_comma {
                    tokens.append_code(",");
                }
                found_non_type_import = true;
                tokens.copy_expected_token(TokenType::Star)?;
                tokens.copy_token();
                tokens.copy_expected_token(TokenType::Name)?;
            }
        } else if tokens.matches1(TokenType::BraceL) {
            if needs_comma {
                tokens.append_code(",");
            }
            tokens.copy_token();
            while !tokens.matches1(TokenType::BraceR) {
                if tokens.is_at_end() {
                    return Err(TransformError::structure("Unexpected end of import specifiers."));
                }
                found_any_named_import = true;
                let specifier = get_import_export_specifier_info(tokens, tokens.current_index())?;
                let elide = specifier.is_type
                    || specifier
                        .right_name
                        .as_deref()
                        .is_some_and(|name| self.should_automatically_elide_imported_name(name));
                if elide {
                    while tokens.current_index() < specifier.end_index {
                        tokens.remove_token();
                    }
                    if tokens.matches1(TokenType::Comma) {
                        tokens.remove_token();
                    }
                } else {
                    found_non_type_import = true;
                    while tokens.current_index() < specifier.end_index {
                        tokens.copy_token();
                    }
                    if tokens.matches1(TokenType::Comma) {
                        tokens.copy_token();
                    }
                }
            }
            tokens.copy_expected_token(TokenType::BraceR)?;
        }

        Ok(if self.keep_unused_imports {
            false
        } else if self.is_typescript_transform_enabled {
            !found_non_type_import
        } else if self.is_flow_transform_enabled {
            found_any_named_import && !found_non_type_import
        } else {
            false
        })
    }

    fn should_automatically_elide_imported_name(&self, name: &str) -> bool {
        self.is_typescript_transform_enabled
            && !self.keep_unused_imports
            && !self.non_type_identifiers.contains(name)
    }

    fn process_export_default(&self, cx: &mut Context<'_>) -> Result<bool, TransformError> {
        if should_elide_default_export(
            self.is_typescript_transform_enabled,
            self.keep_unused_imports,
            &cx.tokens,
            &self.declaration_info,
        )? {
            // export default T;
            cx.tokens.remove_initial_token();
            cx.tokens.remove_token();
            cx.tokens.remove_token();
            return Ok(true);
        }
        let tokens = &cx.tokens;
        let already_has_name = tokens.matches4([TokenType::Export, TokenType::Default, TokenType::Function, TokenType::Name])
            || (tokens.matches5([
                TokenType::Export,
                TokenType::Default,
                TokenType::Name,
                TokenType::Function,
                TokenType::Name,
            ]) && tokens.matches_contextual_at_index(tokens.current_index() + 2, ContextualKeyword::Async))
            || tokens.matches4([TokenType::Export, TokenType::Default, TokenType::Class, TokenType::Name])
            || tokens.matches5([
                TokenType::Export,
                TokenType::Default,
                TokenType::Abstract,
                TokenType::Class,
                TokenType::Name,
            ]);
        if already_has_name || !self.is_react_hot_loader_enabled {
            return Ok(false);
        }
        // export default E → let _default; export default _default = E
        let default_name = cx.names.claim_free_name("_default");
        cx.tokens.replace_token(&format!("let {default_name}; export"));
        cx.tokens.copy_token();
        cx.tokens.append_code(&format!(" {default_name} ="));
        cx.hot_loader_default_export = Some(default_name);
        Ok(true)
    }

    /// Drops type names from `export {...}`, and the whole statement for a
    /// re-export of nothing but types.
    fn process_named_exports(&self, tokens: &mut TokenProcessor<'_>) -> Result<bool, TransformError> {
        if !self.is_typescript_transform_enabled {
            return Ok(false);
        }
        tokens.copy_expected_token(TokenType::Export)?;
        tokens.copy_expected_token(TokenType::BraceL)?;
        let is_re_export = is_export_from(tokens);
        let mut found_non_type_export = false;
        while !tokens.matches1(TokenType::BraceR) {
            if tokens.is_at_end() {
                return Err(TransformError::structure("Unexpected end of export specifiers."));
            }
            let specifier = get_import_export_specifier_info(tokens, tokens.current_index())?;
            let elide = specifier.is_type
                || (!is_re_export
                    && specifier
                        .left_name
                        .as_deref()
                        .is_some_and(|name| self.should_elide_exported_name(name)));
            if elide {
                while tokens.current_index() < specifier.end_index {
                    tokens.remove_token();
                }
                if tokens.matches1(TokenType::Comma) {
                    tokens.remove_token();
                }
            } else {
                found_non_type_export = true;
                while tokens.current_index() < specifier.end_index {
                    tokens.copy_token();
                }
                if tokens.matches1(TokenType::Comma) {
                    tokens.copy_token();
                }
            }
        }
        tokens.copy_expected_token(TokenType::BraceR)?;
        if !self.keep_unused_imports && is_re_export && !found_non_type_export {
            // `export {} from 'a'` would still load `a`.
            tokens.remove_token();
            tokens.remove_token();
            remove_maybe_import_attributes(tokens);
        }
        Ok(true)
    }

    fn should_elide_exported_name(&self, name: &str) -> bool {
        self.is_typescript_transform_enabled
            && !self.keep_unused_imports
            && self.declaration_info.type_declarations.contains(name)
            && !self.declaration_info.value_declarations.contains(name)
    }
}

