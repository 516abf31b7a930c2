//! Pre-scan of a module's imports and exports for the CommonJS rewrite.
//!
//! Before any code is emitted, every import and export statement is visited
//! once to decide the `require` code each import path turns into and the
//! replacement for every imported or exported binding.

use crate::error::TransformError;
use crate::helpers::Helpers;
use crate::name_manager::NameManager;
use crate::token_processor::TokenProcessor;
use crate::util::{get_import_export_specifier_info, get_non_type_identifiers, JsxPragmaInfo};
use indexmap::IndexMap;
use rinse_parser::{ContextualKeyword, TokenType};
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Eq)]
struct NamedImport {
    imported_name: SmolStr,
    local_name: SmolStr,
}

/// Everything imported from or re-exported from one module path.
#[derive(Debug, Default)]
struct ImportInfo {
    default_names: Vec<SmolStr>,
    wildcard_names: Vec<SmolStr>,
    named_imports: Vec<NamedImport>,
    named_exports: Vec<NamedImport>,
    has_bare_import: bool,
    export_star_names: Vec<SmolStr>,
    has_star_export: bool,
}

impl ImportInfo {
    fn is_unused(&self) -> bool {
        self.default_names.is_empty()
            && self.wildcard_names.is_empty()
            && self.named_imports.is_empty()
            && self.named_exports.is_empty()
            && self.export_star_names.is_empty()
            && !self.has_star_export
    }
}

#[derive(Debug)]
pub struct CjsImportProcessor {
    enable_legacy_typescript_module_interop: bool,
    is_typescript_transform_enabled: bool,
    keep_unused_imports: bool,
    pragma: JsxPragmaInfo,
    non_type_identifiers: FxHashSet<SmolStr>,
    /// Keyed by path, in first-seen order so generated names are stable.
    import_info_by_path: IndexMap<String, ImportInfo>,
    imports_to_replace: FxHashMap<String, String>,
    identifier_replacements: FxHashMap<SmolStr, String>,
    export_bindings_by_local_name: FxHashMap<SmolStr, Vec<SmolStr>>,
}

impl CjsImportProcessor {
    pub(crate) fn new(
        enable_legacy_typescript_module_interop: bool,
        is_typescript_transform_enabled: bool,
        keep_unused_imports: bool,
        pragma: JsxPragmaInfo,
    ) -> Self {
        Self {
            enable_legacy_typescript_module_interop,
            is_typescript_transform_enabled,
            keep_unused_imports,
            pragma,
            non_type_identifiers: FxHashSet::default(),
            import_info_by_path: IndexMap::new(),
            imports_to_replace: FxHashMap::default(),
            identifier_replacements: FxHashMap::default(),
            export_bindings_by_local_name: FxHashMap::default(),
        }
    }

    pub(crate) fn preprocess_tokens(
        &mut self,
        tokens: &mut TokenProcessor<'_>,
        names: &mut NameManager,
    ) -> Result<(), TransformError> {
        for index in 0..tokens.tokens().len() {
            if tokens.matches1_at_index(index, TokenType::Import)
                && !tokens.matches3_at_index(index, TokenType::Import, TokenType::Name, TokenType::Eq)
            {
                self.preprocess_import_at_index(tokens, index)?;
            }
            if tokens.matches1_at_index(index, TokenType::Export)
                && !tokens.matches2_at_index(index, TokenType::Export, TokenType::Eq)
            {
                self.preprocess_export_at_index(tokens, index)?;
            }
        }
        self.generate_import_replacements(tokens, names);
        tracing::debug!(
            paths = self.import_info_by_path.len(),
            replacements = self.identifier_replacements.len(),
            "preprocessed imports"
        );
        Ok(())
    }

    /// Drops imports whose every binding is only used as a type. Bare
    /// imports and re-exports always stay.
    pub(crate) fn prune_type_only_imports(&mut self, tokens: &TokenProcessor<'_>) {
        self.non_type_identifiers = get_non_type_identifiers(tokens, &self.pragma);
        let mut pruned = Vec::new();
        for (path, info) in &self.import_info_by_path {
            if info.has_bare_import
                || info.has_star_export
                || !info.export_star_names.is_empty()
                || !info.named_exports.is_empty()
            {
                continue;
            }
            let all_elided = info
                .default_names
                .iter()
                .chain(&info.wildcard_names)
                .chain(info.named_imports.iter().map(|import| &import.local_name))
                .all(|name| self.should_automatically_elide_imported_name(name));
            if all_elided {
                pruned.push(path.clone());
            }
        }
        for path in pruned {
            tracing::trace!(%path, "eliding type-only import");
            self.imports_to_replace.insert(path, String::new());
        }
    }

    pub(crate) fn should_automatically_elide_imported_name(&self, name: &str) -> bool {
        self.is_typescript_transform_enabled
            && !self.keep_unused_imports
            && !self.non_type_identifiers.contains(name)
    }

    fn generate_import_replacements(&mut self, tokens: &mut TokenProcessor<'_>, names: &mut NameManager) {
        for (path, info) in &self.import_info_by_path {
            if info.is_unused() {
                self.imports_to_replace
                    .insert(path.clone(), format!("require('{path}');"));
                continue;
            }

            let primary = free_identifier_for_path(names, path);
            let secondary = if self.enable_legacy_typescript_module_interop {
                primary.clone()
            } else if let Some(first) = info.wildcard_names.first() {
                first.to_string()
            } else {
                free_identifier_for_path(names, path)
            };

            let mut code = format!("var {primary} = require('{path}');");
            if !info.wildcard_names.is_empty() {
                for wildcard in &info.wildcard_names {
                    let module_expr = if self.enable_legacy_typescript_module_interop {
                        primary.clone()
                    } else {
                        let helper = tokens.helpers.get_helper_name(Helpers::INTEROP_REQUIRE_WILDCARD);
                        format!("{helper}({primary})")
                    };
                    code.push_str(&format!(" var {wildcard} = {module_expr};"));
                }
            } else if !info.export_star_names.is_empty() && secondary != primary {
                let helper = tokens.helpers.get_helper_name(Helpers::INTEROP_REQUIRE_WILDCARD);
                code.push_str(&format!(" var {secondary} = {helper}({primary});"));
            } else if !info.default_names.is_empty() && secondary != primary {
                let helper = tokens.helpers.get_helper_name(Helpers::INTEROP_REQUIRE_DEFAULT);
                code.push_str(&format!(" var {secondary} = {helper}({primary});"));
            }

            for export in &info.named_exports {
                let helper = tokens.helpers.get_helper_name(Helpers::CREATE_NAMED_EXPORT_FROM);
                code.push_str(&format!(
                    " {helper}({primary}, '{}', '{}');",
                    export.local_name, export.imported_name
                ));
            }
            for name in &info.export_star_names {
                code.push_str(&format!(" exports.{name} = {secondary};"));
            }
            if info.has_star_export {
                let helper = tokens.helpers.get_helper_name(Helpers::CREATE_STAR_EXPORT);
                code.push_str(&format!(" {helper}({primary});"));
            }
            self.imports_to_replace.insert(path.clone(), code);

            for name in &info.default_names {
                self.identifier_replacements
                    .insert(name.clone(), format!("{secondary}.default"));
            }
            for import in &info.named_imports {
                self.identifier_replacements.insert(
                    import.local_name.clone(),
                    format!("{primary}.{}", import.imported_name),
                );
            }
        }
    }

    fn preprocess_import_at_index(
        &mut self,
        tokens: &TokenProcessor<'_>,
        mut index: usize,
    ) -> Result<(), TransformError> {
        index += 1;
        if is_type_import_at(tokens, index) {
            return Ok(());
        }
        if tokens.matches1_at_index(index, TokenType::ParenL) {
            // import(...)
            return Ok(());
        }

        let mut default_names = Vec::new();
        let mut wildcard_names = Vec::new();
        let mut named_imports = Vec::new();

        if tokens.matches1_at_index(index, TokenType::Name) {
            default_names.push(SmolStr::new(tokens.identifier_name_at_index(index)));
            index += 1;
            if tokens.matches1_at_index(index, TokenType::Comma) {
                index += 1;
            }
        }
        if tokens.matches1_at_index(index, TokenType::Star) {
            // * as
            index += 2;
            wildcard_names.push(SmolStr::new(tokens.identifier_name_at_index(index)));
            index += 1;
        }
        if tokens.matches1_at_index(index, TokenType::BraceL) {
            let (new_index, imports) = get_named_imports(tokens, index + 1)?;
            index = new_index;
            for import in imports {
                // `{default as x}` needs the same interop as a default import.
                if import.imported_name == "default" {
                    default_names.push(import.local_name);
                } else {
                    named_imports.push(import);
                }
            }
        }
        if tokens.matches_contextual_at_index(index, ContextualKeyword::From) {
            index += 1;
        }
        if !tokens.matches1_at_index(index, TokenType::String) {
            return Err(TransformError::structure(
                "Expected string token at the end of import statement.",
            ));
        }

        let path = tokens.string_value_at_index(index);
        let info = self.import_info_mut(path);
        let is_bare = default_names.is_empty() && wildcard_names.is_empty() && named_imports.is_empty();
        info.default_names.extend(default_names);
        info.wildcard_names.extend(wildcard_names);
        info.named_imports.extend(named_imports);
        if is_bare {
            info.has_bare_import = true;
        }
        Ok(())
    }

    fn preprocess_export_at_index(
        &mut self,
        tokens: &TokenProcessor<'_>,
        index: usize,
    ) -> Result<(), TransformError> {
        let next = tokens.token_at(index + 1).kind;
        match next {
            TokenType::Var | TokenType::Let | TokenType::Const => {
                self.preprocess_var_export_at_index(tokens, index);
            }
            TokenType::Function | TokenType::Class => {
                let name = tokens.identifier_name_at_index(index + 2);
                self.add_export_binding(name, name);
            }
            TokenType::Name if tokens.matches1_at_index(index + 2, TokenType::Function) => {
                // export async function
                let name = tokens.identifier_name_at_index(index + 3);
                self.add_export_binding(name, name);
            }
            TokenType::BraceL => self.preprocess_named_export_at_index(tokens, index)?,
            TokenType::Star => self.preprocess_export_star_at_index(tokens, index)?,
            _ => {}
        }
        Ok(())
    }

    /// `export let {a, b: [c]} = d;` binds every declared name to the
    /// matching `exports.` property.
    fn preprocess_var_export_at_index(&mut self, tokens: &TokenProcessor<'_>, index: usize) {
        let mut depth = 0usize;
        let mut i = index + 2;
        while i < tokens.tokens().len() {
            let token = tokens.token_at(i);
            match token.kind {
                TokenType::BraceL | TokenType::DollarBraceL | TokenType::BracketL => depth += 1,
                TokenType::BraceR | TokenType::BracketR => depth = depth.saturating_sub(1),
                TokenType::Name => {
                    if token.is_declaration() {
                        let name = tokens.identifier_name_at_index(i);
                        self.identifier_replacements
                            .insert(SmolStr::new(name), format!("exports.{name}"));
                    }
                }
                _ if depth == 0 => break,
                TokenType::Eq => {
                    if let Some(end) = token.rhs_end_index {
                        i = end;
                        continue;
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    /// Folds `export {a} from 'b'` into the import info for `'b'`. A plain
    /// `export {a as b}` records export bindings instead.
    fn preprocess_named_export_at_index(
        &mut self,
        tokens: &TokenProcessor<'_>,
        index: usize,
    ) -> Result<(), TransformError> {
        let (mut index, imports) = get_named_imports(tokens, index + 2)?;
        if !tokens.matches_contextual_at_index(index, ContextualKeyword::From) {
            // `a as b` here means local `a`, exported as `b`.
            for import in imports {
                self.add_export_binding(&import.imported_name, &import.local_name);
            }
            return Ok(());
        }
        index += 1;
        if !tokens.matches1_at_index(index, TokenType::String) {
            return Err(TransformError::structure(
                "Expected string token at the end of import statement.",
            ));
        }
        let path = tokens.string_value_at_index(index);
        self.import_info_mut(path).named_exports.extend(imports);
        Ok(())
    }

    fn preprocess_export_star_at_index(
        &mut self,
        tokens: &TokenProcessor<'_>,
        mut index: usize,
    ) -> Result<(), TransformError> {
        let mut exported_name = None;
        if tokens.matches3_at_index(index, TokenType::Export, TokenType::Star, TokenType::As) {
            // export * as
            index += 3;
            exported_name = Some(SmolStr::new(tokens.identifier_name_at_index(index)));
            // ns from
            index += 2;
        } else {
            // export * from
            index += 3;
        }
        if !tokens.matches1_at_index(index, TokenType::String) {
            return Err(TransformError::structure(
                "Expected string token at the end of star export statement.",
            ));
        }
        let path = tokens.string_value_at_index(index);
        let info = self.import_info_mut(path);
        match exported_name {
            Some(name) => info.export_star_names.push(name),
            None => info.has_star_export = true,
        }
        Ok(())
    }

    fn import_info_mut(&mut self, path: &str) -> &mut ImportInfo {
        self.import_info_by_path.entry(path.to_string()).or_default()
    }

    fn add_export_binding(&mut self, local_name: &str, exported_name: &str) {
        self.export_bindings_by_local_name
            .entry(SmolStr::new(local_name))
            .or_default()
            .push(SmolStr::new(exported_name));
    }

    /// The code for the first import of `path`; later imports of the same
    /// path get the empty string.
    pub(crate) fn claim_import_code(&mut self, path: &str) -> String {
        self.imports_to_replace
            .insert(path.to_string(), String::new())
            .unwrap_or_default()
    }

    pub(crate) fn identifier_replacement(&self, name: &str) -> Option<&str> {
        self.identifier_replacements.get(name).map(String::as_str)
    }

    /// `exports.a = exports.b` for a local bound to exports `a` and `b`.
    pub(crate) fn resolve_export_binding(&self, assigned_name: &str) -> Option<String> {
        let exported = self.export_bindings_by_local_name.get(assigned_name)?;
        if exported.is_empty() {
            return None;
        }
        Some(
            exported
                .iter()
                .map(|name| format!("exports.{name}"))
                .collect::<Vec<_>>()
                .join(" = "),
        )
    }

    /// Imported and exported names whose local shadowing matters.
    pub(crate) fn global_names(&self) -> FxHashSet<SmolStr> {
        self.identifier_replacements
            .keys()
            .chain(self.export_bindings_by_local_name.keys())
            .cloned()
            .collect()
    }
}

/// `import type ...` or `import typeof ...`, but not a default import that
/// happens to be called `type`.
pub(crate) fn is_type_import_at(tokens: &TokenProcessor<'_>, index: usize) -> bool {
    if tokens.matches1_at_index(index, TokenType::Type) {
        return true;
    }
    (tokens.matches_contextual_at_index(index, ContextualKeyword::Type)
        || tokens.matches1_at_index(index, TokenType::Typeof))
        && !tokens.matches1_at_index(index + 1, TokenType::Comma)
        && !tokens.matches_contextual_at_index(index + 1, ContextualKeyword::From)
}

/// `_name` from the last path component, stripped to word characters.
fn free_identifier_for_path(names: &mut NameManager, path: &str) -> String {
    let last_component = path.rsplit('/').next().unwrap_or(path);
    let base: String = last_component
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .collect();
    names.claim_free_name(&format!("_{base}"))
}

/// Reads specifiers from just after a `{` up to and past its `}`.
fn get_named_imports(
    tokens: &TokenProcessor<'_>,
    mut index: usize,
) -> Result<(usize, Vec<NamedImport>), TransformError> {
    let mut imports = Vec::new();
    loop {
        if tokens.matches1_at_index(index, TokenType::BraceR) {
            index += 1;
            break;
        }
        let specifier = get_import_export_specifier_info(tokens, index)?;
        index = specifier.end_index;
        if let (false, Some(imported_name), Some(local_name)) =
            (specifier.is_type, specifier.left_name, specifier.right_name)
        {
            imports.push(NamedImport {
                imported_name,
                local_name,
            });
        }
        if tokens.matches2_at_index(index, TokenType::Comma, TokenType::BraceR) {
            index += 2;
            break;
        } else if tokens.matches1_at_index(index, TokenType::BraceR) {
            index += 1;
            break;
        } else if tokens.matches1_at_index(index, TokenType::Comma) {
            index += 1;
        } else {
            return Err(TransformError::structure(format!(
                "Unexpected token: {}",
                tokens.token_at(index).kind.label()
            )));
        }
    }
    Ok((index, imports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::HelperManager;
    use crate::options::Options;
    use pretty_assertions::assert_eq;
    use rinse_parser::{parse_file, Dialect};

    fn preprocess(source: &str, typescript: bool) -> CjsImportProcessor {
        let dialect = Dialect {
            typescript,
            ..Dialect::default()
        };
        let file = parse_file(source, dialect).unwrap();
        let mut names = NameManager::new(source, &file.tokens);
        let helpers = HelperManager::new(&mut names);
        let mut tokens = TokenProcessor::new(source, file.tokens, false, false, helpers);
        let pragma = JsxPragmaInfo::new(&Options::default());
        let mut processor = CjsImportProcessor::new(false, typescript, false, pragma);
        processor.preprocess_tokens(&mut tokens, &mut names).unwrap();
        processor.prune_type_only_imports(&tokens);
        processor
    }

    #[test]
    fn test_default_and_named_imports() {
        let mut processor = preprocess("import a, {b as c} from './path/to-mod';", false);
        assert_eq!(
            processor.claim_import_code("./path/to-mod"),
            "var _tomod = require('./path/to-mod'); var _tomod2 = _interopRequireDefault(_tomod);"
        );
        assert_eq!(processor.claim_import_code("./path/to-mod"), "");
        assert_eq!(processor.identifier_replacement("a"), Some("_tomod2.default"));
        assert_eq!(processor.identifier_replacement("c"), Some("_tomod.b"));
    }

    #[test]
    fn test_bare_import_keeps_require() {
        let mut processor = preprocess("import 'side-effect';", false);
        assert_eq!(processor.claim_import_code("side-effect"), "require('side-effect');");
    }

    #[test]
    fn test_wildcard_and_reexports() {
        let mut processor = preprocess("import * as ns from 'a'; export {x as y} from 'b'; export * from 'c';", false);
        assert_eq!(
            processor.claim_import_code("a"),
            "var _a = require('a'); var ns = _interopRequireWildcard(_a);"
        );
        assert_eq!(
            processor.claim_import_code("b"),
            "var _b = require('b'); _createNamedExportFrom(_b, 'y', 'x');"
        );
        assert_eq!(
            processor.claim_import_code("c"),
            "var _c = require('c'); _createStarExport(_c);"
        );
    }

    #[test]
    fn test_export_bindings() {
        let processor = preprocess("let a = 1; export {a, a as b}; export function f() {}", false);
        assert_eq!(
            processor.resolve_export_binding("a").as_deref(),
            Some("exports.a = exports.b")
        );
        assert_eq!(processor.resolve_export_binding("f").as_deref(), Some("exports.f"));
        assert_eq!(processor.resolve_export_binding("z"), None);
    }

    #[test]
    fn test_exported_var_destructuring() {
        let processor = preprocess("export const {a, b: [c = 1]} = d;", false);
        assert_eq!(processor.identifier_replacement("a"), Some("exports.a"));
        assert_eq!(processor.identifier_replacement("c"), Some("exports.c"));
        assert_eq!(processor.identifier_replacement("b"), None);
    }

    #[test]
    fn test_type_only_import_is_pruned() {
        let mut processor = preprocess("import {T} from 't'; import {v} from 'v'; let x: T = v;", true);
        assert_eq!(processor.claim_import_code("t"), "");
        assert_eq!(
            processor.claim_import_code("v"),
            "var _v = require('v');"
        );
    }
}
