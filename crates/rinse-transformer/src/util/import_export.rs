use super::DeclarationInfo;
use crate::error::TransformError;
use crate::token_processor::TokenProcessor;
use rinse_parser::{ContextualKeyword, TokenType};
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// One specifier of an `import {...}` or `export {...}` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SpecifierInfo {
    pub is_type: bool,
    /// The name before `as`, or the only name. `None` for type specifiers.
    pub left_name: Option<SmolStr>,
    /// The name after `as`, or the only name. `None` for type specifiers.
    pub right_name: Option<SmolStr>,
    /// Index of the `,` or `}` that ends the specifier.
    pub end_index: usize,
}

fn is_specifier_end(tokens: &TokenProcessor<'_>, index: usize) -> bool {
    matches!(
        tokens.token_at(index).kind,
        TokenType::BraceR | TokenType::Comma
    )
}

/// Classifies the specifier starting at `index` by its length: `a`,
/// `type a`, `a as b` or `type a as b`.
pub(crate) fn get_import_export_specifier_info(
    tokens: &TokenProcessor<'_>,
    index: usize,
) -> Result<SpecifierInfo, TransformError> {
    let name_at = |index: usize| Some(SmolStr::new(tokens.identifier_name_at_index(index)));
    for length in 1..=4 {
        let end_index = index + length;
        if !is_specifier_end(tokens, end_index) {
            continue;
        }
        let info = match length {
            1 => SpecifierInfo {
                is_type: false,
                left_name: name_at(index),
                right_name: name_at(index),
                end_index,
            },
            3 => SpecifierInfo {
                is_type: false,
                left_name: name_at(index),
                right_name: name_at(index + 2),
                end_index,
            },
            _ => SpecifierInfo {
                is_type: true,
                left_name: None,
                right_name: None,
                end_index,
            },
        };
        return Ok(info);
    }
    Err(TransformError::structure(format!(
        "Unexpected import/export specifier at {index}"
    )))
}

/// At the `{` of an export clause: whether it is followed by `from '...'`.
pub(crate) fn is_export_from(tokens: &TokenProcessor<'_>) -> bool {
    let len = tokens.tokens().len();
    let mut close_brace_index = tokens.current_index();
    while close_brace_index < len && !tokens.matches1_at_index(close_brace_index, TokenType::BraceR) {
        close_brace_index += 1;
    }
    tokens.matches_contextual_at_index(close_brace_index + 1, ContextualKeyword::From)
        && tokens.matches1_at_index(close_brace_index + 2, TokenType::String)
}

/// Removes `import A = require('a');` or `import A = B.C;` without the
/// trailing semicolon.
pub(crate) fn elide_import_equals(tokens: &mut TokenProcessor<'_>) {
    // import
    tokens.remove_initial_token();
    // name
    tokens.remove_token();
    // =
    tokens.remove_token();
    // name or require
    tokens.remove_token();
    if tokens.matches1(TokenType::ParenL) {
        // ( 'path' )
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

/// Removes a trailing `with {...}` or `assert {...}` clause, which a
/// `require` call has no use for.
pub(crate) fn remove_maybe_import_attributes(tokens: &mut TokenProcessor<'_>) {
    if tokens.matches2(TokenType::With, TokenType::BraceL)
        || (tokens.matches2(TokenType::Name, TokenType::BraceL)
            && tokens.matches_contextual(ContextualKeyword::Assert))
    {
        tokens.remove_token();
        tokens.remove_token();
        tokens.remove_balanced_code();
        tokens.remove_token();
    }
}

/// At an `export` token: whether this is `export default T;` where `T` is
/// only declared as a type, so the whole statement goes away.
pub(crate) fn should_elide_default_export(
    is_typescript_enabled: bool,
    keep_unused_imports: bool,
    tokens: &TokenProcessor<'_>,
    declaration_info: &DeclarationInfo,
) -> Result<bool, TransformError> {
    if !is_typescript_enabled || keep_unused_imports {
        return Ok(false);
    }
    let Some(rhs_end) = tokens.current_token().rhs_end_index else {
        return Err(TransformError::structure(
            "Expected non-null rhsEndIndex on export token.",
        ));
    };
    let num_tokens = rhs_end.saturating_sub(tokens.current_index());
    if num_tokens != 3 && !(num_tokens == 4 && tokens.matches1_at_index(rhs_end - 1, TokenType::Semi)) {
        return Ok(false);
    }
    let identifier = tokens.token_at_relative_index(2);
    if identifier.kind != TokenType::Name {
        return Ok(false);
    }
    Ok(declaration_info.is_type_name(tokens.text_for_token(identifier)))
}

/// Names bound by value imports, used to detect shadowing for implicit
/// import elision when imports are not rewritten.
pub(crate) fn get_ts_imported_names(
    tokens: &TokenProcessor<'_>,
) -> Result<FxHashSet<SmolStr>, TransformError> {
    let mut names = FxHashSet::default();
    let len = tokens.tokens().len();
    for index in 0..len {
        if tokens.matches1_at_index(index, TokenType::Import)
            && !tokens.matches3_at_index(index, TokenType::Import, TokenType::Name, TokenType::Eq)
        {
            collect_names_for_import(tokens, index + 1, &mut names)?;
        }
    }
    Ok(names)
}

fn collect_names_for_import(
    tokens: &TokenProcessor<'_>,
    mut index: usize,
    names: &mut FxHashSet<SmolStr>,
) -> Result<(), TransformError> {
    if tokens.matches1_at_index(index, TokenType::ParenL) {
        // Dynamic import.
        return Ok(());
    }
    if tokens.matches1_at_index(index, TokenType::Name) {
        names.insert(SmolStr::new(tokens.identifier_name_at_index(index)));
        index += 1;
        if tokens.matches1_at_index(index, TokenType::Comma) {
            index += 1;
        }
    }
    if tokens.matches1_at_index(index, TokenType::Star) {
        // * as ns
        index += 2;
        names.insert(SmolStr::new(tokens.identifier_name_at_index(index)));
        index += 1;
    }
    if tokens.matches1_at_index(index, TokenType::BraceL) {
        index += 1;
        let len = tokens.tokens().len();
        while index < len && !tokens.matches1_at_index(index, TokenType::BraceR) {
            let specifier = get_import_export_specifier_info(tokens, index)?;
            index = specifier.end_index;
            if let Some(name) = specifier.right_name {
                names.insert(name);
            }
            if tokens.matches1_at_index(index, TokenType::Comma) {
                index += 1;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::HelperManager;
    use crate::name_manager::NameManager;
    use pretty_assertions::assert_eq;
    use rinse_parser::{parse_file, Dialect};

    fn ts_processor(source: &str) -> TokenProcessor<'_> {
        let dialect = Dialect {
            typescript: true,
            ..Dialect::default()
        };
        let file = parse_file(source, dialect).unwrap();
        let mut names = NameManager::new(source, &file.tokens);
        let helpers = HelperManager::new(&mut names);
        TokenProcessor::new(source, file.tokens, false, false, helpers)
    }

    #[test]
    fn test_specifier_shapes() {
        let tokens = ts_processor("import {a, type b, c as d, type e as f} from 'x';");
        let a = get_import_export_specifier_info(&tokens, 2).unwrap();
        assert_eq!(a.right_name.as_deref(), Some("a"));
        assert_eq!(a.end_index, 3);
        let b = get_import_export_specifier_info(&tokens, 4).unwrap();
        assert!(b.is_type);
        let c = get_import_export_specifier_info(&tokens, 7).unwrap();
        assert_eq!(c.left_name.as_deref(), Some("c"));
        assert_eq!(c.right_name.as_deref(), Some("d"));
        let e = get_import_export_specifier_info(&tokens, 11).unwrap();
        assert!(e.is_type);
        assert_eq!(e.end_index, 15);
    }

    #[test]
    fn test_ts_imported_names() {
        let tokens = ts_processor("import a, {b, type c, d as e} from 'x'; import * as ns from 'y'; import q = r;");
        let mut names: Vec<_> = get_ts_imported_names(&tokens)
            .unwrap()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a", "b", "e", "ns"]);
    }
}
