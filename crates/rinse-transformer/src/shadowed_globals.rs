//! Marks identifiers that refer to a local binding hiding a module-level name.

use rinse_parser::{Scope, Token, TokenType};
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// Sets `shadows_global` on every name token, inside a scope that redeclares
/// one of `global_names`, that spells that name.
pub fn identify_shadowed_globals(
    source: &str,
    tokens: &mut [Token],
    scopes: &[Scope],
    global_names: &FxHashSet<SmolStr>,
) {
    if !has_shadowed_globals(source, tokens, global_names) {
        return;
    }
    mark_shadowed_globals(source, tokens, scopes, global_names);
}

fn has_shadowed_globals(source: &str, tokens: &[Token], global_names: &FxHashSet<SmolStr>) -> bool {
    tokens.iter().any(|token| {
        token.kind == TokenType::Name
            && !token.is_type
            && token.is_non_top_level_declaration()
            && global_names.contains(token.text(source))
    })
}

/// Scopes close in order, so they are sorted by end index and a stack can
/// be kept while walking the tokens backwards.
fn mark_shadowed_globals(
    source: &str,
    tokens: &mut [Token],
    scopes: &[Scope],
    global_names: &FxHashSet<SmolStr>,
) {
    let upper = scopes
        .iter()
        .map(|scope| scope.end_token_index)
        .max()
        .unwrap_or(0)
        .max(tokens.len());
    let mut scope_stack: Vec<Scope> = Vec::new();
    let mut remaining = scopes.len();

    for i in (0..=upper).rev() {
        // `i` is one past the token being looked at.
        while scope_stack.last().is_some_and(|scope| scope.start_token_index == i) {
            scope_stack.pop();
        }
        while remaining > 0 && scopes[remaining - 1].end_token_index == i {
            scope_stack.push(scopes[remaining - 1]);
            remaining -= 1;
        }
        if i == 0 {
            break;
        }

        let Some(token) = tokens.get(i - 1) else {
            continue;
        };
        if scope_stack.len() <= 1 || token.is_type || token.kind != TokenType::Name {
            continue;
        }
        let name = token.text(source);
        if !global_names.contains(name) {
            continue;
        }
        let target = if token.is_block_scoped_declaration() {
            scope_stack.last().copied()
        } else if token.is_function_scoped_declaration() {
            scope_stack
                .iter()
                .rev()
                .find(|scope| scope.is_function_scope)
                .or(scope_stack.first())
                .copied()
        } else {
            None
        };
        if let Some(scope) = target {
            mark_shadowed_for_scope(source, tokens, scope, name);
        }
    }
    tracing::trace!(unclosed = scope_stack.len(), "marked shadowed globals");
}

fn mark_shadowed_for_scope(source: &str, tokens: &mut [Token], scope: Scope, name: &str) {
    let end = scope.end_token_index.min(tokens.len());
    let start = scope.start_token_index.min(end);
    for token in &mut tokens[start..end] {
        if matches!(token.kind, TokenType::Name | TokenType::JsxName) && token.text(source) == name {
            token.shadows_global = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rinse_parser::{parse_file, Dialect};

    fn shadowed(source: &str, globals: &[&str]) -> Vec<(usize, bool)> {
        let mut file = parse_file(source, Dialect::default()).unwrap();
        let globals = globals.iter().map(|name| SmolStr::new(*name)).collect();
        identify_shadowed_globals(source, &mut file.tokens, &file.scopes, &globals);
        file.tokens
            .iter()
            .filter(|token| token.text(source) == "a")
            .map(|token| (token.start, token.shadows_global))
            .collect()
    }

    #[test]
    fn test_block_scoped_shadowing() {
        let source = "a; function f() { let a = 1; a; } a;";
        assert_eq!(
            shadowed(source, &["a"]),
            vec![(0, false), (22, true), (29, true), (34, false)]
        );
    }

    #[test]
    fn test_parameter_shadows_in_function() {
        let source = "function f(a) { return a; } a;";
        assert_eq!(shadowed(source, &["a"]), vec![(11, true), (23, true), (28, false)]);
    }

    #[test]
    fn test_var_is_hoisted_to_function() {
        let source = "function f() { { var a; } a; }";
        assert_eq!(shadowed(source, &["a"]), vec![(21, true), (26, true)]);
    }

    #[test]
    fn test_fast_path_without_local_declarations() {
        let source = "a; b(a);";
        assert_eq!(shadowed(source, &["a"]), vec![(0, false), (5, false)]);
    }
}
