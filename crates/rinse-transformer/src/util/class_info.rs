use crate::error::TransformError;
use crate::name_manager::NameManager;
use crate::token_processor::TokenProcessor;
use rinse_parser::{ContextualKeyword, Token, TokenType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClassHeaderInfo {
    pub is_expression: bool,
    pub class_name: Option<String>,
    pub has_superclass: bool,
}

/// A half-open range of token indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TokenRange {
    pub start: usize,
    pub end: usize,
}

/// A field with an initializer, from its name up to the end of its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldInfo {
    pub initializer_name: String,
    pub equals_index: usize,
    pub range: TokenRange,
}

/// What the class lowering needs to know about a class body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClassInfo {
    pub header: ClassHeaderInfo,
    /// `this.a = a` for each parameter property.
    pub constructor_initializer_statements: Vec<String>,
    pub instance_initializer_names: Vec<String>,
    pub static_initializer_names: Vec<String>,
    /// Where to insert initializer calls: after `super(...)` or the
    /// constructor's opening brace. `None` without a constructor.
    pub constructor_insert_pos: Option<usize>,
    pub fields: Vec<FieldInfo>,
    pub ranges_to_remove: Vec<TokenRange>,
}

/// Scans the class starting at the current `class` token and rewinds the
/// cursor afterwards.
pub(crate) fn get_class_info(
    tokens: &mut TokenProcessor<'_>,
    names: &mut NameManager,
    disable_es_transforms: bool,
) -> Result<ClassInfo, TransformError> {
    let snapshot = tokens.snapshot();
    let header = process_class_header(tokens)?;
    let mut constructor_initializer_statements = Vec::new();
    let mut instance_initializer_names = Vec::new();
    let mut static_initializer_names = Vec::new();
    let mut constructor_insert_pos = None;
    let mut fields = Vec::new();
    let mut ranges_to_remove = Vec::new();

    let class_context_id = tokens.current_token().context_id;
    if class_context_id.is_none() {
        return Err(TransformError::structure(
            "Expected non-null class context ID on class open-brace.",
        ));
    }

    tokens.next_token()?;
    while !tokens.matches_context_id_and_label(TokenType::BraceR, class_context_id) {
        if tokens.is_at_end() {
            return Err(TransformError::structure("Unexpected end of class body."));
        }
        if is_constructor(tokens) {
            (constructor_initializer_statements, constructor_insert_pos) = process_constructor(tokens)?;
        } else if tokens.matches1(TokenType::Semi) {
            if !disable_es_transforms {
                let index = tokens.current_index();
                ranges_to_remove.push(TokenRange {
                    start: index,
                    end: index + 1,
                });
            }
            tokens.next_token()?;
        } else if tokens.current_token().is_type {
            tokens.next_token()?;
        } else {
            // A method or a field; skip the modifiers before its name.
            let statement_start = tokens.current_index();
            let mut is_static = false;
            let mut is_es_private = false;
            let mut is_declare_or_abstract = false;
            while is_access_modifier(tokens.current_token()) {
                match tokens.current_token().kind {
                    TokenType::Static => is_static = true,
                    TokenType::Hash => is_es_private = true,
                    TokenType::Declare | TokenType::Abstract => is_declare_or_abstract = true,
                    _ => {}
                }
                tokens.next_token()?;
            }
            if (is_static && tokens.matches1(TokenType::BraceL)) || is_es_private {
                // Static blocks and private members are left as they are.
                skip_to_next_class_element(tokens, class_context_id)?;
                continue;
            }
            if is_constructor(tokens) {
                (constructor_initializer_statements, constructor_insert_pos) =
                    process_constructor(tokens)?;
                continue;
            }

            let name_start = tokens.current_index();
            skip_field_name(tokens)?;
            if tokens.matches1(TokenType::LessThan) || tokens.matches1(TokenType::ParenL) {
                // Method.
                skip_to_next_class_element(tokens, class_context_id)?;
                continue;
            }
            while tokens.current_token().is_type && !tokens.is_at_end() {
                tokens.next_token()?;
            }
            if tokens.matches1(TokenType::Eq) {
                let equals_index = tokens.current_index();
                let Some(value_end) = tokens.current_token().rhs_end_index else {
                    return Err(TransformError::structure(
                        "Expected rhsEndIndex on class field assignment.",
                    ));
                };
                while tokens.current_index() < value_end {
                    tokens.next_token()?;
                }
                let initializer_name = if is_static {
                    let name = names.claim_free_name("__initStatic");
                    static_initializer_names.push(name.clone());
                    name
                } else {
                    let name = names.claim_free_name("__init");
                    instance_initializer_names.push(name.clone());
                    name
                };
                fields.push(FieldInfo {
                    initializer_name,
                    equals_index,
                    range: TokenRange {
                        start: name_start,
                        end: tokens.current_index(),
                    },
                });
            } else if !disable_es_transforms || is_declare_or_abstract {
                // `x;` has no runtime effect once fields are lowered, and
                // `declare x;` never does.
                ranges_to_remove.push(TokenRange {
                    start: statement_start,
                    end: tokens.current_index(),
                });
            }
        }
    }

    tokens.restore_to_snapshot(snapshot);
    if disable_es_transforms {
        // Parameter properties and removals still apply; plain fields stay.
        instance_initializer_names.clear();
        static_initializer_names.clear();
        fields.clear();
    }
    Ok(ClassInfo {
        header,
        constructor_initializer_statements,
        instance_initializer_names,
        static_initializer_names,
        constructor_insert_pos,
        fields,
        ranges_to_remove,
    })
}

fn is_constructor(tokens: &TokenProcessor<'_>) -> bool {
    tokens.matches_contextual(ContextualKeyword::Constructor) && !tokens.current_token().is_type
}

/// Moves to the next member name (or the closing brace), then back over
/// the modifiers in front of it.
fn skip_to_next_class_element(
    tokens: &mut TokenProcessor<'_>,
    class_context_id: Option<u32>,
) -> Result<(), TransformError> {
    tokens.next_token()?;
    while tokens.current_token().context_id != class_context_id {
        tokens.next_token()?;
    }
    while is_access_modifier(tokens.token_at_relative_index(-1)) {
        tokens.previous_token();
    }
    Ok(())
}

fn process_class_header(tokens: &mut TokenProcessor<'_>) -> Result<ClassHeaderInfo, TransformError> {
    let class_token = tokens.current_token();
    let Some(context_id) = class_token.context_id else {
        return Err(TransformError::structure("Expected context ID on class token."));
    };
    let is_expression = class_token.is_expression;
    tokens.next_token()?;
    let class_name = tokens
        .matches1(TokenType::Name)
        .then(|| tokens.identifier_name().to_string());
    let mut has_superclass = false;
    // Type parameters and `implements` are all type tokens; only a value
    // `extends` means there is a superclass.
    while !tokens.matches_context_id_and_label(TokenType::BraceL, Some(context_id)) {
        if tokens.matches1(TokenType::Extends) && !tokens.current_token().is_type {
            has_superclass = true;
        }
        tokens.next_token()?;
    }
    Ok(ClassHeaderInfo {
        is_expression,
        class_name,
        has_superclass,
    })
}

/// Collects parameter properties and finds where initializers go, starting
/// at the `constructor` name and ending after the body.
fn process_constructor(
    tokens: &mut TokenProcessor<'_>,
) -> Result<(Vec<String>, Option<usize>), TransformError> {
    let mut statements = Vec::new();
    tokens.next_token()?;
    let constructor_context_id = tokens.current_token().context_id;
    if constructor_context_id.is_none() {
        return Err(TransformError::structure(
            "Expected context ID on open-paren starting constructor params.",
        ));
    }
    while !tokens.matches_context_id_and_label(TokenType::ParenR, constructor_context_id) {
        if tokens.current_token().context_id != constructor_context_id {
            tokens.next_token()?;
            continue;
        }
        // `(` or `,` right before a parameter.
        tokens.next_token()?;
        if is_access_modifier(tokens.current_token()) {
            while is_access_modifier(tokens.current_token()) {
                tokens.next_token()?;
            }
            if tokens.current_token().kind != TokenType::Name {
                return Err(TransformError::structure(
                    "Expected identifier after access modifiers in constructor arg.",
                ));
            }
            let name = tokens.identifier_name();
            statements.push(format!("this.{name} = {name}"));
        }
    }
    // )
    tokens.next_token()?;
    while tokens.current_token().is_type && !tokens.is_at_end() {
        tokens.next_token()?;
    }
    let mut insert_pos = tokens.current_index();

    let mut found_super_call = false;
    while !tokens.matches_context_id_and_label(TokenType::BraceR, constructor_context_id) {
        if !found_super_call && tokens.matches2(TokenType::Super, TokenType::ParenL) {
            tokens.next_token()?;
            let super_call_context_id = tokens.current_token().context_id;
            if super_call_context_id.is_none() {
                return Err(TransformError::structure(
                    "Expected a context ID on the super call",
                ));
            }
            while !tokens.matches_context_id_and_label(TokenType::ParenR, super_call_context_id) {
                tokens.next_token()?;
            }
            insert_pos = tokens.current_index();
            found_super_call = true;
        }
        tokens.next_token()?;
    }
    // }
    tokens.next_token()?;
    Ok((statements, Some(insert_pos)))
}

/// Tokens that can come before a member name.
fn is_access_modifier(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenType::Async
            | TokenType::Get
            | TokenType::Set
            | TokenType::Plus
            | TokenType::Minus
            | TokenType::Readonly
            | TokenType::Static
            | TokenType::Public
            | TokenType::Private
            | TokenType::Protected
            | TokenType::Override
            | TokenType::Abstract
            | TokenType::Star
            | TokenType::Declare
            | TokenType::Hash
    )
}

/// Skips an identifier or a computed `[...]` member name.
fn skip_field_name(tokens: &mut TokenProcessor<'_>) -> Result<(), TransformError> {
    if tokens.matches1(TokenType::BracketL) {
        let class_context_id = tokens.current_token().context_id;
        if class_context_id.is_none() {
            return Err(TransformError::structure(
                "Expected class context ID on computed name open bracket.",
            ));
        }
        while !tokens.matches_context_id_and_label(TokenType::BracketR, class_context_id) {
            tokens.next_token()?;
        }
    }
    tokens.next_token()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::HelperManager;
    use pretty_assertions::assert_eq;
    use rinse_parser::{parse_file, Dialect};

    fn class_info(source: &str) -> ClassInfo {
        let dialect = Dialect {
            typescript: true,
            ..Dialect::default()
        };
        let file = parse_file(source, dialect).unwrap();
        let mut names = NameManager::new(source, &file.tokens);
        let helpers = HelperManager::new(&mut names);
        let mut tokens = TokenProcessor::new(source, file.tokens, false, false, helpers);
        let info = get_class_info(&mut tokens, &mut names, false).unwrap();
        assert_eq!(tokens.current_index(), 0);
        info
    }

    #[test]
    fn test_fields_and_parameter_properties() {
        let info = class_info(
            "class A extends B { x = 1; static y = 2; z: number; m() {} constructor(private a: T) { super(); } }",
        );
        assert_eq!(
            info.header,
            ClassHeaderInfo {
                is_expression: false,
                class_name: Some("A".to_string()),
                has_superclass: true,
            }
        );
        assert_eq!(info.instance_initializer_names, vec!["__init"]);
        assert_eq!(info.static_initializer_names, vec!["__initStatic"]);
        assert_eq!(info.constructor_initializer_statements, vec!["this.a = a"]);
        assert_eq!(info.fields.len(), 2);
        assert_eq!(info.fields[0].range, TokenRange { start: 5, end: 8 });
        // `z: number` and every `;` between members are removed.
        assert!(info.ranges_to_remove.contains(&TokenRange { start: 14, end: 17 }));
        assert!(info.ranges_to_remove.contains(&TokenRange { start: 8, end: 9 }));
        // Initializers go right after `super()`.
        let insert = info.constructor_insert_pos.unwrap();
        assert_eq!(insert, 33);
    }

    #[test]
    fn test_type_parameter_extends_is_not_a_superclass() {
        let info = class_info("class A<T extends object> implements I {}");
        assert!(!info.header.has_superclass);
        assert_eq!(info.constructor_insert_pos, None);
    }

    #[test]
    fn test_private_members_and_static_blocks_are_skipped() {
        let info = class_info("class A { #x = 1; static { f(); } y = 2; }");
        assert_eq!(info.instance_initializer_names, vec!["__init"]);
        assert_eq!(info.fields.len(), 1);
    }
}
