use super::{Context, RootTransformer, Transformer};
use crate::error::TransformError;
use crate::token_processor::TokenProcessor;
use crate::util::is_identifier;
use rinse_parser::{Token, TokenType};

/// Strips TypeScript-only syntax and lowers enums to plain objects.
pub(crate) struct TypeScriptTransformer {
    is_imports_transform_enabled: bool,
}

impl TypeScriptTransformer {
    pub(crate) fn new(is_imports_transform_enabled: bool) -> Self {
        Self {
            is_imports_transform_enabled,
        }
    }
}

impl Transformer for TypeScriptTransformer {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn process(&self, root: &RootTransformer, cx: &mut Context<'_>) -> Result<bool, TransformError> {
        if root.process_possible_arrow_param_end(cx)
            || root.process_possible_async_arrow_with_type_params(cx)?
            || root.process_possible_type_range(cx)
        {
            return Ok(true);
        }
        if matches!(
            cx.tokens.current_token().kind,
            TokenType::Public
                | TokenType::Protected
                | TokenType::Private
                | TokenType::Abstract
                | TokenType::Readonly
                | TokenType::Override
                | TokenType::NonNullAssertion
        ) {
            cx.tokens.remove_initial_token();
            return Ok(true);
        }
        if cx.tokens.matches1(TokenType::Enum) || cx.tokens.matches2(TokenType::Const, TokenType::Enum) {
            self.process_enum(root, cx, false)?;
            return Ok(true);
        }
        if cx.tokens.matches2(TokenType::Export, TokenType::Enum)
            || cx.tokens.matches3(TokenType::Export, TokenType::Const, TokenType::Enum)
        {
            self.process_enum(root, cx, true)?;
            return Ok(true);
        }
        Ok(false)
    }
}

/// How an enum member's key can be referred to in the generated code.
struct EnumKeyInfo {
    /// The key as a string literal, e.g. `"A"`.
    name_string_code: String,
    /// Set when the key is a usable identifier, so later members can refer
    /// to it by name.
    variable_name: Option<String>,
}

impl TypeScriptTransformer {
    fn process_enum(&self, root: &RootTransformer, cx: &mut Context<'_>, is_export: bool) -> Result<(), TransformError> {
        // `export`, `const` and `enum` all go.
        cx.tokens.remove_initial_token();
        while cx.tokens.matches1(TokenType::Const) || cx.tokens.matches1(TokenType::Enum) {
            cx.tokens.remove_token();
        }
        let enum_name = cx.tokens.identifier_name();
        cx.tokens.remove_token();
        if is_export && !self.is_imports_transform_enabled {
            cx.tokens.append_code("export ");
        }
        cx.tokens
            .append_code(&format!("var {enum_name}; (function ({enum_name})"));
        cx.tokens.copy_expected_token(TokenType::BraceL)?;
        process_enum_body(root, cx, enum_name)?;
        cx.tokens.copy_expected_token(TokenType::BraceR)?;
        if is_export && self.is_imports_transform_enabled {
            cx.tokens.append_code(&format!(
                ")({enum_name} || (exports.{enum_name} = {enum_name} = {{}}));"
            ));
        } else {
            cx.tokens
                .append_code(&format!(")({enum_name} || ({enum_name} = {{}}));"));
        }
        Ok(())
    }
}

/// Emits one statement per member. Numeric members get a reverse mapping;
/// members without a value count up from the previous one.
fn process_enum_body(root: &RootTransformer, cx: &mut Context<'_>, enum_name: &str) -> Result<(), TransformError> {
    let mut previous_value_code: Option<String> = None;
    let mut previous_was_string = false;
    while !cx.tokens.matches1(TokenType::BraceR) {
        if cx.tokens.is_at_end() {
            return Err(TransformError::structure("Unexpected end of enum body."));
        }
        let key = extract_enum_key_info(&cx.tokens, cx.tokens.current_token())?;
        cx.tokens.remove_initial_token();

        let is_string_member = cx.tokens.matches3(TokenType::Eq, TokenType::String, TokenType::Comma)
            || cx.tokens.matches3(TokenType::Eq, TokenType::String, TokenType::BraceR);
        if is_string_member {
            process_string_literal_member(cx, enum_name, &key);
        } else if cx.tokens.matches1(TokenType::Eq) {
            process_explicit_value_member(root, cx, enum_name, &key)?;
        } else {
            if previous_was_string {
                return Err(TransformError::structure("Enum member must have initializer."));
            }
            process_implicit_value_member(cx, enum_name, &key, previous_value_code.as_deref());
        }
        if cx.tokens.matches1(TokenType::Comma) {
            cx.tokens.remove_token();
        }

        previous_was_string = is_string_member;
        previous_value_code = Some(match key.variable_name {
            Some(name) => name,
            None => format!("{enum_name}[{}]", key.name_string_code),
        });
    }
    Ok(())
}

fn extract_enum_key_info(tokens: &TokenProcessor<'_>, token: &Token) -> Result<EnumKeyInfo, TransformError> {
    match token.kind {
        TokenType::Name => {
            let name = tokens.text_for_token(token);
            Ok(EnumKeyInfo {
                name_string_code: format!("\"{name}\""),
                variable_name: is_identifier(name).then(|| name.to_string()),
            })
        }
        TokenType::String => {
            let name = tokens.string_value_for_token(token);
            Ok(EnumKeyInfo {
                name_string_code: tokens.text_for_token(token).to_string(),
                variable_name: is_identifier(name).then(|| name.to_string()),
            })
        }
        _ => Err(TransformError::structure(
            "Expected name or string at beginning of enum element.",
        )),
    }
}

/// `A = "a"` → `const A = "a"; E["A"] = A;`, with no reverse mapping.
fn process_string_literal_member(cx: &mut Context<'_>, enum_name: &str, key: &EnumKeyInfo) {
    let name_code = &key.name_string_code;
    match &key.variable_name {
        Some(variable) => {
            cx.tokens.append_code(&format!("const {variable}"));
            // = "value"
            cx.tokens.copy_token();
            cx.tokens.copy_token();
            cx.tokens
                .append_code(&format!("; {enum_name}[{name_code}] = {variable};"));
        }
        None => {
            cx.tokens.append_code(&format!("{enum_name}[{name_code}]"));
            cx.tokens.copy_token();
            cx.tokens.copy_token();
            cx.tokens.append_code(";");
        }
    }
}

/// `A = 1 + 1` → `const A = 1 + 1; E[E["A"] = A] = "A";`
fn process_explicit_value_member(
    root: &RootTransformer,
    cx: &mut Context<'_>,
    enum_name: &str,
    key: &EnumKeyInfo,
) -> Result<(), TransformError> {
    let Some(rhs_end_index) = cx.tokens.current_token().rhs_end_index else {
        return Err(TransformError::structure("Expected rhsEndIndex on enum assign."));
    };
    let name_code = &key.name_string_code;
    match &key.variable_name {
        Some(variable) => {
            cx.tokens.append_code(&format!("const {variable}"));
            cx.tokens.copy_token();
            while cx.tokens.current_index() < rhs_end_index {
                root.process_token(cx)?;
            }
            cx.tokens.append_code(&format!(
                "; {enum_name}[{enum_name}[{name_code}] = {variable}] = {name_code};"
            ));
        }
        None => {
            cx.tokens
                .append_code(&format!("{enum_name}[{enum_name}[{name_code}]"));
            cx.tokens.copy_token();
            while cx.tokens.current_index() < rhs_end_index {
                root.process_token(cx)?;
            }
            cx.tokens.append_code(&format!("] = {name_code};"));
        }
    }
    Ok(())
}

/// `B` → `const B = A + 1; E[E["B"] = B] = "B";`, or `0` for the first member.
fn process_implicit_value_member(
    cx: &mut Context<'_>,
    enum_name: &str,
    key: &EnumKeyInfo,
    previous_value_code: Option<&str>,
) {
    let mut value_code = match previous_value_code {
        Some(previous) => format!("{previous} + 1"),
        None => "0".to_string(),
    };
    if let Some(variable) = &key.variable_name {
        cx.tokens
            .append_code(&format!("const {variable} = {value_code}; "));
        value_code = variable.clone();
    }
    let name_code = &key.name_string_code;
    cx.tokens.append_code(&format!(
        "{enum_name}[{enum_name}[{name_code}] = {value_code}] = {name_code};"
    ));
}
