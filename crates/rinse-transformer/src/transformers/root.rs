use super::cjs_imports::CjsImportTransformer;
use super::esm_imports::EsmImportTransformer;
use super::flow::FlowTransformer;
use super::jest_hoist::JestHoistTransformer;
use super::jsx::JsxTransformer;
use super::numeric_separator::NumericSeparatorTransformer;
use super::optional_catch_binding::OptionalCatchBindingTransformer;
use super::optional_chaining_nullish::OptionalChainingNullishTransformer;
use super::react_display_name::ReactDisplayNameTransformer;
use super::react_hot_loader::ReactHotLoaderTransformer;
use super::typescript::TypeScriptTransformer;
use super::{Context, Transformer};
use crate::error::{ConfigError, TransformError};
use crate::options::{Options, Transforms};
use crate::util::{get_class_info, ClassInfo};
use rinse_parser::{ContextualKeyword, TokenType};

/// Drives the cursor over the whole file and owns class lowering.
pub(crate) struct RootTransformer {
    transformers: Vec<Box<dyn Transformer>>,
    is_imports_transform_enabled: bool,
    is_react_hot_loader_transform_enabled: bool,
    disable_es_transforms: bool,
}

impl RootTransformer {
    pub(crate) fn new(options: &Options, cx: &Context<'_>) -> Result<Self, TransformError> {
        let transforms = options.transforms;
        let mut transformers: Vec<Box<dyn Transformer>> = Vec::new();

        if !options.disable_es_transforms {
            transformers.push(Box::new(OptionalChainingNullishTransformer));
            transformers.push(Box::new(NumericSeparatorTransformer));
            transformers.push(Box::new(OptionalCatchBindingTransformer));
        }
        if transforms.contains(Transforms::JSX) {
            transformers.push(Box::new(JsxTransformer::new(options)));
            transformers.push(Box::new(ReactDisplayNameTransformer::new(options.file_path.clone())));
        }
        let is_react_hot_loader_transform_enabled = transforms.contains(Transforms::REACT_HOT_LOADER);
        if is_react_hot_loader_transform_enabled {
            let Some(file_path) = options.file_path.clone() else {
                return Err(ConfigError::HotLoaderWithoutFilePath.into());
            };
            transformers.push(Box::new(ReactHotLoaderTransformer::new(file_path)));
        }
        // The ESM transformer still runs without the imports transform, since
        // type-only imports have to be pruned either way.
        let is_imports_transform_enabled = transforms.contains(Transforms::IMPORTS);
        if is_imports_transform_enabled {
            if cx.imports.is_none() {
                return Err(TransformError::structure(
                    "The imports transform is enabled but no import processor was built.",
                ));
            }
            transformers.push(Box::new(CjsImportTransformer::new(
                &cx.tokens,
                options,
                is_react_hot_loader_transform_enabled,
            )));
        } else {
            transformers.push(Box::new(EsmImportTransformer::new(
                &cx.tokens,
                options,
                is_react_hot_loader_transform_enabled,
            )));
        }
        if transforms.contains(Transforms::FLOW) {
            transformers.push(Box::new(FlowTransformer));
        }
        if transforms.contains(Transforms::TYPESCRIPT) {
            transformers.push(Box::new(TypeScriptTransformer::new(is_imports_transform_enabled)));
        }
        if transforms.contains(Transforms::JEST) {
            transformers.push(Box::new(JestHoistTransformer::default()));
        }

        tracing::debug!(
            transformers = ?transformers.iter().map(|transformer| transformer.name()).collect::<Vec<_>>(),
            "registered transformers"
        );
        Ok(Self {
            transformers,
            is_imports_transform_enabled,
            is_react_hot_loader_transform_enabled,
            disable_es_transforms: options.disable_es_transforms,
        })
    }

    /// Names of the feature transformers in the order they are consulted.
    #[cfg(test)]
    pub(crate) fn transformer_names(&self) -> Vec<&'static str> {
        self.transformers.iter().map(|transformer| transformer.name()).collect()
    }

    /// Rewrites the whole file and assembles the output around it.
    pub(crate) fn transform(&self, mut cx: Context<'_>) -> Result<String, TransformError> {
        self.process_balanced_code(&mut cx)?;

        // "use strict" has to come first, ahead of every other prefix.
        let mut prefix = String::new();
        if self.is_imports_transform_enabled {
            prefix.push_str("\"use strict\";");
        }
        for transformer in &self.transformers {
            prefix.push_str(&transformer.prefix_code(&cx));
        }
        prefix.push_str(&cx.tokens.helpers.emit_helpers());
        for variable in &cx.generated_variables {
            prefix.push_str(&format!(" var {variable};"));
        }
        for transformer in &self.transformers {
            prefix.push_str(&transformer.hoisted_code(&cx));
        }
        let suffix: String = self
            .transformers
            .iter()
            .map(|transformer| transformer.suffix_code(&cx))
            .collect();

        let (mut code, _) = cx.tokens.finish()?;
        if code.starts_with("#!") {
            // The prefix goes after the hashbang line.
            let newline_index = match code.find('\n') {
                Some(index) => index,
                None => {
                    code.push('\n');
                    code.len() - 1
                }
            };
            let (hashbang, rest) = code.split_at(newline_index + 1);
            return Ok(format!("{hashbang}{prefix}{rest}{suffix}"));
        }
        Ok(format!("{prefix}{code}{suffix}"))
    }

    /// Processes tokens until a `}` or `)` closes a brace or paren that was
    /// open before this call, leaving the cursor on it.
    pub(crate) fn process_balanced_code(&self, cx: &mut Context<'_>) -> Result<(), TransformError> {
        let mut brace_depth = 0usize;
        let mut paren_depth = 0usize;
        while !cx.tokens.is_at_end() {
            match cx.tokens.current_token().kind {
                TokenType::BraceL | TokenType::DollarBraceL => brace_depth += 1,
                TokenType::BraceR => {
                    if brace_depth == 0 {
                        return Ok(());
                    }
                    brace_depth -= 1;
                }
                TokenType::ParenL => paren_depth += 1,
                TokenType::ParenR => {
                    if paren_depth == 0 {
                        return Ok(());
                    }
                    paren_depth -= 1;
                }
                _ => {}
            }
            self.process_token(cx)?;
        }
        Ok(())
    }

    /// Gives the current token to the first transformer that wants it, or
    /// copies it.
    pub(crate) fn process_token(&self, cx: &mut Context<'_>) -> Result<(), TransformError> {
        if cx.tokens.matches1(TokenType::Class) {
            return self.process_class(cx);
        }
        for transformer in &self.transformers {
            if transformer.process(self, cx)? {
                tracing::trace!(
                    transformer = transformer.name(),
                    index = cx.tokens.current_index(),
                    "token handled"
                );
                return Ok(());
            }
        }
        cx.tokens.copy_token();
        Ok(())
    }

    /// Processes `class Name ...` and returns `Name`.
    pub(crate) fn process_named_class(&self, cx: &mut Context<'_>) -> Result<String, TransformError> {
        if !cx.tokens.matches2(TokenType::Class, TokenType::Name) {
            return Err(TransformError::structure("Expected identifier for exported class name."));
        }
        let name = cx.tokens.identifier_name_at_relative_index(1).to_string();
        self.process_class(cx)?;
        Ok(name)
    }

    /// Lowers fields and parameter properties of the class at the cursor
    /// and processes the rest of it.
    fn process_class(&self, cx: &mut Context<'_>) -> Result<(), TransformError> {
        let class_info = get_class_info(&mut cx.tokens, &mut cx.names, self.disable_es_transforms)?;

        // Initializers are called through the class name, so anonymous
        // classes and class expressions get assigned to a temporary.
        let has_initializers =
            !class_info.static_initializer_names.is_empty() || !class_info.instance_initializer_names.is_empty();
        let needs_comma_expression =
            (class_info.header.is_expression || class_info.header.class_name.is_none()) && has_initializers;

        let mut class_name = class_info.header.class_name.clone();
        if needs_comma_expression {
            let name = cx.names.claim_free_name("_class");
            cx.generated_variables.push(name.clone());
            cx.tokens.append_code(&format!(" ({name} ="));
            class_name = Some(name);
        }
        let class_name = class_name.unwrap_or_default();

        let Some(context_id) = cx.tokens.current_token().context_id else {
            return Err(TransformError::structure("Expected class to have a context ID."));
        };
        cx.tokens.copy_expected_token(TokenType::Class)?;
        while !cx.tokens.matches_context_id_and_label(TokenType::BraceL, Some(context_id)) {
            if cx.tokens.is_at_end() {
                return Err(TransformError::structure("Unexpected end of class header."));
            }
            self.process_token(cx)?;
        }

        self.process_class_body(cx, &class_info, &class_name)?;

        let static_calls: Vec<String> = class_info
            .static_initializer_names
            .iter()
            .map(|name| format!("{class_name}.{name}()"))
            .collect();
        if needs_comma_expression {
            let calls: String = static_calls.iter().map(|call| format!("{call}, ")).collect();
            cx.tokens.append_code(&format!(", {calls}{class_name})"));
        } else if !static_calls.is_empty() {
            let calls: Vec<String> = static_calls.iter().map(|call| format!("{call};")).collect();
            cx.tokens.append_code(&format!(" {}", calls.join(" ")));
        }
        Ok(())
    }

    fn process_class_body(
        &self,
        cx: &mut Context<'_>,
        class_info: &ClassInfo,
        class_name: &str,
    ) -> Result<(), TransformError> {
        let class_context_id = cx.tokens.current_token().context_id;
        if class_context_id.is_none() {
            return Err(TransformError::structure("Expected non-null context ID on class."));
        }
        cx.tokens.copy_expected_token(TokenType::BraceL)?;
        if self.is_react_hot_loader_transform_enabled {
            cx.tokens
                .append_code("__reactstandin__regenerateByEval(key, code) {this[key] = eval(code);}");
        }

        let needs_constructor_init = !class_info.constructor_initializer_statements.is_empty()
            || !class_info.instance_initializer_names.is_empty();
        let init_code = make_constructor_init_code(class_info, class_name);

        if class_info.constructor_insert_pos.is_none() && needs_constructor_init {
            if class_info.header.has_superclass {
                let args = cx.names.claim_free_name("args");
                cx.tokens.append_code(&format!(
                    "constructor(...{args}) {{ super(...{args}); {init_code}; }}"
                ));
            } else {
                cx.tokens.append_code(&format!("constructor() {{ {init_code}; }}"));
            }
        }

        let mut field_index = 0;
        let mut range_to_remove_index = 0;
        while !cx.tokens.matches_context_id_and_label(TokenType::BraceR, class_context_id) {
            if cx.tokens.is_at_end() {
                return Err(TransformError::structure("Unexpected end of class body."));
            }
            let index = cx.tokens.current_index();
            if let Some(field) = class_info
                .fields
                .get(field_index)
                .filter(|field| field.range.start == index)
            {
                let mut needs_close_bracket = false;
                let name = &field.initializer_name;
                if cx.tokens.matches1(TokenType::BracketL) {
                    cx.tokens.copy_token_with_prefix(&format!("{name}() {{this"));
                } else if cx.tokens.matches1(TokenType::String) || cx.tokens.matches1(TokenType::Num) {
                    cx.tokens.copy_token_with_prefix(&format!("{name}() {{this["));
                    needs_close_bracket = true;
                } else {
                    cx.tokens.copy_token_with_prefix(&format!("{name}() {{this."));
                }
                while cx.tokens.current_index() < field.range.end {
                    if needs_close_bracket && cx.tokens.current_index() == field.equals_index {
                        cx.tokens.append_code("]");
                    }
                    self.process_token(cx)?;
                }
                cx.tokens.append_code("}");
                field_index += 1;
            } else if let Some(range) = class_info
                .ranges_to_remove
                .get(range_to_remove_index)
                .filter(|range| index >= range.start)
            {
                if index < range.end {
                    cx.tokens.remove_initial_token();
                }
                while cx.tokens.current_index() < range.end {
                    cx.tokens.remove_token();
                }
                range_to_remove_index += 1;
            } else if Some(index) == class_info.constructor_insert_pos {
                cx.tokens.copy_token();
                if needs_constructor_init {
                    cx.tokens.append_code(&format!(";{init_code};"));
                }
                self.process_token(cx)?;
            } else {
                self.process_token(cx)?;
            }
        }
        cx.tokens.copy_expected_token(TokenType::BraceR)
    }

    /// At `)` before `: ReturnType =>`: drops the return type of an arrow.
    pub(crate) fn process_possible_arrow_param_end(&self, cx: &mut Context<'_>) -> bool {
        let tokens = &mut cx.tokens;
        if !(tokens.matches2(TokenType::ParenR, TokenType::Colon) && tokens.token_at_relative_index(1).is_type) {
            return false;
        }
        let mut next_non_type_index = tokens.current_index() + 1;
        while tokens.token_at(next_non_type_index).is_type {
            next_non_type_index += 1;
        }
        if !tokens.matches1_at_index(next_non_type_index, TokenType::Arrow) {
            return false;
        }
        tokens.remove_initial_token();
        while tokens.current_index() < next_non_type_index {
            tokens.remove_token();
        }
        tokens.replace_token_trimming_left_whitespace(") =>");
        true
    }

    /// `async <T>() => x` would become a call of `async` once the type
    /// parameters are gone, so the `(` is moved up next to `async`.
    pub(crate) fn process_possible_async_arrow_with_type_params(
        &self,
        cx: &mut Context<'_>,
    ) -> Result<bool, TransformError> {
        if !cx.tokens.matches_contextual(ContextualKeyword::Async) && !cx.tokens.matches1(TokenType::Async) {
            return Ok(false);
        }
        let next = cx.tokens.token_at_relative_index(1);
        if next.kind != TokenType::LessThan || !next.is_type {
            return Ok(false);
        }
        let mut next_non_type_index = cx.tokens.current_index() + 1;
        while cx.tokens.token_at(next_non_type_index).is_type {
            next_non_type_index += 1;
        }
        if !cx.tokens.matches1_at_index(next_non_type_index, TokenType::ParenL) {
            return Ok(false);
        }
        cx.tokens.replace_token("async (");
        cx.tokens.remove_initial_token();
        while cx.tokens.current_index() < next_non_type_index {
            cx.tokens.remove_token();
        }
        cx.tokens.remove_token();
        // The `(` was dropped, so the parameters and the `)` are processed
        // here to strip their annotations.
        self.process_balanced_code(cx)?;
        self.process_token(cx)?;
        Ok(true)
    }

    /// Removes a run of type tokens, keeping their newlines.
    pub(crate) fn process_possible_type_range(&self, cx: &mut Context<'_>) -> bool {
        if !cx.tokens.current_token().is_type {
            return false;
        }
        cx.tokens.remove_initial_token();
        while cx.tokens.current_token().is_type && !cx.tokens.is_at_end() {
            cx.tokens.remove_token();
        }
        true
    }
}

fn make_constructor_init_code(class_info: &ClassInfo, class_name: &str) -> String {
    class_info
        .constructor_initializer_statements
        .iter()
        .cloned()
        .chain(
            class_info
                .instance_initializer_names
                .iter()
                .map(|name| format!("{class_name}.prototype.{name}.call(this)")),
        )
        .collect::<Vec<_>>()
        .join(";")
}
