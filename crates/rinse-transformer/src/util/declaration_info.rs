use crate::token_processor::TokenProcessor;
use rinse_parser::TokenType;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// Names declared at the top level, split by whether the declaration is a
/// type or a value.
#[derive(Debug, Default)]
pub(crate) struct DeclarationInfo {
    pub type_declarations: FxHashSet<SmolStr>,
    pub value_declarations: FxHashSet<SmolStr>,
}

impl DeclarationInfo {
    /// A name declared only as a type.
    pub(crate) fn is_type_name(&self, name: &str) -> bool {
        self.type_declarations.contains(name) && !self.value_declarations.contains(name)
    }
}

pub(crate) fn get_declaration_info(tokens: &TokenProcessor<'_>) -> DeclarationInfo {
    let mut info = DeclarationInfo::default();
    for token in tokens.tokens() {
        if token.kind != TokenType::Name || !token.is_top_level_declaration() {
            continue;
        }
        let name = SmolStr::new(tokens.text_for_token(token));
        if token.is_type {
            info.type_declarations.insert(name);
        } else {
            info.value_declarations.insert(name);
        }
    }
    info
}
