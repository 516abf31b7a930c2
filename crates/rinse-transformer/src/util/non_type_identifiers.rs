use super::JsxPragmaInfo;
use crate::token_processor::TokenProcessor;
use rinse_parser::{IdentifierRole, TokenType};
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// Every name referenced from value code. An import binding outside this
/// set is only used in types and can be removed.
pub(crate) fn get_non_type_identifiers(
    tokens: &TokenProcessor<'_>,
    pragma: &JsxPragmaInfo,
) -> FxHashSet<SmolStr> {
    let mut names = FxHashSet::default();
    let all = tokens.tokens();
    for (index, token) in all.iter().enumerate() {
        let next_kind = all.get(index + 1).map(|next| next.kind);
        match token.kind {
            TokenType::Name
                if !token.is_type
                    && !token.shadows_global
                    && matches!(
                        token.identifier_role,
                        Some(
                            IdentifierRole::Access
                                | IdentifierRole::ObjectShorthand
                                | IdentifierRole::ExportAccess
                        )
                    ) =>
            {
                names.insert(SmolStr::new(tokens.text_for_token(token)));
            }
            TokenType::JsxTagStart => {
                names.insert(SmolStr::new(&pragma.base));
                if next_kind == Some(TokenType::JsxTagEnd) {
                    names.insert(SmolStr::new(&pragma.fragment_base));
                }
            }
            TokenType::JsxName if token.identifier_role == Some(IdentifierRole::Access) => {
                let name = tokens.text_for_token(token);
                // Single lowercase tags like `div` are not references.
                if !name.starts_with(|ch: char| ch.is_ascii_lowercase())
                    || next_kind == Some(TokenType::Dot)
                {
                    names.insert(SmolStr::new(name));
                }
            }
            _ => {}
        }
    }
    names
}
