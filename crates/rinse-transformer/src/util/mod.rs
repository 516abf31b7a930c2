//! Token-stream queries shared by the transformers.

mod class_info;
mod declaration_info;
mod import_export;
mod is_identifier;
pub(crate) mod jsx_entities;
mod jsx_pragma;
mod non_type_identifiers;

pub(crate) use class_info::{get_class_info, ClassInfo};
pub(crate) use declaration_info::{get_declaration_info, DeclarationInfo};
pub(crate) use import_export::{
    elide_import_equals, get_import_export_specifier_info, get_ts_imported_names, is_export_from,
    remove_maybe_import_attributes, should_elide_default_export,
};
pub(crate) use is_identifier::is_identifier;
pub(crate) use jsx_pragma::JsxPragmaInfo;
pub(crate) use non_type_identifiers::get_non_type_identifiers;
