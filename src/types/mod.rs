// Module for enum family traits and native type names
pub mod native_type_name;
pub mod pg_enum;

pub use native_type_name::{NativeTypeName, quote_ident, quote_literal};
pub use pg_enum::{EnumMember, FamilyId, PgEnum};
