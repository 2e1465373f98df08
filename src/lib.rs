pub mod cache;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod metadata;
pub mod protocol;
pub mod types;

pub use cache::{EnumRegistry, global_registry};
pub use catalog::{CatalogEnum, EnumCatalog, SqliteCatalog, verify_labels};
pub use codec::{ColumnCodec, EncodedValue, EnumColumnCodec, PgObject, RawValue};
pub use error::{PgEnumError, Result};
pub use metadata::EnumDescriptor;
pub use types::{EnumMember, FamilyId, NativeTypeName, PgEnum};
