// Module for reading enum definitions from a database catalog
pub mod pg_enum;
pub mod sqlite_enum;

pub use sqlite_enum::SqliteCatalog;

use crate::error::{PgEnumError, Result};
use crate::metadata::EnumDescriptor;
use crate::types::NativeTypeName;
use async_trait::async_trait;
use tracing::debug;

/// An enum type as the database defines it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEnum {
    pub type_oid: u32,
    /// Labels in sort order
    pub labels: Vec<String>,
}

/// Source of server-side enum definitions
#[async_trait]
pub trait EnumCatalog: Send + Sync {
    /// Look up an enum type; `None` if no such enum type exists
    async fn load_enum(&self, type_name: &NativeTypeName) -> Result<Option<CatalogEnum>>;
}

/// Check that the server's labels cover every member of the family.
///
/// Extra server labels are fine; a missing one would make encoding that
/// member fail at the server.
pub fn verify_labels(descriptor: &EnumDescriptor, server_labels: &[String]) -> Result<()> {
    let missing: Vec<String> = descriptor
        .labels()
        .iter()
        .filter(|label| !server_labels.iter().any(|s| s == *label))
        .map(|label| label.to_string())
        .collect();

    if missing.is_empty() {
        debug!("Enum type {} covers every label of {}", descriptor.type_name(), descriptor.family());
        Ok(())
    } else {
        Err(PgEnumError::SchemaMismatch {
            type_name: descriptor.type_name().to_string(),
            missing,
        })
    }
}
