use super::{CatalogEnum, EnumCatalog};
use crate::config::DEFAULT_SCHEMA;
use crate::error::Result;
use crate::types::NativeTypeName;
use async_trait::async_trait;
use tokio_postgres::Client;
use tracing::debug;

// pg_enum columns:
// enumtypid     - OID of the enum type this value belongs to
// enumsortorder - Sort position of this value within its enum type
// enumlabel     - Textual label for this enum value
const ENUM_LABELS_QUERY: &str = "SELECT t.oid, e.enumlabel
     FROM pg_catalog.pg_type t
     JOIN pg_catalog.pg_namespace n ON n.oid = t.typnamespace
     JOIN pg_catalog.pg_enum e ON e.enumtypid = t.oid
     WHERE n.nspname = $1 AND t.typname = $2
     ORDER BY e.enumsortorder";

#[async_trait]
impl EnumCatalog for Client {
    async fn load_enum(&self, type_name: &NativeTypeName) -> Result<Option<CatalogEnum>> {
        let schema = type_name.schema().unwrap_or(DEFAULT_SCHEMA);
        let rows = self.query(ENUM_LABELS_QUERY, &[&schema, &type_name.name()]).await?;

        let Some(first) = rows.first() else {
            debug!("No enum type {} in pg_enum", type_name);
            return Ok(None);
        };

        let type_oid: u32 = first.try_get(0)?;
        let labels = rows
            .iter()
            .map(|row| row.try_get::<_, String>(1))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Loaded {} labels for enum type {} (oid {})", labels.len(), type_name, type_oid);
        Ok(Some(CatalogEnum { type_oid, labels }))
    }
}
