use super::{CatalogEnum, EnumCatalog};
use crate::error::Result;
use crate::metadata::EnumMetadata;
use crate::types::NativeTypeName;
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::Connection;

/// Enum catalog backed by the SQLite emulation tables
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    pub fn new(conn: Connection) -> Result<Self> {
        EnumMetadata::init(&conn)?;
        Ok(SqliteCatalog {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Run `f` with exclusive access to the underlying connection
    pub fn with_connection<T>(&self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut conn = self.conn.lock();
        f(&mut conn)
    }

    pub fn into_inner(self) -> Connection {
        self.conn.into_inner()
    }
}

#[async_trait]
impl EnumCatalog for SqliteCatalog {
    async fn load_enum(&self, type_name: &NativeTypeName) -> Result<Option<CatalogEnum>> {
        self.with_connection(|conn| {
            let Some(enum_type) = EnumMetadata::get_enum_type(conn, type_name)? else {
                return Ok(None);
            };
            let labels = EnumMetadata::get_enum_values(conn, enum_type.type_oid)?
                .into_iter()
                .map(|value| value.label)
                .collect();
            Ok(Some(CatalogEnum {
                type_oid: enum_type.type_oid,
                labels,
            }))
        })
    }
}
