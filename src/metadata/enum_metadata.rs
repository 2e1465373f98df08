use crate::config::DEFAULT_SCHEMA;
use crate::error::Result;
use crate::metadata::{EnumDescriptor, EnumTriggers};
use crate::types::NativeTypeName;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::{debug, info};

/// Offset for generated ENUM type OIDs to avoid conflicts with built-in types
const ENUM_TYPE_OID_OFFSET: u32 = 10000;
/// Offset for generated ENUM value OIDs
const ENUM_VALUE_OID_OFFSET: u32 = 20000;

/// Represents an ENUM type definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub type_oid: u32,
    pub schema_name: String,
    pub type_name: String,
}

/// Represents an ENUM value within a type
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub value_oid: u32,
    pub type_oid: u32,
    pub label: String,
    pub sort_order: f64,
}

/// Native ENUM types emulated on SQLite: a type catalog plus per-column
/// validation triggers, so the storage layer rejects labels outside the type
/// the way PostgreSQL does.
pub struct EnumMetadata;

impl EnumMetadata {
    /// Initialize the ENUM metadata tables
    pub fn init(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "-- Track ENUM type definitions
            CREATE TABLE IF NOT EXISTS __pgenum_types (
                type_oid INTEGER PRIMARY KEY,
                schema_name TEXT NOT NULL DEFAULT 'public',
                type_name TEXT NOT NULL,
                UNIQUE (schema_name, type_name)
            );

            -- Track ENUM values with ordering
            CREATE TABLE IF NOT EXISTS __pgenum_values (
                value_oid INTEGER PRIMARY KEY,
                type_oid INTEGER NOT NULL,
                label TEXT NOT NULL,
                sort_order REAL NOT NULL,
                FOREIGN KEY (type_oid) REFERENCES __pgenum_types(type_oid),
                UNIQUE (type_oid, label)
            );

            CREATE INDEX IF NOT EXISTS idx_pgenum_values_type ON __pgenum_values(type_oid);"
        )?;
        EnumTriggers::init_enum_usage_table(conn)?;
        Ok(())
    }

    /// Generate a stable OID for an ENUM type based on its name
    pub fn generate_type_oid(type_name: &NativeTypeName) -> u32 {
        let mut hasher = DefaultHasher::new();
        Self::schema_of(type_name).hash(&mut hasher);
        type_name.name().hash(&mut hasher);
        ENUM_TYPE_OID_OFFSET + (hasher.finish() % 1_000_000) as u32
    }

    /// Generate a stable OID for an ENUM value based on type OID and label
    pub fn generate_value_oid(type_oid: u32, label: &str) -> u32 {
        let mut hasher = DefaultHasher::new();
        type_oid.hash(&mut hasher);
        label.hash(&mut hasher);
        ENUM_VALUE_OID_OFFSET + (hasher.finish() % 1_000_000) as u32
    }

    fn schema_of(type_name: &NativeTypeName) -> &str {
        type_name.schema().unwrap_or(DEFAULT_SCHEMA)
    }

    /// Create a new ENUM type with its values
    pub fn create_enum_type(
        conn: &mut Connection,
        type_name: &NativeTypeName,
        labels: &[&str],
    ) -> Result<u32> {
        // Ensure metadata tables exist
        Self::init(conn)?;

        let tx = conn.transaction()?;

        let type_oid = Self::generate_type_oid(type_name);

        tx.execute(
            "INSERT INTO __pgenum_types (type_oid, schema_name, type_name) VALUES (?1, ?2, ?3)",
            params![type_oid, Self::schema_of(type_name), type_name.name()],
        )?;

        for (i, label) in labels.iter().enumerate() {
            let value_oid = Self::generate_value_oid(type_oid, label);
            let sort_order = (i + 1) as f64;

            tx.execute(
                "INSERT INTO __pgenum_values (value_oid, type_oid, label, sort_order)
                 VALUES (?1, ?2, ?3, ?4)",
                params![value_oid, type_oid, label, sort_order],
            )?;
        }

        tx.commit()?;
        info!("Created ENUM type {} with {} labels (oid {})", type_name, labels.len(), type_oid);
        Ok(type_oid)
    }

    /// Drop and recreate the type from a family descriptor
    pub fn bootstrap(conn: &mut Connection, descriptor: &EnumDescriptor) -> Result<u32> {
        Self::init(conn)?;
        Self::drop_enum_type(conn, descriptor.type_name())?;
        Self::create_enum_type(conn, descriptor.type_name(), descriptor.labels())
    }

    /// Add a new value to an existing ENUM type
    pub fn add_enum_value(
        conn: &mut Connection,
        type_name: &NativeTypeName,
        new_value: &str,
        before_value: Option<&str>,
        after_value: Option<&str>,
    ) -> Result<()> {
        let tx = conn.transaction()?;

        let type_oid: u32 = tx.query_row(
            "SELECT type_oid FROM __pgenum_types WHERE schema_name = ?1 AND type_name = ?2",
            params![Self::schema_of(type_name), type_name.name()],
            |row| row.get(0),
        )?;

        let sort_order = if let Some(before) = before_value {
            let before_order: f64 = tx.query_row(
                "SELECT sort_order FROM __pgenum_values WHERE type_oid = ?1 AND label = ?2",
                params![type_oid, before],
                |row| row.get(0),
            )?;

            let prev_order: Option<f64> = tx.query_row(
                "SELECT MAX(sort_order) FROM __pgenum_values
                 WHERE type_oid = ?1 AND sort_order < ?2",
                params![type_oid, before_order],
                |row| row.get(0),
            )?;

            // Place halfway between previous and before value
            match prev_order {
                Some(prev) => (prev + before_order) / 2.0,
                None => before_order / 2.0,
            }
        } else if let Some(after) = after_value {
            let after_order: f64 = tx.query_row(
                "SELECT sort_order FROM __pgenum_values WHERE type_oid = ?1 AND label = ?2",
                params![type_oid, after],
                |row| row.get(0),
            )?;

            let next_order: Option<f64> = tx.query_row(
                "SELECT MIN(sort_order) FROM __pgenum_values
                 WHERE type_oid = ?1 AND sort_order > ?2",
                params![type_oid, after_order],
                |row| row.get(0),
            )?;

            match next_order {
                Some(next) => (after_order + next) / 2.0,
                None => after_order + 1.0,
            }
        } else {
            let max_order: Option<f64> = tx.query_row(
                "SELECT MAX(sort_order) FROM __pgenum_values WHERE type_oid = ?1",
                [type_oid],
                |row| row.get(0),
            )?;

            max_order.unwrap_or(0.0) + 1.0
        };

        let value_oid = Self::generate_value_oid(type_oid, new_value);
        tx.execute(
            "INSERT INTO __pgenum_values (value_oid, type_oid, label, sort_order)
             VALUES (?1, ?2, ?3, ?4)",
            params![value_oid, type_oid, new_value, sort_order],
        )?;

        tx.commit()?;
        debug!("Added label {:?} to ENUM type {}", new_value, type_name);
        Ok(())
    }

    /// Get ENUM type information by name
    pub fn get_enum_type(conn: &Connection, type_name: &NativeTypeName) -> Result<Option<EnumType>> {
        if !Self::catalog_exists(conn)? {
            return Ok(None);
        }

        let enum_type = conn
            .query_row(
                "SELECT type_oid, schema_name, type_name
                 FROM __pgenum_types WHERE schema_name = ?1 AND type_name = ?2",
                params![Self::schema_of(type_name), type_name.name()],
                |row| {
                    Ok(EnumType {
                        type_oid: row.get(0)?,
                        schema_name: row.get(1)?,
                        type_name: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(enum_type)
    }

    /// Get all values for an ENUM type
    pub fn get_enum_values(conn: &Connection, type_oid: u32) -> Result<Vec<EnumValue>> {
        let mut stmt = conn.prepare(
            "SELECT value_oid, type_oid, label, sort_order
             FROM __pgenum_values
             WHERE type_oid = ?1
             ORDER BY sort_order",
        )?;

        let values = stmt
            .query_map([type_oid], |row| {
                Ok(EnumValue {
                    value_oid: row.get(0)?,
                    type_oid: row.get(1)?,
                    label: row.get(2)?,
                    sort_order: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(values)
    }

    /// Drop an ENUM type, its values and the triggers of columns using it.
    /// Returns whether the type existed.
    pub fn drop_enum_type(conn: &mut Connection, type_name: &NativeTypeName) -> Result<bool> {
        let Some(enum_type) = Self::get_enum_type(conn, type_name)? else {
            return Ok(false);
        };

        let tx = conn.transaction()?;

        for (table_name, column_name) in EnumTriggers::get_columns_using_enum(&tx, enum_type.type_oid)? {
            EnumTriggers::drop_enum_validation_triggers(&tx, &table_name, &column_name)?;
        }
        tx.execute("DELETE FROM __pgenum_usage WHERE type_oid = ?1", [enum_type.type_oid])?;

        // Delete values first (foreign key constraint)
        tx.execute("DELETE FROM __pgenum_values WHERE type_oid = ?1", [enum_type.type_oid])?;
        tx.execute("DELETE FROM __pgenum_types WHERE type_oid = ?1", [enum_type.type_oid])?;

        tx.commit()?;
        info!("Dropped ENUM type {}", type_name);
        Ok(true)
    }

    fn catalog_exists(conn: &Connection) -> Result<bool> {
        let exists = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type='table' AND name='__pgenum_types' LIMIT 1",
                [],
                |_| Ok(true),
            )
            .optional()?;
        Ok(exists.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mood() -> NativeTypeName {
        NativeTypeName::parse("mood").unwrap()
    }

    #[test]
    fn test_enum_metadata_creation() {
        let conn = Connection::open_in_memory().unwrap();
        EnumMetadata::init(&conn).unwrap();

        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='__pgenum_types'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_create_enum_type() {
        let mut conn = Connection::open_in_memory().unwrap();

        let type_oid = EnumMetadata::create_enum_type(&mut conn, &mood(), &["happy", "sad", "angry"]).unwrap();
        assert!(type_oid >= ENUM_TYPE_OID_OFFSET);

        let enum_type = EnumMetadata::get_enum_type(&conn, &mood()).unwrap().unwrap();
        assert_eq!(enum_type.type_name, "mood");
        assert_eq!(enum_type.schema_name, "public");
        assert_eq!(enum_type.type_oid, type_oid);

        let qualified = NativeTypeName::parse("public.mood").unwrap();
        assert_eq!(EnumMetadata::get_enum_type(&conn, &qualified).unwrap(), Some(enum_type));

        let values = EnumMetadata::get_enum_values(&conn, type_oid).unwrap();
        let labels: Vec<&str> = values.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, vec!["happy", "sad", "angry"]);
    }

    #[test]
    fn test_add_enum_value_ordering() {
        let mut conn = Connection::open_in_memory().unwrap();
        let type_oid = EnumMetadata::create_enum_type(&mut conn, &mood(), &["happy", "sad"]).unwrap();

        EnumMetadata::add_enum_value(&mut conn, &mood(), "neutral", Some("sad"), None).unwrap();
        EnumMetadata::add_enum_value(&mut conn, &mood(), "ecstatic", None, Some("neutral")).unwrap();
        EnumMetadata::add_enum_value(&mut conn, &mood(), "angry", None, None).unwrap();

        let labels: Vec<String> = EnumMetadata::get_enum_values(&conn, type_oid)
            .unwrap()
            .into_iter()
            .map(|v| v.label)
            .collect();
        assert_eq!(labels, vec!["happy", "neutral", "ecstatic", "sad", "angry"]);
    }

    #[test]
    fn test_drop_missing_type_is_noop() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert!(!EnumMetadata::drop_enum_type(&mut conn, &mood()).unwrap());

        EnumMetadata::create_enum_type(&mut conn, &mood(), &["happy"]).unwrap();
        assert!(EnumMetadata::drop_enum_type(&mut conn, &mood()).unwrap());
        assert!(EnumMetadata::get_enum_type(&conn, &mood()).unwrap().is_none());
    }
}
