use crate::config::DEFAULT_SCHEMA;
use crate::error::{PgEnumError, Result};
use crate::metadata::EnumMetadata;
use crate::types::{NativeTypeName, quote_literal};
use rusqlite::{Connection, params};
use tracing::debug;

/// Manages ENUM validation triggers and usage tracking
pub struct EnumTriggers;

impl EnumTriggers {
    /// Initialize the enum usage tracking table
    pub fn init_enum_usage_table(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS __pgenum_usage (
                table_name TEXT NOT NULL,
                column_name TEXT NOT NULL,
                type_oid INTEGER NOT NULL,
                PRIMARY KEY (table_name, column_name)
            )",
            [],
        )?;
        Ok(())
    }

    /// Bind a table column to an ENUM type: record the usage and install
    /// INSERT/UPDATE triggers that reject labels outside the type.
    pub fn bind_column(
        conn: &Connection,
        table_name: &str,
        column_name: &str,
        type_name: &NativeTypeName,
    ) -> Result<()> {
        let enum_type = EnumMetadata::get_enum_type(conn, type_name)?.ok_or_else(|| {
            PgEnumError::SchemaMismatch {
                type_name: type_name.to_string(),
                missing: Vec::new(),
            }
        })?;

        conn.execute(
            "INSERT OR REPLACE INTO __pgenum_usage (table_name, column_name, type_oid)
             VALUES (?1, ?2, ?3)",
            params![table_name, column_name, enum_type.type_oid],
        )?;

        Self::create_enum_validation_triggers(conn, table_name, column_name, type_name)
    }

    /// Create validation triggers for an ENUM column
    pub fn create_enum_validation_triggers(
        conn: &Connection,
        table_name: &str,
        column_name: &str,
        type_name: &NativeTypeName,
    ) -> Result<()> {
        let table = quote_sqlite_ident(table_name);
        let column = quote_sqlite_ident(column_name);
        let schema_literal = quote_literal(type_name.schema().unwrap_or(DEFAULT_SCHEMA));
        let name_literal = quote_literal(type_name.name());
        let qualified = type_name.clone().qualified(DEFAULT_SCHEMA);
        let message = quote_literal(&format!("invalid input value for enum {qualified}: \""));

        let label_check = format!(
            "NEW.{column} IS NOT NULL AND NOT EXISTS (
                SELECT 1 FROM __pgenum_values ev
                JOIN __pgenum_types et ON ev.type_oid = et.type_oid
                WHERE et.schema_name = {schema_literal} AND et.type_name = {name_literal}
                  AND ev.label = NEW.{column}
            )"
        );

        let (insert_trigger, update_trigger) = Self::trigger_names(table_name, column_name);

        conn.execute_batch(&format!(
            "CREATE TRIGGER IF NOT EXISTS {insert_trigger}
            BEFORE INSERT ON {table}
            FOR EACH ROW
            WHEN {label_check}
            BEGIN
                SELECT RAISE(ABORT, {message} || NEW.{column} || '\"');
            END;

            CREATE TRIGGER IF NOT EXISTS {update_trigger}
            BEFORE UPDATE OF {column} ON {table}
            FOR EACH ROW
            WHEN {label_check}
            BEGIN
                SELECT RAISE(ABORT, {message} || NEW.{column} || '\"');
            END;"
        ))?;

        debug!("Installed ENUM validation triggers on {}.{} for {}", table_name, column_name, type_name);
        Ok(())
    }

    /// Drop validation triggers for an ENUM column
    pub fn drop_enum_validation_triggers(
        conn: &Connection,
        table_name: &str,
        column_name: &str,
    ) -> Result<()> {
        let (insert_trigger, update_trigger) = Self::trigger_names(table_name, column_name);

        conn.execute(&format!("DROP TRIGGER IF EXISTS {insert_trigger}"), [])?;
        conn.execute(&format!("DROP TRIGGER IF EXISTS {update_trigger}"), [])?;

        Ok(())
    }

    /// Get all tables and columns using a specific ENUM type
    pub fn get_columns_using_enum(conn: &Connection, type_oid: u32) -> Result<Vec<(String, String)>> {
        let mut stmt = conn.prepare(
            "SELECT table_name, column_name FROM __pgenum_usage WHERE type_oid = ?1 ORDER BY table_name, column_name",
        )?;

        let columns = stmt
            .query_map(params![type_oid], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(columns)
    }

    fn trigger_names(table_name: &str, column_name: &str) -> (String, String) {
        (
            quote_sqlite_ident(&format!("__pgenum_{table_name}_{column_name}_insert_check")),
            quote_sqlite_ident(&format!("__pgenum_{table_name}_{column_name}_update_check")),
        )
    }
}

// SQLite identifiers are always quoted so keywords like `order` stay usable
fn quote_sqlite_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
