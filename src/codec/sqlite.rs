//! rusqlite bindings for the SQLite enum emulation.
//!
//! SQLite has no enum type; columns store the label as TEXT and the
//! validation triggers from [`EnumTriggers`](crate::metadata::EnumTriggers)
//! play the server's part.

use super::{EncodedValue, RawValue};
use rusqlite::ToSql;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Value, ValueRef};

impl ToSql for EncodedValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.label() {
            Some(label) => ToSqlOutput::Borrowed(ValueRef::Text(label.as_bytes())),
            None => ToSqlOutput::Owned(Value::Null),
        })
    }
}

impl FromSql for RawValue {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(RawValue::Null),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(|text| RawValue::Text(text.to_string()))
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            ValueRef::Integer(i) => Ok(RawValue::Other {
                type_name: "integer".to_string(),
                bytes: i.to_be_bytes().to_vec(),
            }),
            ValueRef::Real(f) => Ok(RawValue::Other {
                type_name: "real".to_string(),
                bytes: f.to_be_bytes().to_vec(),
            }),
            ValueRef::Blob(bytes) => Ok(RawValue::Other {
                type_name: "blob".to_string(),
                bytes: bytes.to_vec(),
            }),
        }
    }
}
