//! tokio-postgres bindings.
//!
//! Enum values travel as their UTF-8 label in both text and binary format;
//! what makes them enum-typed is the parameter type the statement declares.

use super::{EncodedValue, PgObject, RawValue};
use crate::error::PgEnumError;
use crate::types::NativeTypeName;
use bytes::BytesMut;
use std::error::Error;
use tokio_postgres::types::{FromSql, IsNull, Kind, ToSql, Type};

type BoxError = Box<dyn Error + Sync + Send>;

impl ToSql for EncodedValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        if !self.type_name().matches(ty.schema(), ty.name()) {
            return Err(Box::new(PgEnumError::TypeMismatch {
                expected: self.type_name().to_string(),
                found: format!("{}.{}", ty.schema(), ty.name()),
            }));
        }

        let Some(label) = self.label() else {
            return Ok(IsNull::Yes);
        };

        if let Kind::Enum(server_labels) = ty.kind() {
            if !server_labels.iter().any(|l| l == label) {
                return Err(Box::new(PgEnumError::SchemaMismatch {
                    type_name: self.type_name().to_string(),
                    missing: vec![label.to_string()],
                }));
            }
        }

        out.extend_from_slice(label.as_bytes());
        Ok(IsNull::No)
    }

    fn accepts(ty: &Type) -> bool {
        matches!(ty.kind(), Kind::Enum(_))
    }

    fn to_sql_checked(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        if !<Self as ToSql>::accepts(ty) {
            return Err(Box::new(PgEnumError::TypeMismatch {
                expected: self.type_name().to_string(),
                found: ty.name().to_string(),
            }));
        }
        self.to_sql(ty, out)
    }
}

fn is_text_type(ty: &Type) -> bool {
    [Type::TEXT, Type::VARCHAR, Type::BPCHAR, Type::NAME, Type::UNKNOWN].contains(ty)
}

impl<'a> FromSql<'a> for RawValue {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        match ty.kind() {
            Kind::Enum(_) => {
                let label = std::str::from_utf8(raw)?;
                Ok(RawValue::Object(PgObject::new(
                    NativeTypeName::new(Some(ty.schema()), ty.name()),
                    Some(label.to_string()),
                )))
            }
            _ if is_text_type(ty) => Ok(RawValue::Text(std::str::from_utf8(raw)?.to_string())),
            _ => Ok(RawValue::Other {
                type_name: ty.name().to_string(),
                bytes: raw.to_vec(),
            }),
        }
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, BoxError> {
        Ok(RawValue::Null)
    }

    // Shape checks happen in the codec so that mismatches surface as
    // UnsupportedRawType rather than a driver conversion error
    fn accepts(_ty: &Type) -> bool {
        true
    }
}
