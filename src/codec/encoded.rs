use super::raw::PgObject;
use crate::types::NativeTypeName;

/// Wire representation of an enum parameter: the label tagged with the
/// declared type, so the server never sees an untyped string. A null
/// parameter keeps its tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedValue {
    type_name: NativeTypeName,
    type_oid: Option<u32>,
    label: Option<&'static str>,
}

impl EncodedValue {
    pub fn new(type_name: NativeTypeName, type_oid: Option<u32>, label: Option<&'static str>) -> Self {
        EncodedValue {
            type_name,
            type_oid,
            label,
        }
    }

    pub fn type_name(&self) -> &NativeTypeName {
        &self.type_name
    }

    pub fn type_oid(&self) -> Option<u32> {
        self.type_oid
    }

    /// OID to declare in a Parse message; 0 lets the server infer it
    pub fn param_type_oid(&self) -> u32 {
        self.type_oid.unwrap_or(0)
    }

    pub fn label(&self) -> Option<&'static str> {
        self.label
    }

    pub fn is_null(&self) -> bool {
        self.label.is_none()
    }

    /// Text-format parameter bytes, `None` for SQL NULL
    pub fn as_bytes(&self) -> Option<&'static [u8]> {
        self.label.map(str::as_bytes)
    }

    /// The driver-wrapped form, as it would come back from the server
    pub fn to_pg_object(&self) -> PgObject {
        PgObject::new(self.type_name.clone(), self.label.map(str::to_string))
    }
}
