use crate::types::NativeTypeName;

/// A value wrapped by the driver together with the name of its server type,
/// the way drivers surface user-defined types they have no native mapping for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgObject {
    pub type_name: NativeTypeName,
    pub value: Option<String>,
}

impl PgObject {
    pub fn new(type_name: NativeTypeName, value: Option<String>) -> Self {
        PgObject { type_name, value }
    }
}

/// Column value as handed over by the driver, before decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Null,
    Text(String),
    Object(PgObject),
    /// Anything else; never decodable as an enum label
    Other { type_name: String, bytes: Vec<u8> },
}

impl RawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Short description for error messages
    pub fn describe(&self) -> String {
        match self {
            RawValue::Null => "NULL".to_string(),
            RawValue::Text(text) => format!("text {text:?}"),
            RawValue::Object(object) => match &object.value {
                Some(value) => format!("{} value {value:?}", object.type_name),
                None => format!("{} NULL", object.type_name),
            },
            RawValue::Other { type_name, bytes } => format!("{type_name} value ({} bytes)", bytes.len()),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<Option<String>> for RawValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(RawValue::Null, RawValue::Text)
    }
}

impl From<PgObject> for RawValue {
    fn from(object: PgObject) -> Self {
        RawValue::Object(object)
    }
}
