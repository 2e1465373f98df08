// Conversion between enum members and native ENUM column values
pub mod encoded;
pub mod enum_codec;
pub mod postgres;
pub mod raw;
pub mod sqlite;

pub use encoded::EncodedValue;
pub use enum_codec::{EnumColumnCodec, decode_ordinal, encode_member};
pub use raw::{PgObject, RawValue};

use crate::error::Result;
use crate::types::NativeTypeName;

/// Extension point a data-access layer calls for custom column types: once per
/// column per materialized row, and once per bound parameter.
pub trait ColumnCodec: Send + Sync {
    type Value;

    /// Declared type of the column
    fn sql_type(&self) -> &NativeTypeName;

    fn decode(&self, raw: &RawValue) -> Result<Option<Self::Value>>;

    fn encode(&self, value: Option<&Self::Value>) -> Result<EncodedValue>;
}
