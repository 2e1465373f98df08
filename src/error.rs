use crate::protocol::messages::ErrorResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PgEnumError {
    /// A label read from storage has no member in the family
    #[error("invalid input value for enum {type_name}: \"{label}\" (family {family})")]
    UnknownEnumLabel {
        family: &'static str,
        type_name: String,
        label: String,
    },

    /// The raw column value is neither null, text nor a wrapped enum object
    #[error("cannot decode {found} as enum {family}")]
    UnsupportedRawType { family: &'static str, found: String },

    /// A value outside the target family was handed to encode
    #[error("value {label:?} of {value_family} cannot be bound as enum {family}")]
    UnboundValue {
        family: &'static str,
        value_family: &'static str,
        label: String,
    },

    #[error("enum {family} is already registered as {existing}, cannot register it as {requested}")]
    ConflictingRegistration {
        family: &'static str,
        existing: String,
        requested: String,
    },

    #[error("enum {family} has not been registered")]
    UnregisteredFamily { family: String },

    #[error("invalid enum descriptor for {family}: {reason}")]
    InvalidDescriptor { family: &'static str, reason: String },

    #[error("enum type {type_name} does not define labels {missing:?}")]
    SchemaMismatch {
        type_name: String,
        missing: Vec<String>,
    },

    #[error("parameter of type {found} cannot carry enum {expected}")]
    TypeMismatch { expected: String, found: String },

    #[error("invalid type name: {0:?}")]
    InvalidTypeName(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}

pub type Result<T> = std::result::Result<T, PgEnumError>;

impl PgEnumError {
    /// Get the PostgreSQL error code for this error
    pub fn pg_error_code(&self) -> &str {
        match self {
            PgEnumError::UnknownEnumLabel { .. } => "22P02", // invalid_text_representation
            PgEnumError::UnsupportedRawType { .. } => "42804", // datatype_mismatch
            PgEnumError::UnboundValue { .. } => "42804",
            PgEnumError::TypeMismatch { .. } => "42804",
            PgEnumError::ConflictingRegistration { .. } => "42710", // duplicate_object
            PgEnumError::UnregisteredFamily { .. } => "42704", // undefined_object
            PgEnumError::SchemaMismatch { .. } => "42704",
            PgEnumError::InvalidDescriptor { .. } => "42P17", // invalid_object_definition
            PgEnumError::InvalidTypeName(_) => "42602", // invalid_name
            PgEnumError::Sqlite(_) => "58000", // system_error
            PgEnumError::Postgres(err) => err.code().map(|c| c.code()).unwrap_or("08006"),
        }
    }

    /// Convert to ErrorResponse for protocol
    pub fn to_error_response(&self) -> ErrorResponse {
        let mut response = ErrorResponse::new(
            "ERROR".to_string(),
            self.pg_error_code().to_string(),
            self.to_string(),
        );

        match self {
            PgEnumError::UnknownEnumLabel { type_name, label, .. } => {
                response.detail = Some(format!("Label \"{label}\" is not a member of {type_name}."));
                response.datatype = Some(type_name.clone());
            }
            PgEnumError::SchemaMismatch { type_name, missing } => {
                response.detail = Some(format!("Missing labels: {}", missing.join(", ")));
                response.hint = Some(format!("ALTER TYPE {type_name} ADD VALUE the missing labels."));
                response.datatype = Some(type_name.clone());
            }
            PgEnumError::TypeMismatch { expected, .. } => {
                response.datatype = Some(expected.clone());
            }
            PgEnumError::ConflictingRegistration { existing, .. } => {
                response.datatype = Some(existing.clone());
            }
            _ => {}
        }

        response
    }
}
