use crate::codec::EncodedValue;
use std::fmt;

/// Text format code for Bind parameters and results
pub const FORMAT_TEXT: i16 = 0;

/// Extended-protocol messages sent to the server when binding enum parameters
#[derive(Debug, Clone, PartialEq)]
pub enum FrontendMessage {
    Parse {
        name: String,
        query: String,
        /// 0 leaves the parameter type to the server
        param_types: Vec<u32>,
    },
    Bind {
        portal: String,
        statement: String,
        formats: Vec<i16>,
        values: Vec<Option<Vec<u8>>>,
        result_formats: Vec<i16>,
    },
    Execute {
        portal: String,
        max_rows: i32,
    },
    Sync,
}

impl FrontendMessage {
    /// Parse message declaring each enum parameter with its type OID
    pub fn parse(name: &str, query: &str, params: &[EncodedValue]) -> Self {
        FrontendMessage::Parse {
            name: name.to_string(),
            query: query.to_string(),
            param_types: params.iter().map(EncodedValue::param_type_oid).collect(),
        }
    }

    /// Bind message carrying each label in text format, NULL as length -1
    pub fn bind(portal: &str, statement: &str, params: &[EncodedValue]) -> Self {
        FrontendMessage::Bind {
            portal: portal.to_string(),
            statement: statement.to_string(),
            formats: vec![FORMAT_TEXT],
            values: params
                .iter()
                .map(|p| p.as_bytes().map(<[u8]>::to_vec))
                .collect(),
            result_formats: vec![FORMAT_TEXT],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub severity: String,
    pub code: String,
    pub message: String,
    pub detail: Option<String>,
    pub hint: Option<String>,
    pub datatype: Option<String>,
}

impl ErrorResponse {
    pub fn new(severity: String, code: String, message: String) -> Self {
        ErrorResponse {
            severity,
            code,
            message,
            detail: None,
            hint: None,
            datatype: None,
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (SQLSTATE {})", self.severity, self.message, self.code)?;
        if let Some(detail) = &self.detail {
            write!(f, "\nDETAIL: {detail}")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "\nHINT: {hint}")?;
        }
        Ok(())
    }
}
