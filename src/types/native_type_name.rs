use crate::error::{PgEnumError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

// Identifiers that survive a round trip through the server without quoting
static PLAIN_IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z_][a-z0-9_$]*$").unwrap()
});

// Keywords the server rejects as bare type or schema names, sorted for binary search
const RESERVED_KEYWORDS: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric", "authorization",
    "between", "bigint", "binary", "bit", "boolean", "both", "case", "cast", "char", "character",
    "check", "coalesce", "collate", "collation", "column", "concurrently", "constraint", "create",
    "cross", "current_catalog", "current_date", "current_role", "current_schema", "current_time",
    "current_timestamp", "current_user", "dec", "decimal", "default", "deferrable", "desc",
    "distinct", "do", "else", "end", "except", "exists", "extract", "false", "fetch", "float", "for",
    "foreign", "freeze", "from", "full", "grant", "greatest", "group", "grouping", "having", "ilike",
    "in", "initially", "inner", "inout", "int", "integer", "intersect", "interval", "into", "is",
    "isnull", "join", "lateral", "leading", "least", "left", "like", "limit", "localtime",
    "localtimestamp", "national", "natural", "nchar", "none", "normalize", "not", "notnull", "null",
    "nullif", "numeric", "offset", "on", "only", "or", "order", "out", "outer", "overlaps", "overlay",
    "placing", "position", "precision", "primary", "real", "references", "returning", "right", "row",
    "select", "session_user", "setof", "similar", "smallint", "some", "substring", "symmetric",
    "system_user", "table", "tablesample", "then", "time", "timestamp", "to", "trailing", "treat",
    "trim", "true", "union", "unique", "user", "using", "values", "varchar", "variadic", "verbose",
    "when", "where", "window", "with",
];

/// A possibly schema-qualified PostgreSQL type identifier, such as
/// `post_status_info` or `blog."Post Status"`.
///
/// Unquoted parts are folded to lower case the way the server folds them;
/// quoted parts are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NativeTypeName {
    schema: Option<String>,
    name: String,
}

impl NativeTypeName {
    /// Build from already-resolved parts, e.g. as reported by a driver
    pub fn new(schema: Option<&str>, name: &str) -> Self {
        NativeTypeName {
            schema: schema.map(str::to_string),
            name: name.to_string(),
        }
    }

    /// Parse an SQL type identifier
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || PgEnumError::InvalidTypeName(input.to_string());

        let mut parts: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut quoted = false;
        let mut chars = input.trim().chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '"' => {
                    if quoted || !current.is_empty() {
                        return Err(invalid());
                    }
                    quoted = true;
                    loop {
                        match chars.next() {
                            Some('"') if chars.peek() == Some(&'"') => {
                                chars.next();
                                current.push('"');
                            }
                            Some('"') => break,
                            Some(ch) => current.push(ch),
                            None => return Err(invalid()),
                        }
                    }
                }
                '.' => {
                    if current.is_empty() {
                        return Err(invalid());
                    }
                    parts.push(std::mem::take(&mut current));
                    quoted = false;
                }
                _ if quoted || c.is_whitespace() => return Err(invalid()),
                _ => current.extend(c.to_lowercase()),
            }
        }

        if current.is_empty() {
            return Err(invalid());
        }
        parts.push(current);

        let mut parts = parts.into_iter();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), None, None) => Ok(NativeTypeName { schema: None, name }),
            (Some(schema), Some(name), None) => Ok(NativeTypeName { schema: Some(schema), name }),
            _ => Err(invalid()),
        }
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_qualified(&self) -> bool {
        self.schema.is_some()
    }

    /// Fill in the schema if none was given
    pub fn qualified(self, default_schema: &str) -> Self {
        match self.schema {
            Some(_) => self,
            None => NativeTypeName {
                schema: Some(default_schema.to_string()),
                name: self.name,
            },
        }
    }

    /// Whether both names can denote the same server type. An unqualified
    /// name matches any schema.
    pub fn same_type(&self, other: &NativeTypeName) -> bool {
        if self.name != other.name {
            return false;
        }
        match (&self.schema, &other.schema) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    /// Compare against the (schema, name) pair a driver reports for a column
    pub fn matches(&self, schema: &str, name: &str) -> bool {
        self.name == name && self.schema.as_deref().is_none_or(|s| s == schema)
    }
}

impl fmt::Display for NativeTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{}.", quote_ident(schema))?;
        }
        write!(f, "{}", quote_ident(&self.name))
    }
}

/// Quote an identifier only when the server would otherwise fold or reject it
pub fn quote_ident(ident: &str) -> String {
    if PLAIN_IDENTIFIER_REGEX.is_match(ident) && RESERVED_KEYWORDS.binary_search(&ident).is_err() {
        ident.to_string()
    } else {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }
}

/// Render a string literal
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
