//! Error types for schema parsing and introspection

use thiserror::Error;

/// Errors produced by the schema engine.
///
/// Malformed individual statements or definitions are not errors: parsers
/// skip them and keep going. Only whole-call failures surface here.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The dialect tag names no supported catalog layout
    #[error("unsupported dialect: {0}")]
    UnsupportedDialect(String),

    /// Input contained no parseable definitions
    #[error("no tables found in {format} input")]
    EmptySchema { format: &'static str },

    /// A catalog query failed
    #[error("catalog query failed{}: {message}", .table.as_ref().map(|t| format!(" for table '{t}'")).unwrap_or_default())]
    Catalog {
        table: Option<String>,
        message: String,
    },

    /// The import format name is not recognized
    #[error("unknown schema format: {0}")]
    UnknownFormat(String),

    /// JSON schema document could not be read or written
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchemaError {
    pub(crate) fn catalog(message: impl std::fmt::Display) -> Self {
        SchemaError::Catalog {
            table: None,
            message: message.to_string(),
        }
    }

    pub(crate) fn for_table(self, table: &str) -> Self {
        match self {
            SchemaError::Catalog { message, .. } => SchemaError::Catalog {
                table: Some(table.to_string()),
                message,
            },
            other => other,
        }
    }
}

/// Result alias used throughout the engine
pub type Result<T, E = SchemaError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_message_names_table() {
        let err = SchemaError::catalog("no such table").for_table("users");
        assert_eq!(
            err.to_string(),
            "catalog query failed for table 'users': no such table"
        );
        assert_eq!(
            SchemaError::catalog("boom").to_string(),
            "catalog query failed: boom"
        );
    }
}
