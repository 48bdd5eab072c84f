//! Scalar type vocabulary shared by the declarative parser and the source emitter
//!
//! Declarative model sources name their field types with a small host
//! vocabulary (`int64`, `string`, `time.Time`, `[]byte`, ...). Every such type
//! lands in one [`ScalarType`], which in turn knows its SQL spelling per
//! [`Dialect`]. The reverse direction, raw catalog/DDL type string to scalar,
//! goes through [`ScalarType::from_sql_type`].

use crate::Dialect;

/// Language-level scalar category
///
/// # Examples
///
/// ```
/// use schemakit_types::{Dialect, ScalarType};
///
/// let ty = ScalarType::from_source_type("*int64").unwrap();
/// assert_eq!(ty.sql_type(Dialect::PostgreSQL), "BIGINT");
/// assert_eq!(ty.sql_type(Dialect::SQLite), "INTEGER");
///
/// assert_eq!(ScalarType::from_sql_type("VARCHAR(255)"), ScalarType::Text);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// 64-bit (or platform-width) integer
    Int64,
    /// Integer of 32 bits or fewer
    Int32,
    /// Floating point or fixed-point decimal
    Float,
    Bool,
    Text,
    /// Raw byte sequence
    Bytes,
    /// Date and/or time
    Timestamp,
    /// Raw JSON document
    Json,
}

impl ScalarType {
    /// Classify a declarative source type name.
    ///
    /// A single leading `*` (optional/indirect) is ignored. Returns `None` for
    /// anything outside the recognized scalar vocabulary, including sequences
    /// of non-bytes and user-defined types.
    #[must_use]
    pub fn from_source_type(ty: &str) -> Option<Self> {
        let ty = ty.trim();
        let ty = ty.strip_prefix('*').unwrap_or(ty);
        let scalar = match ty {
            "int" | "int64" | "uint" | "uint64" => ScalarType::Int64,
            "int8" | "int16" | "int32" | "uint8" | "uint16" | "uint32" | "byte" | "rune" => {
                ScalarType::Int32
            }
            "float32" | "float64" => ScalarType::Float,
            "bool" => ScalarType::Bool,
            "string" => ScalarType::Text,
            "[]byte" => ScalarType::Bytes,
            "time.Time" => ScalarType::Timestamp,
            "json.RawMessage" => ScalarType::Json,
            _ => return None,
        };
        Some(scalar)
    }

    /// Classify a raw SQL type string (case-insensitive, size/precision ignored).
    ///
    /// Unknown types fall back to [`ScalarType::Text`].
    #[must_use]
    pub fn from_sql_type(sql_type: &str) -> Self {
        let base = sql_type.split('(').next().unwrap_or_default().trim();
        let base = base.to_ascii_uppercase();
        let base = base.strip_suffix("[]").unwrap_or(&base);

        match base {
            "INTEGER" | "INT" | "BIGINT" | "INT8" | "INT4" | "MEDIUMINT" | "SERIAL"
            | "BIGSERIAL" | "SERIAL8" | "SERIAL4" => ScalarType::Int64,
            "SMALLINT" | "TINYINT" | "INT2" | "SMALLSERIAL" | "SERIAL2" => ScalarType::Int32,
            "REAL" | "FLOAT" | "DOUBLE" | "DOUBLE PRECISION" | "FLOAT8" | "FLOAT4" | "NUMERIC"
            | "DECIMAL" => ScalarType::Float,
            "BOOLEAN" | "BOOL" => ScalarType::Bool,
            "BLOB" | "BYTEA" | "BINARY" | "VARBINARY" | "TINYBLOB" | "MEDIUMBLOB"
            | "LONGBLOB" => ScalarType::Bytes,
            "JSON" | "JSONB" => ScalarType::Json,
            b if b.starts_with("TIMESTAMP")
                || b.starts_with("DATETIME")
                || b == "DATE"
                || b.starts_with("TIME") =>
            {
                ScalarType::Timestamp
            }
            _ => ScalarType::Text,
        }
    }

    /// SQL type name for this scalar in the given dialect
    #[must_use]
    pub const fn sql_type(self, dialect: Dialect) -> &'static str {
        let pg = matches!(dialect, Dialect::PostgreSQL);
        match self {
            ScalarType::Int64 if pg => "BIGINT",
            ScalarType::Int64 | ScalarType::Int32 => "INTEGER",
            ScalarType::Float if pg => "DOUBLE PRECISION",
            ScalarType::Float => "REAL",
            ScalarType::Bool => "BOOLEAN",
            ScalarType::Text => "TEXT",
            ScalarType::Bytes if pg => "BYTEA",
            ScalarType::Bytes => "BLOB",
            ScalarType::Timestamp if pg => "TIMESTAMP",
            ScalarType::Timestamp => "DATETIME",
            ScalarType::Json if pg => "JSONB",
            ScalarType::Json => "TEXT",
        }
    }

    /// Declarative source spelling of this scalar
    #[must_use]
    pub const fn source_type(self) -> &'static str {
        match self {
            ScalarType::Int64 => "int64",
            ScalarType::Int32 => "int32",
            ScalarType::Float => "float64",
            ScalarType::Bool => "bool",
            ScalarType::Text => "string",
            ScalarType::Bytes => "[]byte",
            ScalarType::Timestamp => "time.Time",
            ScalarType::Json => "json.RawMessage",
        }
    }

    /// Package a source file must import to use this scalar, if any
    #[must_use]
    pub const fn source_import(self) -> Option<&'static str> {
        match self {
            ScalarType::Timestamp => Some("time"),
            ScalarType::Json => Some("encoding/json"),
            _ => None,
        }
    }

    /// Source spelling for a column, marking nullable columns with `*`.
    ///
    /// Byte sequences and JSON documents already have a nil state and are
    /// never wrapped.
    #[must_use]
    pub fn source_type_for(self, nullable: bool) -> String {
        match self {
            ScalarType::Bytes | ScalarType::Json => self.source_type().to_string(),
            _ if nullable => format!("*{}", self.source_type()),
            _ => self.source_type().to_string(),
        }
    }
}
