//! Schema-file front door
//!
//! One entry point for every textual schema source, plus JSON interchange
//! of the canonical model.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use schemakit_types::Dialect;
use serde::Deserialize;

use crate::error::{Result, SchemaError};
use crate::model::{SchemaInfo, TableInfo};
use crate::{ddl, declarative, dsl};

/// Textual schema source format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaFormat {
    /// `CREATE TABLE` script
    Sql,
    /// Table notation (`Table users { ... }`)
    Dsl,
    /// Declarative model source
    Models,
    /// Canonical model as JSON
    Json,
}

impl SchemaFormat {
    pub const ALL: [SchemaFormat; 4] = [
        SchemaFormat::Sql,
        SchemaFormat::Dsl,
        SchemaFormat::Models,
        SchemaFormat::Json,
    ];

    /// Detect the format from a file extension (`.sql`, `.dbml`, `.go`,
    /// `.models`, `.json`).
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "sql" | "ddl" => Some(SchemaFormat::Sql),
            "dbml" | "dsl" => Some(SchemaFormat::Dsl),
            "go" | "models" => Some(SchemaFormat::Models),
            "json" => Some(SchemaFormat::Json),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SchemaFormat::Sql => "sql",
            SchemaFormat::Dsl => "dsl",
            SchemaFormat::Models => "models",
            SchemaFormat::Json => "json",
        }
    }

    /// File extension used when writing this format
    pub const fn extension(self) -> &'static str {
        match self {
            SchemaFormat::Sql => "sql",
            SchemaFormat::Dsl => "dbml",
            SchemaFormat::Models => "go",
            SchemaFormat::Json => "json",
        }
    }
}

impl fmt::Display for SchemaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaFormat {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sql" | "ddl" => Ok(SchemaFormat::Sql),
            "dsl" | "dbml" => Ok(SchemaFormat::Dsl),
            "models" | "model" | "go" => Ok(SchemaFormat::Models),
            "json" => Ok(SchemaFormat::Json),
            _ => Err(SchemaError::UnknownFormat(s.to_string())),
        }
    }
}

/// Parse schema text of any supported format.
///
/// `dialect` selects the type mapping for model sources and is the dialect
/// recorded on the result. For SQL it is a hint; `None` means detect from the
/// script. A JSON document carries its own dialect unless one is given.
///
/// # Errors
///
/// [`SchemaError::EmptySchema`] when the input yields no tables, and
/// [`SchemaError::Json`] for malformed JSON.
pub fn import(format: SchemaFormat, text: &str, dialect: Option<Dialect>) -> Result<SchemaInfo> {
    let schema = match format {
        SchemaFormat::Sql => ddl::parse(text, dialect),
        SchemaFormat::Dsl => SchemaInfo::new(dialect.unwrap_or_default(), dsl::parse(text)?),
        SchemaFormat::Models => {
            let dialect = dialect.unwrap_or_default();
            SchemaInfo::new(dialect, declarative::parse(text, dialect)?)
        }
        SchemaFormat::Json => {
            let mut schema = from_json(text)?;
            if let Some(dialect) = dialect {
                schema.driver = dialect;
            }
            schema
        }
    };

    if schema.is_empty() {
        return Err(SchemaError::EmptySchema {
            format: format.as_str(),
        });
    }
    Ok(schema)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonSchema {
    Schema(SchemaInfo),
    Tables(Vec<TableInfo>),
}

/// Read a whole schema object or a bare array of tables.
pub fn from_json(text: &str) -> Result<SchemaInfo> {
    let schema = match serde_json::from_str(text)? {
        JsonSchema::Schema(schema) => schema,
        JsonSchema::Tables(tables) => SchemaInfo::new(Dialect::default(), tables),
    };
    Ok(schema)
}

/// Pretty-printed JSON of the canonical model
pub fn to_json(schema: &SchemaInfo) -> Result<String> {
    Ok(serde_json::to_string_pretty(schema)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_detection() {
        assert_eq!(
            SchemaFormat::from_path(Path::new("db/schema.SQL")),
            Some(SchemaFormat::Sql)
        );
        assert_eq!(SchemaFormat::from_extension(".dbml"), Some(SchemaFormat::Dsl));
        assert_eq!(SchemaFormat::from_extension("go"), Some(SchemaFormat::Models));
        assert_eq!(SchemaFormat::from_path(Path::new("schema")), None);
        assert_eq!("JSON".parse::<SchemaFormat>().unwrap(), SchemaFormat::Json);
        assert!(matches!(
            "yaml".parse::<SchemaFormat>(),
            Err(SchemaError::UnknownFormat(f)) if f == "yaml"
        ));
    }

    #[test]
    fn sql_without_tables_is_empty() {
        let err = import(SchemaFormat::Sql, "CREATE INDEX i ON t(x);", None).unwrap_err();
        assert!(matches!(err, SchemaError::EmptySchema { format: "sql" }));
    }

    #[test]
    fn sql_detects_dialect() {
        let schema = import(
            SchemaFormat::Sql,
            "CREATE TABLE t (id SERIAL PRIMARY KEY);",
            None,
        )
        .unwrap();
        assert_eq!(schema.driver, Dialect::PostgreSQL);
    }

    #[test]
    fn json_accepts_bare_table_array() {
        let schema = import(
            SchemaFormat::Json,
            r#"[{"name": "users", "columns": [{"name": "id", "type": "INTEGER"}]}]"#,
            Some(Dialect::MySQL),
        )
        .unwrap();
        assert_eq!(schema.driver, Dialect::MySQL);
        let id = &schema.tables[0].columns[0];
        assert_eq!(id.sql_type, "INTEGER");
        assert!(id.is_nullable);
    }

    #[test]
    fn json_round_trip() {
        let schema = import(
            SchemaFormat::Dsl,
            "Table users {\n  id integer [pk]\n}\n",
            Some(Dialect::PostgreSQL),
        )
        .unwrap();
        let text = to_json(&schema).unwrap();
        assert!(text.contains("\"driver\": \"postgres\""));
        assert_eq!(from_json(&text).unwrap(), schema);
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            import(SchemaFormat::Json, "{", None),
            Err(SchemaError::Json(_))
        ));
    }
}
