//! CLI command implementations
//!
//! Each command module implements one `schemakit` subcommand. The helpers
//! here are shared by the commands that read or write schema files.

pub mod check;
pub mod convert;
pub mod init;
pub mod introspect;

use std::path::Path;

use schemakit_schema::ddl::{self, DdlOptions};
use schemakit_schema::declarative::{self, SourceOptions};
use schemakit_schema::{Dialect, SchemaFormat, SchemaInfo, dsl, import};

use crate::error::CliError;

/// How a schema is written out
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Package line for generated model sources
    pub package: String,
    /// Guard every `CREATE TABLE` with `IF NOT EXISTS`
    pub if_not_exists: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            package: "models".into(),
            if_not_exists: false,
        }
    }
}

/// Render a schema in the requested format
pub fn render(
    schema: &SchemaInfo,
    format: SchemaFormat,
    options: &RenderOptions,
) -> Result<String, CliError> {
    let text = match format {
        SchemaFormat::Sql => {
            let sql = ddl::export(schema, &DdlOptions { references: true });
            if options.if_not_exists {
                ddl::if_not_exists(&sql)
            } else {
                sql
            }
        }
        SchemaFormat::Dsl => dsl::generate(schema),
        SchemaFormat::Models => declarative::generate_with(
            schema,
            &SourceOptions {
                package: options.package.clone(),
                ..SourceOptions::default()
            },
        ),
        SchemaFormat::Json => import::to_json(schema)?,
    };
    Ok(text)
}

/// Parse a schema file. The format comes from `format` or, failing that,
/// from the file extension.
pub fn read_schema(
    path: &Path,
    format: Option<SchemaFormat>,
    dialect: Option<Dialect>,
) -> Result<(SchemaFormat, SchemaInfo), CliError> {
    let format = format
        .or_else(|| SchemaFormat::from_path(path))
        .ok_or_else(|| {
            CliError::Other(format!(
                "cannot tell the format of {} from its extension; pass --from",
                path.display()
            ))
        })?;
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::IoError(format!("failed to read {}: {e}", path.display())))?;
    let schema = import(format, &text, dialect)?;
    tracing::debug!(path = %path.display(), %format, tables = schema.tables.len(), "schema loaded");
    Ok((format, schema))
}

/// Write `text` to `path`, creating parent directories, or to stdout.
pub fn write_output(path: Option<&Path>, text: &str) -> Result<(), CliError> {
    let Some(path) = path else {
        print!("{text}");
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::IoError(format!("failed to create {}: {e}", parent.display()))
        })?;
    }
    std::fs::write(path, text)
        .map_err(|e| CliError::IoError(format!("failed to write {}: {e}", path.display())))
}
