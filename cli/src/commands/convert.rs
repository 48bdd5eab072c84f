//! Convert command - reads a schema file in one format and writes another

use std::path::Path;

use schemakit_schema::{Dialect, SchemaFormat};

use super::{RenderOptions, read_schema, render, write_output};
use crate::error::CliError;
use crate::output;

/// Inputs of `schemakit convert`
#[derive(Debug, Clone)]
pub struct ConvertOptions<'a> {
    pub input: &'a Path,
    /// Input format; detected from the extension when absent
    pub from: Option<SchemaFormat>,
    pub to: SchemaFormat,
    /// Dialect for type mapping and identifier quoting
    pub dialect: Option<Dialect>,
    /// Output file; stdout when absent
    pub out: Option<&'a Path>,
    pub render: RenderOptions,
}

pub fn run(options: &ConvertOptions<'_>) -> Result<(), CliError> {
    let (from, mut schema) = read_schema(options.input, options.from, options.dialect)?;
    if let Some(dialect) = options.dialect {
        schema.driver = dialect;
    }

    let text = render(&schema, options.to, &options.render)?;
    write_output(options.out, &text)?;

    if let Some(out) = options.out {
        eprintln!(
            "{} {} {} ({} tables, {} -> {})",
            output::success("Wrote"),
            out.display(),
            output::muted(&format!("[{}]", schema.driver)),
            schema.tables.len(),
            from,
            options.to,
        );
    }
    Ok(())
}
