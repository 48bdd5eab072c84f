//! Introspect command - reads the live database schema

use std::path::Path;

use schemakit_schema::{MergePolicy, SchemaFormat};

use super::{RenderOptions, read_schema, render, write_output};
use crate::config::Config;
use crate::db;
use crate::error::CliError;
use crate::output;

/// Inputs of `schemakit introspect`
#[derive(Debug, Clone, Copy)]
pub struct IntrospectOptions<'a> {
    pub format: SchemaFormat,
    /// Output file; `<out>/schema.<ext>` from the config when absent
    pub out: Option<&'a Path>,
    /// Print to stdout instead of writing a file
    pub stdout: bool,
    /// Model file merged with the catalog; overrides `models` in the config
    pub models: Option<&'a Path>,
    /// Keep catalog-only columns when merging
    pub union: bool,
    pub if_not_exists: bool,
}

pub fn run(config: &Config, options: &IntrospectOptions<'_>) -> Result<(), CliError> {
    let credentials = config.credentials()?.ok_or_else(|| {
        CliError::Other("no [dbCredentials] in config; introspect needs a database".into())
    })?;

    eprintln!(
        "{} {} {}",
        output::heading("Introspecting"),
        credentials.display_target(),
        output::muted(&format!("({})", config.dialect))
    );

    let models = match options.models.or(config.models.as_deref()) {
        Some(path) => {
            let (_, schema) = read_schema(path, None, Some(config.dialect))?;
            eprintln!(
                "  {} {} ({} tables)",
                output::label("Merging models from"),
                path.display(),
                schema.tables.len()
            );
            Some(schema.tables)
        }
        None => None,
    };
    let policy = if options.union {
        MergePolicy::Union
    } else {
        MergePolicy::ModelColumns
    };

    let schema = db::introspect(&credentials, config.dialect, models.as_deref(), policy)?;
    if schema.is_empty() {
        eprintln!("  {}", output::warning("No tables found"));
    }
    tracing::info!(tables = schema.tables.len(), "introspection finished");

    let render_options = RenderOptions {
        package: config.package.clone(),
        if_not_exists: options.if_not_exists,
    };
    let text = render(&schema, options.format, &render_options)?;

    if options.stdout {
        return write_output(None, &text);
    }

    let path = options
        .out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.schema_path(options.format.extension()));
    write_output(Some(&path), &text)?;

    eprintln!(
        "{} {} tables saved to {}",
        output::success("Done!"),
        schema.tables.len(),
        path.display()
    );
    Ok(())
}
