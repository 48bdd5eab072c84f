//! Table-notation generation

use std::fmt::Write;

use schemakit_types::{Dialect, ScalarType};

use crate::model::{ColumnInfo, SchemaInfo};

use super::needs_quotes;

/// Render a schema as table-notation text.
///
/// Every foreign-key column is written as a trailing top-level `Ref:` line
/// after all tables, so re-parsing the output recovers every reference
/// regardless of table order.
pub fn generate(schema: &SchemaInfo) -> String {
    let mut out = String::new();

    for (n, table) in schema.tables.iter().enumerate() {
        if n > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "Table {} {{", name(&table.name));
        for col in &table.columns {
            let _ = writeln!(out, "  {}", column_line(col, schema.driver));
        }
        out.push_str("}\n");
    }

    let refs: Vec<String> = schema
        .tables
        .iter()
        .flat_map(|t| t.columns.iter().map(move |c| (t, c)))
        .filter_map(|(t, c)| {
            let target = c.foreign_table.as_deref().filter(|_| c.is_foreign_key)?;
            let to = match c.foreign_key.as_deref() {
                Some(key) => format!("{}.{}", name(target), name(key)),
                None => name(target),
            };
            Some(format!("Ref: {}.{} > {to}", name(&t.name), name(&c.name)))
        })
        .collect();

    if !refs.is_empty() {
        out.push('\n');
        for line in refs {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// A typeless column is written with the dialect's text type, since a
/// column line needs a type to parse.
fn column_line(col: &ColumnInfo, dialect: Dialect) -> String {
    let sql_type = match col.sql_type.trim() {
        "" => ScalarType::Text.sql_type(dialect),
        ty => ty,
    };
    let mut line = format!("{} {sql_type}", name(&col.name));

    let mut attrs = Vec::new();
    if col.is_primary_key {
        attrs.push("pk".to_string());
    } else if !col.is_nullable {
        attrs.push("not null".to_string());
    }
    if let Some(default) = &col.default {
        attrs.push(format!("default: {}", default_value(default)));
    }

    if !attrs.is_empty() {
        let _ = write!(line, " [{}]", attrs.join(", "));
    }
    line
}

fn default_value(value: &str) -> String {
    if value.parse::<f64>().is_ok() && !value.chars().any(char::is_alphabetic) {
        value.to_string()
    } else if value.contains('\'') {
        format!("\"{value}\"")
    } else {
        format!("'{value}'")
    }
}

fn name(ident: &str) -> String {
    if needs_quotes(ident) {
        format!("\"{ident}\"")
    } else {
        ident.to_string()
    }
}
