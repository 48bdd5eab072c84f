//! Check command - parses a schema file and reports what it contains

use std::path::Path;

use schemakit_schema::{Dialect, SchemaFormat, SchemaInfo};

use super::read_schema;
use crate::error::CliError;
use crate::output;

pub fn run(
    input: &Path,
    from: Option<SchemaFormat>,
    dialect: Option<Dialect>,
) -> Result<(), CliError> {
    let (format, schema) = read_schema(input, from, dialect)?;

    println!(
        "{} {} {}",
        output::heading("Checking"),
        input.display(),
        output::muted(&format!("({format}, {})", schema.driver))
    );
    println!();

    for table in &schema.tables {
        let pk = if table.primary_keys.is_empty() {
            output::warning("no primary key")
        } else {
            format!("pk ({})", table.primary_keys.join(", "))
        };
        let mut line = format!(
            "  {}: {} columns, {pk}",
            output::label(&table.name),
            table.columns.len()
        );
        if !table.relations.is_empty() {
            line.push_str(&format!(", {} relations", table.relations.len()));
        }
        println!("{line}");
    }

    let dangling = dangling_references(&schema);
    if !dangling.is_empty() {
        println!();
        for (table, column, target) in &dangling {
            println!(
                "  {} {table}.{column} references unknown table {target}",
                output::warning("Warning:")
            );
        }
    }

    let columns: usize = schema.tables.iter().map(|t| t.columns.len()).sum();
    println!();
    println!(
        "{}",
        output::success(&format!("{} tables, {columns} columns", schema.tables.len()))
    );
    Ok(())
}

/// Foreign-key columns whose target table is not part of the schema
fn dangling_references(schema: &SchemaInfo) -> Vec<(&str, &str, &str)> {
    schema
        .tables
        .iter()
        .flat_map(|t| t.columns.iter().map(move |c| (t, c)))
        .filter_map(|(t, c)| {
            let target = c.foreign_table.as_deref()?;
            (!schema.is_valid_table(target)).then_some((t.name.as_str(), c.name.as_str(), target))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemakit_schema::import;

    #[test]
    fn finds_references_to_missing_tables() {
        let schema = import(
            SchemaFormat::Sql,
            "CREATE TABLE posts (id INTEGER PRIMARY KEY, author_id INTEGER REFERENCES authors(id));",
            None,
        )
        .unwrap();
        assert_eq!(dangling_references(&schema), [("posts", "author_id", "authors")]);
    }
}
