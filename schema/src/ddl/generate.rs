//! CREATE TABLE generation

use std::borrow::Cow;
use std::fmt::Write;

use schemakit_types::Dialect;

use crate::model::{ColumnInfo, SchemaInfo, TableInfo};

/// Options for DDL generation
#[derive(Debug, Clone, Copy, Default)]
pub struct DdlOptions {
    /// Emit inline `REFERENCES table(column)` for foreign-key columns
    pub references: bool,
}

/// Generate one `CREATE TABLE` statement with default options.
pub fn generate(table: &TableInfo, dialect: Dialect) -> String {
    generate_with(table, dialect, &DdlOptions::default())
}

/// Generate one `CREATE TABLE` statement.
///
/// Columns are emitted in declaration order as
/// `name type [PRIMARY KEY | NOT NULL] [DEFAULT literal]`. A key spanning
/// several columns is emitted as a trailing table constraint instead.
pub fn generate_with(table: &TableInfo, dialect: Dialect, options: &DdlOptions) -> String {
    let keys: Vec<&str> = if table.primary_keys.is_empty() {
        table
            .columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.as_str())
            .collect()
    } else {
        table.primary_keys.iter().map(String::as_str).collect()
    };
    let composite = keys.len() > 1;

    let mut clauses: Vec<String> = table
        .columns
        .iter()
        .map(|col| {
            let inline_key = !composite && keys.iter().any(|k| k.eq_ignore_ascii_case(&col.name));
            column_clause(col, dialect, inline_key, options)
        })
        .collect();

    if composite {
        let cols: Vec<String> = keys.iter().map(|k| dialect.quote_ident(k)).collect();
        clauses.push(format!("PRIMARY KEY ({})", cols.join(", ")));
    }

    let mut sql = format!("CREATE TABLE {} (\n", dialect.quote_ident(&table.name));
    sql.push_str(
        &clauses
            .iter()
            .map(|c| format!("    {c}"))
            .collect::<Vec<_>>()
            .join(",\n"),
    );
    sql.push_str("\n);");
    sql
}

/// Generate the whole schema, one statement per table separated by a blank line.
pub fn export(schema: &SchemaInfo, options: &DdlOptions) -> String {
    let mut out = String::new();
    for (n, table) in schema.tables.iter().enumerate() {
        if n > 0 {
            out.push_str("\n\n");
        }
        out.push_str(&generate_with(table, schema.driver, options));
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

fn column_clause(col: &ColumnInfo, dialect: Dialect, inline_key: bool, options: &DdlOptions) -> String {
    let mut clause = dialect.quote_ident(&col.name);
    if !col.sql_type.is_empty() {
        clause.push(' ');
        clause.push_str(&col.sql_type);
    }

    if inline_key {
        clause.push_str(" PRIMARY KEY");
    } else if !col.is_nullable {
        clause.push_str(" NOT NULL");
    }

    if let Some(default) = &col.default {
        let _ = write!(clause, " DEFAULT {}", default_sql(default));
    }

    if options.references && col.is_foreign_key {
        if let Some(table) = &col.foreign_table {
            let _ = write!(clause, " REFERENCES {}", dialect.quote_ident(table));
            if let Some(key) = &col.foreign_key {
                let _ = write!(clause, "({})", dialect.quote_ident(key));
            }
        }
    }
    clause
}

/// Render a stored default literal back into SQL, quoting it unless it is
/// a number, a keyword constant, or an expression.
fn default_sql(value: &str) -> Cow<'_, str> {
    let upper = value.to_ascii_uppercase();
    let bare = is_numeric(value)
        || matches!(
            upper.as_str(),
            "NULL" | "TRUE" | "FALSE" | "CURRENT_TIMESTAMP" | "CURRENT_DATE" | "CURRENT_TIME"
        )
        || value.starts_with('(')
        || value.starts_with('\'')
        || value.contains("::")
        || is_call(value);

    if bare {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("'{}'", value.replace('\'', "''")))
    }
}

fn is_numeric(value: &str) -> bool {
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    let mut parts = digits.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let frac = parts.next();
    !whole.is_empty()
        && whole.chars().all(|c| c.is_ascii_digit())
        && frac.is_none_or(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()))
}

/// `name(...)` such as `now()` or `gen_random_uuid()`
fn is_call(value: &str) -> bool {
    match value.find('(') {
        Some(open) if value.ends_with(')') && open > 0 => value[..open]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> TableInfo {
        let mut t = TableInfo::new("users");
        t.columns = vec![
            ColumnInfo::new("id", "INTEGER").with_primary_key(),
            ColumnInfo::new("email", "VARCHAR(255)").not_null(),
            ColumnInfo::new("status", "TEXT").with_default("active"),
            ColumnInfo::new("org_id", "INTEGER").references("orgs", "id"),
        ];
        t.rebuild_primary_keys();
        t
    }

    #[test]
    fn single_key_inline() {
        let sql = generate(&users(), Dialect::SQLite);
        assert_eq!(
            sql,
            "CREATE TABLE \"users\" (\n    \"id\" INTEGER PRIMARY KEY,\n    \"email\" VARCHAR(255) NOT NULL,\n    \"status\" TEXT DEFAULT 'active',\n    \"org_id\" INTEGER\n);"
        );
    }

    #[test]
    fn composite_key_as_constraint() {
        let mut t = TableInfo::new("memberships");
        t.columns = vec![
            ColumnInfo::new("user_id", "INT"),
            ColumnInfo::new("group_id", "INT"),
        ];
        t.set_primary_key(&["user_id", "group_id"]);
        let sql = generate(&t, Dialect::MySQL);
        assert!(sql.contains("`user_id` INT NOT NULL"));
        assert!(sql.contains("PRIMARY KEY (`user_id`, `group_id`)"));
        assert!(!sql.contains("INT PRIMARY KEY"));
    }

    #[test]
    fn references_are_opt_in() {
        let sql = generate_with(&users(), Dialect::PostgreSQL, &DdlOptions { references: true });
        assert!(sql.contains("\"org_id\" INTEGER REFERENCES \"orgs\"(\"id\")"));
    }

    #[test]
    fn default_literals() {
        assert_eq!(default_sql("0"), "0");
        assert_eq!(default_sql("-1.5"), "-1.5");
        assert_eq!(default_sql("current_timestamp"), "current_timestamp");
        assert_eq!(default_sql("now()"), "now()");
        assert_eq!(default_sql("(datetime('now'))"), "(datetime('now'))");
        assert_eq!(default_sql("it's"), "'it''s'");
        assert_eq!(default_sql("1.2.3"), "'1.2.3'");
        assert_eq!(default_sql("hello world"), "'hello world'");
    }
}
