//! Live catalog introspection
//!
//! The introspector reads base tables and their columns from a live
//! database through a [`CatalogClient`], a deliberately small seam: run one
//! read-only query with text parameters, get rows of optional text back.
//! Driver implementations live behind cargo features:
//!
//! | Feature | Client |
//! |---|---|
//! | `rusqlite` | `rusqlite::Connection` |
//! | `postgres-sync` | `postgres::Client` |
//! | `mysql` | [`MySqlCatalog`] (sqlx pool on a private runtime) |
//!
//! Catalog queries are sequential. A failure on one table is logged and
//! that table is skipped; only a failure to list tables at all is an error.

pub mod queries;

#[cfg(feature = "mysql")]
mod mysql;
#[cfg(feature = "postgres-sync")]
mod postgres;
#[cfg(feature = "rusqlite")]
mod sqlite;

#[cfg(feature = "mysql")]
pub use mysql::MySqlCatalog;

use schemakit_types::Dialect;

use crate::error::{Result, SchemaError};
use crate::merge::{MergePolicy, merge_tables};
use crate::model::{ColumnInfo, SchemaInfo, TableInfo};
use crate::trace::schema_warn;

/// A connection able to run read-only catalog queries
pub trait CatalogClient {
    /// Run `sql` with positional text parameters and return every row.
    fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<CatalogRow>>;
}

impl<C: CatalogClient + ?Sized> CatalogClient for &mut C {
    fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<CatalogRow>> {
        (**self).query(sql, params)
    }
}

/// One result row, every value rendered as text (`None` for SQL NULL)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRow(pub Vec<Option<String>>);

impl CatalogRow {
    pub fn text(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).and_then(Option::as_deref)
    }

    /// Boolean-ish value: `1`, `t`, `true`, `y`, `yes` (any case)
    pub fn flag(&self, idx: usize) -> bool {
        self.text(idx).is_some_and(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "t" | "true" | "y" | "yes"
            )
        })
    }

    pub fn int(&self, idx: usize) -> Option<u64> {
        self.text(idx).and_then(|v| v.trim().parse().ok())
    }
}

impl From<Vec<Option<String>>> for CatalogRow {
    fn from(values: Vec<Option<String>>) -> Self {
        Self(values)
    }
}

/// Reads a live catalog into the canonical model
#[derive(Debug)]
pub struct Introspector<C> {
    client: C,
    dialect: Dialect,
}

impl<C: CatalogClient> Introspector<C> {
    /// Create an introspector for a dialect tag such as `"sqlite"`, `"pg"` or
    /// `"mysql"`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnsupportedDialect`] for any other tag.
    pub fn new(client: C, dialect: &str) -> Result<Self> {
        let dialect = Dialect::parse(dialect)
            .ok_or_else(|| SchemaError::UnsupportedDialect(dialect.to_string()))?;
        Ok(Self::with_dialect(client, dialect))
    }

    pub fn with_dialect(client: C, dialect: Dialect) -> Self {
        Self { client, dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn into_inner(self) -> C {
        self.client
    }

    /// Base-table names, excluding the dialect's internal tables
    pub fn list_tables(&mut self) -> Result<Vec<String>> {
        let rows = self.client.query(queries::tables(self.dialect), &[])?;
        Ok(rows
            .iter()
            .filter_map(|r| r.text(0))
            .filter(|name| !is_internal(self.dialect, name))
            .map(str::to_string)
            .collect())
    }

    /// Columns, primary key and directly exposed foreign keys of one table
    pub fn describe_table(&mut self, name: &str) -> Result<TableInfo> {
        self.read_table(name).map_err(|e| e.for_table(name))
    }

    fn read_table(&mut self, name: &str) -> Result<TableInfo> {
        let mut table = TableInfo::new(name);

        for row in self.client.query(queries::columns(self.dialect), &[name])? {
            let Some(col_name) = row.text(0) else {
                continue;
            };
            let mut col = ColumnInfo::new(col_name, row.text(1).unwrap_or_default());
            col.is_nullable = row.flag(2);
            col.default = row.text(3).map(clean_default);
            table.columns.push(col);
        }
        if table.columns.is_empty() {
            return Err(SchemaError::catalog("table has no columns or does not exist"));
        }

        let keys: Vec<String> = self
            .client
            .query(queries::primary_key(self.dialect), &[name])?
            .iter()
            .filter_map(|r| r.text(0).map(str::to_string))
            .collect();
        table.set_primary_key(&keys);

        for row in self.client.query(queries::foreign_keys(self.dialect), &[name])? {
            let (Some(local), Some(target)) = (row.text(0), row.text(1)) else {
                continue;
            };
            if let Some(col) = table.column_mut(local) {
                col.set_reference(target, row.text(2));
            }
        }
        Ok(table)
    }

    /// Exact row count; advisory only
    pub fn row_count(&mut self, name: &str) -> Result<u64> {
        let sql = queries::row_count(self.dialect, name);
        self.client
            .query(&sql, &[])?
            .first()
            .and_then(|r| r.int(0))
            .ok_or_else(|| SchemaError::catalog("row count returned no value").for_table(name))
    }

    /// Read every base table. Tables that fail to describe are skipped;
    /// row counts are filled where they can be read.
    ///
    /// # Errors
    ///
    /// Only when the table list itself cannot be read.
    pub fn introspect(&mut self) -> Result<SchemaInfo> {
        let names = self.list_tables()?;
        let mut tables = Vec::with_capacity(names.len());

        for name in &names {
            match self.describe_table(name) {
                Ok(mut table) => {
                    table.row_count = self.advisory_row_count(name);
                    tables.push(table);
                }
                Err(e) => {
                    schema_warn!(table = name, error = e; "skipping table");
                }
            }
        }
        Ok(SchemaInfo::new(self.dialect, tables))
    }

    fn advisory_row_count(&mut self, name: &str) -> Option<u64> {
        match self.row_count(name) {
            Ok(count) => Some(count),
            Err(e) => {
                schema_warn!(table = name, error = e; "row count unavailable");
                None
            }
        }
    }
}

/// Rebuild the whole schema from the catalog and the declarative model.
///
/// Tables known to both sides are merged; catalog tables come first in
/// catalog order, then model-only tables in model order. Every table of the
/// result gets an advisory row count, model-only ones included. If the
/// catalog cannot be listed, the result degrades to the model tables alone
/// and no counts are attempted.
pub fn refresh<C: CatalogClient>(
    client: C,
    dialect: Dialect,
    model_tables: &[TableInfo],
    policy: MergePolicy,
) -> SchemaInfo {
    let mut introspector = Introspector::with_dialect(client, dialect);
    let catalog = match introspector.introspect() {
        Ok(schema) => schema.tables,
        Err(e) => {
            schema_warn!(dialect = dialect, error = e; "catalog unavailable, using model tables only");
            return SchemaInfo::new(dialect, model_tables.to_vec());
        }
    };

    let mut tables = merge_tables(model_tables, &catalog, policy);
    for table in &mut tables {
        let in_catalog = catalog.iter().any(|c| c.name.eq_ignore_ascii_case(&table.name));
        if !in_catalog && table.row_count.is_none() {
            table.row_count = introspector.advisory_row_count(&table.name);
        }
    }
    SchemaInfo::new(dialect, tables)
}

fn is_internal(dialect: Dialect, name: &str) -> bool {
    match dialect {
        Dialect::SQLite => name.starts_with("sqlite_"),
        Dialect::PostgreSQL | Dialect::MySQL => false,
    }
}

/// Strip one level of literal quoting and a trailing cast from a catalog
/// default: `'active'::character varying` becomes `active`. Expressions are
/// kept verbatim.
fn clean_default(raw: &str) -> String {
    let raw = raw.trim();
    let literal = match raw.rfind("::") {
        Some(i) if raw[..i].ends_with('\'') => &raw[..i],
        _ => raw,
    };
    match literal
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
    {
        Some(inner) if !inner.contains('\'') || inner.contains("''") => inner.replace("''", "'"),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Answers queries from canned rows keyed by (sql, first param)
    #[derive(Debug, Default)]
    struct FakeCatalog {
        answers: HashMap<(String, String), Vec<CatalogRow>>,
        fail: Vec<String>,
    }

    impl FakeCatalog {
        fn answer(&mut self, sql: &str, param: &str, rows: &[&[Option<&str>]]) {
            let rows = rows
                .iter()
                .map(|r| CatalogRow(r.iter().map(|v| v.map(str::to_string)).collect()))
                .collect();
            self.answers
                .insert((sql.to_string(), param.to_string()), rows);
        }
    }

    impl CatalogClient for FakeCatalog {
        fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<CatalogRow>> {
            let param = params.first().copied().unwrap_or_default();
            if self.fail.iter().any(|f| f == param || f == sql) {
                return Err(SchemaError::catalog("boom"));
            }
            Ok(self
                .answers
                .get(&(sql.to_string(), param.to_string()))
                .cloned()
                .unwrap_or_default())
        }
    }

    fn catalog() -> FakeCatalog {
        let d = Dialect::PostgreSQL;
        let mut fake = FakeCatalog::default();
        fake.answer(
            queries::tables(d),
            "",
            &[&[Some("posts")], &[Some("broken")], &[Some("users")]],
        );
        fake.answer(
            queries::columns(d),
            "users",
            &[
                &[Some("id"), Some("integer"), Some("false"), Some("nextval('users_id_seq'::regclass)")],
                &[Some("status"), Some("text"), Some("true"), Some("'active'::text")],
            ],
        );
        fake.answer(queries::primary_key(d), "users", &[&[Some("id")]]);
        fake.answer(
            queries::columns(d),
            "posts",
            &[
                &[Some("id"), Some("integer"), Some("false"), None],
                &[Some("author_id"), Some("integer"), Some("true"), None],
            ],
        );
        fake.answer(queries::primary_key(d), "posts", &[&[Some("id")]]);
        fake.answer(
            queries::foreign_keys(d),
            "posts",
            &[&[Some("author_id"), Some("users"), Some("id")]],
        );
        fake.answer(&queries::row_count(d, "users"), "", &[&[Some("2")]]);
        fake.fail.push("broken".to_string());
        fake
    }

    #[test]
    fn unknown_dialect_is_fatal() {
        let err = Introspector::new(FakeCatalog::default(), "oracle").unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedDialect(d) if d == "oracle"));
    }

    #[test]
    fn describes_columns_keys_and_references() {
        let mut intro = Introspector::new(catalog(), "postgres").unwrap();
        let users = intro.describe_table("users").unwrap();
        assert_eq!(users.primary_keys, ["id"]);
        assert!(!users.columns[0].is_nullable);
        assert_eq!(
            users.columns[0].default.as_deref(),
            Some("nextval('users_id_seq'::regclass)")
        );
        assert_eq!(users.columns[1].default.as_deref(), Some("active"));

        let posts = intro.describe_table("posts").unwrap();
        let author = posts.column("author_id").unwrap();
        assert!(author.is_foreign_key);
        assert_eq!(author.foreign_table.as_deref(), Some("users"));
    }

    #[test]
    fn failed_tables_are_skipped() {
        let mut intro = Introspector::new(catalog(), "pg").unwrap();
        let schema = intro.introspect().unwrap();
        let names: Vec<_> = schema.table_names().collect();
        assert_eq!(names, ["posts", "users"]);
        assert_eq!(schema.table("users").unwrap().row_count, Some(2));
        // no canned count for posts
        assert_eq!(schema.table("posts").unwrap().row_count, None);
    }

    #[test]
    fn refresh_falls_back_to_model_tables() {
        let mut fake = catalog();
        fake.fail.push(queries::tables(Dialect::PostgreSQL).to_string());
        let model = vec![TableInfo::new("users")];
        let schema = refresh(fake, Dialect::PostgreSQL, &model, MergePolicy::default());
        assert_eq!(schema.tables, model);
    }

    #[test]
    fn refresh_merges_and_appends_model_only_tables() {
        let mut users = TableInfo::new("users");
        users.columns = vec![ColumnInfo::new("status", "")];
        let tags = TableInfo::new("tags");

        let schema = refresh(
            catalog(),
            Dialect::PostgreSQL,
            &[users, tags],
            MergePolicy::ModelColumns,
        );
        let names: Vec<_> = schema.table_names().collect();
        assert_eq!(names, ["posts", "users", "tags"]);
        let users = schema.table("users").unwrap();
        assert_eq!(users.columns.len(), 1);
        assert_eq!(users.columns[0].sql_type, "text");
    }

    #[test]
    fn refresh_counts_model_only_tables() {
        let mut fake = catalog();
        fake.answer(
            &queries::row_count(Dialect::PostgreSQL, "tags"),
            "",
            &[&[Some("7")]],
        );
        let schema = refresh(
            fake,
            Dialect::PostgreSQL,
            &[TableInfo::new("tags"), TableInfo::new("audits")],
            MergePolicy::ModelColumns,
        );
        assert_eq!(schema.table("tags").unwrap().row_count, Some(7));
        assert_eq!(schema.table("users").unwrap().row_count, Some(2));
        // count query fails, the table stays uncounted
        assert_eq!(schema.table("audits").unwrap().row_count, None);
    }

    #[test]
    fn defaults_are_unquoted() {
        assert_eq!(clean_default("'it''s'"), "it's");
        assert_eq!(clean_default("'a'::character varying"), "a");
        assert_eq!(clean_default("0"), "0");
        assert_eq!(clean_default("CURRENT_TIMESTAMP"), "CURRENT_TIMESTAMP");
    }

    #[test]
    fn row_flags() {
        let row = CatalogRow::from(vec![Some("YES".into()), Some("0".into()), None]);
        assert!(row.flag(0));
        assert!(!row.flag(1));
        assert!(!row.flag(2));
        assert_eq!(row.int(1), Some(0));
        assert_eq!(row.text(5), None);
    }
}
