//! CREATE TABLE parsing properties and emitter round trips

use schemakit_schema::ddl::{self, detect_dialect, generate, if_not_exists, parse};
use schemakit_schema::{ColumnInfo, Dialect, TableInfo};

const BLOG: &str = r#"
-- Users
CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email VARCHAR(255) NOT NULL, /* login */
    status TEXT DEFAULT 'active;pending',
    balance NUMERIC(10,2) DEFAULT 0
);

CREATE TABLE posts (
    id INTEGER PRIMARY KEY,
    author_id INTEGER NOT NULL REFERENCES users(id),
    title TEXT NOT NULL
);
"#;

fn column_names(table: &TableInfo) -> Vec<&str> {
    table.columns.iter().map(|c| c.name.as_str()).collect()
}

#[test]
fn statements_split_on_top_level_semicolons_only() {
    let schema = parse(BLOG, None);
    let names: Vec<_> = schema.table_names().collect();
    assert_eq!(names, ["users", "posts"]);

    let users = &schema.tables[0];
    assert_eq!(column_names(users), ["id", "email", "status", "balance"]);
    assert_eq!(users.column("status").unwrap().default.as_deref(), Some("active;pending"));
    assert_eq!(users.column("balance").unwrap().sql_type, "NUMERIC(10,2)");
}

#[test]
fn layout_does_not_change_the_result() {
    let compact = "CREATE TABLE users(id INTEGER PRIMARY KEY AUTOINCREMENT,email VARCHAR(255) NOT NULL,\
                   status TEXT DEFAULT 'active;pending',balance NUMERIC(10,2) DEFAULT 0);";
    let spread = "/* header */ CREATE   TABLE\n users (\n\n  id INTEGER   PRIMARY KEY AUTOINCREMENT , -- key\n\
                  email VARCHAR(255)\n NOT NULL,\n status TEXT DEFAULT 'active;pending'\n,\n balance NUMERIC(10,2) DEFAULT 0\n)\n;";
    let a = parse(compact, None);
    let b = parse(spread, None);
    assert_eq!(a.tables, b.tables);
    assert_eq!(a.tables[0].columns.len(), 4);
}

#[test]
fn table_primary_key_constraint_implies_not_null() {
    let schema = parse(
        "CREATE TABLE memberships (a INTEGER, b INTEGER, note TEXT, PRIMARY KEY (a, b));",
        None,
    );
    let t = &schema.tables[0];
    assert_eq!(t.primary_keys, ["a", "b"]);
    assert!(!t.column("a").unwrap().is_nullable);
    assert!(!t.column("b").unwrap().is_nullable);
    assert!(t.column("note").unwrap().is_nullable);
}

#[test]
fn varchar_size_is_kept_verbatim() {
    let schema = parse("CREATE TABLE t (name VARCHAR(255));", None);
    assert_eq!(schema.tables[0].columns[0].sql_type, "VARCHAR(255)");
}

#[test]
fn dialect_detection() {
    assert_eq!(detect_dialect("id INTEGER PRIMARY KEY AUTOINCREMENT"), Dialect::SQLite);
    assert_eq!(detect_dialect("id SERIAL PRIMARY KEY"), Dialect::PostgreSQL);
    assert_eq!(detect_dialect("id INT AUTO_INCREMENT"), Dialect::MySQL);
    assert_eq!(detect_dialect(") ENGINE = InnoDB"), Dialect::MySQL);
    assert_eq!(detect_dialect("id INTEGER"), Dialect::SQLite);
    assert_eq!(parse("CREATE TABLE t (id SERIAL);", None).driver, Dialect::PostgreSQL);
}

#[test]
fn serial_implies_primary_key() {
    let schema = parse("CREATE TABLE t (id BIGSERIAL, name TEXT);", None);
    let t = &schema.tables[0];
    assert_eq!(t.primary_keys, ["id"]);
    assert!(!t.columns[0].is_nullable);
}

#[test]
fn generated_ddl_parses_back() {
    let mut t = TableInfo::new("line items");
    t.columns = vec![
        ColumnInfo::new("order_id", "INTEGER"),
        ColumnInfo::new("sku", "VARCHAR(32)"),
        ColumnInfo::new("qty", "INTEGER").not_null().with_default("1"),
        ColumnInfo::new("price", "NUMERIC(10, 2)"),
    ];
    t.set_primary_key(&["order_id", "sku"]);

    for dialect in Dialect::ALL {
        let sql = generate(&t, dialect);
        let back = parse(&sql, Some(dialect));
        assert_eq!(back.tables.len(), 1, "{dialect}: {sql}");
        let back = &back.tables[0];
        assert_eq!(back.name, t.name);
        assert_eq!(column_names(back), column_names(&t));
        for (got, want) in back.columns.iter().zip(&t.columns) {
            assert_eq!(got.sql_type, want.sql_type);
            assert_eq!(got.is_nullable, want.is_nullable);
            assert_eq!(got.default, want.default);
        }
        assert_eq!(back.primary_keys, t.primary_keys);
    }
}

#[test]
fn embedded_quotes_are_doubled() {
    let mut t = TableInfo::new("we\"ird");
    t.columns = vec![ColumnInfo::new("a`b", "TEXT")];
    assert!(generate(&t, Dialect::SQLite).starts_with("CREATE TABLE \"we\"\"ird\" ("));
    assert!(generate(&t, Dialect::MySQL).contains("`a``b` TEXT"));
}

#[test]
fn export_then_guard() {
    let schema = parse(BLOG, Some(Dialect::PostgreSQL));
    let text = if_not_exists(&ddl::export(&schema, &Default::default()));
    assert_eq!(text.matches("CREATE TABLE IF NOT EXISTS").count(), 2);

    let back = parse(&text, Some(Dialect::PostgreSQL));
    assert_eq!(back.table_names().collect::<Vec<_>>(), ["users", "posts"]);
}
