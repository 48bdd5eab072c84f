//! Table notation, declarative models and conversions between formats

use schemakit_schema::{
    Dialect, MergePolicy, RelationKind, SchemaFormat, SchemaError, declarative, dsl, import,
    merge, merge_tables,
};

const MODELS: &str = r#"
package models

import "time"

type User struct {
    ID        int64      `db:"primaryKey"`
    Email     string     `db:"size:255;not null"`
    Nickname  *string
    CreatedAt time.Time
    Posts     []Post     `db:"foreignKey:AuthorID"`
    Tags      []string
}

type Post struct {
    ID       int64  `db:"primaryKey"`
    AuthorID int64  `db:"not null"`
    Author   *User  `db:"foreignKey:AuthorID"`
    Title    string
}
"#;

#[test]
fn dsl_inline_reference() {
    let tables = dsl::parse("Table posts {\n  author_id integer [ref: > users.id]\n}\n").unwrap();
    let col = &tables[0].columns[0];
    assert!(col.is_foreign_key);
    assert_eq!(col.foreign_table.as_deref(), Some("users"));
    assert_eq!(col.foreign_key.as_deref(), Some("id"));
}

#[test]
fn dsl_requires_a_table() {
    assert!(matches!(
        dsl::parse("Project p {\n}\n"),
        Err(SchemaError::EmptySchema { .. })
    ));
}

#[test]
fn declarative_field_classification() {
    let tables = declarative::parse(MODELS, Dialect::PostgreSQL).unwrap();
    let users = &tables[0];
    assert_eq!(users.name, "users");

    // sequence of a non-scalar is a relation, not a column
    assert!(!users.has_column("posts"));
    // single reference to a scalar is a nullable column
    assert!(users.column("nickname").unwrap().is_nullable);
    // dot-qualified timestamp type is a column
    assert_eq!(users.column("created_at").unwrap().sql_type, "TIMESTAMP");
    assert_eq!(users.column("email").unwrap().sql_type, "VARCHAR(255)");
    assert_eq!(users.column("id").unwrap().sql_type, "BIGINT");

    let posts = users.relation("Posts").unwrap();
    assert_eq!(posts.kind, RelationKind::ToMany);
    assert_eq!(posts.foreign_key.as_deref(), Some("author_id"));
}

#[test]
fn owning_relation_marks_local_key() {
    let tables = declarative::parse(MODELS, Dialect::SQLite).unwrap();
    let posts = &tables[1];
    assert_eq!(posts.name, "posts");
    let author = posts.relation("Author").unwrap();
    assert_eq!(author.kind, RelationKind::OwningToOne);
    let key = posts.column("author_id").unwrap();
    assert!(key.is_foreign_key);
    assert_eq!(key.foreign_table.as_deref(), Some("users"));
    assert_eq!(key.foreign_key.as_deref(), Some("id"));
}

#[test]
fn merge_backfills_type_and_drops_catalog_only_columns() {
    let model = import(
        SchemaFormat::Json,
        r#"[{"name": "users", "columns": [{"name": "email", "type": ""}]}]"#,
        None,
    )
    .unwrap();
    let catalog = import(
        SchemaFormat::Sql,
        "CREATE TABLE users (email TEXT, legacy_col TEXT);",
        None,
    )
    .unwrap();

    let merged = merge(&model.tables[0], &catalog.tables[0]);
    assert_eq!(merged.column("email").unwrap().sql_type, "TEXT");
    assert!(!merged.has_column("legacy_col"));

    let union = merge_tables(&model.tables, &catalog.tables, MergePolicy::Union);
    assert!(union[0].has_column("legacy_col"));
}

#[test]
fn models_to_sql_to_dsl_and_back() {
    let schema = import(SchemaFormat::Models, MODELS, Some(Dialect::PostgreSQL)).unwrap();

    let sql = schemakit_schema::ddl::export(&schema, &Default::default());
    let from_sql = import(SchemaFormat::Sql, &sql, Some(Dialect::PostgreSQL)).unwrap();
    assert_eq!(
        from_sql.table_names().collect::<Vec<_>>(),
        schema.table_names().collect::<Vec<_>>()
    );
    for (a, b) in from_sql.tables.iter().zip(&schema.tables) {
        assert_eq!(a.primary_keys, b.primary_keys);
        assert_eq!(a.columns.len(), b.columns.len());
    }

    let text = dsl::generate(&schema);
    let from_dsl = import(SchemaFormat::Dsl, &text, Some(Dialect::PostgreSQL)).unwrap();
    let author = from_dsl.table("posts").unwrap().column("author_id").unwrap();
    assert_eq!(author.foreign_table.as_deref(), Some("users"));
    assert!(!author.is_nullable);
}

#[test]
fn source_emitter_is_deterministic_and_reparses() {
    let schema = import(SchemaFormat::Models, MODELS, Some(Dialect::SQLite)).unwrap();
    let first = declarative::generate(&schema);
    assert_eq!(first, declarative::generate(&schema));
    assert!(first.contains("type User struct {"));
    assert!(first.contains("type Post struct {"));

    let again = import(SchemaFormat::Models, &first, Some(Dialect::SQLite)).unwrap();
    for (a, b) in again.tables.iter().zip(&schema.tables) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.primary_keys, b.primary_keys);
        let names = |t: &schemakit_schema::TableInfo| {
            t.columns.iter().map(|c| c.name.clone()).collect::<Vec<_>>()
        };
        assert_eq!(names(a), names(b));
    }
    assert_eq!(again.table("users").unwrap().relations.len(), 1);
}
