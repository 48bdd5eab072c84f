//! Declarative model source generation
//!
//! Output is deterministic: the same schema always renders byte-identical
//! text. Fields are column-aligned within each definition.

use std::collections::BTreeSet;
use std::fmt::Write;

use schemakit_types::{Dialect, ScalarType};
use schemakit_types::ident::{singularize, to_pascal_name, to_snake_name};

use crate::model::{ColumnInfo, RelationInfo, RelationKind, SchemaInfo, TableInfo};
use crate::trace::schema_warn;

/// Options for source generation
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Package line of the generated file
    pub package: String,
    /// Annotation tag carrying the model keys
    pub tag: String,
    /// Also emit a `json:"..."` tag per field
    pub json_tags: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            package: "models".to_string(),
            tag: "db".to_string(),
            json_tags: true,
        }
    }
}

/// Generate model source with default options.
pub fn generate(schema: &SchemaInfo) -> String {
    generate_with(schema, &SourceOptions::default())
}

/// Generate model source: one definition per table, one field per column,
/// one field per relation.
pub fn generate_with(schema: &SchemaInfo, options: &SourceOptions) -> String {
    let mut out = format!("package {}\n", options.package);

    let imports: BTreeSet<&str> = schema
        .tables
        .iter()
        .flat_map(|t| &t.columns)
        .filter_map(|c| ScalarType::from_sql_type(&c.sql_type).source_import())
        .collect();
    match imports.len() {
        0 => {}
        1 => {
            let _ = writeln!(out, "\nimport \"{}\"", imports.iter().next().unwrap_or(&""));
        }
        _ => {
            out.push_str("\nimport (\n");
            for import in &imports {
                let _ = writeln!(out, "\t\"{import}\"");
            }
            out.push_str(")\n");
        }
    }

    for table in &schema.tables {
        out.push('\n');
        out.push_str(&definition(table, schema.driver, options));
    }
    out
}

/// Name of the definition generated for `table`
pub fn type_name(table: &str) -> String {
    to_pascal_name(&singularize(table))
}

struct Field {
    name: String,
    ty: String,
    tag: String,
}

fn definition(table: &TableInfo, dialect: Dialect, options: &SourceOptions) -> String {
    let fields: Vec<Field> = table
        .columns
        .iter()
        .map(|c| column_field(c, dialect, options))
        .chain(table.relations.iter().map(|r| relation_field(table, r, options)))
        .collect();

    let name_width = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let type_width = fields.iter().map(|f| f.ty.len()).max().unwrap_or(0);

    let mut out = format!("type {} struct {{\n", type_name(&table.name));
    for f in &fields {
        if f.tag.is_empty() {
            let _ = writeln!(out, "\t{:<name_width$} {}", f.name, f.ty);
        } else {
            let _ = writeln!(
                out,
                "\t{:<name_width$} {:<type_width$} `{}`",
                f.name, f.ty, f.tag
            );
        }
    }
    out.push_str("}\n");
    out
}

fn column_field(col: &ColumnInfo, dialect: Dialect, options: &SourceOptions) -> Field {
    let scalar = ScalarType::from_sql_type(&col.sql_type);
    let ty = scalar.source_type_for(col.is_nullable && !col.is_primary_key);

    let mut keys = Vec::new();
    if col.is_primary_key {
        keys.push("primaryKey".to_string());
    }
    keys.push(format!("column:{}", col.name));
    let size = size_of(&col.sql_type).filter(|_| scalar == ScalarType::Text);
    if let Some(size) = size {
        keys.push(format!("size:{size}"));
    } else if !col.sql_type.is_empty()
        && !col.sql_type.eq_ignore_ascii_case(scalar.sql_type(dialect))
    {
        // not recoverable from the field type alone
        keys.push(format!("type:{}", col.sql_type));
    }
    if !col.is_nullable && !col.is_primary_key {
        keys.push("not null".to_string());
    }
    if let Some(default) = &col.default {
        match default_value(default) {
            Some(value) => keys.push(format!("default:{value}")),
            None => {
                schema_warn!(column = col.name; "default cannot be written to an annotation, dropped")
            }
        }
    }

    Field {
        name: to_pascal_name(&col.name),
        ty,
        tag: tags(&keys, &col.name, false, options),
    }
}

fn relation_field(table: &TableInfo, rel: &RelationInfo, options: &SourceOptions) -> Field {
    let target = type_name(&rel.table);
    let ty = if rel.kind.is_to_many() {
        format!("[]{target}")
    } else {
        format!("*{target}")
    };

    let mut keys = Vec::new();
    match rel.kind {
        RelationKind::ToManyThrough => {
            let join = rel
                .join_table
                .clone()
                .unwrap_or_else(|| format!("{}_{}", table.name, rel.table));
            keys.push(format!("many2many:{join}"));
        }
        _ => {
            if let Some(fk) = &rel.foreign_key {
                keys.push(format!("foreignKey:{}", to_pascal_name(fk)));
            }
        }
    }
    if let Some(reference) = &rel.reference_key {
        keys.push(format!("references:{}", to_pascal_name(reference)));
    }

    Field {
        name: to_pascal_name(&rel.name),
        ty,
        tag: tags(&keys, &to_snake_name(&rel.name), true, options),
    }
}

/// A default as it appears after `default:`. Values holding a key separator
/// or a quote are wrapped in single quotes, with inner ones doubled. `None`
/// when the value cannot sit in a backtick annotation at all.
fn default_value(default: &str) -> Option<String> {
    if default.contains(['`', '\n', '\r']) {
        return None;
    }
    let bare = !default.is_empty()
        && default.trim() == default
        && !default.contains([';', '\'', '"']);
    if bare {
        Some(default.to_string())
    } else {
        Some(format!("'{}'", default.replace('\'', "''")))
    }
}

fn tags(keys: &[String], json_name: &str, omitempty: bool, options: &SourceOptions) -> String {
    let mut parts = Vec::new();
    if !keys.is_empty() {
        let list = keys.join(";").replace('\\', "\\\\").replace('"', "\\\"");
        parts.push(format!("{}:\"{list}\"", options.tag));
    }
    if options.json_tags {
        let suffix = if omitempty { ",omitempty" } else { "" };
        parts.push(format!("json:\"{json_name}{suffix}\""));
    }
    parts.join(" ")
}

/// Single size parameter of a type such as `VARCHAR(255)`
fn size_of(sql_type: &str) -> Option<&str> {
    let open = sql_type.find('(')?;
    let close = sql_type[open..].find(')')? + open;
    let size = sql_type[open + 1..close].trim();
    (!size.is_empty() && size.chars().all(|c| c.is_ascii_digit())).then_some(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarative::parse;

    fn schema() -> SchemaInfo {
        let mut users = TableInfo::new("users");
        users.columns = vec![
            ColumnInfo::new("id", "INTEGER").with_primary_key(),
            ColumnInfo::new("email", "VARCHAR(255)").not_null(),
            ColumnInfo::new("bio", "TEXT"),
            ColumnInfo::new("created_at", "DATETIME").with_default("CURRENT_TIMESTAMP"),
        ];
        users.relations = vec![RelationInfo {
            name: "Posts".into(),
            kind: RelationKind::ToMany,
            table: "posts".into(),
            foreign_key: Some("author_id".into()),
            reference_key: None,
            join_table: None,
        }];
        users.rebuild_primary_keys();
        SchemaInfo::new(Dialect::SQLite, vec![users])
    }

    #[test]
    fn renders_definition() {
        let src = generate(&schema());
        let expected = "package models

import \"time\"

type User struct {
\tID        int64      `db:\"primaryKey;column:id\" json:\"id\"`
\tEmail     string     `db:\"column:email;size:255;not null\" json:\"email\"`
\tBio       *string    `db:\"column:bio\" json:\"bio\"`
\tCreatedAt *time.Time `db:\"column:created_at;default:CURRENT_TIMESTAMP\" json:\"created_at\"`
\tPosts     []Post     `db:\"foreignKey:AuthorID\" json:\"posts,omitempty\"`
}
";
        assert_eq!(src, expected);
    }

    #[test]
    fn output_is_deterministic() {
        assert_eq!(generate(&schema()), generate(&schema()));
    }

    #[test]
    fn many_to_many_defaults_join_table() {
        let mut s = schema();
        s.tables[0].relations[0].kind = RelationKind::ToManyThrough;
        let src = generate(&s);
        assert!(src.contains("`db:\"many2many:users_posts\" json:\"posts,omitempty\"`"));
    }

    #[test]
    fn foreign_type_spelling_is_kept() {
        let mut s = schema();
        s.tables[0].columns.push(ColumnInfo::new("token", "uuid"));
        let src = generate(&s);
        assert!(src.contains("`db:\"column:token;type:uuid\" json:\"token\"`"));
    }

    #[test]
    fn output_parses_back() {
        let tables = parse(&generate(&schema()), Dialect::SQLite).unwrap();
        assert_eq!(tables.len(), 1);
        let users = &tables[0];
        assert_eq!(users.name, "users");
        assert_eq!(users.primary_keys, ["id"]);

        let original = schema();
        for (got, want) in users.columns.iter().zip(&original.tables[0].columns) {
            assert_eq!(got.name, want.name);
            assert_eq!(got.sql_type, want.sql_type);
            assert_eq!(got.is_nullable, want.is_nullable);
            assert_eq!(got.default, want.default);
        }
        let posts = users.relation("Posts").unwrap();
        assert_eq!(posts.kind, RelationKind::ToMany);
        assert_eq!(posts.foreign_key.as_deref(), Some("author_id"));
    }

    #[test]
    fn awkward_defaults_survive_a_round_trip() {
        let mut s = schema();
        let defaults = ["x;y", "say \"hi\"", "it's", "C:\\temp", " padded", ""];
        for (n, default) in defaults.iter().enumerate() {
            s.tables[0]
                .columns
                .push(ColumnInfo::new(format!("note_{n}"), "TEXT").with_default(*default));
        }
        let src = generate(&s);
        assert!(src.contains(r#"default:'x;y'"#), "{src}");
        assert!(src.contains(r#"default:'say \"hi\"'"#), "{src}");

        let tables = parse(&src, Dialect::SQLite).unwrap();
        let users = &tables[0];
        for (n, default) in defaults.iter().enumerate() {
            let col = users.column(&format!("note_{n}")).unwrap();
            assert_eq!(col.default.as_deref(), Some(*default), "note_{n}");
            assert_eq!(col.sql_type, "TEXT");
        }
    }

    #[test]
    fn unrepresentable_default_is_dropped() {
        let mut s = schema();
        s.tables[0]
            .columns
            .push(ColumnInfo::new("tick", "TEXT").with_default("a`b"));
        let src = generate(&s);
        assert!(src.contains("`db:\"column:tick\" json:\"tick\"`"), "{src}");
    }

    #[test]
    fn size_parameter() {
        assert_eq!(size_of("VARCHAR(255)"), Some("255"));
        assert_eq!(size_of("NUMERIC(10,2)"), None);
        assert_eq!(size_of("TEXT"), None);
    }
}
