//! Canonical schema model
//!
//! Every producer (catalog introspection, the DDL/DSL/declarative parsers,
//! the merge engine) returns these types as a complete snapshot, and every
//! emitter consumes them. Nothing in the engine patches a published snapshot
//! in place; a refresh builds a new [`SchemaInfo`].

use schemakit_types::Dialect;
use serde::{Deserialize, Serialize};

/// A whole schema: ordered tables plus the dialect they were read in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub tables: Vec<TableInfo>,
    #[serde(alias = "dialect", default)]
    pub driver: Dialect,
}

impl SchemaInfo {
    pub fn new(driver: Dialect, tables: Vec<TableInfo>) -> Self {
        Self { tables, driver }
    }

    /// Case-insensitive table lookup
    pub fn table(&self, name: &str) -> Option<&TableInfo> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Whether `name` names a table in this schema (case-insensitive)
    pub fn is_valid_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// One table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<RelationInfo>,
    #[serde(default)]
    pub primary_keys: Vec<String>,
    /// Advisory row count, filled by live introspection only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
}

impl TableInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Case-insensitive column lookup
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut ColumnInfo> {
        self.columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Rebuild `primary_keys` from the per-column flags, in declaration order.
    pub fn rebuild_primary_keys(&mut self) {
        self.primary_keys = self
            .columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.clone())
            .collect();
    }

    /// Apply an explicit, ordered key declaration.
    ///
    /// The listed columns become the whole key in the given order: they are
    /// flagged primary and not-nullable, and any other column loses its
    /// primary flag. Names that match no column are ignored, and a list
    /// that matches nothing leaves the existing key alone.
    pub fn set_primary_key<S: AsRef<str>>(&mut self, names: &[S]) {
        if !names.iter().any(|n| self.column(n.as_ref()).is_some()) {
            return;
        }
        for col in &mut self.columns {
            col.is_primary_key = false;
        }
        let mut keys = Vec::with_capacity(names.len());
        for name in names {
            if let Some(col) = self.column_mut(name.as_ref()) {
                col.set_primary_key();
                if !keys.contains(&col.name) {
                    keys.push(col.name.clone());
                }
            }
        }
        self.primary_keys = keys;
    }

    pub fn relation(&self, name: &str) -> Option<&RelationInfo> {
        self.relations.iter().find(|r| r.name == name)
    }
}

/// One column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Raw dialect-native type string, unnormalized (`VARCHAR(255)` stays as written)
    #[serde(rename = "type", default)]
    pub sql_type: String,
    /// Language-level type hint from a declarative source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default = "nullable_by_default")]
    pub is_nullable: bool,
    #[serde(default)]
    pub is_foreign_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    /// Raw default literal, quotes already stripped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

fn nullable_by_default() -> bool {
    true
}

impl ColumnInfo {
    /// A nullable, non-key column
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            source_type: None,
            is_primary_key: false,
            is_nullable: true,
            is_foreign_key: false,
            foreign_table: None,
            foreign_key: None,
            default: None,
        }
    }

    /// Flag as primary key, which implies not-nullable
    pub fn set_primary_key(&mut self) {
        self.is_primary_key = true;
        self.is_nullable = false;
    }

    /// Mark as referencing `table(column)`.
    ///
    /// An empty table name leaves the column untouched so that
    /// `is_foreign_key` always implies a target table.
    pub fn set_reference(&mut self, table: &str, column: Option<&str>) {
        let table = table.trim();
        if table.is_empty() {
            return;
        }
        self.is_foreign_key = true;
        self.foreign_table = Some(table.to_string());
        self.foreign_key = column
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
    }

    pub fn with_primary_key(mut self) -> Self {
        self.set_primary_key();
        self
    }

    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn references(mut self, table: &str, column: &str) -> Self {
        self.set_reference(table, Some(column));
        self
    }
}

/// Relation cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// The other side holds the key (`has_one`)
    #[serde(rename = "has_one")]
    OwnedToOne,
    /// This side holds the key (`belongs_to`)
    #[serde(rename = "belongs_to")]
    OwningToOne,
    #[serde(rename = "has_many")]
    ToMany,
    /// Many-to-many through a join table
    #[serde(rename = "many_to_many")]
    ToManyThrough,
}

impl RelationKind {
    pub const fn is_to_many(self) -> bool {
        matches!(self, RelationKind::ToMany | RelationKind::ToManyThrough)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            RelationKind::OwnedToOne => "has_one",
            RelationKind::OwningToOne => "belongs_to",
            RelationKind::ToMany => "has_many",
            RelationKind::ToManyThrough => "many_to_many",
        }
    }
}

/// A named association between two tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RelationKind,
    /// Target table
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_key: Option<String>,
    /// Present iff `kind` is [`RelationKind::ToManyThrough`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_table: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> TableInfo {
        TableInfo {
            name: "users".into(),
            columns: vec![
                ColumnInfo::new("id", "INTEGER").with_primary_key(),
                ColumnInfo::new("email", "TEXT").not_null(),
                ColumnInfo::new("org_id", "INTEGER").references("orgs", "id"),
            ],
            ..TableInfo::default()
        }
    }

    #[test]
    fn lookups_are_case_insensitive() {
        let schema = SchemaInfo::new(Dialect::SQLite, vec![users()]);
        assert!(schema.is_valid_table("USERS"));
        assert!(!schema.is_valid_table("posts"));
        assert!(schema.table("Users").unwrap().has_column("EMAIL"));
    }

    #[test]
    fn explicit_key_order_wins() {
        let mut t = users();
        t.set_primary_key(&["email", "id"]);
        assert_eq!(t.primary_keys, ["email", "id"]);
        assert!(!t.column("email").unwrap().is_nullable);

        t.set_primary_key(&["org_id"]);
        assert_eq!(t.primary_keys, ["org_id"]);
        assert!(!t.column("id").unwrap().is_primary_key);
    }

    #[test]
    fn unknown_key_columns_leave_the_key_alone() {
        let mut t = users();
        t.set_primary_key(&["id"]);
        t.set_primary_key(&["missing"]);
        assert_eq!(t.primary_keys, ["id"]);
        assert!(t.column("id").unwrap().is_primary_key);
    }

    #[test]
    fn rebuild_follows_declaration_order() {
        let mut t = users();
        t.columns[2].set_primary_key();
        t.rebuild_primary_keys();
        assert_eq!(t.primary_keys, ["id", "org_id"]);
    }

    #[test]
    fn empty_reference_target_is_ignored() {
        let mut c = ColumnInfo::new("x", "INTEGER");
        c.set_reference("  ", Some("id"));
        assert!(!c.is_foreign_key);
        assert!(c.foreign_table.is_none());
    }

    #[test]
    fn json_shape() {
        let json = serde_json::to_value(users()).unwrap();
        assert_eq!(json["columns"][0]["type"], "INTEGER");
        assert_eq!(json["columns"][0]["is_primary_key"], true);
        assert_eq!(json["columns"][2]["foreign_table"], "orgs");

        let rel = RelationInfo {
            name: "Posts".into(),
            kind: RelationKind::ToMany,
            table: "posts".into(),
            foreign_key: Some("author_id".into()),
            reference_key: None,
            join_table: None,
        };
        assert_eq!(serde_json::to_value(&rel).unwrap()["type"], "has_many");
    }
}
