//! # schemakit
//!
//! Parse, introspect, merge and emit relational database schemas.
//!
//! ## Quick Start
//!
//! ```rust
//! use schemakit::prelude::*;
//!
//! # fn main() -> schemakit::Result<()> {
//! let schema = schemakit::import(
//!     SchemaFormat::Dsl,
//!     "Table users {\n  id integer [pk]\n  email varchar(255) [not null]\n}\n",
//!     Some(Dialect::PostgreSQL),
//! )?;
//!
//! let sql = schemakit::ddl::export(&schema, &Default::default());
//! assert!(sql.starts_with("CREATE TABLE \"users\""));
//!
//! let source = schemakit::declarative::generate(&schema);
//! assert!(source.contains("type User struct {"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Catalog Support
//!
//! | Database   | Driver   | Feature Flag    |
//! |------------|----------|-----------------|
//! | SQLite     | rusqlite | `rusqlite`      |
//! | PostgreSQL | postgres | `postgres-sync` |
//! | MySQL      | sqlx     | `mysql`         |
//!
//! Parsing and emitting need no feature; only live introspection does.

// =============================================================================
// Root-level exports
// =============================================================================

pub use schemakit_schema::{
    CatalogClient, CatalogRow, ColumnInfo, Introspector, MergePolicy, RelationInfo, RelationKind,
    Result, SchemaError, SchemaFormat, SchemaInfo, TableInfo, import, merge, merge_tables,
    merge_with, refresh,
};
pub use schemakit_types::{Dialect, ScalarType};

/// Identifier casing and inflection
pub use schemakit_types::ident;

pub use schemakit_schema::{ddl, declarative, dsl, introspect, lexer, model};

/// Commonly used types
pub mod prelude {
    pub use schemakit_schema::{
        ColumnInfo, MergePolicy, RelationInfo, RelationKind, SchemaFormat, SchemaInfo, TableInfo,
    };
    pub use schemakit_types::{Dialect, ScalarType};
}
