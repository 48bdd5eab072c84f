//! Schema engine for schemakit
//!
//! Every producer in this crate returns the canonical model in [`model`]:
//!
//! - [`introspect`] reads a live catalog (SQLite, PostgreSQL, MySQL)
//! - [`ddl::parse`] reads `CREATE TABLE` scripts
//! - [`dsl::parse`] reads table notation
//! - [`declarative::parse`] reads declarative model source
//! - [`merge`] combines a model table with its catalog counterpart
//!
//! and every emitter consumes it: [`ddl::generate`], [`dsl::generate`] and
//! [`declarative::generate`]. [`import`] is the single front door for
//! schema files.
//!
//! ```
//! use schemakit_schema::{Dialect, ddl};
//!
//! let schema = ddl::parse(
//!     "CREATE TABLE users (id INTEGER PRIMARY KEY, email VARCHAR(255) NOT NULL);",
//!     None,
//! );
//! let users = schema.table("users").unwrap();
//! assert_eq!(users.primary_keys, ["id"]);
//!
//! let sql = ddl::generate(users, Dialect::MySQL);
//! assert!(sql.contains("`email` VARCHAR(255) NOT NULL"));
//! ```

mod error;
mod trace;

pub mod ddl;
pub mod declarative;
pub mod dsl;
pub mod import;
pub mod introspect;
pub mod lexer;
pub mod merge;
pub mod model;

pub use error::{Result, SchemaError};
pub use import::{SchemaFormat, import};
pub use introspect::{CatalogClient, CatalogRow, Introspector, refresh};
pub use merge::{MergePolicy, merge, merge_tables, merge_with};
pub use model::{ColumnInfo, RelationInfo, RelationKind, SchemaInfo, TableInfo};
pub use schemakit_types::{Dialect, ScalarType};
