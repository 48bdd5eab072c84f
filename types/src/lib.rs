//! Shared vocabulary for schemakit
//!
//! This crate holds the small, dependency-light pieces every other schemakit
//! crate agrees on:
//!
//! - [`Dialect`] - the closed set of database families (SQLite, PostgreSQL, MySQL)
//!   together with their identifier quoting rules
//! - [`ScalarType`] - the language-level scalar vocabulary and its per-dialect
//!   SQL type tables
//! - [`ident`] - identifier casing, singular/plural forms
//!
//! # Features
//!
//! - `serde` - derive serde support for [`Dialect`]

mod dialect;
pub mod ident;
mod scalar;

pub use dialect::{Dialect, DialectParseError};
pub use scalar::ScalarType;

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::Dialect;
    pub use crate::ScalarType;
    pub use crate::ident::{pluralize, singularize, to_pascal_name, to_snake_name};
}
