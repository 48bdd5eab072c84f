//! Declarative model sources
//!
//! A model source is a list of type definitions whose fields carry an
//! optional backtick annotation:
//!
//! ```text
//! type User struct {
//!     ID        int64     `db:"primaryKey"`
//!     Email     string    `db:"size:255;not null"`
//!     Nickname  *string
//!     CreatedAt time.Time
//!     Posts     []Post    `db:"foreignKey:AuthorID"`
//! }
//! ```
//!
//! The annotation is either a bare `key;key:value` list or a set of
//! `tag:"..."` pairs, in which case the first configured tag found is used.
//! [`parse`] turns such text into tables; [`generate`] writes it back.

mod codegen;
mod parser;

pub use codegen::{SourceOptions, generate, generate_with};
pub use parser::{ModelOptions, parse, parse_with};
