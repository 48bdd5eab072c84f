//! schemakit CLI - convert, check and introspect database schemas
//!
//! The binary reads a `schemakit.toml` configuration for commands that talk
//! to a database. File conversions work without one.
//!
//! # Quick Start
//!
//! 1. Install the CLI: `cargo install schemakit-cli`
//! 2. Run `schemakit init` to create a `schemakit.toml`
//! 3. Run `schemakit introspect` to capture the live schema
//!
//! # Configuration
//!
//! ```toml
//! dialect = "sqlite"
//! out = "./schemakit"
//! package = "models"
//!
//! [dbCredentials]
//! url = "./dev.db"
//! ```
//!
//! For PostgreSQL, with the URL taken from the environment:
//!
//! ```toml
//! dialect = "postgres"
//!
//! [dbCredentials]
//! url = { env = "DATABASE_URL" }
//! ```
//!
//! # Commands
//!
//! - `schemakit init` - Create a new schemakit.toml configuration file
//! - `schemakit convert <file> --to <format>` - Convert between sql, dsl, models and json
//! - `schemakit check <file>` - Parse a schema file and report its tables
//! - `schemakit introspect` - Read the live database schema (requires database connection)

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod output;

pub use config::{Config, Credentials, Dialect, Error as ConfigError};
pub use error::CliError;
