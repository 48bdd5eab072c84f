//! Error types for the CLI

use schemakit_schema::SchemaError;
use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Schema could not be read, introspected or written
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),

    /// Could not open the database
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
