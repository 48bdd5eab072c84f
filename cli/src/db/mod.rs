//! Database connections for catalog introspection
//!
//! Every connection is opened for reading only. Which drivers exist depends
//! on the features the binary was built with.

use schemakit_schema::{
    CatalogClient, Dialect, Introspector, MergePolicy, SchemaInfo, TableInfo, refresh,
};

use crate::config::Credentials;
use crate::error::CliError;

/// Open a catalog connection for the configured database
pub fn connect(credentials: &Credentials) -> Result<Box<dyn CatalogClient>, CliError> {
    match credentials {
        Credentials::Sqlite { path } => open_sqlite(path),
        Credentials::Postgres(creds) => open_postgres(&creds.connection_url()),
        Credentials::Mysql(creds) => open_mysql(&creds.connection_url()),
    }
}

/// Read the live schema, merged with `models` when given.
pub fn introspect(
    credentials: &Credentials,
    dialect: Dialect,
    models: Option<&[TableInfo]>,
    policy: MergePolicy,
) -> Result<SchemaInfo, CliError> {
    let mut client = connect(credentials)?;
    match models {
        Some(tables) => Ok(refresh(&mut *client, dialect, tables, policy)),
        None => Ok(Introspector::with_dialect(&mut *client, dialect).introspect()?),
    }
}

#[cfg(feature = "rusqlite")]
fn open_sqlite(path: &str) -> Result<Box<dyn CatalogClient>, CliError> {
    use rusqlite::OpenFlags;

    let path = path
        .strip_prefix("sqlite://")
        .or_else(|| path.strip_prefix("file:"))
        .unwrap_or(path);
    let conn = rusqlite::Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| {
        CliError::ConnectionError(format!("failed to open SQLite database '{path}': {e}"))
    })?;
    Ok(Box::new(conn))
}

#[cfg(not(feature = "rusqlite"))]
fn open_sqlite(_path: &str) -> Result<Box<dyn CatalogClient>, CliError> {
    Err(missing_driver("SQLite", "rusqlite"))
}

#[cfg(feature = "postgres-sync")]
fn open_postgres(url: &str) -> Result<Box<dyn CatalogClient>, CliError> {
    let client = postgres::Client::connect(url, postgres::NoTls)
        .map_err(|e| CliError::ConnectionError(format!("failed to connect to PostgreSQL: {e}")))?;
    Ok(Box::new(client))
}

#[cfg(not(feature = "postgres-sync"))]
fn open_postgres(_url: &str) -> Result<Box<dyn CatalogClient>, CliError> {
    Err(missing_driver("PostgreSQL", "postgres-sync"))
}

#[cfg(feature = "mysql")]
fn open_mysql(url: &str) -> Result<Box<dyn CatalogClient>, CliError> {
    let client = schemakit_schema::introspect::MySqlCatalog::connect(url)
        .map_err(|e| CliError::ConnectionError(e.to_string()))?;
    Ok(Box::new(client))
}

#[cfg(not(feature = "mysql"))]
fn open_mysql(_url: &str) -> Result<Box<dyn CatalogClient>, CliError> {
    Err(missing_driver("MySQL", "mysql"))
}

#[cfg(any(
    not(feature = "rusqlite"),
    not(feature = "postgres-sync"),
    not(feature = "mysql")
))]
fn missing_driver(database: &str, feature: &str) -> CliError {
    CliError::ConnectionError(format!(
        "{database} support is not compiled in; rebuild with `--features {feature}`"
    ))
}
