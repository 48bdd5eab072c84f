//! `postgres` (sync) catalog client

use postgres::types::ToSql;

use super::{CatalogClient, CatalogRow};
use crate::error::{Result, SchemaError};

impl CatalogClient for postgres::Client {
    fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<CatalogRow>> {
        let params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

        let rows = postgres::Client::query(self, sql, &params).map_err(SchemaError::catalog)?;

        rows.iter()
            .map(|row| {
                (0..row.len())
                    .map(|i| row.try_get::<_, Option<String>>(i))
                    .collect::<Result<Vec<_>, _>>()
                    .map(CatalogRow)
                    .map_err(SchemaError::catalog)
            })
            .collect()
    }
}
