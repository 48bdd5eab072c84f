//! `rusqlite` catalog client

use rusqlite::types::ValueRef;

use super::{CatalogClient, CatalogRow};
use crate::error::{Result, SchemaError};

impl CatalogClient for rusqlite::Connection {
    fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<CatalogRow>> {
        let mut stmt = self.prepare(sql).map_err(SchemaError::catalog)?;
        let width = stmt.column_count();

        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(text))
                    .collect::<rusqlite::Result<Vec<_>>>()
                    .map(CatalogRow)
            })
            .map_err(SchemaError::catalog)?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(SchemaError::catalog)
    }
}

fn text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}
