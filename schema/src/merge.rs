//! Model/catalog merge
//!
//! Combines a table discovered from declarative model source with the same
//! table discovered from the catalog (or from DDL). The model side encodes
//! relation semantics the catalog cannot infer, so it owns the structure;
//! the catalog fills in what the model left blank.

use crate::model::TableInfo;

/// What happens to columns the catalog knows and the model does not
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// The model is authoritative for columns; catalog-only columns are dropped.
    #[default]
    ModelColumns,
    /// Catalog-only columns are appended after the model's columns.
    Union,
}

/// Merge with [`MergePolicy::ModelColumns`].
pub fn merge(model: &TableInfo, catalog: &TableInfo) -> TableInfo {
    merge_with(model, catalog, MergePolicy::default())
}

/// Merge one table known to both sides.
///
/// Relations and the primary-key list come from the model. Per model column,
/// an empty type is backfilled from the catalog column of the same name, and
/// a catalog foreign key is adopted when the model did not mark one. The
/// advisory row count comes from the catalog.
pub fn merge_with(model: &TableInfo, catalog: &TableInfo, policy: MergePolicy) -> TableInfo {
    let mut merged = model.clone();

    for col in &mut merged.columns {
        let Some(found) = catalog.column(&col.name) else {
            continue;
        };
        if col.sql_type.trim().is_empty() {
            col.sql_type.clone_from(&found.sql_type);
        }
        if !col.is_foreign_key && found.is_foreign_key {
            col.is_foreign_key = true;
            col.foreign_table.clone_from(&found.foreign_table);
            col.foreign_key.clone_from(&found.foreign_key);
        }
    }

    if policy == MergePolicy::Union {
        let extra: Vec<_> = catalog
            .columns
            .iter()
            .filter(|c| !model.has_column(&c.name))
            .cloned()
            .collect();
        merged.columns.extend(extra);
    }

    merged.row_count = catalog.row_count.or(model.row_count);
    merged
}

/// Merge two table sets.
///
/// Catalog order comes first, each table merged with its model counterpart
/// when one exists; model-only tables follow in model order. Neither side
/// missing a table is an error.
pub fn merge_tables(
    model: &[TableInfo],
    catalog: &[TableInfo],
    policy: MergePolicy,
) -> Vec<TableInfo> {
    let find = |tables: &'_ [TableInfo], name: &str| {
        tables
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(name))
    };

    let mut out: Vec<TableInfo> = catalog
        .iter()
        .map(|c| match find(model, &c.name) {
            Some(i) => merge_with(&model[i], c, policy),
            None => c.clone(),
        })
        .collect();

    out.extend(
        model
            .iter()
            .filter(|m| find(catalog, &m.name).is_none())
            .cloned(),
    );
    out
}
