use crate::{
    MAX_COLUMN_NAME_LEN, MAX_CONSTRAINT_COLUMNS, MAX_TABLE_NAME_LEN,
    catalog::Catalog,
    err,
    error::ErrorTree,
    node::Table,
};
use std::collections::BTreeMap;

/// Validate a freshly read catalog before it becomes a snapshot.
///
/// All failures are collected; the build fails with the full tree rather
/// than the first offence.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), ErrorTree> {
    let mut errs = ErrorTree::new();

    validate_table_naming(catalog, &mut errs);
    for table in catalog.tables() {
        validate_table(table, &mut errs);
    }

    errs.result()
}

fn validate_table_naming(catalog: &Catalog, errs: &mut ErrorTree) {
    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();

    for (position, table) in catalog.tables().iter().enumerate() {
        if table.name.is_empty() {
            err!(errs, "table at position {position} has an empty name");
        }
        if table.name.len() > MAX_TABLE_NAME_LEN {
            err!(errs, "table name '{}' exceeds {MAX_TABLE_NAME_LEN} bytes", table.name);
        }

        if let Some(prev) = seen.insert(table.name.as_str(), position) {
            err!(
                errs,
                "duplicate table name '{}' at positions {prev} and {position}",
                table.name
            );
        }
    }
}

fn validate_table(table: &Table, errs: &mut ErrorTree) {
    let name = &table.name;
    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();

    for (position, column) in table.columns.iter().enumerate() {
        if column.name.is_empty() {
            err!(errs, "table '{name}': column at position {position} has an empty name");
        }
        if column.name.len() > MAX_COLUMN_NAME_LEN {
            err!(
                errs,
                "table '{name}': column name '{}' exceeds {MAX_COLUMN_NAME_LEN} bytes",
                column.name
            );
        }

        if let Some(prev) = seen.insert(column.name.as_str(), position) {
            err!(
                errs,
                "table '{name}': duplicate column name '{}' at positions {prev} and {position}",
                column.name
            );
        }
    }

    for constraint in table.constraints() {
        if constraint.columns.is_empty() {
            err!(errs, "table '{name}': {} has no columns", constraint.kind);
        }
        if constraint.columns.len() > MAX_CONSTRAINT_COLUMNS {
            err!(
                errs,
                "table '{name}': {constraint} exceeds {MAX_CONSTRAINT_COLUMNS} columns"
            );
        }

        for column in &constraint.columns {
            if table.column(column).is_none() {
                err!(
                    errs,
                    "table '{name}': {constraint} references unknown column '{column}'"
                );
            }
        }

        let set = constraint.column_set();
        if set.len() != constraint.columns.len() {
            err!(errs, "table '{name}': {constraint} repeats a column");
        }
    }
}
