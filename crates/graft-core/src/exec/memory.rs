use crate::{
    exec::{ExecError, ExecutionAdapter, WriteKind, WriteOutcome},
    plan::WriteOperation,
    record::Record,
    value::Value,
};
use graft_schema::{catalog::Catalog, node::Table};
use std::{collections::BTreeMap, sync::Mutex};

///
/// MemoryAdapter
///
/// In-memory execution adapter implementing the atomic insert-or-update
/// primitive over catalog-described tables, including enforcement of the
/// unique constraints that are not the conflict target. The whole write
/// happens under one lock, so no intermediate state is observable and an
/// abandoned call leaves nothing behind.
///

pub struct MemoryAdapter {
    tables: Mutex<BTreeMap<String, MemoryTable>>,
}

struct MemoryTable {
    meta: Table,
    rows: Vec<Record>,
    next_id: u64,
}

impl MemoryAdapter {
    /// Create an empty store with one table per catalog entry.
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        let tables = catalog
            .tables()
            .iter()
            .map(|table| {
                (
                    table.name.clone(),
                    MemoryTable {
                        meta: table.clone(),
                        rows: Vec::new(),
                        next_id: 1,
                    },
                )
            })
            .collect();

        Self {
            tables: Mutex::new(tables),
        }
    }

    /// Snapshot of a table's rows, for assertions.
    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.tables
            .lock()
            .expect("memory store lock poisoned")
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }
}

impl ExecutionAdapter for MemoryAdapter {
    fn execute(&self, op: &WriteOperation) -> Result<WriteOutcome, ExecError> {
        let mut tables = self.tables.lock().expect("memory store lock poisoned");

        let table = tables.get_mut(&op.table).ok_or_else(|| ExecError::TableMissing {
            table: op.table.clone(),
        })?;

        for column in op.record.keys() {
            if table.meta.column(column).is_none() {
                return Err(ExecError::ColumnMissing {
                    table: op.table.clone(),
                    column: column.clone(),
                });
            }
        }

        match find_conflicting_row(&table.rows, &op.record, &op.conflict_columns) {
            Some(position) => update_row(table, op, position),
            None => insert_row(table, op),
        }
    }
}

/// Index of the row matched by the conflict target, if any.
///
/// NULL (or absent) conflict values never match an existing row; that is
/// the backing store's semantics for unique indexes over nullable columns.
fn find_conflicting_row(rows: &[Record], record: &Record, columns: &[String]) -> Option<usize> {
    rows.iter().position(|row| row_matches(row, record, columns))
}

fn row_matches(row: &Record, values: &Record, columns: &[String]) -> bool {
    columns.iter().all(|column| {
        match (row.get(column), values.get(column)) {
            (Some(have), Some(want)) if !have.is_null() && !want.is_null() => {
                have.domain_eq(want)
            }
            _ => false,
        }
    })
}

fn update_row(
    table: &mut MemoryTable,
    op: &WriteOperation,
    position: usize,
) -> Result<WriteOutcome, ExecError> {
    let mut updated = table.rows[position].clone();
    for column in &op.update_columns {
        if let Some(value) = op.record.get(column) {
            updated.insert(column.clone(), value.clone());
        }
    }

    // the update may collide with a unique constraint on another row
    check_unique_constraints(table, &updated, Some(position), &op.conflict_columns)?;

    table.rows[position] = updated.clone();

    Ok(WriteOutcome {
        kind: WriteKind::Updated,
        row: updated,
    })
}

fn insert_row(table: &mut MemoryTable, op: &WriteOperation) -> Result<WriteOutcome, ExecError> {
    let mut row = op.record.clone();

    // serial-style fill for a single-column primary key the caller omitted
    if let Some(pk) = &table.meta.primary_key
        && let [column] = pk.columns.as_slice()
        && !row.contains_key(column)
    {
        row.insert(column.clone(), Value::Uint(table.next_id));
        table.next_id += 1;
    }

    check_unique_constraints(table, &row, None, &op.conflict_columns)?;

    table.rows.push(row.clone());

    Ok(WriteOutcome {
        kind: WriteKind::Inserted,
        row,
    })
}

/// Reject the candidate row if any unique constraint other than the
/// conflict target collides with a different stored row.
fn check_unique_constraints(
    table: &MemoryTable,
    candidate: &Record,
    skip_position: Option<usize>,
    conflict_columns: &[String],
) -> Result<(), ExecError> {
    for constraint in table.meta.constraints() {
        if constraint.columns == conflict_columns {
            continue;
        }

        for (position, row) in table.rows.iter().enumerate() {
            if skip_position == Some(position) {
                continue;
            }

            if row_matches(row, candidate, &constraint.columns) {
                return Err(ExecError::StorageConflict {
                    constraint: constraint.to_string(),
                });
            }
        }
    }

    Ok(())
}
