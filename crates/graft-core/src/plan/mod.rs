#[cfg(test)]
mod tests;

use crate::{
    index::{ConflictTarget, ConstraintIndex},
    obs::sink::{self, MetricsEvent},
    record::Record,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// PlanError
///
/// Request-validation failures. Every variant is synchronous, descriptive,
/// and column/constraint-identified; none is retryable and none leaves
/// partial state behind (no operation is produced).
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PlanError {
    #[error("table '{table}' has no upsert support (no primary key)")]
    IneligibleTable { table: String },

    #[error("no primary key or unique constraint on '{table}' matches where columns ({columns})")]
    NoMatchingConstraint { table: String, columns: String },

    #[error("value passed in the input for {column} does not match the where clause value")]
    ValueMismatch { column: String },
}

///
/// WriteOperation
///
/// A single atomic insert-or-update: insert the reconciled record; on
/// conflict on `conflict_columns`, update `update_columns` from the
/// record. Conflict-target columns identify the row and are never
/// updated. Atomicity is the execution adapter's contract.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct WriteOperation {
    pub table: String,
    pub conflict_columns: Vec<String>,
    pub record: Record,
    pub update_columns: Vec<String>,
}

///
/// UpsertPlanner
///
/// Stateless across calls: each `plan` invocation is a pure function of
/// the index snapshot, the `where` selector, and the `input` payload.
///

#[derive(Clone)]
pub struct UpsertPlanner {
    index: Arc<ConstraintIndex>,
}

impl UpsertPlanner {
    #[must_use]
    pub const fn new(index: Arc<ConstraintIndex>) -> Self {
        Self { index }
    }

    #[must_use]
    pub fn index(&self) -> &ConstraintIndex {
        &self.index
    }

    /// Plan one upsert invocation.
    ///
    /// Selects the conflict target from the `where` key set (primary key
    /// when empty), reconciles `where` into `input`, and emits the write
    /// operation. Execution failures are not this layer's concern.
    pub fn plan(
        &self,
        table: &str,
        where_: &Record,
        input: &Record,
    ) -> Result<WriteOperation, PlanError> {
        let result = self.plan_inner(table, where_, input);

        match &result {
            Ok(op) => sink::record(MetricsEvent::PlanOk {
                table: op.table.clone(),
                primary_key_target: self
                    .index
                    .primary_key(table)
                    .is_some_and(|pk| pk.columns == op.conflict_columns),
            }),
            Err(_) => sink::record(MetricsEvent::PlanFailed {
                table: table.to_string(),
            }),
        }

        result
    }

    fn plan_inner(
        &self,
        table: &str,
        where_: &Record,
        input: &Record,
    ) -> Result<WriteOperation, PlanError> {
        let target = self.select_target(table, where_)?;
        let record = reconcile(where_, input)?;

        let update_columns = record
            .keys()
            .filter(|column| !target.contains_column(column))
            .cloned()
            .collect();

        Ok(WriteOperation {
            table: table.to_string(),
            conflict_columns: target.columns.clone(),
            record,
            update_columns,
        })
    }

    fn select_target(&self, table: &str, where_: &Record) -> Result<&ConflictTarget, PlanError> {
        if !self.index.is_eligible(table) {
            return Err(PlanError::IneligibleTable {
                table: table.to_string(),
            });
        }

        let keys = where_.column_set();
        if keys.is_empty() {
            // empty selector defaults to the primary key
            return self.index.primary_key(table).ok_or_else(|| {
                PlanError::IneligibleTable {
                    table: table.to_string(),
                }
            });
        }

        // exact-set match only; a subset of a constraint is a caller error
        self.index.match_exact(table, &keys).ok_or_else(|| {
            PlanError::NoMatchingConstraint {
                table: table.to_string(),
                columns: keys.into_iter().collect::<Vec<_>>().join(", "),
            }
        })
    }
}

/// Merge a `where` selector into an `input` payload.
///
/// A column present in both must carry equal values (domain equality, so
/// numeric 0.0 equals 0.0 and is never treated as absent); a column
/// present only in `where` is copied down so the write never drops a
/// selector value.
fn reconcile(where_: &Record, input: &Record) -> Result<Record, PlanError> {
    let mut record = input.clone();

    for (column, value) in where_.iter() {
        match record.get(column) {
            Some(existing) if !existing.domain_eq(value) => {
                return Err(PlanError::ValueMismatch {
                    column: column.clone(),
                });
            }
            Some(_) => {}
            None => {
                record.insert(column.clone(), value.clone());
            }
        }
    }

    Ok(record)
}
