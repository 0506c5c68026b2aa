mod memory;

pub use memory::MemoryAdapter;

use crate::{plan::WriteOperation, record::Record};
use thiserror::Error as ThisError;

///
/// ExecError
///
/// Storage-layer failures, propagated to the caller unchanged. The
/// planner never retries or reinterprets these; callers branch on
/// [`is_retryable`](Self::is_retryable).
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ExecError {
    #[error("storage conflict on {constraint}")]
    StorageConflict { constraint: String },

    #[error("table '{table}' does not exist in the store")]
    TableMissing { table: String },

    #[error("column '{column}' does not exist on table '{table}'")]
    ColumnMissing { table: String, column: String },

    #[error("write timed out at the adapter's deadline")]
    Timeout,
}

impl ExecError {
    /// Retryable-vs-fatal boundary distinction.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

///
/// WriteKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteKind {
    Inserted,
    Updated,
}

///
/// WriteOutcome
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WriteOutcome {
    pub kind: WriteKind,
    pub row: Record,
}

///
/// ExecutionAdapter
///
/// Owns atomicity and concurrency control: either the row is inserted
/// fresh or the row matched by the conflict target is updated, with no
/// intermediate state observable to other readers. A cancelled caller
/// must leave no partial write behind.
///

pub trait ExecutionAdapter {
    fn execute(&self, op: &WriteOperation) -> Result<WriteOutcome, ExecError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_timeouts_are_retryable() {
        assert!(ExecError::Timeout.is_retryable());
        assert!(
            !ExecError::StorageConflict {
                constraint: "UNIQUE (serial_key, weight)".to_string()
            }
            .is_retryable()
        );
        assert!(
            !ExecError::TableMissing {
                table: "bikes".to_string()
            }
            .is_retryable()
        );
    }
}
