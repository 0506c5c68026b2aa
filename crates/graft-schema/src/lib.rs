//! Catalog metadata for Graft: tables, columns, constraints, and the
//! reader boundary that loads them from a backing store.

pub mod catalog;
pub mod error;
pub mod node;
pub mod validate;

/// Maximum length for table identifiers.
pub const MAX_TABLE_NAME_LEN: usize = 64;

/// Maximum length for column identifiers.
pub const MAX_COLUMN_NAME_LEN: usize = 64;

/// Maximum number of columns allowed in a single constraint.
///
/// Keeps conflict-target key sets bounded and cheap to canonicalize.
pub const MAX_CONSTRAINT_COLUMNS: usize = 16;

use crate::catalog::CatalogError;
use thiserror::Error as ThisError;

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    CatalogError(#[from] CatalogError),
}

///
/// Prelude
///
/// Domain vocabulary only; no readers, validators, or helpers.
///

pub mod prelude {
    pub use crate::{
        catalog::Catalog,
        err,
        error::ErrorTree,
        node::{Column, Constraint, ConstraintKind, Table},
    };
    pub use serde::{Deserialize, Serialize};
}
