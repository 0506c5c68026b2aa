use crate::{exec::ExecError, plan::PlanError};
use graft_schema::catalog::CatalogError;
use thiserror::Error as ThisError;

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    CatalogError(#[from] CatalogError),

    #[error(transparent)]
    ExecError(#[from] ExecError),

    #[error(transparent)]
    PlanError(#[from] PlanError),
}
