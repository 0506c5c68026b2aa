mod column;
mod constraint;
mod table;

pub use column::Column;
pub use constraint::{Constraint, ConstraintKind};
pub use table::Table;
