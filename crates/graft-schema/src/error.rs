use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// ErrorTree
///
/// Flat aggregate of validation failures collected during a catalog build.
/// Empty trees are success; non-empty trees fail the whole build.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ErrorTree {
    errors: Vec<String>,
}

impl ErrorTree {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record a validation failure.
    pub fn add(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Absorb every failure from another tree.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.errors
    }

    /// Collapse into a `Result`, consuming the tree.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "no errors"),
            [one] => write!(f, "{one}"),
            many => {
                write!(f, "{} errors: ", many.len())?;
                for (i, message) in many.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{message}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ErrorTree {}

/// Push a formatted validation failure onto an [`ErrorTree`].
#[macro_export]
macro_rules! err {
    ( $errs:expr, $( $arg:tt )* ) => {
        $errs.add(format!( $( $arg )* ))
    };
}
