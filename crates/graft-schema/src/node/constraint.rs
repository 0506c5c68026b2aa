use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    fmt::{self, Display},
};

///
/// ConstraintKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
}

impl Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PrimaryKey => "PRIMARY KEY",
            Self::Unique => "UNIQUE",
        };
        write!(f, "{label}")
    }
}

///
/// Constraint
///
/// Column order is preserved from the catalog for display and shape
/// ordering; matching against caller key sets is exact-set and
/// order-insensitive.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub columns: Vec<String>,
}

impl Constraint {
    #[must_use]
    pub fn primary_key<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: ConstraintKind::PrimaryKey,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn unique<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: ConstraintKind::Unique,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Canonical order-insensitive view of the constraint's columns.
    #[must_use]
    pub fn column_set(&self) -> BTreeSet<&str> {
        self.columns.iter().map(String::as_str).collect()
    }

    /// Exact-set match against a caller-supplied key set.
    #[must_use]
    pub fn matches_exact(&self, keys: &BTreeSet<&str>) -> bool {
        self.column_set() == *keys
    }

    #[must_use]
    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.columns.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_set_match_is_order_insensitive() {
        let unique = Constraint::unique(["serial_key", "weight"]);

        let forward: BTreeSet<&str> = ["serial_key", "weight"].into_iter().collect();
        let reversed: BTreeSet<&str> = ["weight", "serial_key"].into_iter().collect();
        assert!(unique.matches_exact(&forward));
        assert!(unique.matches_exact(&reversed));
    }

    #[test]
    fn subset_is_not_an_exact_match() {
        let unique = Constraint::unique(["serial_key", "weight"]);

        let subset: BTreeSet<&str> = ["serial_key"].into_iter().collect();
        let superset: BTreeSet<&str> = ["serial_key", "weight", "make"].into_iter().collect();
        assert!(!unique.matches_exact(&subset));
        assert!(!unique.matches_exact(&superset));
    }

    #[test]
    fn display_formats_like_ddl() {
        let pk = Constraint::primary_key(["id"]);
        let unique = Constraint::unique(["project_name", "title"]);

        assert_eq!(pk.to_string(), "PRIMARY KEY (id)");
        assert_eq!(unique.to_string(), "UNIQUE (project_name, title)");
    }
}
