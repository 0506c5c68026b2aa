
use graft_schema::{
    catalog::Catalog,
    node::{Constraint, ConstraintKind},
};
use std::collections::{BTreeMap, BTreeSet};

///
/// ConflictTarget
///
/// A constraint usable as the basis for an upsert: the column set that
/// decides "this row already exists". Derived from catalog metadata when
/// the index is built; matching is exact-set and order-insensitive.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConflictTarget {
    pub kind: ConstraintKind,
    pub columns: Vec<String>,
}

impl ConflictTarget {
    fn from_constraint(constraint: &Constraint) -> Self {
        Self {
            kind: constraint.kind,
            columns: constraint.columns.clone(),
        }
    }

    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        matches!(self.kind, ConstraintKind::PrimaryKey)
    }

    /// Canonical order-insensitive view of the target's columns.
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

///
/// ConstraintIndex
///
/// Map from table name to conflict-target candidates, built once per
/// catalog snapshot. Read-only after construction; catalog rebuilds
/// produce a fresh index that is swapped in wholesale so in-flight
/// planning never observes a partial rebuild.
///
/// Tables without a primary key are excluded outright. That is policy,
/// not an error: no candidates, no synthesized field, nothing to plan.
///

#[derive(Clone, Debug, Default)]
pub struct ConstraintIndex {
    tables: BTreeMap<String, Vec<ConflictTarget>>,
}

impl ConstraintIndex {
    #[must_use]
    pub fn build(catalog: &Catalog) -> Self {
        let mut tables = BTreeMap::new();

        for table in catalog.tables() {
            if !table.is_upsert_eligible() {
                continue;
            }

            // primary key first, then unique constraints in catalog order
            let candidates = table
                .constraints()
                .map(ConflictTarget::from_constraint)
                .collect();
            tables.insert(table.name.clone(), candidates);
        }

        Self { tables }
    }

    #[must_use]
    pub fn is_eligible(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Conflict-target candidates for a table; empty for ineligible or
    /// unknown tables.
    #[must_use]
    pub fn candidates_for(&self, table: &str) -> &[ConflictTarget] {
        self.tables.get(table).map_or(&[], Vec::as_slice)
    }

    /// The primary-key target, if the table is eligible.
    #[must_use]
    pub fn primary_key(&self, table: &str) -> Option<&ConflictTarget> {
        // build order guarantees the primary key is the first candidate
        self.candidates_for(table).first()
    }

    /// Find the candidate whose column set equals `keys` exactly.
    #[must_use]
    pub fn match_exact(&self, table: &str, keys: &BTreeSet<&str>) -> Option<&ConflictTarget> {
        self.candidates_for(table)
            .iter()
            .find(|target| target.matches_exact(keys))
    }

    /// Eligible table names in deterministic (sorted) order.
    pub fn eligible_tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
