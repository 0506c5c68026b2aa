use crate::node::{Column, Constraint, ConstraintKind};
use serde::{Deserialize, Serialize};

///
/// Table
///
/// Table metadata for one catalog generation. Immutable once the catalog
/// snapshot is built; a schema rebuild produces a fresh `Table`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Table {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Column>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<Constraint>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uniques: Vec<Constraint>,
}

impl Table {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            uniques: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, nullable: bool) -> Self {
        self.columns.push(Column::new(name, nullable));
        self
    }

    #[must_use]
    pub fn with_primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = Some(Constraint::primary_key(columns));
        self
    }

    #[must_use]
    pub fn with_unique<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uniques.push(Constraint::unique(columns));
        self
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// A table qualifies for a generated upsert mutation iff it has a
    /// primary key.
    #[must_use]
    pub const fn is_upsert_eligible(&self) -> bool {
        self.primary_key.is_some()
    }

    /// All constraints in candidate order: primary key first, then unique
    /// constraints in catalog order.
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.primary_key.iter().chain(self.uniques.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bikes() -> Table {
        Table::new("bikes")
            .with_column("id", false)
            .with_column("weight", true)
            .with_column("make", true)
            .with_column("model", true)
            .with_column("serial_key", true)
            .with_primary_key(["id"])
            .with_unique(["serial_key", "weight"])
    }

    #[test]
    fn eligibility_requires_a_primary_key() {
        assert!(bikes().is_upsert_eligible());
        assert!(!Table::new("no_primary_keys").with_column("name", true).is_upsert_eligible());
    }

    #[test]
    fn constraints_list_primary_key_first() {
        let table = bikes();
        let kinds: Vec<_> = table.constraints().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ConstraintKind::PrimaryKey, ConstraintKind::Unique]);
    }

    #[test]
    fn serialization_skips_empty_metadata() {
        let table = Table::new("bare");
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "bare" }));
    }

    #[test]
    fn column_lookup_by_name() {
        let table = bikes();
        assert!(table.column("weight").is_some_and(|c| c.nullable));
        assert!(table.column("missing").is_none());
    }
}
