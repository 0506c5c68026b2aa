use crate::value::Value;
use derive_more::{Deref, DerefMut, IntoIterator};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

///
/// Record
///
/// Sparse column→value mapping used for `where` selectors, payloads, and
/// reconciled writes. A column missing from the map is absent from the
/// payload; `Value::Null` is a present null, never absence.
///

#[derive(
    Clone, Debug, Default, Deref, DerefMut, Deserialize, Eq, IntoIterator, PartialEq, Serialize,
)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert for inline construction.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    /// The set of columns present in this record.
    #[must_use]
    pub fn column_set(&self) -> BTreeSet<&str> {
        self.0.keys().map(String::as_str).collect()
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_is_not_null() {
        let record = Record::new().with("a", Value::Null);

        assert!(record.contains_key("a"));
        assert!(!record.contains_key("b"));
        assert_eq!(record.get("a"), Some(&Value::Null));
        assert_eq!(record.get("b"), None);
    }

    #[test]
    fn column_set_reflects_present_keys() {
        let record = Record::new().with("weight", 0u64).with("serial_key", "123");
        let set = record.column_set();

        assert_eq!(set, ["serial_key", "weight"].into_iter().collect());
    }

    #[test]
    fn serializes_as_a_map_of_tagged_values() {
        let record = Record::new().with("make", "kona");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json, serde_json::json!({ "make": { "Text": "kona" } }));
    }
}
