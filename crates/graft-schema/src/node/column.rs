use serde::{Deserialize, Serialize};

///
/// Column
///
/// Column metadata as reported by the catalog. A value for a nullable
/// column may be `Null`; absence of the column from a payload is a
/// distinct state tracked at the record layer, never here.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Column {
    pub name: String,

    #[serde(default)]
    pub nullable: bool,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            nullable,
        }
    }
}
