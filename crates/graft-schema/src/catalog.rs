use crate::{error::ErrorTree, node::Table, validate::validate_catalog};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// CatalogError
///
/// Build-time failures only. A catalog that cannot be read or fails
/// validation is fatal to schema synthesis, never to an individual
/// upsert request.
///

#[derive(Debug, ThisError)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("catalog validation failed: {0}")]
    Invalid(ErrorTree),
}

///
/// Catalog
///
/// The set of tables for one schema generation. Table order follows the
/// backing store's catalog order and is preserved for deterministic
/// synthesis.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Catalog {
    tables: Vec<Table>,
}

impl Catalog {
    #[must_use]
    pub const fn new() -> Self {
        Self { tables: Vec::new() }
    }

    #[must_use]
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn push(&mut self, table: Table) {
        self.tables.push(table);
    }

    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

///
/// CatalogReader
///
/// Pull boundary to the backing store's metadata: per table, the column
/// list, primary-key column set, and unique-constraint column sets.
///

pub trait CatalogReader {
    fn read_catalog(&self) -> Result<Catalog, CatalogError>;
}

///
/// StaticCatalogReader
///
/// Reader backed by an in-memory catalog, for tests and embedders that
/// assemble metadata by hand.
///

#[derive(Clone, Debug, Default)]
pub struct StaticCatalogReader {
    catalog: Catalog,
}

impl StaticCatalogReader {
    #[must_use]
    pub const fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

impl CatalogReader for StaticCatalogReader {
    fn read_catalog(&self) -> Result<Catalog, CatalogError> {
        Ok(self.catalog.clone())
    }
}

/// Read and validate a catalog, producing the immutable snapshot shared by
/// the index and synthesizer.
///
/// Rebuilds go through this function and swap the returned `Arc` on
/// completion; in-flight planning keeps reading the previous snapshot.
pub fn build_snapshot(reader: &dyn CatalogReader) -> Result<Arc<Catalog>, CatalogError> {
    let catalog = reader.read_catalog()?;
    validate_catalog(&catalog).map_err(CatalogError::Invalid)?;

    Ok(Arc::new(catalog))
}
