//! The query template catalog.
//!
//! Templates live in `queries.json`, a nested JSON document addressed by
//! dotted keys (`admin.addRace.raceInsert`, `guest.winningTrainers`). The
//! catalog is read-only once loaded; the embedded copy is parsed once per
//! process and cached.

use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

/// The default catalog document, compiled into the binary.
const EMBEDDED_QUERIES: &str = include_str!("../assets/queries.json");

/// Errors that can occur when loading or resolving query templates.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to read the catalog file.
    #[error("failed to read query catalog: {0}")]
    FileRead(#[from] std::io::Error),

    /// The catalog document is not valid JSON.
    #[error("failed to parse query catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// No template exists at the given dotted key.
    #[error("no query template at key: {0}")]
    MissingTemplate(String),

    /// The dotted key resolved to a non-string node.
    #[error("query catalog entry is not a template string: {0}")]
    NotATemplate(String),
}

/// An immutable mapping from dotted keys to SQL template strings.
#[derive(Debug, Clone)]
pub struct QueryCatalog {
    root: Value,
}

impl QueryCatalog {
    /// Parses a catalog from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(Self {
            root: serde_json::from_str(json)?,
        })
    }

    /// Loads a catalog from a file on disk.
    pub fn load(path: &str) -> Result<Self, CatalogError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// The embedded default catalog, parsed once and cached for the life of
    /// the process.
    ///
    /// # Panics
    ///
    /// Panics if the embedded document is malformed, which a test guards
    /// against.
    pub fn embedded() -> &'static QueryCatalog {
        static CATALOG: OnceLock<QueryCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            QueryCatalog::from_json_str(EMBEDDED_QUERIES)
                .expect("embedded queries.json must be valid")
        })
    }

    /// Resolves a dotted key (`admin.moveHorse`) to its template string.
    ///
    /// # Errors
    ///
    /// `MissingTemplate` if any path segment is absent, `NotATemplate` if
    /// the key lands on a nested object instead of a string leaf.
    pub fn template(&self, key: &str) -> Result<&str, CatalogError> {
        let mut node = &self.root;
        for segment in key.split('.') {
            node = node
                .get(segment)
                .ok_or_else(|| CatalogError::MissingTemplate(key.to_string()))?;
        }
        node.as_str()
            .ok_or_else(|| CatalogError::NotATemplate(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_parses() {
        let catalog = QueryCatalog::embedded();
        let template = catalog
            .template("admin.addRace.raceInsert")
            .expect("race insert template should exist");
        assert!(template.contains("{raceId}"));
    }

    #[test]
    fn all_known_keys_resolve() {
        let catalog = QueryCatalog::embedded();
        for key in [
            "admin.addRace.raceInsert",
            "admin.addRace.resultsInsert",
            "admin.deleteOwner",
            "admin.moveHorse",
            "admin.approveTrainer",
            "guest.ownersHorses",
            "guest.winningTrainers",
            "guest.trainerWinnings",
            "guest.trackActivity",
        ] {
            catalog.template(key).unwrap_or_else(|e| panic!("{e}"));
        }
    }

    #[test]
    fn missing_key_is_an_error() {
        let catalog = QueryCatalog::embedded();
        let err = catalog.template("admin.noSuchQuery").unwrap_err();
        assert!(matches!(err, CatalogError::MissingTemplate(_)));
    }

    #[test]
    fn non_leaf_key_is_an_error() {
        let catalog = QueryCatalog::embedded();
        let err = catalog.template("admin.addRace").unwrap_err();
        assert!(matches!(err, CatalogError::NotATemplate(_)));
    }
}
