//! Shared error types for the services crate.
//!
//! Missing records and missing sessions are not errors here: those paths
//! return `None`. What remains is backend failure and bad seed data.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `SessionStore` and the flows built on it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionStoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to encode session snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors emitted while loading a catalog seed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogLoadError {
    #[error("catalog seed is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] learnify_core::Error),
    #[error("quiz lessons without a quiz: {0}")]
    MissingQuiz(String),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Catalog(#[from] CatalogLoadError),
}
