//! Error types for the catalog crate.
//!
//! Every way the startup artifacts can be broken gets its own variant so the
//! binary can refuse to start with a precise message instead of serving
//! recommendations against inconsistent data.

use thiserror::Error;

/// Errors that can occur while loading and validating the catalog artifacts
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Artifact file could not be found or opened
    #[error("Failed to open artifact: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading an artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact body is not valid JSON (or has the wrong shape)
    #[error("Failed to decode {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// Catalog length and matrix dimensions disagree
    ///
    /// Index i of the catalog must always refer to row/column i of the
    /// matrix, so any length divergence is fatal.
    #[error("Shape mismatch: {movies} movies but {rows} matrix rows")]
    ShapeMismatch { movies: usize, rows: usize },

    /// A matrix row has the wrong number of columns (matrix must be square)
    #[error("Matrix row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A similarity score is NaN or infinite
    #[error("Non-finite similarity score at [{row}][{col}]")]
    NonFiniteScore { row: usize, col: usize },

    /// The artifacts deserialized to an empty catalog
    #[error("Catalog is empty")]
    EmptyCatalog,
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
