//! # Catalog Crate
//!
//! This crate owns the immutable similarity store: the ordered movie catalog
//! and the precomputed pairwise similarity matrix, loaded once at startup
//! from persisted artifacts.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, SimilarityMatrix, Catalog)
//! - **loader**: Deserialize the startup artifacts and validate their shape
//! - **error**: Error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::Catalog;
//! use std::path::Path;
//!
//! // Load both artifacts (fatal error on any shape mismatch)
//! let catalog = Catalog::load_from_files(Path::new("data"))?;
//!
//! let idx = catalog.find_by_title("Avatar").unwrap();
//! let row = catalog.matrix().row(idx);
//!
//! println!("{} scored against {} movies", idx, row.len());
//! ```
//!
//! ## Invariants
//!
//! - `catalog.len() == matrix.rows == matrix.cols`, checked at construction
//! - All similarity scores are finite
//! - Both structures are read-only for the lifetime of the process

// Public modules
pub mod error;
pub mod loader;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use types::{Catalog, Movie, MovieId, SimilarityMatrix};
