//! Loader for the persisted catalog artifacts.
//!
//! Two blobs are deserialized at process start:
//! - movies.json: array of { movie_id, title } in catalog order
//! - similarity.json: square array of arrays of similarity scores
//!
//! Both were exported from the offline similarity pipeline; this crate only
//! consumes them. Any structural mismatch between the two is a fatal startup
//! error, surfaced through [`CatalogError`].

use crate::error::{CatalogError, Result};
use crate::types::{Catalog, Movie};
use std::fs;
use std::path::Path;
use tracing::info;

/// Artifact file names inside the data directory
pub const MOVIES_FILE: &str = "movies.json";
pub const SIMILARITY_FILE: &str = "similarity.json";

impl Catalog {
    /// Load the catalog and similarity matrix from a data directory.
    ///
    /// The two artifacts are read and decoded in parallel with rayon, then
    /// validated against each other by [`Catalog::from_parts`].
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        let movies_path = data_dir.join(MOVIES_FILE);
        let similarity_path = data_dir.join(SIMILARITY_FILE);

        let (movies, rows) = rayon::join(
            || read_movies(&movies_path),
            || read_similarity(&similarity_path),
        );
        let movies = movies?;
        let rows = rows?;

        info!(
            movies = movies.len(),
            matrix_rows = rows.len(),
            "Loaded catalog artifacts from {}",
            data_dir.display()
        );

        let catalog = Self::from_parts(movies, rows)?;
        info!(titles = catalog.len(), "Catalog validated");
        Ok(catalog)
    }

    /// Build a catalog from raw JSON strings.
    ///
    /// Same decode path as [`Catalog::load_from_files`] without touching the
    /// filesystem; used by tests.
    pub fn from_json_strs(movies_json: &str, similarity_json: &str) -> Result<Self> {
        let movies = decode_movies(MOVIES_FILE, movies_json)?;
        let rows = decode_similarity(SIMILARITY_FILE, similarity_json)?;
        Self::from_parts(movies, rows)
    }
}

fn read_artifact(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

fn read_movies(path: &Path) -> Result<Vec<Movie>> {
    let body = read_artifact(path)?;
    decode_movies(&path.display().to_string(), &body)
}

fn read_similarity(path: &Path) -> Result<Vec<Vec<f32>>> {
    let body = read_artifact(path)?;
    decode_similarity(&path.display().to_string(), &body)
}

fn decode_movies(file: &str, body: &str) -> Result<Vec<Movie>> {
    serde_json::from_str(body).map_err(|source| CatalogError::Json {
        file: file.to_string(),
        source,
    })
}

fn decode_similarity(file: &str, body: &str) -> Result<Vec<Vec<f32>>> {
    serde_json::from_str(body).map_err(|source| CatalogError::Json {
        file: file.to_string(),
        source,
    })
}
