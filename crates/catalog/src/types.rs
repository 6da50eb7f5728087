//! Core domain types for the movie catalog.
//!
//! The catalog and the similarity matrix are loaded together at startup and
//! stay read-only for the lifetime of the process. Position in the catalog is
//! the index used to address rows and columns of the matrix, so both
//! structures are validated against each other at construction time and never
//! mutated afterwards.

use crate::error::{CatalogError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Stable identifier used to query the TMDB metadata API for a movie
pub type MovieId = u32;

// =============================================================================
// Movie
// =============================================================================

/// A single movie from the precomputed artifact.
///
/// `title` is the lookup key used by the selection surface. It is not
/// guaranteed unique across the catalog; lookups resolve to the first
/// occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// TMDB identifier for this movie
    #[serde(rename = "movie_id")]
    pub id: MovieId,
    pub title: String,
}

// =============================================================================
// SimilarityMatrix
// =============================================================================

/// Square matrix of pairwise similarity scores, flat row-major storage.
///
/// `score(i, j)` is the similarity between movie i and movie j. Diagonal
/// entries are self-similarity and are excluded from recommendation results
/// by the engine, not here.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    n: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Build a matrix from nested rows, validating squareness and finiteness.
    ///
    /// Row validation is data-parallel with rayon; the matrix for a few
    /// thousand movies has millions of entries and this runs on every start.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(CatalogError::EmptyCatalog);
        }

        rows.par_iter().enumerate().try_for_each(|(i, row)| {
            if row.len() != n {
                return Err(CatalogError::RaggedRow {
                    row: i,
                    expected: n,
                    found: row.len(),
                });
            }
            for (j, score) in row.iter().enumerate() {
                if !score.is_finite() {
                    return Err(CatalogError::NonFiniteScore { row: i, col: j });
                }
            }
            Ok(())
        })?;

        let scores = rows.into_iter().flatten().collect();
        Ok(Self { n, scores })
    }

    /// Number of rows (== number of columns)
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarity scores of movie `i` against every movie in the catalog
    ///
    /// Panics if `i` is out of bounds; callers index with positions obtained
    /// from the catalog, which are valid by construction.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.scores[i * self.n..(i + 1) * self.n]
    }

    /// Similarity score between movies `i` and `j`
    pub fn score(&self, i: usize, j: usize) -> f32 {
        self.scores[i * self.n + j]
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The immutable similarity store: ordered movies plus their pairwise scores.
///
/// Constructed once at startup and shared read-only (typically behind an
/// `Arc`), so no locking discipline is needed anywhere downstream.
#[derive(Debug)]
pub struct Catalog {
    movies: Vec<Movie>,
    matrix: SimilarityMatrix,
    /// Title -> first catalog position bearing that title
    title_index: HashMap<String, usize>,
}

impl Catalog {
    /// Build and validate a catalog from in-memory parts.
    ///
    /// This is the single construction path; the artifact loader and the
    /// tests both go through it, so the shape invariants hold everywhere.
    pub fn from_parts(movies: Vec<Movie>, rows: Vec<Vec<f32>>) -> Result<Self> {
        if movies.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        if movies.len() != rows.len() {
            return Err(CatalogError::ShapeMismatch {
                movies: movies.len(),
                rows: rows.len(),
            });
        }

        let matrix = SimilarityMatrix::from_rows(rows)?;

        // First occurrence wins on duplicate titles
        let mut title_index = HashMap::with_capacity(movies.len());
        for (idx, movie) in movies.iter().enumerate() {
            title_index.entry(movie.title.clone()).or_insert(idx);
        }

        Ok(Self {
            movies,
            matrix,
            title_index,
        })
    }

    /// Catalog position of the first movie with this exact title
    ///
    /// Case-sensitive exact match; the selection surface feeds us titles it
    /// got from `titles()`, so no fuzzy matching is done here.
    pub fn find_by_title(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    /// Movie at a catalog position
    pub fn movie(&self, idx: usize) -> Option<&Movie> {
        self.movies.get(idx)
    }

    /// All catalog titles in insertion order (the selection surface)
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|m| m.title.as_str())
    }

    /// All movies in catalog order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
