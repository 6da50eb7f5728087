//! Recommendation engine: nearest-neighbor ranking over the similarity matrix.
//!
//! ## Algorithm
//! 1. Resolve the catalog position of the queried title (first match wins)
//! 2. Take that movie's matrix row as (index, score) pairs
//! 3. Sort descending by score; ties keep original row order (stable sort)
//! 4. Exclude the queried movie itself (self-similarity is maximal)
//! 5. Take the top k and enrich with title and TMDB id from the catalog
//!
//! The whole thing is a pure function of (title, catalog); no side effects,
//! no network, no mutation.

use catalog::{Catalog, MovieId};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

/// Default number of recommendations to return
pub const DEFAULT_LIMIT: usize = 5;

/// Errors from the recommendation engine
#[derive(Error, Debug)]
pub enum RecommendError {
    /// The queried title matched nothing in the catalog
    ///
    /// The reference behavior here was an index-out-of-bounds crash; we
    /// surface it as a typed error so callers can show a clear message.
    #[error("Movie not found in catalog: {title}")]
    MovieNotFound { title: String },
}

/// One ranked result: a catalog movie with its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMovie {
    /// Catalog position of this movie
    pub index: usize,
    /// TMDB identifier, used downstream to resolve the poster
    pub id: MovieId,
    pub title: String,
    pub score: f32,
}

/// Ranks catalog movies by similarity to a queried title
#[derive(Clone)]
pub struct Recommender {
    /// Shared reference to the catalog (read-only, so no Mutex needed)
    catalog: Arc<Catalog>,

    /// How many recommendations to return by default
    limit: usize,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Configure the default result count (default: 5)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Top recommendations for a title, using the configured limit
    pub fn recommend(&self, title: &str) -> Result<Vec<ScoredMovie>, RecommendError> {
        self.recommend_with_limit(title, self.limit)
    }

    /// Top `limit` recommendations for a title.
    ///
    /// Returns `min(limit, catalog.len() - 1)` results: the queried movie is
    /// never part of its own recommendations, and a catalog smaller than the
    /// limit yields fewer results rather than failing.
    #[instrument(skip(self))]
    pub fn recommend_with_limit(
        &self,
        title: &str,
        limit: usize,
    ) -> Result<Vec<ScoredMovie>, RecommendError> {
        let query_idx =
            self.catalog
                .find_by_title(title)
                .ok_or_else(|| RecommendError::MovieNotFound {
                    title: title.to_string(),
                })?;

        let row = self.catalog.matrix().row(query_idx);

        // (index, score) pairs for every movie except the query itself
        let mut ranked: Vec<(usize, f32)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|&(idx, _)| idx != query_idx)
            .collect();

        // Stable sort keeps original row order on score ties
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(limit);

        let results: Vec<ScoredMovie> = ranked
            .into_iter()
            .filter_map(|(idx, score)| {
                let movie = self.catalog.movie(idx)?;
                Some(ScoredMovie {
                    index: idx,
                    id: movie.id,
                    title: movie.title.clone(),
                    score,
                })
            })
            .collect();

        debug!(
            query = %title,
            results = results.len(),
            "Ranked recommendations"
        );
        Ok(results)
    }
}
