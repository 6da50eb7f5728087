//! # Recommendation Service
//!
//! This module coordinates the full recommendation flow:
//! 1. Rank catalog movies by similarity to the queried title
//! 2. Resolve a poster URL for each result (concurrent, bounded)
//! 3. Attach detail-page links and return display-ready cards
//!
//! Poster resolution fans out over a bounded set of concurrent fetches with a
//! per-fetch deadline, so total latency is no longer additive across results.
//! A missed deadline or a panicked fetch task degrades that one card to the
//! placeholder image; it never fails the request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::{info, warn};

use catalog::{Catalog, MovieId};
use engine::{RecommendError, Recommender, ScoredMovie};
use tmdb_client::PosterClient;

/// Hard cap on the poster gallery size
pub const GALLERY_MAX: usize = 10;

/// Final recommendation card returned to the user
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub id: MovieId,
    pub title: String,
    pub score: f32,
    pub poster_url: String,
    pub detail_url: String,
}

/// One entry of the browsing gallery
#[derive(Debug, Clone)]
pub struct GalleryEntry {
    pub id: MovieId,
    pub title: String,
    pub poster_url: String,
}

/// Service that combines the ranking engine with poster resolution
#[derive(Clone)]
pub struct RecommendationService {
    catalog: Arc<Catalog>,
    recommender: Recommender,
    posters: Arc<PosterClient>,

    /// Upper bound on in-flight poster fetches
    max_concurrent_fetches: usize,

    /// Deadline for one poster resolution, retries included
    poster_deadline: Duration,
}

impl RecommendationService {
    pub fn new(catalog: Arc<Catalog>, posters: PosterClient) -> Self {
        let recommender = Recommender::new(catalog.clone());
        Self {
            catalog,
            recommender,
            posters: Arc::new(posters),
            max_concurrent_fetches: 4,
            poster_deadline: Duration::from_secs(15),
        }
    }

    /// Configure the fan-out bound (default: 4)
    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max.max(1);
        self
    }

    /// Configure the per-poster deadline (default: 15 seconds)
    pub fn with_poster_deadline(mut self, deadline: Duration) -> Self {
        self.poster_deadline = deadline;
        self
    }

    /// All catalog titles, for the selection surface
    pub fn titles(&self) -> Vec<String> {
        self.catalog.titles().map(|t| t.to_string()).collect()
    }

    /// Ranked recommendations without poster resolution.
    ///
    /// Pure and synchronous; this is the path for callers that do not need
    /// images (and for tests that must not touch the network).
    pub fn recommend_titles(
        &self,
        title: &str,
        limit: usize,
    ) -> Result<Vec<ScoredMovie>, RecommendError> {
        self.recommender.recommend_with_limit(title, limit)
    }

    /// Full recommendations: ranking plus poster and detail URLs.
    ///
    /// The only error is `MovieNotFound`; poster trouble of any kind shows
    /// up as placeholder URLs in the result cards.
    pub async fn recommend(
        &self,
        title: &str,
        limit: usize,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        let start = Instant::now();

        let ranked = self.recommender.recommend_with_limit(title, limit)?;
        info!(query = %title, results = ranked.len(), "Ranked recommendations");

        let poster_urls = self
            .resolve_posters(ranked.iter().map(|m| m.id).collect())
            .await;

        let recommendations: Vec<Recommendation> = ranked
            .into_iter()
            .zip(poster_urls)
            .map(|(movie, poster_url)| Recommendation {
                detail_url: self.posters.detail_url(movie.id),
                id: movie.id,
                title: movie.title,
                score: movie.score,
                poster_url,
            })
            .collect();

        info!(
            query = %title,
            elapsed = ?start.elapsed(),
            "Recommendation flow complete"
        );
        Ok(recommendations)
    }

    /// Poster gallery over the first `count` catalog movies (capped at 10)
    pub async fn gallery(&self, count: usize) -> Vec<GalleryEntry> {
        let count = count.min(GALLERY_MAX).min(self.catalog.len());
        let movies: Vec<(MovieId, String)> = self.catalog.movies()[..count]
            .iter()
            .map(|m| (m.id, m.title.clone()))
            .collect();

        let poster_urls = self
            .resolve_posters(movies.iter().map(|(id, _)| *id).collect())
            .await;

        movies
            .into_iter()
            .zip(poster_urls)
            .map(|((id, title), poster_url)| GalleryEntry {
                id,
                title,
                poster_url,
            })
            .collect()
    }

    /// Resolve posters for a list of movie ids, preserving input order.
    ///
    /// Fetches run concurrently, bounded by a semaphore, each under its own
    /// deadline. Tasks are awaited in submission order so the returned URLs
    /// line up with the input ids.
    async fn resolve_posters(&self, ids: Vec<MovieId>) -> Vec<String> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_fetches));
        let placeholder = self.posters.config().placeholder_url.clone();

        let mut handles = Vec::with_capacity(ids.len());
        for id in ids {
            let semaphore = semaphore.clone();
            let posters = self.posters.clone();
            let deadline = self.poster_deadline;
            let placeholder = placeholder.clone();

            handles.push(tokio::spawn(async move {
                // The semaphore is never closed; a failed acquire just means
                // we proceed without the permit
                let _permit = semaphore.acquire_owned().await.ok();
                match tokio::time::timeout(deadline, posters.resolve_poster(id)).await {
                    Ok(url) => url,
                    Err(_) => {
                        warn!(movie_id = id, "Poster resolution missed its deadline");
                        placeholder
                    }
                }
            }));
        }

        let mut urls = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(url) => urls.push(url),
                Err(e) => {
                    warn!(error = %e, "Poster task panicked");
                    urls.push(placeholder.clone());
                }
            }
        }
        urls
    }
}
