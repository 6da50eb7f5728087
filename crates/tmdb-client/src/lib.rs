//! TMDB poster client for resolving movie poster URLs.
//!
//! This crate provides the one piece of the system that talks to the outside
//! world: a bounded-retry HTTP fetch against the TMDB movie endpoint. It
//! handles:
//! - Building the metadata request for a movie id
//! - Retrying transport and non-success-status failures (3 attempts, fixed
//!   1 second backoff)
//! - Substituting a fallback poster path when the response has none
//! - Falling back to a placeholder image URL when every attempt fails
//!
//! `resolve_poster` never returns an error. The calling UI renders whatever
//! URL comes back, so total failure degrades to a placeholder image instead
//! of propagating.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Fixed demo credential for the TMDB API
const DEFAULT_API_KEY: &str = "d76159193bc8fb58406d48db264bd9f4";

/// Endpoints and fallback values for the TMDB integration.
///
/// Defaults point at the real TMDB API; tests override the base URLs to hit
/// a local mock server.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// Metadata API base, queried as `{api_base_url}/movie/{id}`
    pub api_base_url: String,
    /// Image CDN prefix the poster path is appended to
    pub image_base_url: String,
    /// Human-facing detail page base
    pub detail_base_url: String,
    pub api_key: String,
    /// Poster path substituted when the response carries none
    pub fallback_poster_path: String,
    /// Image returned when every fetch attempt fails
    pub placeholder_url: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            detail_base_url: "https://www.themoviedb.org/movie".to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            fallback_poster_path: "/placeholder.jpg".to_string(),
            placeholder_url: "https://via.placeholder.com/500".to_string(),
        }
    }
}

/// Errors inside a single fetch attempt.
///
/// These never escape [`PosterClient::resolve_poster`]; they exist so the
/// retry loop can log precisely what went wrong on each attempt.
#[derive(Error, Debug)]
pub enum PosterError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TMDB returned status {code}")]
    Status { code: u16 },
}

/// Shape of the TMDB movie response; only the poster path matters here
#[derive(Debug, Deserialize)]
struct MovieDetails {
    poster_path: Option<String>,
}

/// Client for resolving poster URLs from TMDB.
///
/// Cheap to clone (reqwest clients share their connection pool).
#[derive(Clone)]
pub struct PosterClient {
    http: reqwest::Client,
    config: TmdbConfig,

    /// Number of fetch attempts before giving up (default: 3)
    max_retries: u32,

    /// Fixed delay between attempts (default: 1 second)
    retry_delay: Duration,
}

impl Default for PosterClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PosterClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            config: TmdbConfig::default(),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }

    /// Point the client at different endpoints (used by tests)
    pub fn with_config(mut self, config: TmdbConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure the attempt count (default: 3)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Configure the delay between attempts (default: 1 second)
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Resolve the poster image URL for a movie.
    ///
    /// Always succeeds: a transport error or non-success status is retried
    /// up to `max_retries` times with a fixed delay, and exhausting the
    /// retries yields the configured placeholder URL. A response without a
    /// `poster_path` is a success; the fallback path is substituted rather
    /// than treated as an error, so a malformed body can never starve the
    /// caller of a URL.
    pub async fn resolve_poster(&self, movie_id: u32) -> String {
        for attempt in 1..=self.max_retries {
            match self.fetch_poster_path(movie_id).await {
                Ok(path) => {
                    debug!(movie_id, attempt, path = %path, "Resolved poster");
                    return format!("{}{}", self.config.image_base_url, path);
                }
                Err(e) => {
                    warn!(movie_id, attempt, error = %e, "Poster fetch attempt failed");
                    if attempt < self.max_retries {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        warn!(
            movie_id,
            attempts = self.max_retries,
            "All poster fetch attempts failed, using placeholder"
        );
        self.config.placeholder_url.clone()
    }

    /// One GET against the metadata endpoint, returning the poster path
    async fn fetch_poster_path(&self, movie_id: u32) -> Result<String, PosterError> {
        let url = format!("{}/movie/{}", self.config.api_base_url, movie_id);

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PosterError::Status {
                code: response.status().as_u16(),
            });
        }

        let details: MovieDetails = response.json().await?;
        Ok(details
            .poster_path
            .unwrap_or_else(|| self.config.fallback_poster_path.clone()))
    }

    /// Detail page URL for a movie on the provider's site
    pub fn detail_url(&self, movie_id: u32) -> String {
        format!("{}/{}", self.config.detail_base_url, movie_id)
    }

    pub fn config(&self) -> &TmdbConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Shared state for the mock TMDB endpoint: how many requests have come
    /// in, and how many should fail before one succeeds
    #[derive(Clone)]
    struct MockState {
        hits: Arc<AtomicUsize>,
        fail_first: usize,
        poster_path: Option<&'static str>,
    }

    async fn mock_movie(State(state): State<MockState>) -> (StatusCode, Json<serde_json::Value>) {
        let hit = state.hits.fetch_add(1, Ordering::SeqCst);
        if hit < state.fail_first {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"status_message": "boom"})),
            );
        }
        let body = match state.poster_path {
            Some(path) => serde_json::json!({"poster_path": path}),
            None => serde_json::json!({"poster_path": null}),
        };
        (StatusCode::OK, Json(body))
    }

    /// Start a mock TMDB API on a random port
    async fn start_mock_tmdb(state: MockState) -> (String, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock TMDB server");
        let addr = listener.local_addr().expect("Failed to get local address");

        let app = Router::new()
            .route("/movie/:id", get(mock_movie))
            .with_state(state);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock TMDB failed");
        });

        (format!("http://{}", addr), handle)
    }

    fn test_client(api_base_url: String) -> PosterClient {
        PosterClient::new()
            .with_config(TmdbConfig {
                api_base_url,
                ..TmdbConfig::default()
            })
            .with_retry_delay(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_retry_then_succeed() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (addr, handle) = start_mock_tmdb(MockState {
            hits: hits.clone(),
            fail_first: 2,
            poster_path: Some("/real.jpg"),
        })
        .await;

        let client = test_client(addr);
        let url = client.resolve_poster(550).await;

        assert_eq!(url, "https://image.tmdb.org/t/p/w500/real.jpg");
        assert_eq!(hits.load(Ordering::SeqCst), 3, "two failures plus one success");

        handle.abort();
    }

    #[tokio::test]
    async fn test_exhausted_retries_return_placeholder() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (addr, handle) = start_mock_tmdb(MockState {
            hits: hits.clone(),
            fail_first: usize::MAX,
            poster_path: None,
        })
        .await;

        let client = test_client(addr);
        let url = client.resolve_poster(550).await;

        assert_eq!(url, "https://via.placeholder.com/500");
        assert_eq!(hits.load(Ordering::SeqCst), 3, "exactly 3 attempts");

        handle.abort();
    }

    #[tokio::test]
    async fn test_missing_poster_path_substitutes_fallback() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (addr, handle) = start_mock_tmdb(MockState {
            hits: hits.clone(),
            fail_first: 0,
            poster_path: None,
        })
        .await;

        let client = test_client(addr);
        let url = client.resolve_poster(550).await;

        assert_eq!(url, "https://image.tmdb.org/t/p/w500/placeholder.jpg");
        assert_eq!(
            hits.load(Ordering::SeqCst),
            1,
            "a missing field is a success, not a retry"
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_connection_error_returns_placeholder() {
        // Bind a listener to reserve a port, then drop it so connects fail
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = test_client(format!("http://{}", addr));
        let url = client.resolve_poster(550).await;

        assert_eq!(url, "https://via.placeholder.com/500");
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (addr, handle) = start_mock_tmdb(MockState {
            hits: hits.clone(),
            fail_first: 0,
            poster_path: Some("/kqjL17yufvn9OVLyXYpvtyrFfak.jpg"),
        })
        .await;

        let client = test_client(addr);
        let url = client.resolve_poster(603).await;

        assert_eq!(
            url,
            "https://image.tmdb.org/t/p/w500/kqjL17yufvn9OVLyXYpvtyrFfak.jpg"
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        handle.abort();
    }

    #[test]
    fn test_detail_url() {
        let client = PosterClient::new();
        assert_eq!(
            client.detail_url(19995),
            "https://www.themoviedb.org/movie/19995"
        );
    }
}
