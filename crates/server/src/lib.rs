//! Server crate for the CineMatch recommendation demo.
//!
//! This crate contains the service that coordinates the ranking engine and
//! the poster resolver into complete, display-ready recommendations.

pub mod service;

pub use service::{GalleryEntry, Recommendation, RecommendationService};
