//! Server crate for the movie-match recommendation engine.
//!
//! This crate holds the compute-once catalog snapshot cache and the
//! orchestrator that serves recommendations from a built snapshot.

pub mod orchestrator;
pub mod snapshot;

pub use orchestrator::{MovieRecommendation, RecommendationOrchestrator};
pub use snapshot::{CatalogSnapshot, CorpusVersion, SnapshotCache};
