//! # Recommendation Orchestrator
//!
//! This module is the request entry point in front of the ranking core:
//! 1. Take the liked ids chosen by the presentation layer
//! 2. Rank the whole catalog against them on a blocking worker
//! 3. Attach display details (genres, overview) to each result
//! 4. Log timings
//!
//! The orchestrator owns no mutable state; every call reads the same
//! immutable snapshot, so it can be cloned freely across tasks.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use data_loader::ItemId;

use crate::snapshot::CatalogSnapshot;

/// Final recommendation returned to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecommendation {
    pub id: ItemId,
    pub title: String,
    pub score: f64,
    pub genres: Vec<String>,
    pub overview: String,
}

/// Serves recommendations from one catalog snapshot
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    snapshot: Arc<CatalogSnapshot>,
}

impl RecommendationOrchestrator {
    pub fn new(snapshot: Arc<CatalogSnapshot>) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &Arc<CatalogSnapshot> {
        &self.snapshot
    }

    /// Main entry point: get recommendations for a set of liked items
    ///
    /// # Arguments
    /// * `liked_ids` - Items the user likes; unknown ids are ignored
    /// * `limit` - Number of recommendations to return (e.g., 15)
    ///
    /// # Returns
    /// Recommendations sorted by score (highest first); empty when no
    /// liked id is known
    pub async fn get_recommendations(
        &self,
        liked_ids: &[ItemId],
        limit: usize,
    ) -> Result<Vec<MovieRecommendation>> {
        let start_time = Instant::now();

        // Scoring is CPU-bound over the whole matrix
        let ranked = tokio::task::spawn_blocking({
            let snapshot = Arc::clone(&self.snapshot);
            let liked = liked_ids.to_vec();
            move || snapshot.recommend(&liked, limit)
        })
        .await
        .context("Ranking task panicked")?
        .context("Failed to rank candidates")?;
        debug!(
            "Ranked {} candidates in {:.2?}",
            self.snapshot.matrix().len(),
            start_time.elapsed()
        );

        let recommendations = ranked
            .into_iter()
            .map(|rec| {
                let details = self.snapshot.details(rec.id);
                MovieRecommendation {
                    id: rec.id,
                    title: rec.title,
                    score: rec.score,
                    genres: details.map(|d| d.genre_names.clone()).unwrap_or_default(),
                    overview: details.map(|d| d.overview.clone()).unwrap_or_default(),
                }
            })
            .collect::<Vec<_>>();

        info!(
            "Selected {} recommendations for {} liked items in {:.2?}",
            recommendations.len(),
            liked_ids.len(),
            start_time.elapsed()
        );
        Ok(recommendations)
    }
}
