//! Content-based ranking against a user profile.
//!
//! ## Algorithm
//! 1. Keep the liked ids that exist in the matrix (deduplicated)
//! 2. Profile = elementwise mean of their feature vectors
//! 3. Score every other row by cosine similarity to the profile
//! 4. Stable sort by score descending, so ties keep row order
//! 5. Take the top n and attach titles

use crate::error::{PipelineError, Result};
use crate::matrix::FeatureMatrix;
use data_loader::{IdentifierIndex, ItemId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// A ranked item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: ItemId,
    pub title: String,
    /// Cosine similarity to the profile; in [0, 1] for non-negative features
    pub score: f64,
}

/// Cosine of the angle between `a` and `b`.
///
/// Returns 0.0 when either vector has zero norm. The result is clamped to
/// [-1, 1] to absorb rounding.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Row positions of the liked ids present in the matrix, first occurrence
/// order, duplicates removed. Unknown ids are dropped silently.
fn valid_liked_positions(liked_ids: &[ItemId], matrix: &FeatureMatrix) -> Vec<usize> {
    let mut seen = HashSet::new();
    liked_ids
        .iter()
        .filter_map(|&id| matrix.position(id))
        .filter(|&pos| seen.insert(pos))
        .collect()
}

/// Mean feature vector of the valid liked ids, or `None` if there are none
pub fn user_profile(liked_ids: &[ItemId], matrix: &FeatureMatrix) -> Option<Vec<f64>> {
    let positions = valid_liked_positions(liked_ids, matrix);
    mean_of_rows(&positions, matrix)
}

fn mean_of_rows(positions: &[usize], matrix: &FeatureMatrix) -> Option<Vec<f64>> {
    if positions.is_empty() {
        return None;
    }
    let mut profile = vec![0.0; matrix.dim()];
    for &pos in positions {
        for (acc, x) in profile.iter_mut().zip(matrix.row(pos)) {
            *acc += x;
        }
    }
    let count = positions.len() as f64;
    profile.iter_mut().for_each(|v| *v /= count);
    Some(profile)
}

/// Rank every non-liked item by similarity to the liked items' profile.
///
/// # Arguments
/// * `liked_ids` - Items the user likes; unknown ids and repeats are ignored
/// * `n` - Maximum number of recommendations
/// * `matrix` - The scaled feature matrix
/// * `index` - Title lookup built from the same catalog as `matrix`
///
/// # Returns
/// * `Ok(vec![])` when no liked id is valid or `n == 0`
/// * `Err(IndexInconsistency)` if a ranked id has no title
pub fn recommend(
    liked_ids: &[ItemId],
    n: usize,
    matrix: &FeatureMatrix,
    index: &IdentifierIndex,
) -> Result<Vec<Recommendation>> {
    let liked = valid_liked_positions(liked_ids, matrix);
    if liked.len() < liked_ids.len() {
        debug!(
            "Ignoring {} unknown or repeated liked ids",
            liked_ids.len() - liked.len()
        );
    }
    let Some(profile) = mean_of_rows(&liked, matrix) else {
        return Ok(Vec::new());
    };
    if n == 0 {
        return Ok(Vec::new());
    }

    let excluded: HashSet<usize> = liked.into_iter().collect();

    // Parallel collect keeps row order, which the stable sort relies on
    let mut scored: Vec<(usize, f64)> = (0..matrix.len())
        .into_par_iter()
        .filter(|pos| !excluded.contains(pos))
        .map(|pos| (pos, cosine_similarity(&profile, matrix.row(pos))))
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(n);

    scored
        .into_iter()
        .map(|(pos, score)| {
            let id = matrix.ids()[pos];
            let title = index
                .title_of(id)
                .ok_or(PipelineError::IndexInconsistency { id })?;
            Ok(Recommendation {
                id,
                title: title.to_string(),
                score,
            })
        })
        .collect()
}
