//! One-hot language encoding with an `other` bucket.

use crate::traits::FeatureEncoder;
use crate::vocabulary::Vocabulary;
use data_loader::CatalogRecord;
use std::collections::HashMap;
use tracing::debug;

pub const OTHER_LANGUAGE: &str = "other";

/// Keeps a column for each of the most frequent language codes and folds
/// every other code (including empty and never-seen ones) into `other`.
///
/// ## Algorithm
/// 1. Count non-empty codes across the corpus
/// 2. Rank by count descending; ties go to the code seen first
/// 3. Keep the top `top_k`; the `other` column always comes last
#[derive(Debug, Clone)]
pub struct LanguageEncoder {
    vocabulary: Vocabulary,
}

impl LanguageEncoder {
    pub fn fit(records: &[CatalogRecord], top_k: usize) -> Self {
        // code -> (count, first seen position)
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (pos, record) in records.iter().enumerate() {
            if record.language.is_empty() {
                continue;
            }
            counts.entry(record.language.as_str()).or_insert((0, pos)).0 += 1;
        }

        let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.0.cmp(&a.1.0).then(a.1.1.cmp(&b.1.1)));
        ranked.truncate(top_k);

        let vocabulary = Vocabulary::from_labels(ranked.into_iter().map(|(code, _)| code));
        debug!(
            "Language vocabulary: {} codes + {}",
            vocabulary.len(),
            OTHER_LANGUAGE
        );
        Self { vocabulary }
    }

    /// The kept codes, in column order (excluding `other`)
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    fn other_position(&self) -> usize {
        self.vocabulary.len()
    }
}

impl FeatureEncoder for LanguageEncoder {
    fn name(&self) -> &str {
        "LanguageEncoder"
    }

    fn column_names(&self) -> Vec<String> {
        self.vocabulary
            .labels()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(OTHER_LANGUAGE))
            .map(|code| format!("lang_{}", code))
            .collect()
    }

    fn width(&self) -> usize {
        self.vocabulary.len() + 1
    }

    fn encode_into(&self, record: &CatalogRecord, out: &mut [f64]) {
        let pos = self
            .vocabulary
            .position(&record.language)
            .unwrap_or_else(|| self.other_position());
        out[pos] = 1.0;
    }
}
