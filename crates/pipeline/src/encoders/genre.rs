//! Multi-hot genre encoding.

use crate::traits::FeatureEncoder;
use crate::vocabulary::Vocabulary;
use data_loader::CatalogRecord;
use std::collections::BTreeSet;
use tracing::debug;

/// Marks membership in each genre of a vocabulary frozen at fit time.
///
/// The vocabulary is every distinct genre name in the corpus, sorted.
/// Records with no genres (or only unseen ones) encode as all zeros.
#[derive(Debug, Clone)]
pub struct GenreEncoder {
    vocabulary: Vocabulary,
}

impl GenreEncoder {
    pub fn fit(records: &[CatalogRecord]) -> Self {
        let names: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.genre_names.iter().map(String::as_str))
            .collect();
        let vocabulary = Vocabulary::from_labels(names);
        debug!("Genre vocabulary: {} labels", vocabulary.len());
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }
}

impl FeatureEncoder for GenreEncoder {
    fn name(&self) -> &str {
        "GenreEncoder"
    }

    fn column_names(&self) -> Vec<String> {
        self.vocabulary
            .labels()
            .iter()
            .map(|label| format!("genre_{}", label))
            .collect()
    }

    fn width(&self) -> usize {
        self.vocabulary.len()
    }

    fn encode_into(&self, record: &CatalogRecord, out: &mut [f64]) {
        for name in &record.genre_names {
            if let Some(pos) = self.vocabulary.position(name) {
                out[pos] = 1.0;
            }
        }
    }
}
