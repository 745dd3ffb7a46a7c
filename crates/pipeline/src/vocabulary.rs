//! Frozen label vocabularies for categorical features.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An ordered set of labels with fixed positions.
///
/// Built once from the corpus; there is no way to add a label afterwards.
/// A label that was not seen at build time has no position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Vocabulary {
    /// Freeze labels in the given order. Repeated labels keep their first position.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = Self::default();
        for label in labels {
            let label = label.into();
            if !vocabulary.positions.contains_key(&label) {
                vocabulary.positions.insert(label.clone(), vocabulary.labels.len());
                vocabulary.labels.push(label);
            }
        }
        vocabulary
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_follow_insertion_order() {
        let vocabulary = Vocabulary::from_labels(["Drama", "Action", "Drama", "War"]);

        assert_eq!(vocabulary.len(), 3);
        assert_eq!(vocabulary.position("Drama"), Some(0));
        assert_eq!(vocabulary.position("Action"), Some(1));
        assert_eq!(vocabulary.position("War"), Some(2));
        assert_eq!(vocabulary.position("Western"), None);
    }
}
