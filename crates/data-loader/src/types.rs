//! Core domain types for the movie catalog.
//!
//! This module defines the data structures that flow out of ingestion:
//! - `RawRecord`: one CSV row, every field still optional text
//! - `CatalogRecord`: a cleaned, validated record
//! - `Catalog`: the cleaned record set in corpus order

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a catalog item
pub type ItemId = i64;

// =============================================================================
// Raw input
// =============================================================================

/// A single row of the source table before any cleaning.
///
/// `None` means the cell was absent or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub genres: Option<String>,
    pub runtime: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
}

/// Outcome of parsing the serialized genre list of one record.
///
/// Parsing never fails loudly; malformed text becomes `Unparsable` and is
/// treated downstream as contributing no genres.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreField {
    Parsed(Vec<String>),
    Unparsable,
}

impl GenreField {
    /// Genre names, empty when the field could not be parsed
    pub fn into_names(self) -> Vec<String> {
        match self {
            GenreField::Parsed(names) => names,
            GenreField::Unparsable => Vec::new(),
        }
    }
}

// =============================================================================
// Cleaned records
// =============================================================================

/// A validated catalog record.
///
/// Produced once by ingestion and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: ItemId,
    /// Never empty
    pub title: String,
    /// Genre names in the order they appear in the source
    pub genre_names: Vec<String>,
    /// `None` when the source value was missing or not a finite number
    pub runtime: Option<f64>,
    /// Original language code, empty when absent
    pub language: String,
    /// Free text, passed through for display
    pub overview: String,
}

/// Counts of what ingestion threw away or degraded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    pub rows_read: usize,
    pub dropped_invalid_id: usize,
    pub dropped_duplicate_id: usize,
    pub dropped_missing_title: usize,
    /// Records kept with an empty genre list because the field was malformed
    pub unparsable_genres: usize,
    /// Records kept whose runtime was missing or unparsable
    pub missing_runtime: usize,
}

impl IngestStats {
    /// Number of records that survived cleaning
    pub fn kept(&self) -> usize {
        self.rows_read
            - self.dropped_invalid_id
            - self.dropped_duplicate_id
            - self.dropped_missing_title
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The cleaned record set.
///
/// Records keep corpus order, which is the row order used everywhere
/// downstream (feature matrix rows, tie-breaking, first-title-wins).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) records: Vec<CatalogRecord>,
    pub(crate) positions: HashMap<ItemId, usize>,
    pub(crate) stats: IngestStats,
}

impl Catalog {
    /// Creates a new, empty Catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in corpus order
    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    /// Get a record by id
    pub fn get_record(&self, id: ItemId) -> Option<&CatalogRecord> {
        self.positions.get(&id).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// What ingestion dropped or degraded
    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Append a record unless its id is already present.
    ///
    /// Returns `false` for a duplicate id; the first record wins.
    pub fn insert_record(&mut self, record: CatalogRecord) -> bool {
        if self.positions.contains_key(&record.id) {
            return false;
        }
        self.positions.insert(record.id, self.records.len());
        self.records.push(record);
        true
    }
}
