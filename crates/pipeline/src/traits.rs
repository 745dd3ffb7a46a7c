//! Core traits for the feature pipeline.
//!
//! This module defines the FeatureEncoder trait that lets the assembler
//! concatenate independent column blocks into one fixed-width row.

use data_loader::CatalogRecord;

/// A fitted encoder that owns a contiguous block of feature columns.
///
/// Encoders are fitted once from the corpus by their own constructor
/// (e.g. `GenreEncoder::fit`) and are immutable afterwards: encoding a
/// record never changes the vocabulary or the imputation value.
///
/// ## Design Note
/// - `Send + Sync` lets rows be encoded in parallel
/// - `encode_into` receives a zeroed slice of exactly `width()` values, so
///   any column the encoder does not set stays 0
pub trait FeatureEncoder: Send + Sync {
    /// Returns the name of this encoder (for logging/debugging)
    fn name(&self) -> &str;

    /// Names of the columns this encoder emits, in order
    fn column_names(&self) -> Vec<String>;

    /// Number of columns this encoder emits
    fn width(&self) -> usize;

    /// Write this encoder's columns for `record` into `out`.
    ///
    /// # Arguments
    /// * `record` - The record to encode
    /// * `out` - Zero-initialized slice of length `width()`
    fn encode_into(&self, record: &CatalogRecord, out: &mut [f64]);
}
