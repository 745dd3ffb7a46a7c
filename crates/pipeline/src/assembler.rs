//! The FeatureAssembler concatenates encoder blocks into rows.
//!
//! This module provides the FeatureAssembler struct that chains fitted
//! encoders together using the builder pattern. Column order is the order
//! the encoders were added in.

use crate::matrix::FeatureMatrix;
use crate::traits::FeatureEncoder;
use data_loader::CatalogRecord;
use rayon::prelude::*;
use tracing::debug;

/// Chains fitted encoders into one fixed-width row layout.
///
/// ## Usage
/// ```ignore
/// let assembler = FeatureAssembler::new()
///     .add_encoder(RuntimeEncoder::fit(records))
///     .add_encoder(GenreEncoder::fit(records))
///     .add_encoder(LanguageEncoder::fit(records, 15));
///
/// let matrix = assembler.assemble(records);
/// ```
pub struct FeatureAssembler {
    encoders: Vec<Box<dyn FeatureEncoder>>,
}

impl FeatureAssembler {
    /// Create a new empty FeatureAssembler.
    pub fn new() -> Self {
        Self {
            encoders: Vec::new(),
        }
    }

    /// Append an encoder's column block (builder pattern).
    pub fn add_encoder(mut self, encoder: impl FeatureEncoder + 'static) -> Self {
        self.encoders.push(Box::new(encoder));
        self
    }

    /// Total row width
    pub fn dim(&self) -> usize {
        self.encoders.iter().map(|e| e.width()).sum()
    }

    /// Column names of every block, in layout order
    pub fn column_names(&self) -> Vec<String> {
        self.encoders.iter().flat_map(|e| e.column_names()).collect()
    }

    /// Encode one record into a fresh row. Columns no encoder sets are 0.
    pub fn encode(&self, record: &CatalogRecord) -> Vec<f64> {
        let mut row = vec![0.0; self.dim()];
        self.encode_into(record, &mut row);
        row
    }

    fn encode_into(&self, record: &CatalogRecord, row: &mut [f64]) {
        let mut offset = 0;
        for encoder in &self.encoders {
            let width = encoder.width();
            encoder.encode_into(record, &mut row[offset..offset + width]);
            offset += width;
        }
    }

    /// Build the unscaled matrix, one row per record, in record order.
    ///
    /// Rows are encoded in parallel; order is preserved.
    pub fn assemble(&self, records: &[CatalogRecord]) -> FeatureMatrix {
        let dim = self.dim();
        let mut values = vec![0.0; records.len() * dim];

        if dim > 0 {
            values
                .par_chunks_mut(dim)
                .zip(records.par_iter())
                .for_each(|(row, record)| self.encode_into(record, row));
        }

        for encoder in &self.encoders {
            debug!("Encoder {}: {} columns", encoder.name(), encoder.width());
        }

        let ids = records.iter().map(|r| r.id).collect();
        FeatureMatrix::from_parts(self.column_names(), ids, values)
    }
}

impl Default for FeatureAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoders::{GenreEncoder, LanguageEncoder, RuntimeEncoder};
    use crate::test_util::{abc_catalog, record};

    #[test]
    fn test_empty_assembler() {
        let assembler = FeatureAssembler::new();
        let matrix = assembler.assemble(&[record(1, &[], None, "en")]);

        assert_eq!(matrix.dim(), 0);
        assert_eq!(matrix.len(), 1);
    }

    #[test]
    fn test_column_layout_follows_encoder_order() {
        let catalog = abc_catalog("fr");
        let records = catalog.records();

        let assembler = FeatureAssembler::new()
            .add_encoder(RuntimeEncoder::fit(records))
            .add_encoder(GenreEncoder::fit(records))
            .add_encoder(LanguageEncoder::fit(records, 15));
        let matrix = assembler.assemble(records);

        assert_eq!(
            matrix.columns(),
            &["runtime", "genre_Action", "genre_Comedy", "lang_en", "lang_fr", "lang_other"]
        );
        assert_eq!(matrix.vector(1).unwrap(), &[90.0, 1.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(matrix.vector(3).unwrap(), &[95.0, 1.0, 1.0, 0.0, 1.0, 0.0]);
        assert_eq!(matrix.ids(), &[1, 2, 3]);
    }
}
