//! Corpus-wide min-max scaling.
//!
//! Ranges are learned once from the assembled matrix and kept as
//! [`ScalingParameters`] so the exact same transform can be reapplied.

use crate::error::{PipelineError, Result};
use crate::matrix::FeatureMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Learned range of one column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnRange {
    pub min: f64,
    pub max: f64,
}

impl ColumnRange {
    /// `(x - min) / (max - min)`, or 0 for a constant column.
    ///
    /// A span too wide for `f64` is computed on halved operands instead.
    pub fn scale(&self, x: f64) -> f64 {
        let span = self.max - self.min;
        if span.is_nan() || span <= 0.0 {
            return 0.0;
        }
        if span.is_finite() {
            (x - self.min) / span
        } else {
            (x / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingParameters {
    ranges: Vec<ColumnRange>,
}

impl ScalingParameters {
    /// Learn per-column ranges. An empty matrix yields `(0, 0)` ranges.
    pub fn fit(matrix: &FeatureMatrix) -> Self {
        let mut ranges = vec![
            ColumnRange {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            };
            matrix.dim()
        ];

        for (_, row) in matrix.rows() {
            for (range, &x) in ranges.iter_mut().zip(row) {
                range.min = range.min.min(x);
                range.max = range.max.max(x);
            }
        }

        if matrix.is_empty() {
            ranges.fill(ColumnRange { min: 0.0, max: 0.0 });
        }
        Self { ranges }
    }

    pub fn ranges(&self) -> &[ColumnRange] {
        &self.ranges
    }

    pub fn dim(&self) -> usize {
        self.ranges.len()
    }

    /// Scale one row in place. The row must have `dim()` values.
    pub fn scale_row(&self, row: &mut [f64]) {
        for (x, range) in row.iter_mut().zip(&self.ranges) {
            *x = range.scale(*x);
        }
    }

    /// Scale every row of `matrix` in place
    pub fn apply(&self, matrix: &mut FeatureMatrix) -> Result<()> {
        let dim = matrix.dim();
        if dim != self.dim() {
            return Err(PipelineError::DimensionMismatch {
                expected: self.dim(),
                found: dim,
            });
        }
        if dim > 0 {
            matrix
                .values_mut()
                .par_chunks_mut(dim)
                .for_each(|row| self.scale_row(row));
        }
        Ok(())
    }
}
