//! Feature engineering and similarity ranking for catalog items.
//!
//! This crate provides:
//! - FeatureEncoder trait and the runtime/genre/language encoders
//! - FeatureAssembler for composing encoders into a fixed row layout
//! - ScalingParameters for corpus-wide min-max scaling
//! - FittedFeaturePipeline tying the fit/transform phases together
//! - `recommend` for cosine-similarity ranking against a user profile
//!
//! ## Architecture
//! The build runs once per corpus:
//! 1. Encoders are fitted from the cleaned catalog (vocabularies, imputation)
//! 2. The assembler concatenates their columns into one row per item
//! 3. Scaling parameters are learned and applied to every column
//!
//! Each request then runs `recommend` against the resulting matrix.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{recommend, BuildConfig, FittedFeaturePipeline};
//! use data_loader::IdentifierIndex;
//!
//! let (pipeline, matrix) = FittedFeaturePipeline::fit_transform(&catalog, &BuildConfig::default())?;
//! let index = IdentifierIndex::build(&catalog);
//!
//! let recommendations = recommend(&[862, 8844], 15, &matrix, &index)?;
//! ```

pub mod error;
pub mod config;
pub mod traits;
pub mod vocabulary;
pub mod encoders;
pub mod assembler;
pub mod matrix;
pub mod scaler;
pub mod features;
pub mod recommender;

#[cfg(test)]
mod test_util;

// Re-export main types
pub use assembler::FeatureAssembler;
pub use config::{BuildConfig, DEFAULT_TOP_LANGUAGES};
pub use error::{PipelineError, Result};
pub use features::FittedFeaturePipeline;
pub use matrix::FeatureMatrix;
pub use recommender::{cosine_similarity, recommend, user_profile, Recommendation};
pub use scaler::{ColumnRange, ScalingParameters};
pub use traits::FeatureEncoder;
pub use vocabulary::Vocabulary;
