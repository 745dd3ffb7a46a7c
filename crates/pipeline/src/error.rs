//! Error types for the feature pipeline and recommender.

use data_loader::ItemId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// A ranked id has no title. The title index and the feature matrix are
    /// built from the same catalog, so this is a build invariant violation.
    #[error("Index inconsistency: ranked item {id} has no title mapping")]
    IndexInconsistency { id: ItemId },

    /// Scaling parameters were fitted on a matrix of a different width
    #[error("Expected {expected} feature columns but found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
