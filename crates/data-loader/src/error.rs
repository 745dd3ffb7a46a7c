//! Error types for the data-loader crate.
//!
//! Only failures that make the whole corpus unreadable live here.
//! Problems with a single record (bad id, missing title, malformed genres,
//! unparsable runtime) are recovered during ingestion and never surface
//! as errors; they are counted in [`IngestStats`](crate::IngestStats) instead.

use thiserror::Error;

/// Errors that can occur while loading the catalog.
///
/// Every variant is fatal at build time: the corpus cannot be turned into
/// a record set and nothing downstream can run.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// The source could not be opened or read at all
    #[error("Catalog source unavailable: {path}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader gave up partway through the source
    #[error("Malformed CSV in {path}: {source}")]
    MalformedSource {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// The source has no header row
    #[error("Catalog source is empty: {path}")]
    EmptySource { path: String },

    /// A column the ingestor cannot work without is absent from the header
    #[error("Required column '{column}' missing from header")]
    MissingColumn { column: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
