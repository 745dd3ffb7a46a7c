//! # Data Loader Crate
//!
//! This crate turns a movie metadata table into a cleaned catalog.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (RawRecord, CatalogRecord, Catalog)
//! - **parser**: CSV splitting and lenient field parsers
//! - **ingest**: Cleaning rules (id coercion, dedupe, title filter)
//! - **index**: Bidirectional id ↔ title lookup
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Catalog, IdentifierIndex};
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_file(Path::new("data/movies_metadata.csv"))?;
//! let index = IdentifierIndex::build(&catalog);
//!
//! let toy_story = index.id_of("Toy Story").unwrap();
//! println!("{} -> {}", toy_story, index.title_of(toy_story).unwrap());
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod ingest;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::IdentifierIndex;
pub use types::{
    // Type aliases
    ItemId,
    // Core types
    Catalog,
    CatalogRecord,
    GenreField,
    IngestStats,
    RawRecord,
};
