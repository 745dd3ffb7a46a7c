//! Fitted feature encoders.
//!
//! Each encoder is learned from the cleaned corpus by its `fit` constructor
//! and then emits a fixed block of columns per record:
//! - RuntimeEncoder: one numeric column, missing values imputed
//! - GenreEncoder: multi-hot over the genre vocabulary
//! - LanguageEncoder: one-hot over the top languages plus `other`

pub mod genre;
pub mod language;
pub mod runtime;

pub use genre::GenreEncoder;
pub use language::LanguageEncoder;
pub use runtime::RuntimeEncoder;
