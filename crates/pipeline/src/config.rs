//! Build-time knobs for the feature pipeline.

use serde::{Deserialize, Serialize};

/// Number of language codes that get their own column; the rest share `other`
pub const DEFAULT_TOP_LANGUAGES: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub top_languages: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            top_languages: DEFAULT_TOP_LANGUAGES,
        }
    }
}
