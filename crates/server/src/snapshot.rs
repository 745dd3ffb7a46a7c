//! # Catalog Snapshot Cache
//!
//! The feature build (ingest → encode → assemble → scale) is a one-time
//! batch over the whole corpus. Its outputs are bundled into an immutable
//! [`CatalogSnapshot`] and shared through `Arc` with every request.
//!
//! [`SnapshotCache`] is the compute-once gate in front of the build:
//! - the cache lock is held for the whole build, so concurrent callers for
//!   the same corpus wait for one build instead of starting their own
//! - snapshots are keyed by [`CorpusVersion`] (SHA-256 of the source bytes);
//!   a changed corpus triggers exactly one rebuild, never a stale answer

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tracing::info;

use data_loader::{Catalog, CatalogRecord, IdentifierIndex, ItemId};
use pipeline::{BuildConfig, FeatureMatrix, FittedFeaturePipeline, Recommendation};

/// Identity of a corpus: hex SHA-256 of its raw bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorpusVersion(String);

impl CorpusVersion {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(bytes)))
    }

    /// Version for an in-memory corpus with a caller-chosen identity
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorpusVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything built from one corpus version. Read-only once constructed.
pub struct CatalogSnapshot {
    version: CorpusVersion,
    config: BuildConfig,
    catalog: Catalog,
    features: FittedFeaturePipeline,
    matrix: FeatureMatrix,
    index: IdentifierIndex,
}

impl CatalogSnapshot {
    /// Run the full feature build over a cleaned catalog
    pub fn build(version: CorpusVersion, catalog: Catalog, config: BuildConfig) -> Result<Self> {
        let (features, matrix) = FittedFeaturePipeline::fit_transform(&catalog, &config)
            .context("Failed to build feature matrix")?;
        let index = IdentifierIndex::build(&catalog);

        Ok(Self {
            version,
            config,
            catalog,
            features,
            matrix,
            index,
        })
    }

    pub fn version(&self) -> &CorpusVersion {
        &self.version
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn features(&self) -> &FittedFeaturePipeline {
        &self.features
    }

    pub fn matrix(&self) -> &FeatureMatrix {
        &self.matrix
    }

    pub fn index(&self) -> &IdentifierIndex {
        &self.index
    }

    /// Display details (overview, genres) of an item
    pub fn details(&self, id: ItemId) -> Option<&CatalogRecord> {
        self.catalog.get_record(id)
    }

    /// Rank against this snapshot; see [`pipeline::recommend`]
    pub fn recommend(&self, liked_ids: &[ItemId], n: usize) -> pipeline::Result<Vec<Recommendation>> {
        pipeline::recommend(liked_ids, n, &self.matrix, &self.index)
    }
}

/// Compute-once, read-many holder of the current snapshot
pub struct SnapshotCache {
    config: BuildConfig,
    slot: Mutex<Option<Arc<CatalogSnapshot>>>,
    builds: AtomicUsize,
}

impl SnapshotCache {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            slot: Mutex::new(None),
            builds: AtomicUsize::new(0),
        }
    }

    /// Return the snapshot for `version`, building it with `load` if the
    /// cached one is missing or belongs to another version.
    ///
    /// `load` runs at most once per version change, even under concurrent
    /// callers; a failed build leaves the previous snapshot in place.
    pub fn get_or_build<F>(&self, version: CorpusVersion, load: F) -> Result<Arc<CatalogSnapshot>>
    where
        F: FnOnce() -> Result<Catalog>,
    {
        let mut slot = self.slot.lock();
        if let Some(snapshot) = slot.as_ref().filter(|s| *s.version() == version) {
            return Ok(Arc::clone(snapshot));
        }

        info!("Building catalog snapshot for corpus {}", version);
        let catalog = load()?;
        let snapshot = Arc::new(CatalogSnapshot::build(version, catalog, self.config)?);
        self.builds.fetch_add(1, Ordering::Relaxed);

        *slot = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Read a CSV source and return its snapshot, rebuilding only if the
    /// file contents changed since the last build.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<CatalogSnapshot>> {
        let bytes = data_loader::parser::read_source(path)
            .with_context(|| format!("Failed to read catalog source {}", path.display()))?;
        let version = CorpusVersion::of_bytes(&bytes);

        self.get_or_build(version, || {
            Catalog::from_csv_bytes(&bytes, &path.display().to_string())
                .context("Failed to ingest catalog")
        })
    }

    /// The last snapshot built, if any
    pub fn current(&self) -> Option<Arc<CatalogSnapshot>> {
        self.slot.lock().clone()
    }

    /// How many builds have completed
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(BuildConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_version_is_content_hash() {
        let a = CorpusVersion::of_bytes(b"id,title\n1,Heat\n");
        let b = CorpusVersion::of_bytes(b"id,title\n1,Heat\n");
        let c = CorpusVersion::of_bytes(b"id,title\n1,Up\n");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_failed_build_keeps_previous_snapshot() {
        let cache = SnapshotCache::default();
        let first = cache
            .get_or_build(CorpusVersion::named("v1"), || Ok(Catalog::new()))
            .unwrap();

        let failed = cache.get_or_build(CorpusVersion::named("v2"), || {
            Err(anyhow::anyhow!("source went away"))
        });
        assert!(failed.is_err());

        let current = cache.current().unwrap();
        assert!(Arc::ptr_eq(&first, &current));
        assert_eq!(cache.build_count(), 1);
    }
}
