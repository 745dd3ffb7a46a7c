//! Compute-once behavior of the snapshot cache under concurrency and
//! corpus changes.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use data_loader::Catalog;
use server::{CorpusVersion, SnapshotCache};

const CATALOG_CSV: &str = "\
id,title,genres,runtime,original_language,overview
1,Alpha,\"[{'id': 28, 'name': 'Action'}]\",90,en,First
2,Beta,\"[{'id': 35, 'name': 'Comedy'}]\",100,en,Second
3,Gamma,\"[{'id': 28, 'name': 'Action'}, {'id': 35, 'name': 'Comedy'}]\",95,fr,Third
";

fn load_inline() -> anyhow::Result<Catalog> {
    Ok(Catalog::from_csv_bytes(CATALOG_CSV.as_bytes(), "inline.csv")?)
}

#[test]
fn test_concurrent_callers_share_one_build() {
    let cache = Arc::new(SnapshotCache::default());
    let loads = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let loads = Arc::clone(&loads);
            thread::spawn(move || {
                cache
                    .get_or_build(CorpusVersion::named("v1"), || {
                        loads.fetch_add(1, Ordering::SeqCst);
                        load_inline()
                    })
                    .unwrap()
            })
        })
        .collect();

    let snapshots: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(cache.build_count(), 1);
    assert!(snapshots.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(snapshots[0].catalog().len(), 3);
}

#[test]
fn test_version_change_rebuilds_once() {
    let cache = SnapshotCache::default();

    let first = cache.get_or_build(CorpusVersion::named("v1"), load_inline).unwrap();
    let again = cache.get_or_build(CorpusVersion::named("v1"), load_inline).unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    let second = cache.get_or_build(CorpusVersion::named("v2"), load_inline).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.version().as_str(), "v2");
    assert_eq!(cache.build_count(), 2);

    // Same data, so the rebuilt matrix is identical
    assert_eq!(first.matrix(), second.matrix());
}

#[test]
fn test_get_or_load_tracks_file_contents() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CATALOG_CSV.as_bytes()).unwrap();
    file.flush().unwrap();

    let cache = SnapshotCache::default();
    let first = cache.get_or_load(file.path()).unwrap();
    let unchanged = cache.get_or_load(file.path()).unwrap();
    assert!(Arc::ptr_eq(&first, &unchanged));
    assert_eq!(cache.build_count(), 1);

    file.write_all(b"4,Delta,[],120,de,Fourth\n").unwrap();
    file.flush().unwrap();

    let changed = cache.get_or_load(file.path()).unwrap();
    assert_eq!(cache.build_count(), 2);
    assert_ne!(first.version(), changed.version());
    assert_eq!(changed.catalog().len(), 4);
    assert!(changed.index().id_of("Delta").is_some());
}

#[test]
fn test_missing_source_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SnapshotCache::default();

    let result = cache.get_or_load(&dir.path().join("absent.csv"));
    assert!(result.is_err());
    assert!(cache.current().is_none());
    assert_eq!(cache.build_count(), 0);
}

#[test]
fn test_snapshot_serves_recommendations() {
    let cache = SnapshotCache::default();
    let snapshot = cache.get_or_build(CorpusVersion::named("v1"), load_inline).unwrap();

    let recs = snapshot.recommend(&[1], 5).unwrap();
    assert_eq!(recs.len(), 2);
    assert!(recs.iter().all(|r| r.id != 1));
    assert_eq!(snapshot.details(3).unwrap().overview, "Third");
}
