//! Catalog ingestion: raw rows in, cleaned records out.
//!
//! Cleaning rules, applied in this order:
//! 1. Coerce the id to an integer; rows whose id does not parse are dropped
//! 2. Deduplicate by id, keeping the first occurrence
//! 3. Drop rows with a missing or empty title
//!
//! Deduplication happens before the title check, so an id whose first
//! occurrence has no title is gone entirely even if a later duplicate has one.
//! Malformed genres and runtimes never drop a record; they degrade to an
//! empty genre list and a missing runtime.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Per-row parse result, computed in parallel before the ordered pass
struct ParsedRow {
    id: Option<ItemId>,
    title: Option<String>,
    genres: GenreField,
    runtime: Option<f64>,
    language: String,
    overview: String,
}

impl ParsedRow {
    fn from_raw(raw: RawRecord) -> Self {
        Self {
            id: raw.id.as_deref().and_then(parser::parse_id),
            title: raw.title.filter(|t| !t.is_empty()),
            genres: parser::parse_genres(raw.genres.as_deref()),
            runtime: parser::parse_runtime(raw.runtime.as_deref()),
            language: raw
                .original_language
                .map(|l| l.trim().to_string())
                .unwrap_or_default(),
            overview: raw.overview.unwrap_or_default(),
        }
    }
}

impl Catalog {
    /// Load and clean a catalog from a CSV file.
    ///
    /// This is the main entry point for building a catalog from disk.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading catalog from {:?}", path);
        let bytes = parser::read_source(path)?;
        Self::from_csv_bytes(&bytes, &path.display().to_string())
    }

    /// Clean a catalog from CSV bytes. Invalid UTF-8 is replaced, not rejected.
    pub fn from_csv_bytes(bytes: &[u8], source: &str) -> Result<Self> {
        let raw = parser::parse_table(bytes, source)?;
        Ok(Self::from_raw_records(raw))
    }

    /// Apply the cleaning rules to raw rows.
    ///
    /// Field parsing runs in parallel; the dedupe pass is sequential so that
    /// "first occurrence" always means corpus order.
    pub fn from_raw_records(raw: Vec<RawRecord>) -> Self {
        let rows_read = raw.len();
        let parsed: Vec<ParsedRow> = raw.into_par_iter().map(ParsedRow::from_raw).collect();

        let mut catalog = Catalog::new();
        let mut stats = IngestStats {
            rows_read,
            ..IngestStats::default()
        };
        let mut seen: HashSet<ItemId> = HashSet::with_capacity(parsed.len());

        for row in parsed {
            let Some(id) = row.id else {
                stats.dropped_invalid_id += 1;
                continue;
            };
            if !seen.insert(id) {
                stats.dropped_duplicate_id += 1;
                continue;
            }
            let Some(title) = row.title else {
                stats.dropped_missing_title += 1;
                continue;
            };

            if row.genres == GenreField::Unparsable {
                stats.unparsable_genres += 1;
            }
            if row.runtime.is_none() {
                stats.missing_runtime += 1;
            }

            catalog.insert_record(CatalogRecord {
                id,
                title,
                genre_names: row.genres.into_names(),
                runtime: row.runtime,
                language: row.language,
                overview: row.overview,
            });
        }

        debug!(
            "Dropped {} rows with invalid ids, {} duplicates, {} without titles",
            stats.dropped_invalid_id, stats.dropped_duplicate_id, stats.dropped_missing_title
        );
        debug!(
            "Degraded {} unparsable genre fields, {} missing runtimes",
            stats.unparsable_genres, stats.missing_runtime
        );
        info!("Catalog cleaned: {} of {} rows kept", catalog.len(), rows_read);

        catalog.stats = stats;
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn raw(id: &str, title: Option<&str>) -> RawRecord {
        RawRecord {
            id: Some(id.to_string()),
            title: title.map(str::to_string),
            ..RawRecord::default()
        }
    }

    #[test]
    fn test_drops_unparsable_ids() {
        let catalog = Catalog::from_raw_records(vec![
            raw("1", Some("One")),
            raw("1997-08-20", Some("Bad id")),
            RawRecord {
                title: Some("No id".to_string()),
                ..RawRecord::default()
            },
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.stats().dropped_invalid_id, 2);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let catalog = Catalog::from_raw_records(vec![
            raw("7", Some("First")),
            raw("8", Some("Other")),
            raw("7.0", Some("Second")),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get_record(7).unwrap().title, "First");
        assert_eq!(catalog.stats().dropped_duplicate_id, 1);
    }

    #[test]
    fn test_dedupe_happens_before_title_filter() {
        let catalog = Catalog::from_raw_records(vec![
            raw("5", None),
            raw("5", Some("Late title")),
            raw("6", Some("")),
        ]);

        assert!(catalog.is_empty());
        assert_eq!(catalog.stats().dropped_missing_title, 2);
        assert_eq!(catalog.stats().dropped_duplicate_id, 1);
        assert_eq!(catalog.stats().kept(), 0);
    }

    #[test]
    fn test_whitespace_title_is_kept() {
        let catalog = Catalog::from_raw_records(vec![raw("9", Some("   "))]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get_record(9).unwrap().title, "   ");
        assert_eq!(catalog.stats().dropped_missing_title, 0);
    }

    #[test]
    fn test_stray_quote_keeps_following_rows() {
        let csv = "id,title,overview\n1,Heat,a 12\" record\n2,Up,plain\n3,Alien,plain\n";
        let catalog = Catalog::from_csv_bytes(csv.as_bytes(), "inline.csv").unwrap();

        let ids: Vec<ItemId> = catalog.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(catalog.get_record(1).unwrap().overview, "a 12\" record");
    }

    #[test]
    fn test_bad_genres_and_runtime_degrade() {
        let catalog = Catalog::from_raw_records(vec![RawRecord {
            id: Some("3".to_string()),
            title: Some("Broken".to_string()),
            genres: Some("[{'name': 'Action'".to_string()),
            runtime: Some("long".to_string()),
            original_language: Some(" en ".to_string()),
            overview: None,
        }]);

        let record = catalog.get_record(3).unwrap();
        assert!(record.genre_names.is_empty());
        assert_eq!(record.runtime, None);
        assert_eq!(record.language, "en");
        assert_eq!(record.overview, "");
        assert_eq!(catalog.stats().unparsable_genres, 1);
        assert_eq!(catalog.stats().missing_runtime, 1);
    }

    #[test]
    fn test_records_keep_corpus_order() {
        let catalog = Catalog::from_raw_records(vec![
            raw("30", Some("c")),
            raw("10", Some("a")),
            raw("20", Some("b")),
        ]);
        let ids: Vec<ItemId> = catalog.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "id,title,genres,runtime,original_language,overview\n\
             862,Toy Story,\"[{{'id': 16, 'name': 'Animation'}}]\",81.0,en,\"Toys, alive\"\n"
        )
        .unwrap();

        let catalog = Catalog::load_from_file(file.path()).unwrap();
        let record = catalog.get_record(862).unwrap();
        assert_eq!(record.genre_names, vec!["Animation".to_string()]);
        assert_eq!(record.runtime, Some(81.0));
        assert_eq!(record.overview, "Toys, alive");
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = Catalog::load_from_file(Path::new("/nonexistent/movies.csv")).unwrap_err();
        assert!(matches!(err, crate::DataLoadError::SourceUnavailable { .. }));
    }
}
