//! Shared fixtures for unit tests.

use data_loader::{Catalog, CatalogRecord, ItemId};

pub fn record(id: ItemId, genres: &[&str], runtime: Option<f64>, language: &str) -> CatalogRecord {
    CatalogRecord {
        id,
        title: format!("Movie {}", id),
        genre_names: genres.iter().map(|g| g.to_string()).collect(),
        runtime,
        language: language.to_string(),
        overview: String::new(),
    }
}

pub fn catalog(records: Vec<CatalogRecord>) -> Catalog {
    let mut catalog = Catalog::new();
    for record in records {
        catalog.insert_record(record);
    }
    catalog
}

/// The three-item corpus: A (Action, 90, en), B (Comedy, 100, en), C (Action+Comedy, 95, `c_lang`)
pub fn abc_catalog(c_lang: &str) -> Catalog {
    catalog(vec![
        record(1, &["Action"], Some(90.0), "en"),
        record(2, &["Comedy"], Some(100.0), "en"),
        record(3, &["Action", "Comedy"], Some(95.0), c_lang),
    ])
}
