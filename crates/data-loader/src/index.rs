//! Bidirectional id ↔ title lookup.
//!
//! `id_to_title` is total over the catalog. `title_to_id` is not: when
//! several records share a title, the first one in corpus order owns it and
//! later records can only be reached by id.

use crate::types::{Catalog, ItemId};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct IdentifierIndex {
    id_to_title: HashMap<ItemId, String>,
    title_to_id: HashMap<String, ItemId>,
}

impl IdentifierIndex {
    /// Build both directions from the cleaned catalog
    pub fn build(catalog: &Catalog) -> Self {
        let mut index = Self {
            id_to_title: HashMap::with_capacity(catalog.len()),
            title_to_id: HashMap::with_capacity(catalog.len()),
        };

        for record in catalog.records() {
            index.id_to_title.insert(record.id, record.title.clone());
            index
                .title_to_id
                .entry(record.title.clone())
                .or_insert(record.id);
        }
        index
    }

    pub fn title_of(&self, id: ItemId) -> Option<&str> {
        self.id_to_title.get(&id).map(String::as_str)
    }

    /// Exact title lookup; resolves to the first id that carried the title
    pub fn id_of(&self, title: &str) -> Option<ItemId> {
        self.title_to_id.get(title).copied()
    }

    /// Distinct titles, sorted, for selection widgets
    pub fn titles(&self) -> Vec<&str> {
        let mut titles: Vec<&str> = self.title_to_id.keys().map(String::as_str).collect();
        titles.sort_unstable();
        titles
    }

    /// Number of ids indexed
    pub fn len(&self) -> usize {
        self.id_to_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_title.is_empty()
    }
}
