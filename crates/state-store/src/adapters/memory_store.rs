//! # In-memory Document Store
//!
//! The sole adapter for the [`Database`] port. The engine is
//! single-threaded and synchronous (the chain owns one store and hands
//! out borrows per transaction), so this holds plain owned collections —
//! no interior mutability, no locks.

use crate::domain::{Document, Query, StateError};
use crate::ports::Database;
use std::collections::HashMap;

/// In-memory, ordered-per-collection document store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<Document>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Database for MemoryStore {
    fn create_collection(&mut self, name: &str) {
        self.collections.entry(name.to_string()).or_default();
    }

    fn has_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    fn find(&self, collection: &str, query: &Query) -> Vec<Document> {
        self.collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| crate::domain::matches(doc, query))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn insert(&mut self, collection: &str, doc: Document) -> Result<(), StateError> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(doc);
        Ok(())
    }

    fn update(&mut self, collection: &str, doc: Document) -> Result<(), StateError> {
        let id = doc.get("_id").cloned();
        let docs = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| StateError::CollectionNotFound(collection.to_string()))?;
        let slot = docs
            .iter_mut()
            .find(|existing| existing.get("_id").cloned() == id && id.is_some())
            .ok_or_else(|| StateError::UpdateTargetNotFound {
                collection: collection.to_string(),
            })?;
        *slot = doc;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: i64, v: i64) -> Document {
        json!({"_id": id, "v": v}).as_object().unwrap().clone()
    }

    #[test]
    fn insert_then_find_round_trips() {
        let mut store = MemoryStore::new();
        store.insert("t", doc(1, 10)).unwrap();
        store.insert("t", doc(2, 20)).unwrap();

        let mut query = Query::new();
        query.insert("v".into(), json!(20));
        let found = store.find("t", &query);
        assert_eq!(found, vec![doc(2, 20)]);
    }

    #[test]
    fn find_on_missing_collection_is_empty() {
        let store = MemoryStore::new();
        assert!(store.find("missing", &Query::new()).is_empty());
    }

    #[test]
    fn update_replaces_matching_document() {
        let mut store = MemoryStore::new();
        store.insert("t", doc(1, 10)).unwrap();
        store.update("t", doc(1, 99)).unwrap();

        let found = store.find_one("t", &Query::new()).unwrap();
        assert_eq!(found.get("v").unwrap(), &json!(99));
    }

    #[test]
    fn update_without_match_fails() {
        let mut store = MemoryStore::new();
        store.insert("t", doc(1, 10)).unwrap();
        let err = store.update("t", doc(2, 1)).unwrap_err();
        assert_eq!(
            err,
            StateError::UpdateTargetNotFound {
                collection: "t".to_string()
            }
        );
    }

    #[test]
    fn create_collection_is_idempotent() {
        let mut store = MemoryStore::new();
        store.create_collection("contracts");
        store.create_collection("contracts");
        assert!(store.has_collection("contracts"));
        assert!(store.find("contracts", &Query::new()).is_empty());
    }
}
