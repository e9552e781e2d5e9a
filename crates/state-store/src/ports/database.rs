//! # Database Port
//!
//! The driven interface the execution engine depends on (§6, External
//! Interfaces: State store). Any collaborator that can create
//! collections by name and run equality queries over them satisfies this
//! trait; [`crate::adapters::MemoryStore`] is the in-memory implementation
//! shipped with this crate.

use crate::domain::{Document, Query, StateError};

/// Collection creation, lookup, and per-collection CRUD/query operations.
pub trait Database {
    /// Creates the named collection if it does not already exist.
    /// Idempotent.
    fn create_collection(&mut self, name: &str);

    /// Returns true if the named collection exists.
    fn has_collection(&self, name: &str) -> bool;

    /// Returns every document in `collection` matching `query`, in
    /// insertion order. An empty/missing collection yields an empty list.
    fn find(&self, collection: &str, query: &Query) -> Vec<Document>;

    /// Returns the first document in `collection` matching `query`, if
    /// any.
    fn find_one(&self, collection: &str, query: &Query) -> Option<Document> {
        self.find(collection, query).into_iter().next()
    }

    /// Appends `doc` to `collection`, creating the collection first if
    /// needed.
    fn insert(&mut self, collection: &str, doc: Document) -> Result<(), StateError>;

    /// Replaces the first document in `collection` whose `_id` field
    /// equals `doc`'s `_id` field. Fails with
    /// [`StateError::UpdateTargetNotFound`] if `collection` holds no such
    /// document.
    fn update(&mut self, collection: &str, doc: Document) -> Result<(), StateError>;
}
