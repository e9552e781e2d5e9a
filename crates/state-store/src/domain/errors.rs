//! # State Management Error Types
//!
//! Defines all error conditions for state operations. Each error is
//! recoverable - no panics occur in production code.

use thiserror::Error;

/// State store errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The named collection has not been created.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    /// A contract name that is already registered was deployed again.
    #[error("contract already exists")]
    DuplicateContract,

    /// `update` was given a document missing its identity field, or one
    /// that does not match any existing document.
    #[error("no matching document to update in collection {collection}")]
    UpdateTargetNotFound {
        /// Collection the update targeted.
        collection: String,
    },
}
