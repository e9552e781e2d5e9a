//! # Adapters
//!
//! Concrete implementations of [`crate::ports::Database`].

pub mod memory_store;

pub use memory_store::MemoryStore;
