//! Domain layer: pure data and algorithms, no I/O.
//!
//! ## Entities
//!
//! - [`Transaction`]: a deploy or invoke request, content-addressed by
//!   its own hash, carrying the logs its execution produced.
//! - [`Block`]: an ordered batch of executed transactions, linked to
//!   its predecessor by hash and summarized by a Merkle root.
//!
//! ## Invariants
//!
//! - A transaction's `hash` is fixed at construction and never
//!   recomputed; only `logs` may change, and only once.
//! - A block's `hash`/`merkle_root` are computed after every
//!   transaction's `logs` have been populated, so tampering with either
//!   a transaction's fields or its logs changes the block hash.

mod entities;

pub use entities::{merkle_root, Block, Transaction};
