//! # Chain Engine
//!
//! A single-node smart-contract execution engine: transactions deploy
//! or invoke sandboxed contracts, block production batches and hashes
//! them, and the whole chain can be verified or replayed from genesis.
//!
//! ## Role in System
//!
//! - **Dispatch**: [`Executor`] decides deploy vs. invoke, builds the
//!   host object a contract sees, and turns a sandboxed run (or its
//!   failure) into the JSON logs attached to a transaction.
//! - **Production**: [`Chain`] queues transactions, batches them into
//!   [`Block`]s, and links each block to its predecessor by hash.
//! - **Integrity**: [`Chain::is_chain_valid`] re-derives every block's
//!   Merkle root and hash; [`Chain::replay_blockchain`] re-executes the
//!   whole history against a fresh store.
//!
//! ## Concurrency
//!
//! Single-threaded and synchronous throughout: there is no I/O to await,
//! so nothing here pulls in an async runtime.

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod adapters;
/// Chain state, block production, validity, and replay.
mod chain;
/// Engine-wide configuration.
pub mod config;
/// Pure domain entities: transactions, blocks, the Merkle root.
pub mod domain;
/// Error taxonomy for dispatch faults and internal-consistency failures.
pub mod error;
/// Per-transaction dispatch.
mod executor;

pub use chain::Chain;
pub use config::ExecutionConfig;
pub use domain::{merkle_root, Block, Transaction};
pub use error::{DispatchFault, EngineError};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
