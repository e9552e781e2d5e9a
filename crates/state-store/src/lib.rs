//! # State Store
//!
//! The execution engine's document store and contract registry.
//!
//! ## Role in System
//!
//! - **Single source of truth**: the authoritative, in-memory state
//!   consulted and mutated by every contract invocation.
//! - **Collections, not a trie**: unlike an account/balance ledger, a
//!   contract's data is a set of named JSON-document collections
//!   (`"{contract}_{table}"`), queried by equality predicate.
//! - **Contract registry**: a reserved `contracts` collection holding
//!   `{name, owner, code, tables}` per deployed contract (§4.D).
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|-----------------------|
//! | INV-1 | Contract names are globally unique | `domain::registry::insert_contract` |
//! | INV-2 | A table name is owned by exactly one contract | enforced by callers via `ContractRecord::tables` (this crate never auto-creates tables) |

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::MemoryStore;
pub use domain::{
    get_contract, insert_contract, matches, ContractRecord, Document, Query, StateError,
    CONTRACTS_COLLECTION,
};
pub use ports::Database;
