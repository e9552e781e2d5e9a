//! # Domain Layer for State Management
//!
//! Pure domain logic: the document/query model, the contract registry,
//! and the crate's error type.
//!
//! ## Modules
//!
//! - `entities`: `Document`, `Query`, `ContractRecord`.
//! - `registry`: lookup and one-shot insertion over the reserved `contracts` collection.
//! - `errors`: domain error type.

pub mod entities;
pub mod errors;
pub mod registry;

pub use entities::{matches, ContractRecord, Document, Query, CONTRACTS_COLLECTION};
pub use errors::StateError;
pub use registry::{get_contract, insert_contract};
