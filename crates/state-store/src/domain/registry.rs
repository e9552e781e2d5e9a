//! # Contract Registry
//!
//! The registry is a thin domain-layer wrapper around the reserved
//! [`CONTRACTS_COLLECTION`] collection: lookup by name, and one-shot
//! insertion (deployment is immutable — there is no `update`).

use crate::domain::entities::{ContractRecord, CONTRACTS_COLLECTION};
use crate::domain::errors::StateError;
use crate::ports::Database;

/// Looks up a deployed contract by name.
pub fn get_contract(db: &dyn Database, name: &str) -> Option<ContractRecord> {
    let mut query = crate::domain::entities::Query::new();
    query.insert("name".into(), name.into());
    db.find_one(CONTRACTS_COLLECTION, &query)
        .and_then(|doc| ContractRecord::from_document(&doc))
}

/// Registers a new contract. Fails if the name is already taken.
pub fn insert_contract(db: &mut dyn Database, record: ContractRecord) -> Result<(), StateError> {
    if get_contract(db, &record.name).is_some() {
        return Err(StateError::DuplicateContract);
    }
    db.insert(CONTRACTS_COLLECTION, record.into_document())
}
