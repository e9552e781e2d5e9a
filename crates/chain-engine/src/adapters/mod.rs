//! Adapters binding `contract-sandbox`'s [`contract_sandbox::HostDb`] port
//! to a concrete [`state_store::Database`].

mod host_db;

pub(crate) use host_db::StoreHostDb;
