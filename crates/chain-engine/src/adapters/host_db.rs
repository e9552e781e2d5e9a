//! Implements [`contract_sandbox::HostDb`] against a shared
//! [`state_store::adapters::MemoryStore`], qualifying every table name
//! with the calling contract's name.

use contract_sandbox::HostDb;
use state_store::{Database, Document, MemoryStore, Query};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// One contract run's view of the store. `owned` is the registry's
/// table set at the time the run started; `created` accumulates tables
/// made during this run (only possible when `allow_create`, i.e. the
/// deploy bootstrap) so the caller can fold them into the registry
/// entry once the run succeeds.
#[derive(Clone)]
pub(crate) struct StoreHostDb {
    store: Rc<RefCell<MemoryStore>>,
    contract: String,
    allow_create: bool,
    owned: BTreeSet<String>,
    created: Rc<RefCell<BTreeSet<String>>>,
}

impl StoreHostDb {
    pub(crate) fn new(
        store: Rc<RefCell<MemoryStore>>,
        contract: String,
        allow_create: bool,
        owned: BTreeSet<String>,
    ) -> Self {
        Self {
            store,
            contract,
            allow_create,
            owned,
            created: Rc::new(RefCell::new(BTreeSet::new())),
        }
    }

    fn qualify(&self, logical_name: &str) -> String {
        format!("{}_{}", self.contract, logical_name)
    }

    /// Tables created during this run, for folding into the registry
    /// entry after a successful deploy.
    pub(crate) fn created_tables(&self) -> BTreeSet<String> {
        self.created.borrow().clone()
    }
}

impl HostDb for StoreHostDb {
    fn create_table(&mut self, logical_name: &str) -> Option<String> {
        if !self.allow_create {
            return None;
        }
        let qualified = self.qualify(logical_name);
        self.store.borrow_mut().create_collection(&qualified);
        self.created.borrow_mut().insert(qualified.clone());
        Some(qualified)
    }

    fn get_table(&self, logical_name: &str) -> Option<String> {
        let qualified = self.qualify(logical_name);
        if self.owned.contains(&qualified) || self.created.borrow().contains(&qualified) {
            Some(qualified)
        } else {
            None
        }
    }

    fn find(&self, qualified_table: &str, query: &Query) -> Vec<Document> {
        self.store.borrow().find(qualified_table, query)
    }

    fn insert(&mut self, qualified_table: &str, doc: Document) {
        let _ = self.store.borrow_mut().insert(qualified_table, doc);
    }

    fn update(&mut self, qualified_table: &str, doc: Document) -> bool {
        self.store.borrow_mut().update(qualified_table, doc).is_ok()
    }

    fn find_in_table(&self, contract: &str, table: &str, query: &Query) -> Vec<Document> {
        let qualified = format!("{contract}_{table}");
        self.store.borrow().find(&qualified, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Rc<RefCell<MemoryStore>> {
        Rc::new(RefCell::new(MemoryStore::default()))
    }

    #[test]
    fn invoke_mode_cannot_create_tables() {
        let mut db = StoreHostDb::new(store(), "wallet".into(), false, BTreeSet::new());
        assert_eq!(db.create_table("balances"), None);
    }

    #[test]
    fn deploy_mode_creates_and_then_sees_the_table() {
        let mut db = StoreHostDb::new(store(), "wallet".into(), true, BTreeSet::new());
        let qualified = db.create_table("balances").unwrap();
        assert_eq!(qualified, "wallet_balances");
        assert_eq!(db.get_table("balances"), Some(qualified.clone()));
        assert_eq!(db.created_tables(), BTreeSet::from([qualified]));
    }

    #[test]
    fn get_table_is_scoped_to_already_owned_tables() {
        let owned = BTreeSet::from(["wallet_balances".to_string()]);
        let db = StoreHostDb::new(store(), "wallet".into(), false, owned);
        assert_eq!(db.get_table("balances"), Some("wallet_balances".to_string()));
        assert_eq!(db.get_table("nonexistent"), None);
    }

    #[test]
    fn find_in_table_crosses_contract_boundaries() {
        let shared = store();
        shared.borrow_mut().create_collection("wallet_balances");
        let mut doc = Document::new();
        doc.insert("account".into(), serde_json::json!("alice"));
        shared.borrow_mut().insert("wallet_balances", doc).unwrap();

        let db = StoreHostDb::new(shared, "exchange".into(), false, BTreeSet::new());
        let found = db.find_in_table("wallet", "balances", &Query::new());
        assert_eq!(found.len(), 1);
    }
}
