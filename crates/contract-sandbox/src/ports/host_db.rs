//! # Host Database Port
//!
//! What a running contract is allowed to do to the state store, shaped
//! by deploy-vs-invoke ownership rules rather than exposing the raw
//! `state_store::Database` trait directly to sandboxed code.

use state_store::{Document, Query};

/// Table access as seen from inside a contract run.
///
/// Implemented by `chain-engine`'s executor, which owns both the
/// registry and the store and therefore knows which tables the calling
/// contract owns. All table names here are fully qualified
/// (`"{contract}_{logical}"`) except where noted.
pub trait HostDb {
    /// Creates (idempotently) a table owned by the calling contract and
    /// returns its fully qualified name. Only available during the
    /// deploy bootstrap; an invoke-mode implementation returns `None`.
    fn create_table(&mut self, logical_name: &str) -> Option<String>;

    /// Returns the fully qualified name of `logical_name` iff it is
    /// already owned by the calling contract.
    fn get_table(&self, logical_name: &str) -> Option<String>;

    /// Runs an equality query against an already-qualified table name.
    fn find(&self, qualified_table: &str, query: &Query) -> Vec<Document>;

    /// Single-row variant of [`HostDb::find`].
    fn find_one(&self, qualified_table: &str, query: &Query) -> Option<Document> {
        self.find(qualified_table, query).into_iter().next()
    }

    /// Inserts `doc` into an already-qualified table name.
    fn insert(&mut self, qualified_table: &str, doc: Document);

    /// Replaces a matching document in an already-qualified table.
    /// Returns `false` if nothing matched.
    fn update(&mut self, qualified_table: &str, doc: Document) -> bool;

    /// Runs an equality query against `contract`'s `table`, regardless
    /// of which contract is calling. Read-only, cross-contract escape
    /// hatch; never ownership-gated.
    fn find_in_table(&self, contract: &str, table: &str, query: &Query) -> Vec<Document>;

    /// Single-row variant of [`HostDb::find_in_table`].
    fn find_one_in_table(&self, contract: &str, table: &str, query: &Query) -> Option<Document> {
        self.find_in_table(contract, table, query).into_iter().next()
    }
}
