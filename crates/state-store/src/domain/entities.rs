//! # Domain Entities for State Management
//!
//! Core data structures for the document store: a `Document` is a JSON
//! object, a `Collection` is an ordered list of documents addressed by
//! name, and a `Query` is an equality predicate evaluated against a
//! document's top-level fields.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// A stored record. Always a JSON object; the store never holds bare
/// scalars or arrays at the top level.
pub type Document = Map<String, Value>;

/// An equality predicate: a document matches a query when every field
/// named in the query is present in the document with an equal value.
/// The empty query matches every document.
pub type Query = Map<String, Value>;

/// Returns true if `doc` satisfies every equality constraint in `query`.
pub fn matches(doc: &Document, query: &Query) -> bool {
    query
        .iter()
        .all(|(key, expected)| doc.get(key) == Some(expected))
}

/// Name of the reserved collection holding deployed contract metadata.
pub const CONTRACTS_COLLECTION: &str = "contracts";

/// A deployed contract's registry entry.
///
/// Stored as a document in the reserved [`CONTRACTS_COLLECTION`]. `code`
/// holds the sandbox's compiled-artifact representation (an opaque string
/// from this crate's point of view); `tables` is the set of fully
/// qualified table names (`"{name}_{logical}"`) this contract owns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractRecord {
    /// Globally unique contract name; the registry's primary key.
    pub name: String,
    /// Account that deployed the contract.
    pub owner: String,
    /// Compiled sandbox artifact, serialized as text.
    pub code: String,
    /// Fully qualified names of tables this contract owns.
    pub tables: BTreeSet<String>,
}

impl ContractRecord {
    /// Fully qualifies a logical table name under this contract.
    pub fn qualify(&self, logical_name: &str) -> String {
        format!("{}_{logical_name}", self.name)
    }

    pub(crate) fn into_document(self) -> Document {
        let mut doc = Map::new();
        doc.insert("name".into(), Value::String(self.name));
        doc.insert("owner".into(), Value::String(self.owner));
        doc.insert("code".into(), Value::String(self.code));
        doc.insert(
            "tables".into(),
            Value::Array(self.tables.into_iter().map(Value::String).collect()),
        );
        doc
    }

    pub(crate) fn from_document(doc: &Document) -> Option<Self> {
        let name = doc.get("name")?.as_str()?.to_string();
        let owner = doc.get("owner")?.as_str()?.to_string();
        let code = doc.get("code")?.as_str()?.to_string();
        let tables = doc
            .get("tables")?
            .as_array()?
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        Some(Self {
            name,
            owner,
            code,
            tables,
        })
    }
}
