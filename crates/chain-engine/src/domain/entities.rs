//! Transaction and block entities, and the Merkle root over a block's
//! transaction hashes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A deploy or invoke request. `hash` is computed once, at
/// construction, over the six fields below (using the literal `"null"`
/// for any field that is absent); `logs` starts empty and is filled in
/// exactly once, by block production, after the transaction has run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Block the sender believed this transaction would land in.
    /// Informational only; never validated against the block it
    /// actually ends up in.
    pub ref_block_number: Option<i64>,
    /// Opaque identifier, meaningful only to whoever constructed it.
    pub transaction_id: Option<String>,
    /// Account on whose behalf this transaction runs.
    pub sender: Option<String>,
    /// Target contract name, or the reserved name `"contract"` for a
    /// deploy.
    pub contract: Option<String>,
    /// Action to invoke, or `"deploy"` to create a new contract.
    pub action: Option<String>,
    /// JSON-encoded parameters, or `None`.
    pub payload: Option<String>,
    /// Content hash fixed at construction.
    pub hash: String,
    logs: Value,
}

impl Transaction {
    /// Builds a transaction and computes its hash immediately.
    pub fn new(
        ref_block_number: Option<i64>,
        transaction_id: Option<String>,
        sender: Option<String>,
        contract: Option<String>,
        action: Option<String>,
        payload: Option<String>,
    ) -> Self {
        let hash = Self::compute_hash(
            ref_block_number,
            &transaction_id,
            &sender,
            &contract,
            &action,
            &payload,
        );
        Self {
            ref_block_number,
            transaction_id,
            sender,
            contract,
            action,
            payload,
            hash,
            logs: Value::Null,
        }
    }

    fn compute_hash(
        ref_block_number: Option<i64>,
        transaction_id: &Option<String>,
        sender: &Option<String>,
        contract: &Option<String>,
        action: &Option<String>,
        payload: &Option<String>,
    ) -> String {
        let ref_block_number = ref_block_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "null".to_string());
        let parts = [
            ref_block_number.as_str(),
            transaction_id.as_deref().unwrap_or("null"),
            sender.as_deref().unwrap_or("null"),
            contract.as_deref().unwrap_or("null"),
            action.as_deref().unwrap_or("null"),
            payload.as_deref().unwrap_or("null"),
        ];
        shared_crypto::sha256_hex_concat(&parts)
    }

    /// The logs this transaction's execution produced. `Value::Null`
    /// until block production has run it.
    pub fn logs(&self) -> &Value {
        &self.logs
    }

    /// Records the outcome of running this transaction. Called at most
    /// once, by block production, immediately after dispatch.
    pub(crate) fn set_logs(&mut self, logs: Value) {
        self.logs = logs;
    }
}

/// A batch of executed transactions linked to its predecessor.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Height, starting at 0 for genesis.
    pub block_number: u64,
    /// Hash of the previous block, or `"0"` for genesis.
    pub previous_hash: String,
    /// Block timestamp, caller-supplied.
    pub timestamp: String,
    /// Transactions in execution order, each carrying its post-run logs.
    pub transactions: Vec<Transaction>,
    /// `sha256(previousHash || timestamp || JSON(transactions))`,
    /// computed after every transaction's logs are populated.
    pub hash: String,
    /// Merkle root over `transactions`' hashes.
    pub merkle_root: String,
}

impl Block {
    pub(crate) fn compute_hash(previous_hash: &str, timestamp: &str, transactions: &[Transaction]) -> String {
        let encoded = serde_json::to_string(transactions).expect("transactions always serialize");
        shared_crypto::sha256_hex_concat(&[previous_hash, timestamp, &encoded])
    }

    pub(crate) fn new(
        block_number: u64,
        previous_hash: String,
        timestamp: String,
        transactions: Vec<Transaction>,
    ) -> Self {
        let merkle_root = merkle_root(&transactions);
        let hash = Self::compute_hash(&previous_hash, &timestamp, &transactions);
        Self {
            block_number,
            previous_hash,
            timestamp,
            transactions,
            hash,
            merkle_root,
        }
    }
}

/// Bottom-up Merkle root over each transaction's hash: pairs of
/// adjacent hashes are concatenated and re-hashed level by level,
/// duplicating the last hash of a level when it has an odd count.
/// Empty input yields the empty string.
pub fn merkle_root(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return String::new();
    }
    let mut level: Vec<String> = transactions.iter().map(|tx| tx.hash.clone()).collect();
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            let left = pair[0].as_str();
            let right = pair.get(1).map(String::as_str).unwrap_or(left);
            next.push(shared_crypto::sha256_hex_concat(&[left, right]));
        }
        level = next;
    }
    level.into_iter().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str) -> Transaction {
        Transaction::new(
            Some(1),
            Some(id.to_string()),
            Some("alice".to_string()),
            Some("wallet".to_string()),
            Some("transfer".to_string()),
            Some(r#"{"to":"bob"}"#.to_string()),
        )
    }

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(tx("t1").hash, tx("t1").hash);
    }

    #[test]
    fn hash_changes_with_any_field() {
        assert_ne!(tx("t1").hash, tx("t2").hash);
    }

    #[test]
    fn absent_sender_hashes_the_same_as_the_literal_string_null() {
        let with_null_sender = Transaction::new(Some(1), Some("t1".into()), None, Some("wallet".into()), Some("transfer".into()), None);
        let with_literal_sender = Transaction::new(
            Some(1),
            Some("t1".into()),
            Some("null".into()),
            Some("wallet".into()),
            Some("transfer".into()),
            None,
        );
        assert_eq!(with_null_sender.hash, with_literal_sender.hash);
    }

    #[test]
    fn merkle_root_of_empty_block_is_empty_string() {
        assert_eq!(merkle_root(&[]), "");
    }

    #[test]
    fn merkle_root_duplicates_last_hash_when_odd() {
        let txs = vec![tx("t1"), tx("t2"), tx("t3")];
        let pair = shared_crypto::sha256_hex_concat(&[txs[0].hash.as_str(), txs[1].hash.as_str()]);
        let tail = shared_crypto::sha256_hex_concat(&[txs[2].hash.as_str(), txs[2].hash.as_str()]);
        let expected = shared_crypto::sha256_hex_concat(&[pair.as_str(), tail.as_str()]);
        assert_eq!(merkle_root(&txs), expected);
    }

    #[test]
    fn logs_start_null_and_can_be_set_once() {
        let mut transaction = tx("t1");
        assert!(transaction.logs().is_null());
        transaction.set_logs(serde_json::json!({"events": []}));
        assert_eq!(transaction.logs(), &serde_json::json!({"events": []}));
    }

    #[test]
    fn block_hash_changes_when_a_transaction_logs_changes() {
        let mut t = tx("t1");
        let before = Block::new(1, "0".into(), "ts".into(), vec![t.clone()]);
        t.set_logs(serde_json::json!({"events": [{"event": "x", "data": null}]}));
        let after = Block::new(1, "0".into(), "ts".into(), vec![t]);
        assert_ne!(before.hash, after.hash);
    }
}
