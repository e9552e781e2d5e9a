//! # Domain Entities
//!
//! Pure data carried across the sandbox boundary: what a contract run is
//! given (`HostObject`) and what it hands back (`SandboxOutcome`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One `{event, data}` pair emitted by a contract via `emit(...)`, kept
/// in emission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedEvent {
    /// Event name as passed to `emit`.
    pub event: String,
    /// Event payload as passed to `emit`.
    pub data: Value,
}

/// Everything a single contract run is given from the executor.
///
/// `sender`/`owner` are absent for the deploy bootstrap call (§4.G: the
/// `create` action runs before any registry entry — and therefore any
/// owner — exists).
#[derive(Clone, Debug)]
pub struct HostObject {
    /// Transaction sender, absent only for the deploy bootstrap.
    pub sender: Option<String>,
    /// The invoked contract's registered owner, absent only for deploy.
    pub owner: Option<String>,
    /// `"create"` for deploy, the transaction's action otherwise.
    pub action: String,
    /// Deep-copied parameters; the sandbox cannot mutate this back into
    /// the executor's copy.
    pub payload: Value,
}

/// The events a successful contract run produced, in the order `emit`
/// was called (including events merged in from reentrant calls).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SandboxOutcome {
    /// Events emitted during the run.
    pub events: Vec<EmittedEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sandbox_outcome_defaults_to_no_events() {
        assert!(SandboxOutcome::default().events.is_empty());
    }
}
