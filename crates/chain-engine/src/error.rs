//! Error types for the execution engine.
//!
//! Almost every way a transaction can fail is a *soft* failure: it is
//! folded into that transaction's `logs` rather than aborting block
//! production. [`DispatchFault`] enumerates those. [`EngineError`] is
//! reserved for conditions the executor cannot attribute to the
//! transaction itself.

use contract_sandbox::SandboxError;
use thiserror::Error;

/// Why dispatching a single transaction produced no usable outcome.
/// Every variant here ends up as `{"error": ...}` in that transaction's
/// logs; none of them abort block production.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchFault {
    /// `sender`, `contract`, or `action` was missing.
    #[error("the parameters sender, contract and action are required")]
    MissingOperands,
    /// A transaction tried to invoke the reserved `create` action on an
    /// already-deployed contract.
    #[error("you cannot trigger the create action")]
    ReservedAction,
    /// The named contract has no registry entry.
    #[error("contract doesn't exist")]
    UnknownContract,
    /// A deploy targeted a contract name that is already registered.
    #[error("contract already exists")]
    DuplicateContract,
    /// The deploy payload was missing `name`/`code`, or `code` was not
    /// valid base64 / UTF-8.
    #[error("parameters name and code are mandatory")]
    BadDeployPayload,
    /// The contract's sandboxed run itself failed.
    #[error(transparent)]
    Sandbox(#[from] SandboxError),
}

/// An internal-consistency failure: something the executor expected to
/// hold regardless of transaction content. Reserved for conditions that
/// in practice should not occur given a correctly wired `Chain`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The underlying state store rejected an operation the executor
    /// believed was already validated (e.g. a duplicate insert after an
    /// uniqueness check just passed).
    #[error("state store returned an inconsistent result: {0}")]
    InconsistentState(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sandbox_fault_wraps_transparently() {
        let fault = DispatchFault::from(SandboxError::Timeout);
        assert_eq!(fault.to_string(), "timeout");
    }

    #[test]
    fn soft_faults_have_stable_messages() {
        assert_eq!(
            DispatchFault::MissingOperands.to_string(),
            "the parameters sender, contract and action are required"
        );
        assert_eq!(DispatchFault::UnknownContract.to_string(), "contract doesn't exist");
    }
}
