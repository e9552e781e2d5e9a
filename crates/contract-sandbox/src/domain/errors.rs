//! # Sandbox Error Taxonomy
//!
//! A contract run can fail in exactly four distinguishable ways. The
//! variants carry no engine-specific text: replay must reproduce the
//! same `logs`, and therefore the same block hash, even if the
//! underlying scripting engine's own error wording changes between
//! versions. [`SandboxError::name`] and [`SandboxError::message`] are
//! the only strings ever written to a transaction's logs.

use thiserror::Error;

/// Why a contract run failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SandboxError {
    /// The wrapped source failed to parse or type-check.
    #[error("compile_error")]
    CompileError,
    /// The contract threw, indexed out of bounds, or otherwise faulted
    /// while running.
    #[error("runtime_error")]
    RuntimeError,
    /// The execution quantum elapsed before the run returned.
    #[error("timeout")]
    Timeout,
    /// Reentrant calls via `executeSmartContract` exceeded the
    /// configured call-depth ceiling.
    #[error("depth_exceeded")]
    DepthExceeded,
}

impl SandboxError {
    /// Stable, engine-independent name for this failure kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CompileError => "CompileError",
            Self::RuntimeError => "RuntimeError",
            Self::Timeout => "Timeout",
            Self::DepthExceeded => "DepthExceeded",
        }
    }

    /// Stable, engine-independent human-readable message for this
    /// failure kind.
    pub fn message(&self) -> &'static str {
        match self {
            Self::CompileError => "failed to compile contract source",
            Self::RuntimeError => "contract execution raised an error",
            Self::Timeout => "contract execution exceeded its time quantum",
            Self::DepthExceeded => "reentrant call depth exceeded the configured limit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_has_a_stable_name_and_message() {
        for err in [
            SandboxError::CompileError,
            SandboxError::RuntimeError,
            SandboxError::Timeout,
            SandboxError::DepthExceeded,
        ] {
            assert!(!err.name().is_empty());
            assert!(!err.message().is_empty());
        }
    }
}
