//! # Contract Sandbox
//!
//! Executes untrusted, deployed contract code against a host object
//! built by the executor, with sealed globals and a bounded time
//! quantum.
//!
//! ## Role in System
//!
//! - **Sealed execution**: each [`Sandbox::run`] call gets a fresh
//!   interpreter; no contract can retain a reference to the host across
//!   calls.
//! - **Deterministic faults**: failures are normalised into a fixed
//!   taxonomy ([`SandboxError`]) rather than surfacing engine-specific
//!   text, so replay reproduces identical logs.
//!
//! [`Sandbox::run`]: ports::Sandbox::run

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::RhaiSandbox;
pub use domain::{EmittedEvent, HostObject, SandboxError, SandboxOutcome};
pub use ports::{Artifact, HostDb, ReentrantCall, RunContext, Sandbox};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
