//! # Sandbox Port
//!
//! The interface the execution engine depends on to run untrusted
//! contract code (§6, External Interfaces: Sandbox).

use crate::domain::{HostObject, SandboxError, SandboxOutcome};
use crate::ports::host_db::HostDb;
use std::time::Duration;

/// A compiled, reusable form of contract source. A `rhai::AST` in this
/// implementation; opaque to every other crate.
pub type Artifact = rhai::AST;

/// Reentrant invocation hook: `(contract, action, payload) -> outcome`.
/// Supplied by the executor so a contract's `executeSmartContract` call
/// can recurse back through dispatch without this crate depending on
/// `chain-engine`. Owned (not borrowed) so it can be registered on a
/// scripting engine that requires its host functions to outlive no
/// particular stack frame.
pub type ReentrantCall = dyn FnMut(&str, &str, serde_json::Value) -> Result<SandboxOutcome, SandboxError>;

/// Everything a single [`Sandbox::run`] call needs beyond the artifact
/// itself. Built fresh by the executor for every call; nothing here is
/// reused across runs.
pub struct RunContext {
    /// Sender/owner/action/payload for this run.
    pub host: HostObject,
    /// Whether this is the deploy bootstrap call (`action == "create"`),
    /// which alone may create tables.
    pub is_deploy: bool,
    /// Table access scoped to the calling contract.
    pub db: Box<dyn HostDb>,
    /// Wall-clock ceiling for this run.
    pub quantum: Duration,
    /// Reentrant call hook for `executeSmartContract`.
    pub reenter: Box<ReentrantCall>,
}

/// Compiles and runs untrusted contract code with sealed globals and a
/// bounded time quantum.
pub trait Sandbox {
    /// Parses `source` into a reusable artifact. Fails with
    /// [`SandboxError::CompileError`] on a syntax or type error.
    fn compile(&self, source: &str) -> Result<Artifact, SandboxError>;

    /// Runs `artifact` against `ctx`. A fresh interpreter state is used
    /// for every call: no host object or reference survives past
    /// return.
    fn run(&self, artifact: &Artifact, ctx: RunContext) -> Result<SandboxOutcome, SandboxError>;
}
