//! # Domain Layer
//!
//! Pure data and error types shared by the sandbox port and its `rhai`
//! adapter. No I/O, no dependency on any concrete scripting engine.

pub mod entities;
pub mod errors;

pub use entities::{EmittedEvent, HostObject, SandboxOutcome};
pub use errors::SandboxError;
