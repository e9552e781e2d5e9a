//! # Adapters
//!
//! Concrete implementations of [`crate::ports::Sandbox`].

pub mod rhai_sandbox;

pub use rhai_sandbox::{wrap_source, RhaiSandbox, DISPATCH_TEMPLATE};
