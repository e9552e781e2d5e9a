//! # Ports
//!
//! Traits this crate exposes ([`Sandbox`]) and depends on ([`HostDb`]).

pub mod host_db;
pub mod sandbox;

pub use host_db::HostDb;
pub use sandbox::{Artifact, ReentrantCall, RunContext, Sandbox};
