//! # Ports
//!
//! Driven port exposed by this crate: [`Database`].

pub mod database;

pub use database::Database;
