//! # moodyme_core
//!
//! Core domain logic for the MoodyMe admin service: session credentials,
//! identity-provider and document-store adapters, the fixed content set,
//! user directory aggregation and dashboard statistics.

pub mod auth;
pub mod content;
pub mod directory;
pub mod documents;
pub mod firebase;
pub mod identity;
pub mod ids;
pub mod models;
pub mod stats;
pub mod validation;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
