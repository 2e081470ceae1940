//! Domain models.
//!
//! These are internal domain models shared by the adapters and the HTTP
//! layer. Wire names are camelCase to match the documents written by the
//! mobile app.

pub mod content;
pub mod session;
pub mod user;
