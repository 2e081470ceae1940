//! Business logic layered between handlers and the core adapters.

pub mod auth;
pub mod cookies;
pub mod users;
