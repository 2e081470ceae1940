//! HTTP request handlers.

pub mod auth;
pub mod content;
pub mod dashboard;
pub mod pages;
pub mod users;
