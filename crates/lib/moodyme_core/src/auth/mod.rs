//! Admin session credentials.
//!
//! Sessions are self-contained signed tokens; nothing is stored server-side.
//! The signing secret is resolved once at startup (see [`secret`]).

pub mod password;
pub mod secret;
pub mod session;

use thiserror::Error;

pub use session::{DEFAULT_SESSION_TTL_DAYS, SessionCodec};

/// Session credential errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid session signature")]
    InvalidSignature,

    #[error("Session expired")]
    Expired,

    #[error("Malformed session: {0}")]
    Malformed(String),

    #[error("Session encode error: {0}")]
    Encode(String),
}
