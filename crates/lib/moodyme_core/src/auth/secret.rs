//! Session secret resolution.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::ids::random_id;

const SECRET_LEN: usize = 64;

/// Resolve the session signing secret.
///
/// Order: `SESSION_SECRET`, then `JWT_SECRET`, then a secret persisted under
/// the user data directory (generated on first use).
pub fn resolve_session_secret() -> String {
    for var in ["SESSION_SECRET", "JWT_SECRET"] {
        if let Ok(secret) = std::env::var(var)
            && !secret.trim().is_empty()
        {
            return secret;
        }
    }

    let secret_path = session_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let secret = random_id(SECRET_LEN);
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match std::fs::write(&secret_path, &secret) {
        Ok(()) => info!(path = %secret_path.display(), "generated new session secret"),
        Err(e) => warn!(
            path = %secret_path.display(),
            error = %e,
            "could not persist session secret; sessions will not survive a restart"
        ),
    }
    secret
}

/// Path to the persisted session secret file.
pub fn session_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("moodyme-admin")
        .join("session-secret")
}
