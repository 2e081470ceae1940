//! API server configuration.

use std::fmt;
use std::path::PathBuf;

use moodyme_core::auth::DEFAULT_SESSION_TTL_DAYS;
use moodyme_core::auth::secret::resolve_session_secret;
use moodyme_core::directory::DEFAULT_PAGE_SIZE;
use tracing::warn;

/// Longest accepted session lifetime.
pub const MAX_SESSION_TTL_DAYS: i64 = 365;

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3200").
    pub bind_addr: String,
    /// Session signing secret.
    pub session_secret: String,
    /// Session lifetime in days; also the cookie max-age.
    pub session_ttl_days: i64,
    /// Mark the session cookie `Secure`.
    pub secure_cookies: bool,
    /// Directory holding the static admin UI, if served.
    pub assets_dir: Option<PathBuf>,
    /// Default page size for user listings.
    pub users_page_size: usize,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("session_secret", &"[REDACTED]")
            .field("session_ttl_days", &self.session_ttl_days)
            .field("secure_cookies", &self.secure_cookies)
            .field("assets_dir", &self.assets_dir)
            .field("users_page_size", &self.users_page_size)
            .finish()
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable           | Default                                     |
    /// |--------------------|---------------------------------------------|
    /// | `BIND_ADDR`        | `127.0.0.1:3200`                            |
    /// | `SESSION_SECRET` / `JWT_SECRET` | generated & persisted to file  |
    /// | `SESSION_TTL_DAYS` | `7`, clamped to `1..=365`                   |
    /// | `APP_ENV`          | `production` enables `Secure` cookies       |
    /// | `ADMIN_ASSETS_DIR` | unset (no static UI)                        |
    /// | `USERS_PAGE_SIZE`  | `10`                                        |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3200".into()),
            session_secret: resolve_session_secret(),
            session_ttl_days: session_ttl_days(parse_or(
                "SESSION_TTL_DAYS",
                DEFAULT_SESSION_TTL_DAYS,
            )),
            secure_cookies: std::env::var("APP_ENV").is_ok_and(|v| v == "production"),
            assets_dir: std::env::var("ADMIN_ASSETS_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            users_page_size: parse_or("USERS_PAGE_SIZE", DEFAULT_PAGE_SIZE).max(1),
        }
    }

    /// Session lifetime in seconds.
    pub fn session_ttl_secs(&self) -> i64 {
        self.session_ttl_days * 24 * 60 * 60
    }
}

fn session_ttl_days(days: i64) -> i64 {
    if !(1..=MAX_SESSION_TTL_DAYS).contains(&days) {
        warn!(days, "SESSION_TTL_DAYS out of range, clamping");
    }
    days.clamp(1, MAX_SESSION_TTL_DAYS)
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(name, value = %raw, "ignoring unparsable setting");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ttl_is_clamped() {
        assert_eq!(session_ttl_days(7), 7);
        assert_eq!(session_ttl_days(0), 1);
        assert_eq!(session_ttl_days(-3), 1);
        assert_eq!(session_ttl_days(i64::MAX), MAX_SESSION_TTL_DAYS);
    }

    #[test]
    fn ttl_seconds_match_days() {
        let config = ApiConfig {
            bind_addr: "127.0.0.1:0".into(),
            session_secret: "secret".into(),
            session_ttl_days: session_ttl_days(i64::MAX),
            secure_cookies: false,
            assets_dir: None,
            users_page_size: 10,
        };
        assert_eq!(config.session_ttl_secs(), 365 * 24 * 60 * 60);
        assert!(format!("{config:?}").contains("[REDACTED]"));
    }
}
