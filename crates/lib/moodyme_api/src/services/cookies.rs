//! Session cookie construction.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Cookie carrying the admin session credential.
pub const SESSION_COOKIE: &str = "admin_token";

/// Build the httpOnly session cookie.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE.to_string(), token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/".to_string())
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// Build an expired session cookie to clear the browser's copy.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE.to_string(), String::new()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/".to_string())
        .max_age(Duration::ZERO)
        .build()
}
