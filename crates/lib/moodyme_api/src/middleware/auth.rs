//! Session middleware: credential extraction, verification and role checks.
//!
//! The credential is read from the `admin_token` cookie, falling back to an
//! `Authorization: Bearer` header.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use moodyme_core::models::session::SessionClaims;
use tracing::{debug, warn};

use crate::AppState;
use crate::error::AppError;
use crate::services::cookies::SESSION_COOKIE;

/// Verified session claims, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AdminSession(pub SessionClaims);

/// The session credential carried by a request, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE)
        && !cookie.value().is_empty()
    {
        return Some(cookie.value().to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Axum middleware: verifies the session credential and injects
/// [`AdminSession`] into request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))?;

    let claims = state.sessions.verify(&token).inspect_err(|e| {
        warn!(path = %request.uri().path(), error = %e, "session rejected");
    })?;

    request.extensions_mut().insert(AdminSession(claims));
    Ok(next.run(request).await)
}

/// Axum middleware: requires the verified session to carry the ADMIN role.
///
/// Must run inside [`require_session`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let session = request
        .extensions()
        .get::<AdminSession>()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))?;

    if !session.0.role.is_admin() {
        warn!(uid = %session.0.user_id, "non-admin session on admin route");
        return Err(AppError::Forbidden("Admin privileges required".into()));
    }
    Ok(next.run(request).await)
}

/// Guard for the admin UI pages.
///
/// Without a credential the browser is sent to the login page; an invalid
/// credential or a non-admin session gets a plain 403.
pub async fn guard_admin_pages(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(request.headers()) else {
        debug!(path = %request.uri().path(), "no session, redirecting to login");
        return Redirect::to("/").into_response();
    };

    match state.sessions.verify(&token) {
        Ok(claims) if claims.role.is_admin() => next.run(request).await,
        Ok(claims) => {
            warn!(uid = %claims.user_id, "non-admin session on admin page");
            (StatusCode::FORBIDDEN, "Unauthorized access").into_response()
        }
        Err(e) => {
            warn!(error = %e, "invalid session on admin page");
            (StatusCode::FORBIDDEN, "Unauthorized access").into_response()
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminSession>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))
    }
}
