//! Login, logout and session verification.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum_extra::extract::CookieJar;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AdminSession;
use crate::models::{LoginRequest, LoginResponse, SessionResponse, SessionUser, SuccessResponse};
use crate::services::{auth, cookies};

/// `POST /api/auth/login` — authenticate with email + password or ID token.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let Json(body) = payload?;
    let (token, identity) = auth::login(&state, &body).await?;

    let cookie = cookies::session_cookie(
        &token,
        state.config.session_ttl_secs(),
        state.config.secure_cookies,
    );
    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            message: "Login successful".into(),
            user: SessionUser::from(&identity),
        }),
    ))
}

/// `POST /api/auth/logout` — clear the session cookie.
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    (
        jar.add(cookies::clear_session_cookie(state.config.secure_cookies)),
        Json(SuccessResponse::with_message("Logged out")),
    )
}

/// `GET /api/auth/verify` — the user behind the current session.
pub async fn verify_handler(AdminSession(claims): AdminSession) -> Json<SessionResponse> {
    Json(SessionResponse {
        success: true,
        user: SessionUser::from(&claims),
    })
}
