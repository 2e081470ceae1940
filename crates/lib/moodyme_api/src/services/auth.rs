//! Operator login.

use moodyme_core::models::user::Identity;
use tracing::{info, warn};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::LoginRequest;

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve the uid behind a login attempt.
async fn authenticate(state: &AppState, email: &str, request: &LoginRequest) -> AppResult<String> {
    if let Some(id_token) = non_empty(&request.id_token) {
        let verified = state.identity.verify_token(id_token).await?;
        let matches = verified
            .email
            .as_deref()
            .is_some_and(|token_email| token_email.eq_ignore_ascii_case(email));
        if !matches {
            warn!(email, "login token does not belong to the submitted email");
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }
        return Ok(verified.uid);
    }

    let Some(password) = request.password.as_deref().filter(|p| !p.is_empty()) else {
        return Err(AppError::Validation(
            "Email and password or ID token are required".into(),
        ));
    };

    // The provider may report a disabled account before checking the
    // password, so a disabled account is a 401 whatever its role.
    Ok(state.identity.sign_in_with_password(email, password).await?)
}

/// Authenticate an operator and issue a session credential.
///
/// Order of checks: required fields (400), credentials (401), ADMIN role
/// (403), active account (401). A password login to a disabled account stops
/// at the credential step.
pub async fn login(state: &AppState, request: &LoginRequest) -> AppResult<(String, Identity)> {
    let email = non_empty(&request.email).ok_or_else(|| {
        AppError::Validation("Email and password or ID token are required".into())
    })?;
    if non_empty(&request.id_token).is_none() && non_empty(&request.password).is_none() {
        return Err(AppError::Validation(
            "Email and password or ID token are required".into(),
        ));
    }

    let uid = authenticate(state, email, request).await.inspect_err(|e| {
        warn!(email, error = %e, "login rejected");
    })?;

    let identity = state
        .identity
        .get_by_id(&uid)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    if !identity.role.is_admin() {
        warn!(uid = %identity.id, "login by non-admin account");
        return Err(AppError::Forbidden(
            "Access denied. Admin privileges required.".into(),
        ));
    }
    if !identity.is_active {
        warn!(uid = %identity.id, "login by inactive admin account");
        return Err(AppError::Unauthorized("Account is inactive".into()));
    }

    let token = state.sessions.issue(&identity)?;
    info!(uid = %identity.id, email = %identity.email, "admin logged in");
    Ok((token, identity))
}
