//! User account management for operators.

use moodyme_core::directory::{self, Page, RoleScope, UserQuery, combine_one};
use moodyme_core::identity::admin;
use moodyme_core::models::session::SessionClaims;
use moodyme_core::models::user::{ClaimsUpdate, CombinedUser, Identity, NewUser, Role};
use moodyme_core::validation;
use tracing::info;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{CreateAdminRequest, UserListParams, UserUpdateRequest};

fn not_found() -> AppError {
    AppError::NotFound("User not found".into())
}

async fn require_identity(state: &AppState, uid: &str) -> AppResult<Identity> {
    state.identity.get_by_id(uid).await?.ok_or_else(not_found)
}

async fn combined(state: &AppState, uid: &str) -> AppResult<CombinedUser> {
    directory::find_combined(state.identity.as_ref(), state.documents.as_ref(), uid)
        .await?
        .ok_or_else(not_found)
}

/// Search, filter and paginate combined users within a role scope.
pub async fn list(
    state: &AppState,
    params: &UserListParams,
    scope: RoleScope,
) -> AppResult<Page<CombinedUser>> {
    let users =
        directory::load_combined(state.identity.as_ref(), state.documents.as_ref()).await?;
    let query = UserQuery {
        search: params.search.clone(),
        is_active: params.is_active,
        scope,
        page: params.page.unwrap_or(1),
        limit: params.limit.unwrap_or(state.config.users_page_size),
    };
    Ok(query.apply(users))
}

pub async fn get(state: &AppState, uid: &str) -> AppResult<CombinedUser> {
    combined(state, uid).await
}

/// Apply a name and/or status change.
///
/// Names are merged onto the current claim set so the role is never lost.
pub async fn update(
    state: &AppState,
    uid: &str,
    request: &UserUpdateRequest,
) -> AppResult<CombinedUser> {
    let names = ClaimsUpdate {
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
    };
    validation::into_result(validation::name_update_errors(&names))
        .map_err(AppError::Validation)?;

    let current = require_identity(state, uid).await?;
    let claims = current.claims();
    let merged = claims.merged(&names);
    if merged != claims {
        state.identity.set_claims(uid, &merged).await?;
    }
    if let Some(active) = request.is_active
        && active != current.is_active
    {
        state.identity.set_status(uid, active).await?;
    }

    info!(uid, "user updated");
    combined(state, uid).await
}

/// Enable or disable an account.
pub async fn set_status(state: &AppState, uid: &str, active: bool) -> AppResult<CombinedUser> {
    require_identity(state, uid).await?;
    state.identity.set_status(uid, active).await?;
    info!(uid, active, "user status changed");
    combined(state, uid).await
}

/// Permanently delete an account. Operators cannot delete themselves.
pub async fn delete(state: &AppState, acting: &SessionClaims, uid: &str) -> AppResult<()> {
    if acting.user_id == uid {
        return Err(AppError::Validation(
            "You cannot delete your own account".into(),
        ));
    }
    state.identity.delete_user(uid).await?;
    info!(uid, by = %acting.user_id, "user deleted");
    Ok(())
}

/// Create an operator account with the ADMIN role.
pub async fn create_admin(state: &AppState, request: &CreateAdminRequest) -> AppResult<CombinedUser> {
    let new_user = NewUser {
        email: request.email.clone(),
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        password: request.password.clone(),
        role: Some(Role::Admin),
    };
    let created = admin::create_admin(state.identity.as_ref(), new_user).await?;
    Ok(combine_one(created, None))
}
