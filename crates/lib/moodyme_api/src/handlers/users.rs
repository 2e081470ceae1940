//! User and admin account handlers.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use moodyme_core::directory::RoleScope;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AdminSession;
use crate::models::{
    CreateAdminRequest, StatusRequest, SuccessResponse, UserListParams, UserListResponse,
    UserResponse, UserUpdateRequest,
};
use crate::services::users;

/// `GET /api/admin/users` — non-admin accounts.
pub async fn list_users_handler(
    State(state): State<AppState>,
    params: Result<Query<UserListParams>, QueryRejection>,
) -> AppResult<Json<UserListResponse>> {
    let Query(params) = params?;
    let page = users::list(&state, &params, RoleScope::UsersOnly).await?;
    Ok(Json(UserListResponse {
        success: true,
        page,
    }))
}

/// `GET /api/admin/admins` — operator accounts.
pub async fn list_admins_handler(
    State(state): State<AppState>,
    params: Result<Query<UserListParams>, QueryRejection>,
) -> AppResult<Json<UserListResponse>> {
    let Query(params) = params?;
    let page = users::list(&state, &params, RoleScope::AdminsOnly).await?;
    Ok(Json(UserListResponse {
        success: true,
        page,
    }))
}

/// `POST /api/admin/admins`
pub async fn create_admin_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateAdminRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let Json(body) = payload?;
    let user = users::create_admin(&state, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            success: true,
            message: Some("Admin created successfully".into()),
            user,
        }),
    ))
}

/// `GET /api/admin/users/{id}`
pub async fn get_user_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Json<UserResponse>> {
    let Path(uid) = path?;
    let user = users::get(&state, &uid).await?;
    Ok(Json(UserResponse {
        success: true,
        message: None,
        user,
    }))
}

/// `PATCH /api/admin/users/{id}`
pub async fn update_user_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UserUpdateRequest>, JsonRejection>,
) -> AppResult<Json<UserResponse>> {
    let Path(uid) = path?;
    let Json(body) = payload?;
    let user = users::update(&state, &uid, &body).await?;
    Ok(Json(UserResponse {
        success: true,
        message: Some("User updated successfully".into()),
        user,
    }))
}

/// `PATCH /api/admin/users/{id}/status`
pub async fn update_status_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> AppResult<Json<UserResponse>> {
    let Path(uid) = path?;
    let Json(body) = payload?;
    let user = users::set_status(&state, &uid, body.is_active).await?;
    let message = if body.is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };
    Ok(Json(UserResponse {
        success: true,
        message: Some(message.into()),
        user,
    }))
}

/// `DELETE /api/admin/users/{id}` — permanent.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    AdminSession(claims): AdminSession,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Json<SuccessResponse>> {
    let Path(uid) = path?;
    users::delete(&state, &claims, &uid).await?;
    Ok(Json(SuccessResponse::with_message(
        "User deleted successfully",
    )))
}
