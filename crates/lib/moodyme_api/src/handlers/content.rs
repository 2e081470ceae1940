//! Content management handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use moodyme_core::content::ContentError;
use moodyme_core::models::content::{ContentUpdate, NewContent};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{ContentCounts, ContentListResponse, ContentResponse};

fn not_found() -> AppError {
    AppError::NotFound("Content not found".into())
}

/// `GET /api/admin/content` — every seeded record, newest first.
pub async fn list_content_handler(
    State(state): State<AppState>,
) -> AppResult<Json<ContentListResponse>> {
    let contents = state.content().get_all().await?;
    let stats = ContentCounts::of(&contents);
    Ok(Json(ContentListResponse {
        success: true,
        contents,
        stats,
    }))
}

/// `POST /api/admin/content` — always rejected; the content set is fixed.
pub async fn create_content_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<ContentResponse>> {
    let Ok(request) = serde_json::from_slice::<NewContent>(&body) else {
        return Err(ContentError::UnsupportedOperation.into());
    };
    let content = state.content().create(&request).await?;
    Ok(Json(ContentResponse {
        success: true,
        message: None,
        content,
    }))
}

/// `GET /api/admin/content/docs/{doc_name}`
pub async fn get_content_by_doc_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Json<ContentResponse>> {
    let Path(doc_name) = path?;
    let content = state
        .content()
        .get_by_doc_name(&doc_name)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ContentResponse {
        success: true,
        message: None,
        content,
    }))
}

/// `PATCH /api/admin/content/docs/{doc_name}`
pub async fn update_content_by_doc_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<ContentUpdate>, JsonRejection>,
) -> AppResult<Json<ContentResponse>> {
    let Path(doc_name) = path?;
    let Json(update) = payload?;
    let content = state.content().update_by_doc_name(&doc_name, &update).await?;
    Ok(Json(ContentResponse {
        success: true,
        message: Some("Content updated successfully".into()),
        content,
    }))
}

/// `GET /api/admin/content/{id}`
pub async fn get_content_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Json<ContentResponse>> {
    let Path(id) = path?;
    let content = state
        .content()
        .get_by_id(&id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ContentResponse {
        success: true,
        message: None,
        content,
    }))
}

/// `PATCH /api/admin/content/{id}`
pub async fn update_content_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<ContentUpdate>, JsonRejection>,
) -> AppResult<Json<ContentResponse>> {
    let Path(id) = path?;
    let Json(update) = payload?;
    let content = state.content().update_by_id(&id, &update).await?;
    Ok(Json(ContentResponse {
        success: true,
        message: Some("Content updated successfully".into()),
        content,
    }))
}

/// `DELETE /api/admin/content/{id}` — soft delete.
pub async fn delete_content_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Json<ContentResponse>> {
    let Path(id) = path?;
    let content = state.content().deactivate(&id).await?;
    Ok(Json(ContentResponse {
        success: true,
        message: Some("Content deactivated successfully".into()),
        content,
    }))
}
