//! Static admin UI.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::AppState;
use crate::error::AppError;

/// JSON 404 for unmatched API paths.
pub async fn api_not_found_handler() -> AppError {
    AppError::NotFound("Route not found".into())
}

/// Serve a file from the assets directory, falling back to `index.html`.
pub async fn static_page_handler(State(state): State<AppState>, request: Request) -> Response {
    if request.uri().path().starts_with("/api/") {
        return api_not_found_handler().await.into_response();
    }
    let Some(dir) = state.config.assets_dir.as_ref() else {
        return (StatusCode::NOT_FOUND, "Admin UI is not configured").into_response();
    };

    let service = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
    match service.oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
