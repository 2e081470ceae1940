//! # moodyme_api
//!
//! HTTP API library for the MoodyMe admin service.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use chrono::Duration;
use moodyme_core::auth::SessionCodec;
use moodyme_core::content::ContentStore;
use moodyme_core::documents::DocumentStore;
use moodyme_core::identity::IdentityProvider;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, content, dashboard, pages, users};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Session credential codec.
    pub sessions: SessionCodec,
    /// Identity provider backend.
    pub identity: Arc<dyn IdentityProvider>,
    /// Document store backend.
    pub documents: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(
        config: ApiConfig,
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        let sessions = SessionCodec::new(
            config.session_secret.as_bytes(),
            Duration::days(config.session_ttl_days),
        );
        Self {
            config,
            sessions,
            identity,
            documents,
        }
    }

    /// Content store over this state's document backend.
    pub fn content(&self) -> ContentStore<'_> {
        ContentStore::new(self.documents.as_ref())
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    // Public routes (no session required)
    let public = Router::new()
        .route(routes::AUTH_LOGIN, post(auth::login_handler))
        .route(routes::AUTH_LOGOUT, post(auth::logout_handler));

    // Any valid session
    let session = Router::new()
        .route(routes::AUTH_VERIFY, get(auth::verify_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_session,
        ));

    // ADMIN sessions only. The fallback sits inside the session layers so an
    // unknown admin path without a credential is still a 401.
    let admin = Router::new()
        .route(routes::ADMIN_STATS, get(dashboard::stats_handler))
        .route(
            routes::ADMIN_CONTENT,
            get(content::list_content_handler).post(content::create_content_handler),
        )
        .route(
            routes::ADMIN_CONTENT_DOC,
            get(content::get_content_by_doc_handler).patch(content::update_content_by_doc_handler),
        )
        .route(
            routes::ADMIN_CONTENT_ID,
            get(content::get_content_handler)
                .patch(content::update_content_handler)
                .delete(content::delete_content_handler),
        )
        .route(routes::ADMIN_USERS, get(users::list_users_handler))
        .route(
            routes::ADMIN_USER_ID,
            get(users::get_user_handler)
                .patch(users::update_user_handler)
                .delete(users::delete_user_handler),
        )
        .route(
            routes::ADMIN_USER_STATUS,
            patch(users::update_status_handler),
        )
        .route(
            routes::ADMIN_ADMINS,
            get(users::list_admins_handler).post(users::create_admin_handler),
        )
        .fallback(pages::api_not_found_handler)
        .layer(axum::middleware::from_fn(middleware::auth::require_admin))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_session,
        ));

    // Admin UI pages
    let pages = Router::new()
        .route(routes::ADMIN_PAGE, get(pages::static_page_handler))
        .route(routes::ADMIN_PAGE_INDEX, get(pages::static_page_handler))
        .route(routes::ADMIN_PAGES, get(pages::static_page_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::guard_admin_pages,
        ));

    Router::new()
        .merge(public)
        .merge(session)
        .nest(routes::ADMIN_API, admin)
        .merge(pages)
        .route(routes::ROOT, get(pages::static_page_handler))
        .fallback(pages::static_page_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
