//! Shared helpers for API integration tests: memory backends and a router.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use moodyme_api::config::ApiConfig;
use moodyme_api::{AppState, router};
use moodyme_core::content::seed::seed_content;
use moodyme_core::documents::memory::MemoryDocumentStore;
use moodyme_core::identity::IdentityProvider;
use moodyme_core::identity::memory::MemoryIdentityProvider;
use moodyme_core::models::user::{Identity, NewUser, Role};
use serde_json::Value;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse-1";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub identity: Arc<MemoryIdentityProvider>,
    pub documents: Arc<MemoryDocumentStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub text: String,
}

impl TestResponse {
    /// The `admin_token` value set by this response, if any.
    pub fn session_cookie(&self) -> Option<String> {
        self.set_cookie()
            .and_then(|c| c.split(';').next().map(str::to_string))
            .and_then(|pair| pair.strip_prefix("admin_token=").map(str::to_string))
    }

    pub fn set_cookie(&self) -> Option<String> {
        self.headers
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

pub fn test_config(assets_dir: Option<PathBuf>) -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        session_secret: "integration-test-secret".into(),
        session_ttl_days: 7,
        secure_cookies: false,
        assets_dir,
        users_page_size: 10,
    }
}

/// Router over fresh memory backends with seeded content.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_assets(None).await
}

pub async fn spawn_app_with_assets(assets_dir: Option<PathBuf>) -> TestApp {
    let identity = Arc::new(MemoryIdentityProvider::new().with_bcrypt_cost(4));
    let documents = Arc::new(MemoryDocumentStore::new());
    seed_content(documents.as_ref()).await.expect("seed content");

    let state = AppState::new(test_config(assets_dir), identity.clone(), documents.clone());
    TestApp {
        router: router(state.clone()),
        state,
        identity,
        documents,
    }
}

impl TestApp {
    pub async fn create_account(&self, email: &str, role: Role, active: bool) -> Identity {
        let created = self
            .identity
            .create_user(&NewUser {
                email: email.into(),
                first_name: "Test".into(),
                last_name: "Account".into(),
                password: PASSWORD.into(),
                role: Some(role),
            })
            .await
            .expect("create account");
        if !active {
            self.identity
                .set_status(&created.id, false)
                .await
                .expect("disable account");
        }
        self.identity
            .get_by_id(&created.id)
            .await
            .expect("lookup")
            .expect("account exists")
    }

    /// A session credential for `identity`, bypassing login.
    pub fn session_for(&self, identity: &Identity) -> String {
        self.state.sessions.issue(identity).expect("issue session")
    }

    /// An active admin and a session for it.
    pub async fn admin_session(&self) -> (Identity, String) {
        let admin = self
            .create_account("admin@moodyme.app", Role::Admin, true)
            .await;
        let token = self.session_for(&admin);
        (admin, token)
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let resp = self.router.clone().oneshot(request).await.expect("request");
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        let text = String::from_utf8_lossy(&bytes).to_string();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        session: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = session {
            builder = builder.header(COOKIE, format!("admin_token={token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");
        self.send(request).await
    }

    pub async fn call_with_bearer(&self, method: Method, uri: &str, token: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("build request");
        self.send(request).await
    }

    pub async fn login(&self, body: Value) -> TestResponse {
        self.call(Method::POST, "/api/auth/login", None, Some(body))
            .await
    }
}
