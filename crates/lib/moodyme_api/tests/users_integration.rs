//! Integration tests for user management and the dashboard.

mod common;

use axum::http::{Method, StatusCode};
use common::spawn_app;
use moodyme_core::identity::IdentityProvider;
use moodyme_core::models::user::Role;
use serde_json::json;

#[tokio::test]
async fn user_list_excludes_admins() {
    let app = spawn_app().await;
    let (_, token) = app.admin_session().await;
    app.create_account("second-admin@moodyme.app", Role::Admin, true)
        .await;
    for i in 0..3 {
        app.create_account(&format!("user{i}@moodyme.app"), Role::User, true)
            .await;
    }

    let resp = app
        .call(Method::GET, "/api/admin/users", Some(&token), None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["total"], 3);
    let items = resp.body["items"].as_array().unwrap();
    assert!(items.iter().all(|u| u["role"] != "ADMIN"));

    let resp = app
        .call(Method::GET, "/api/admin/admins", Some(&token), None)
        .await;
    assert_eq!(resp.body["total"], 2);
}

#[tokio::test]
async fn user_list_search_and_pagination() {
    let app = spawn_app().await;
    let (_, token) = app.admin_session().await;
    for i in 0..12 {
        app.create_account(&format!("user{i:02}@moodyme.app"), Role::User, i != 5)
            .await;
    }

    let resp = app
        .call(Method::GET, "/api/admin/users?page=2", Some(&token), None)
        .await;
    assert_eq!(resp.body["total"], 12);
    assert_eq!(resp.body["page"], 2);
    assert_eq!(resp.body["limit"], 10);
    assert_eq!(resp.body["totalPages"], 2);
    assert_eq!(resp.body["items"].as_array().unwrap().len(), 2);

    let resp = app
        .call(Method::GET, "/api/admin/users?search=USER05", Some(&token), None)
        .await;
    assert_eq!(resp.body["total"], 1);
    assert_eq!(resp.body["items"][0]["isActive"], false);

    let resp = app
        .call(
            Method::GET,
            "/api/admin/users?isActive=false",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(resp.body["total"], 1);

    let resp = app
        .call(Method::GET, "/api/admin/users?page=abc", Some(&token), None)
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn self_deletion_is_rejected_before_the_provider() {
    let app = spawn_app().await;
    let (admin, token) = app.admin_session().await;

    let resp = app
        .call(
            Method::DELETE,
            &format!("/api/admin/users/{}", admin.id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "You cannot delete your own account");
    assert!(app.identity.get_by_id(&admin.id).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_removes_other_accounts() {
    let app = spawn_app().await;
    let (_, token) = app.admin_session().await;
    let user = app.create_account("user@moodyme.app", Role::User, true).await;
    let uri = format!("/api/admin/users/{}", user.id);

    let resp = app.call(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(app.identity.get_by_id(&user.id).await.unwrap().is_none());

    let resp = app.call(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_and_name_updates_keep_role() {
    let app = spawn_app().await;
    let (_, token) = app.admin_session().await;
    let user = app.create_account("user@moodyme.app", Role::User, true).await;
    let uri = format!("/api/admin/users/{}", user.id);

    let resp = app
        .call(
            Method::PATCH,
            &format!("{uri}/status"),
            Some(&token),
            Some(json!({ "isActive": false })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["user"]["isActive"], false);
    assert_eq!(resp.body["user"]["disabled"], true);

    let resp = app
        .call(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "firstName": "Grace", "isActive": true })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["user"]["firstName"], "Grace");
    assert_eq!(resp.body["user"]["lastName"], "Account");
    assert_eq!(resp.body["user"]["fullName"], "Grace Account");
    assert_eq!(resp.body["user"]["isActive"], true);
    assert_eq!(resp.body["user"]["role"], "USER");

    let resp = app
        .call(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "lastName": "X" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .call(
            Method::PATCH,
            "/api/admin/users/missing/status",
            Some(&token),
            Some(json!({ "isActive": true })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_names_win_in_user_detail() {
    let app = spawn_app().await;
    let (_, token) = app.admin_session().await;
    let user = app.create_account("user@moodyme.app", Role::User, true).await;
    app.documents
        .insert(
            "users",
            &user.id,
            json!({ "uid": user.id, "firstName": "Profile", "allowEmailSent": true })
                .as_object()
                .cloned()
                .unwrap(),
        )
        .await;

    let resp = app
        .call(
            Method::GET,
            &format!("/api/admin/users/{}", user.id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["user"]["firstName"], "Profile");
    assert_eq!(resp.body["user"]["allowEmailSent"], true);
    assert_eq!(resp.body["user"]["authData"]["firstName"], "Test");
}

#[tokio::test]
async fn create_admin_validates_and_rejects_duplicates() {
    let app = spawn_app().await;
    let (_, token) = app.admin_session().await;
    let body = json!({
        "email": "ops@moodyme.app",
        "firstName": "Ops",
        "lastName": "Team",
        "password": "long-enough-1"
    });

    let resp = app
        .call(Method::POST, "/api/admin/admins", Some(&token), Some(body.clone()))
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["user"]["role"], "ADMIN");

    let resp = app
        .call(Method::POST, "/api/admin/admins", Some(&token), Some(body))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .call(
            Method::POST,
            "/api/admin/admins",
            Some(&token),
            Some(json!({
                "email": "bad",
                "firstName": "O",
                "lastName": "Team",
                "password": "short"
            })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_stats_count_non_admins() {
    let app = spawn_app().await;
    let (_, token) = app.admin_session().await;
    app.create_account("a@moodyme.app", Role::User, true).await;
    app.create_account("b@moodyme.app", Role::User, false).await;

    let resp = app
        .call(Method::GET, "/api/admin/stats", Some(&token), None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["stats"]["totalUsers"], 2);
    assert_eq!(resp.body["stats"]["activeUsers"], 1);
    assert_eq!(resp.body["stats"]["inactiveUsers"], 1);
    assert_eq!(resp.body["stats"]["contentCount"], 7);
    assert_eq!(resp.body["stats"]["activeContent"], 7);
    assert_eq!(resp.body["recentUsers"].as_array().unwrap().len(), 2);
}
