// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # API Integration Tests
//!
//! Drives the full router, middleware included, over the fixture directory.
//!
//! - `test_login_*` / `test_refresh_*`: credential exchange
//! - `test_authn_*`: bearer handling at the HTTP boundary
//! - `test_rbac_*`: role and permission routes
//! - `test_error_*`: failure bodies

use std::time::Duration;

use http::StatusCode;
use serde_json::json;
use warden_api::auth::{Claims, TokenKind};
use warden_core::{AccountId, Subject};
use warden_tests::prelude::*;

// =============================================================================
// Login & Refresh
// =============================================================================

#[tokio::test]
async fn test_login_issues_default_lifetimes() {
    init_test_logging();
    let app = TestApp::new();
    let body = app.login("eddie", PASSWORD).await;

    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);

    let access = app
        .tokens()
        .verify_access(body["access_token"].as_str().unwrap())
        .unwrap();
    let refresh = app
        .tokens()
        .verify_refresh(body["refresh_token"].as_str().unwrap())
        .unwrap();

    assert_eq!(access.sub, app.fixture.editor);
    assert_eq!(access.email, "eddie@example.com");
    assert!((access.exp - access.iat - 3600).abs() <= 1);
    assert!((refresh.exp - refresh.iat - 604_800).abs() <= 1);
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_user_look_the_same() {
    let app = TestApp::new();

    for (username, password) in [("eddie", "wrong"), ("nobody", PASSWORD)] {
        let response = app
            .send(
                TestRequest::post(app.path("/auth/login"))
                    .json(json!({ "username": username, "password": password }))
                    .build(),
            )
            .await;
        assert_error_response(response, StatusCode::UNAUTHORIZED, "invalid credentials").await;
    }
}

#[tokio::test]
async fn test_login_inactive_account() {
    let app = TestApp::new();
    let response = app
        .send(
            TestRequest::post(app.path("/auth/login"))
                .json(json!({ "username": "ivy", "password": PASSWORD }))
                .build(),
        )
        .await;
    assert_error_response(response, StatusCode::FORBIDDEN, "account is deactivated").await;
}

#[tokio::test]
async fn test_login_inactive_account_wrong_password_hides_state() {
    let app = TestApp::new();
    let response = app
        .send(
            TestRequest::post(app.path("/auth/login"))
                .json(json!({ "username": "ivy", "password": "wrong" }))
                .build(),
        )
        .await;
    assert_error_response(response, StatusCode::UNAUTHORIZED, "invalid credentials").await;
}

#[tokio::test]
async fn test_login_malformed_body() {
    let app = TestApp::new();
    let response = app
        .send(
            TestRequest::post(app.path("/auth/login"))
                .json(json!({ "username": "eddie" }))
                .build(),
        )
        .await;
    assert_status(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_credential_store_failure() {
    let fixture = DirectoryFixture::seeded();
    let directory = FailingStore::credentials(fixture.directory());
    let app = TestApp::with_parts(fixture, directory, TokenFixtures::service());

    let response = app
        .send(
            TestRequest::post(app.path("/auth/login"))
                .json(json!({ "username": "eddie", "password": PASSWORD }))
                .build(),
        )
        .await;
    assert_error_response(
        response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error",
    )
    .await;
}

#[tokio::test]
async fn test_refresh_exchanges_pair() {
    let app = TestApp::new();
    let login = app.login("alice", PASSWORD).await;

    let response = app
        .send(
            TestRequest::post(app.path("/auth/refresh"))
                .json(json!({ "refresh_token": login["refresh_token"] }))
                .build(),
        )
        .await;
    assert_status(&response, StatusCode::OK);

    let body = body_json(response).await;
    let claims = app
        .tokens()
        .verify_access(body["access_token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.sub, app.fixture.alice);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let app = TestApp::new();
    let login = app.login("alice", PASSWORD).await;

    let response = app
        .send(
            TestRequest::post(app.path("/auth/refresh"))
                .json(json!({ "refresh_token": login["access_token"] }))
                .build(),
        )
        .await;
    assert_error_response(response, StatusCode::UNAUTHORIZED, "invalid token").await;
}

#[tokio::test]
async fn test_refresh_after_deactivation() {
    let app = TestApp::new();
    let login = app.login("eddie", PASSWORD).await;
    app.fixture.store.set_active(app.fixture.editor, false).unwrap();

    let response = app
        .send(
            TestRequest::post(app.path("/auth/refresh"))
                .json(json!({ "refresh_token": login["refresh_token"] }))
                .build(),
        )
        .await;
    assert_error_response(response, StatusCode::FORBIDDEN, "account is deactivated").await;
}

// =============================================================================
// Authentication at the Boundary
// =============================================================================

#[tokio::test]
async fn test_authn_health_is_public() {
    let app = TestApp::new();
    let response = app.send(TestRequest::get("/health").build()).await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_authn_missing_token() {
    let app = TestApp::new();
    let response = app.send(TestRequest::get(app.path("/auth/info")).build()).await;
    assert_error_response(response, StatusCode::UNAUTHORIZED, "token missing").await;
}

#[tokio::test]
async fn test_authn_garbage_token() {
    let app = TestApp::new();
    let response = app
        .send(TestRequest::get(app.path("/auth/info")).bearer("garbage").build())
        .await;
    assert_error_response(response, StatusCode::UNAUTHORIZED, "invalid token").await;
}

#[tokio::test]
async fn test_authn_wrong_scheme() {
    let app = TestApp::new();
    let token = app.access_token(app.fixture.editor);
    let response = app
        .send(
            TestRequest::get(app.path("/auth/info"))
                .authorization(format!("Token {}", token))
                .build(),
        )
        .await;
    assert_error_response(response, StatusCode::UNAUTHORIZED, "invalid token").await;
}

#[tokio::test]
async fn test_authn_expired_token() {
    let app = TestApp::new();
    let claims = Claims::expired(app.fixture.editor, "e@example.com", Duration::from_secs(30));
    let token = app.tokens().sign(TokenKind::Access, &claims).unwrap();

    let response = app
        .send(TestRequest::get(app.path("/auth/info")).bearer(&token).build())
        .await;
    assert_error_response(response, StatusCode::UNAUTHORIZED, "token expired").await;
}

#[tokio::test]
async fn test_authn_unknown_account() {
    let app = TestApp::new();
    let token = app.access_token(AccountId::new());
    let response = app
        .send(TestRequest::get(app.path("/auth/info")).bearer(&token).build())
        .await;
    assert_error_response(response, StatusCode::UNAUTHORIZED, "unauthorized").await;
}

#[tokio::test]
async fn test_authn_inactive_account_with_valid_token() {
    let app = TestApp::new();
    let token = app.access_token(app.fixture.inactive);
    let response = app
        .send(TestRequest::get(app.path("/auth/info")).bearer(&token).build())
        .await;
    assert_error_response(response, StatusCode::FORBIDDEN, "forbidden").await;
}

#[tokio::test]
async fn test_authn_info_reports_snapshot() {
    let app = TestApp::new();
    let token = app.access_token(app.fixture.alice);
    let response = app
        .send(TestRequest::get(app.path("/auth/info")).bearer(&token).build())
        .await;
    assert_status(&response, StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["is_superuser"], false);
    assert_eq!(body["roles"][0]["name"], "admin");
    let names: Vec<&str> = body["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names, vec!["articles.edit", "menus.read"]);
}

// =============================================================================
// Roles & Permissions
// =============================================================================

#[tokio::test]
async fn test_rbac_admin_route() {
    let app = TestApp::new();
    let ping = app.path("/admin/ping");

    let admin = app.access_token(app.fixture.alice);
    let response = app.send(TestRequest::get(&ping).bearer(&admin).build()).await;
    assert_status(&response, StatusCode::OK);

    let editor = app.access_token(app.fixture.editor);
    let response = app.send(TestRequest::get(&ping).bearer(&editor).build()).await;
    assert_error_response(response, StatusCode::FORBIDDEN, "forbidden").await;

    let root = app.access_token(app.fixture.root);
    let response = app.send(TestRequest::get(&ping).bearer(&root).build()).await;
    assert_status(&response, StatusCode::OK);
}

#[tokio::test]
async fn test_rbac_admin_route_requires_token() {
    let app = TestApp::new();
    let response = app.send(TestRequest::get(app.path("/admin/ping")).build()).await;
    assert_error_response(response, StatusCode::UNAUTHORIZED, "token missing").await;
}

fn model_permission_path(app: &TestApp, subject: Subject, permission: &str) -> String {
    app.path(&format!(
        "/auth/model-permissions/{}/{}/{}",
        subject.kind(),
        subject.uuid(),
        permission
    ))
}

#[tokio::test]
async fn test_rbac_direct_grant_without_link() {
    let app = TestApp::new();
    let token = app.access_token(app.fixture.alice);
    let uri = model_permission_path(&app, Subject::Resource(app.fixture.menu), "menus.read");

    let response = app.send(TestRequest::get(uri).bearer(&token).build()).await;
    assert_status(&response, StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["granted"], true);
    assert_eq!(body["permission"], "menus.read");
}

#[tokio::test]
async fn test_rbac_link_grant() {
    let app = TestApp::new();
    let report = Subject::Resource(app.fixture.report);

    let editor = app.access_token(app.fixture.editor);
    let response = app
        .send(
            TestRequest::get(model_permission_path(&app, report, "reports.view"))
                .bearer(&editor)
                .build(),
        )
        .await;
    assert_status(&response, StatusCode::OK);

    let roleless = app.access_token(app.fixture.roleless);
    let response = app
        .send(
            TestRequest::get(model_permission_path(&app, report, "reports.view"))
                .bearer(&roleless)
                .build(),
        )
        .await;
    assert_error_response(response, StatusCode::FORBIDDEN, "forbidden").await;
}

#[tokio::test]
async fn test_rbac_unknown_permission() {
    let app = TestApp::new();
    let token = app.access_token(app.fixture.alice);
    let uri = model_permission_path(&app, Subject::Resource(app.fixture.menu), "menus.nuke");

    let response = app.send(TestRequest::get(uri).bearer(&token).build()).await;
    assert_error_response(response, StatusCode::FORBIDDEN, "forbidden").await;
}

#[tokio::test]
async fn test_rbac_superuser_any_permission() {
    let app = TestApp::new();
    let token = app.access_token(app.fixture.root);
    let uri = model_permission_path(&app, Subject::Resource(app.fixture.menu), "menus.nuke");

    let response = app.send(TestRequest::get(uri).bearer(&token).build()).await;
    assert_status(&response, StatusCode::OK);
}

// =============================================================================
// Error Bodies
// =============================================================================

#[tokio::test]
async fn test_error_bad_subject_kind() {
    let app = TestApp::new();
    let token = app.access_token(app.fixture.alice);
    let uri = app.path(&format!(
        "/auth/model-permissions/widget/{}/menus.read",
        app.fixture.menu
    ));

    let response = app.send(TestRequest::get(uri).bearer(&token).build()).await;
    assert_status(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_error_role_store_failure_fails_closed() {
    let fixture = DirectoryFixture::seeded();
    let directory = FailingStore::roles(fixture.directory());
    let editor = fixture.editor;
    let app = TestApp::with_parts(fixture, directory, TokenFixtures::service());

    let token = app.access_token(editor);
    let response = app
        .send(TestRequest::get(app.path("/auth/info")).bearer(&token).build())
        .await;
    assert_error_response(
        response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error",
    )
    .await;
}
