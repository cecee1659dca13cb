// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! Wires the full router over a [`DirectoryFixture`] so tests can drive it
//! with `tower::ServiceExt::oneshot` without binding a socket.

use std::sync::Arc;

use axum::response::Response;
use axum::Router;
use http::Request;
use tower::ServiceExt;
use warden_api::auth::{AuthGate, Claims, TokenKind, TokenService};
use warden_api::{ApiServer, AppState};
use warden_config::ServerConfig;
use warden_core::{AccountId, Directory};

use super::assertions::body_json;
use super::builders::TestRequest;
use super::fixtures::{email_of, DirectoryFixture, TokenFixtures};

/// Base path of the API routes under test.
pub const BASE_PATH: &str = "/api/v1";

/// A router over the standard fixture.
pub struct TestApp {
    /// The seeded directory.
    pub fixture: DirectoryFixture,
    /// Shared state handed to the router.
    pub state: AppState,
    router: Router,
}

impl TestApp {
    /// Builds the app over the standard fixture and token secrets.
    pub fn new() -> Self {
        let fixture = DirectoryFixture::seeded();
        let directory = fixture.directory();
        Self::with_parts(fixture, directory, TokenFixtures::service())
    }

    /// Builds the app from explicit parts.
    pub fn with_parts(
        fixture: DirectoryFixture,
        directory: Directory,
        tokens: Arc<TokenService>,
    ) -> Self {
        let config = ServerConfig {
            base_path: BASE_PATH.to_string(),
            ..ServerConfig::default()
        };
        let state = AppState::builder()
            .config(config)
            .tokens(tokens)
            .directory(directory)
            .build()
            .expect("test state builds");
        let router = ApiServer::new(state.clone()).router();

        Self {
            fixture,
            state,
            router,
        }
    }

    /// Returns `suffix` under the API base path.
    pub fn path(&self, suffix: &str) -> String {
        format!("{}{}", BASE_PATH, suffix)
    }

    /// Returns the gate the router uses.
    pub fn gate(&self) -> &AuthGate {
        self.state.gate()
    }

    /// Returns the token service the router uses.
    pub fn tokens(&self) -> &TokenService {
        self.state.tokens()
    }

    /// Sends one request through a fresh clone of the router.
    pub async fn send(&self, request: Request<axum::body::Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Signs a valid access token for `account_id` without logging in.
    pub fn access_token(&self, account_id: AccountId) -> String {
        let claims = Claims::new(account_id, email_of("fixture"), self.tokens().access_ttl());
        self.tokens()
            .sign(TokenKind::Access, &claims)
            .expect("sign access token")
    }

    /// Logs in and returns the JSON body of the response.
    ///
    /// # Panics
    ///
    /// Panics if the login is rejected.
    pub async fn login(&self, username: &str, password: &str) -> serde_json::Value {
        let response = self
            .send(
                TestRequest::post(self.path("/auth/login"))
                    .json(serde_json::json!({ "username": username, "password": password }))
                    .build(),
            )
            .await;
        assert!(
            response.status().is_success(),
            "login for '{}' failed with {}",
            username,
            response.status()
        );
        body_json(response).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
