// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use warden_config::{CorsConfig, ServerConfig};

use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::{AuthLayer, GuardLayer};
use crate::state::AppState;

/// Role required by the admin routes.
pub const ADMIN_ROLE: &str = "admin";

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ServerConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let base = self.config.base_path.trim_end_matches('/');
        let gate = self.state.gate.clone();

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.config.request_timeout(),
            ))
            .layer(create_cors_layer(&self.config.cors))
            .layer(AuthLayer::new(gate.clone()).with_default_public_paths(base));

        let admin = Router::new()
            .route(&format!("{}/admin/ping", base), get(handlers::ping))
            .route_layer(GuardLayer::role(gate, [ADMIN_ROLE]));

        Router::new()
            // Health (public)
            .route("/health", get(handlers::health))
            // Auth endpoints
            .route(&format!("{}/auth/login", base), post(handlers::login))
            .route(&format!("{}/auth/refresh", base), post(handlers::refresh_token))
            .route(&format!("{}/auth/info", base), get(handlers::account_info))
            .route(&format!("{}/auth/permissions", base), get(handlers::permissions))
            .route(
                &format!("{}/auth/model-permissions/{{kind}}/{{id}}/{{permission}}", base),
                get(handlers::check_model_permission),
            )
            // Admin endpoints
            .merge(admin)
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server until the process is stopped.
    pub async fn run(self) -> ApiResult<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Binds the configured address and runs with graceful shutdown.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal_with(format!("failed to bind {}", addr), e))?;

        self.serve(listener, shutdown_signal).await
    }

    /// Serves on an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let router = self.router();
        let addr = listener
            .local_addr()
            .map_err(|e| ApiError::internal_with("failed to read local address", e))?;

        info!(%addr, base_path = %self.config.base_path, "Starting API server");

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ApiError::internal_with("server error", e))?;

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer from configuration.
///
/// An empty origin list allows no cross-origin requests.
fn create_cors_layer(cors: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    let wildcard = cors.allowed_origins.iter().any(|o| o == "*");
    if wildcard {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        layer = layer.allow_origin(AllowOrigin::list(origins));
    }

    // Credentials cannot be combined with a wildcard origin.
    if cors.allow_credentials {
        if wildcard {
            tracing::warn!("CORS allow_credentials ignored with wildcard origin");
        } else {
            layer = layer.allow_credentials(true);
        }
    }

    layer
}

// =============================================================================
// Server Builder
// =============================================================================

/// Builder for creating the API server.
pub struct ApiServerBuilder {
    state_builder: crate::state::AppStateBuilder,
}

impl ApiServerBuilder {
    /// Creates a new server builder.
    pub fn new() -> Self {
        Self {
            state_builder: AppState::builder(),
        }
    }

    /// Sets the server configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.state_builder = self.state_builder.config(config);
        self
    }

    /// Sets the token configuration.
    pub fn token_config(mut self, config: crate::auth::TokenConfig) -> Self {
        self.state_builder = self.state_builder.token_config(config);
        self
    }

    /// Sets the directory.
    pub fn directory(mut self, directory: warden_core::Directory) -> Self {
        self.state_builder = self.state_builder.directory(directory);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ApiResult<ApiServer> {
        let state = self.state_builder.build()?;
        Ok(ApiServer::new(state))
    }
}

impl Default for ApiServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
