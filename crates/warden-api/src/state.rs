// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use warden_config::ServerConfig;
use warden_core::Directory;

use crate::auth::{AuthGate, TokenConfig, TokenService};
use crate::error::{ApiError, ApiResult};

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
///
/// Built once at startup. The token service lives here and nowhere else.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Token service.
    pub tokens: Arc<TokenService>,
    /// Request gate.
    pub gate: Arc<AuthGate>,
    /// Directory stores.
    pub directory: Directory,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the token service.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Returns the request gate.
    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    /// Returns the directory.
    pub fn directory(&self) -> &Directory {
        &self.directory
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing [`AppState`].
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<ServerConfig>,
    token_config: Option<TokenConfig>,
    tokens: Option<Arc<TokenService>>,
    directory: Option<Directory>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the token configuration. Ignored when a token service is given.
    pub fn token_config(mut self, config: TokenConfig) -> Self {
        self.token_config = Some(config);
        self
    }

    /// Sets a prebuilt token service.
    pub fn tokens(mut self, tokens: Arc<TokenService>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Sets the directory.
    pub fn directory(mut self, directory: Directory) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Builds the state.
    ///
    /// # Errors
    ///
    /// Fails when neither a token service nor a token configuration was set,
    /// when the token configuration is invalid, or when no directory was set.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();

        let tokens = match (self.tokens, self.token_config) {
            (Some(tokens), _) => tokens,
            (None, Some(token_config)) => Arc::new(TokenService::new(token_config)?),
            (None, None) => return Err(ApiError::internal("token configuration is required")),
        };

        let directory = self
            .directory
            .ok_or_else(|| ApiError::internal("directory is required"))?;

        let gate = Arc::new(AuthGate::new(tokens.clone(), directory.clone()));

        Ok(AppState {
            config: Arc::new(config),
            tokens,
            gate,
            directory,
        })
    }
}

// =============================================================================
// FromRef implementations for extracting parts of state
// =============================================================================

impl axum::extract::FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<AuthGate> {
    fn from_ref(state: &AppState) -> Self {
        state.gate.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
