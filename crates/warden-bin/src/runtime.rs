// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server runtime orchestration.
//!
//! Startup order:
//!
//! 1. Load and validate configuration
//! 2. Seed the in-memory directory
//! 3. Build the token service (misconfiguration is fatal here)
//! 4. Serve until SIGTERM/SIGINT

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use warden_api::auth::{TokenConfig, TokenService};
use warden_api::{ApiServer, AppState};
use warden_config::{load_config, WardenConfig};
use warden_core::Directory;

use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// ServerRuntime
// =============================================================================

/// Owns the configuration and runs the API server to completion.
pub struct ServerRuntime {
    config: Arc<WardenConfig>,
    shutdown: ShutdownCoordinator,
}

impl ServerRuntime {
    /// Creates a runtime from validated configuration.
    pub fn new(config: WardenConfig) -> Self {
        Self {
            config: Arc::new(config),
            shutdown: ShutdownCoordinator::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &WardenConfig {
        &self.config
    }

    /// Returns the shutdown coordinator.
    pub fn shutdown(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    /// Builds the shared application state.
    pub fn build_state(&self) -> BinResult<AppState> {
        let seed = &self.config.directory;
        if seed.accounts.is_empty() {
            warn!("Directory seed has no accounts; nobody will be able to log in");
        }

        let directory = seed.build().map_err(BinError::Seed)?;
        let stats = directory.stats();
        info!(
            accounts = stats.accounts,
            roles = stats.roles,
            permissions = stats.permissions,
            links = stats.links,
            "Directory ready"
        );

        let tokens = TokenService::new(TokenConfig::from_settings(&self.config.security.tokens)?)?;
        info!(
            access_ttl_secs = tokens.access_ttl().as_secs(),
            refresh_ttl_secs = tokens.refresh_ttl().as_secs(),
            "Token service configured"
        );

        let state = AppState::builder()
            .config(self.config.server.clone())
            .tokens(Arc::new(tokens))
            .directory(Directory::from_shared(Arc::new(directory)))
            .build()
            .context("failed to assemble application state")?;

        Ok(state)
    }

    /// Runs the server until a shutdown signal arrives.
    pub async fn run(self) -> BinResult<()> {
        info!("Starting warden v{}", crate::VERSION);

        let state = self.build_state()?;
        let server = ApiServer::new(state);

        let signals = self.shutdown.clone();
        let signal_task = tokio::spawn(async move { signals.wait_for_os_signal().await });

        let result = server
            .run_with_shutdown(self.shutdown.shutdown_signal())
            .await;

        signal_task.abort();
        result?;

        info!("warden shutdown complete");
        Ok(())
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for constructing the server runtime.
#[derive(Default)]
pub struct RuntimeBuilder {
    config_path: Option<PathBuf>,
    config: Option<WardenConfig>,
    port: Option<u16>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration file path.
    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the configuration directly.
    pub fn config(mut self, config: WardenConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the listen port.
    pub fn port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Loads the configuration and builds the runtime.
    pub fn build(self) -> BinResult<ServerRuntime> {
        let mut config = match self.config {
            Some(config) => config,
            None => {
                let path = self
                    .config_path
                    .ok_or_else(|| BinError::usage("no configuration provided"))?;

                load_config(&path).map_err(|e| BinError::config(&path, e))?
            }
        };

        if let Some(port) = self.port {
            config.server.port = port;
        }

        Ok(ServerRuntime::new(config))
    }
}

// =============================================================================
// Tests
// =============================================================================
