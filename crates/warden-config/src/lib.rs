// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-config
//!
//! Configuration management for the warden auth server.
//!
//! ## Features
//!
//! - **Schema Definition**: server, token, logging and directory seed sections
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: secrets and lifetimes from environment variables
//! - **Directory Seeding**: build an in-memory directory from configuration
//!
//! ## Quick Start
//!
//! ```no_run
//! use warden_config::loader::load_config;
//!
//! let config = load_config("warden.yaml").unwrap();
//! println!("Listening on {}", config.server.socket_addr());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;
mod seed;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, ConfigFormat, ConfigLoader};
pub use schema::{
    AccountSeed, CorsConfig, DirectorySeed, LinkSeed, LogFormat, LogLevel, LoggingConfig,
    PermissionSeed, RoleSeed, SecretValue, SecurityConfig, ServerConfig, TokenSettings,
    WardenConfig, MAX_TTL_HOURS,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
