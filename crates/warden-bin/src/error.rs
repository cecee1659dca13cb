// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Failure modes of the `warden` commands and their process exit codes.
//!
//! | Variant | Raised by | Exit code |
//! |---------|-----------|-----------|
//! | [`Usage`](BinError::Usage) | `hash-password`, `gen-secret` argument checks | 64 |
//! | [`Config`](BinError::Config), [`Seed`](BinError::Seed), [`Tokens`](BinError::Tokens) | `run`, `validate` | 78 |
//! | [`StrictWarnings`](BinError::StrictWarnings) | `validate --strict` | 1 |
//! | [`Server`](BinError::Server) | `run` (bind or serve failure) | 69 |
//! | [`Internal`](BinError::Internal) | logging, async runtime, output rendering, stdin | 70 |

use std::path::PathBuf;

use thiserror::Error;
use warden_api::auth::TokenError;
use warden_api::ApiError;
use warden_config::ConfigError;

/// Result type alias for warden-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Process exit codes, numbered after BSD `sysexits.h`.
pub mod exit_code {
    /// `validate --strict` found warnings.
    pub const STRICT_WARNINGS: i32 = 1;
    /// Bad command-line input (`EX_USAGE`).
    pub const USAGE: i32 = 64;
    /// The server could not bind or serve (`EX_UNAVAILABLE`).
    pub const UNAVAILABLE: i32 = 69;
    /// Internal failure (`EX_SOFTWARE`).
    pub const SOFTWARE: i32 = 70;
    /// Missing or invalid configuration (`EX_CONFIG`).
    pub const CONFIG: i32 = 78;
}

/// Errors surfaced by the `warden` binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// Invalid command-line input.
    #[error("{0}")]
    Usage(String),

    /// The configuration file could not be loaded or failed validation.
    #[error("{}: {source}", path.display())]
    Config {
        /// Configuration file path.
        path: PathBuf,
        /// Loader error.
        #[source]
        source: ConfigError,
    },

    /// The directory seed could not be applied.
    #[error("failed to seed directory: {0}")]
    Seed(#[source] ConfigError),

    /// Token settings were rejected by the token service.
    #[error("token settings rejected: {0}")]
    Tokens(#[from] TokenError),

    /// `validate --strict` found warnings.
    #[error("strict mode: {count} warning(s) found")]
    StrictWarnings {
        /// Number of warnings.
        count: usize,
    },

    /// The HTTP server failed.
    #[error("server failed: {0}")]
    Server(#[from] ApiError),

    /// Any other failure, with its context chain.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BinError {
    /// Creates a usage error.
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Creates a configuration error for `path`.
    pub fn config(path: impl Into<PathBuf>, source: ConfigError) -> Self {
        Self::Config {
            path: path.into(),
            source,
        }
    }

    /// Returns the process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => exit_code::USAGE,
            Self::Config { .. } | Self::Seed(_) | Self::Tokens(_) => exit_code::CONFIG,
            Self::StrictWarnings { .. } => exit_code::STRICT_WARNINGS,
            Self::Server(_) => exit_code::UNAVAILABLE,
            Self::Internal(_) => exit_code::SOFTWARE,
        }
    }

    /// Prints the error to stderr and exits with [`exit_code`](Self::exit_code).
    pub fn exit(self) -> ! {
        match &self {
            Self::Internal(err) => eprintln!("warden: {:#}", err),
            other => eprintln!("warden: {}", other),
        }
        std::process::exit(self.exit_code())
    }
}
