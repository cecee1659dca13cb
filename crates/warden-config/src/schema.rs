// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions for warden.
//!
//! ```yaml
//! server:
//!   port: 8080
//!   base_path: /api/v1
//! security:
//!   tokens:
//!     access_secret: ${JWT_SECRET}
//!     refresh_secret: ${REFRESH_TOKEN_SECRET}
//!     access_ttl_hours: 1
//!     refresh_ttl_hours: 168
//! logging:
//!   level: info
//!   format: json
//! directory:
//!   permissions:
//!     - name: menus.read
//!   roles:
//!     - name: admin
//!       permissions: [menus.read]
//! ```

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use warden_core::SubjectKind;

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Default API port.
pub const DEFAULT_API_PORT: u16 = 8080;

/// Default access token lifetime in hours.
pub const DEFAULT_ACCESS_TTL_HOURS: u64 = 1;

/// Default refresh token lifetime in hours (one week).
pub const DEFAULT_REFRESH_TTL_HOURS: u64 = 168;

/// Upper bound for either token lifetime in hours (ten years).
pub const MAX_TTL_HOURS: u64 = 87_600;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure for warden.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WardenConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Token and gate configuration.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Seed data for the in-memory directory.
    #[serde(default)]
    pub directory: DirectorySeed,
}

impl WardenConfig {
    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.security.validate()?;
        self.directory.validate()?;
        Ok(())
    }

    /// Returns a copy with every secret replaced by `***`, safe to print.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        let mask = |secret: &mut SecretValue| *secret = SecretValue::new("***");
        config.security.tokens.access_secret.iter_mut().for_each(mask);
        config.security.tokens.refresh_secret.iter_mut().for_each(mask);
        config
            .directory
            .accounts
            .iter_mut()
            .for_each(|account| mask(&mut account.password_hash));
        config
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,

    /// Listen port.
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Base path for API routes.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
}

fn default_api_port() -> u16 {
    DEFAULT_API_PORT
}

fn default_base_path() -> String {
    "/api/v1".to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ServerConfig {
    /// Validates the server configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout_secs",
                "cannot be zero",
            ));
        }
        if !self.base_path.is_empty() && !self.base_path.starts_with('/') {
            return Err(ConfigError::validation(
                "server.base_path",
                "must start with '/'",
            ));
        }
        Ok(())
    }

    /// Returns the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the socket address.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::new(self.bind_address, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: DEFAULT_API_PORT,
            base_path: default_base_path(),
            cors: CorsConfig::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins (use "*" for all). Empty disables CORS.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Allow credentials.
    #[serde(default)]
    pub allow_credentials: bool,
}

// =============================================================================
// Security Configuration
// =============================================================================

/// Security configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    /// Token signing configuration.
    #[serde(default)]
    pub tokens: TokenSettings,
}

impl SecurityConfig {
    /// Validates the security configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.tokens.validate()
    }
}

/// Signing secrets and lifetimes for access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenSettings {
    /// HMAC secret for access tokens.
    #[serde(default)]
    pub access_secret: Option<SecretValue>,

    /// HMAC secret for refresh tokens. Must differ from the access secret.
    #[serde(default)]
    pub refresh_secret: Option<SecretValue>,

    /// Access token lifetime in hours.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_hours: u64,

    /// Refresh token lifetime in hours.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_hours: u64,

    /// Optional `iss` claim, checked on verification when set.
    #[serde(default)]
    pub issuer: Option<String>,
}

fn default_access_ttl() -> u64 {
    DEFAULT_ACCESS_TTL_HOURS
}

fn default_refresh_ttl() -> u64 {
    DEFAULT_REFRESH_TTL_HOURS
}

impl TokenSettings {
    /// Validates secrets and lifetimes.
    pub fn validate(&self) -> ConfigResult<()> {
        let access = self
            .access_secret
            .as_ref()
            .ok_or_else(|| ConfigError::missing_field("security.tokens.access_secret"))?;
        let refresh = self
            .refresh_secret
            .as_ref()
            .ok_or_else(|| ConfigError::missing_field("security.tokens.refresh_secret"))?;

        if access.is_empty() {
            return Err(ConfigError::validation(
                "security.tokens.access_secret",
                "cannot be empty",
            ));
        }
        if refresh.is_empty() {
            return Err(ConfigError::validation(
                "security.tokens.refresh_secret",
                "cannot be empty",
            ));
        }
        if access.expose() == refresh.expose() {
            return Err(ConfigError::validation(
                "security.tokens.refresh_secret",
                "must differ from the access secret",
            ));
        }
        if self.access_ttl_hours == 0 {
            return Err(ConfigError::validation(
                "security.tokens.access_ttl_hours",
                "cannot be zero",
            ));
        }
        if self.access_ttl_hours >= self.refresh_ttl_hours {
            return Err(ConfigError::validation(
                "security.tokens.refresh_ttl_hours",
                "must be greater than access_ttl_hours",
            ));
        }
        if self.refresh_ttl_hours > MAX_TTL_HOURS {
            return Err(ConfigError::validation(
                "security.tokens.refresh_ttl_hours",
                format!("cannot exceed {} hours", MAX_TTL_HOURS),
            ));
        }
        Ok(())
    }

    /// Returns the access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.access_ttl_hours.saturating_mul(3600))
    }

    /// Returns the refresh token lifetime.
    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_ttl_hours.saturating_mul(3600))
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            access_secret: None,
            refresh_secret: None,
            access_ttl_hours: DEFAULT_ACCESS_TTL_HOURS,
            refresh_ttl_hours: DEFAULT_REFRESH_TTL_HOURS,
            issuer: None,
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line format.
    #[default]
    Pretty,
    /// Single-line format.
    Compact,
    /// JSON lines for log shippers.
    Json,
}

// =============================================================================
// Directory Seed
// =============================================================================

/// Entities loaded into the in-memory directory at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectorySeed {
    /// Permissions.
    #[serde(default)]
    pub permissions: Vec<PermissionSeed>,
    /// Roles with their direct grants.
    #[serde(default)]
    pub roles: Vec<RoleSeed>,
    /// Accounts with their role assignments.
    #[serde(default)]
    pub accounts: Vec<AccountSeed>,
    /// Subject permission links.
    #[serde(default)]
    pub links: Vec<LinkSeed>,
}

impl DirectorySeed {
    /// Checks that every reference resolves within the seed.
    pub fn validate(&self) -> ConfigResult<()> {
        let permissions: std::collections::HashSet<&str> =
            self.permissions.iter().map(|p| p.name.as_str()).collect();
        let roles: std::collections::HashSet<String> =
            self.roles.iter().map(|r| r.name.to_lowercase()).collect();

        for role in &self.roles {
            for name in &role.permissions {
                if !permissions.contains(name.as_str()) {
                    return Err(ConfigError::validation(
                        format!("directory.roles[{}].permissions", role.name),
                        format!("unknown permission '{}'", name),
                    ));
                }
            }
        }
        for account in &self.accounts {
            for name in &account.roles {
                if !roles.contains(&name.to_lowercase()) {
                    return Err(ConfigError::validation(
                        format!("directory.accounts[{}].roles", account.username),
                        format!("unknown role '{}'", name),
                    ));
                }
            }
        }
        for (i, link) in self.links.iter().enumerate() {
            if !permissions.contains(link.permission.as_str()) {
                return Err(ConfigError::validation(
                    format!("directory.links[{}].permission", i),
                    format!("unknown permission '{}'", link.permission),
                ));
            }
            match link.kind {
                SubjectKind::Role if !roles.contains(&link.target.to_lowercase()) => {
                    return Err(ConfigError::validation(
                        format!("directory.links[{}].target", i),
                        format!("unknown role '{}'", link.target),
                    ));
                }
                SubjectKind::Resource if uuid::Uuid::parse_str(&link.target).is_err() => {
                    return Err(ConfigError::validation(
                        format!("directory.links[{}].target", i),
                        "resource target must be a UUID",
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` if the seed defines nothing.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
            && self.roles.is_empty()
            && self.accounts.is_empty()
            && self.links.is_empty()
    }
}

/// A seeded permission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionSeed {
    /// Unique name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A seeded role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleSeed {
    /// Unique name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Names of directly granted permissions.
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// A seeded account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountSeed {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// PHC password hash, as printed by `warden hash-password`.
    pub password_hash: SecretValue,
    /// Whether the account may log in.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Superuser flag.
    #[serde(default)]
    pub superuser: bool,
    /// Names of assigned roles.
    #[serde(default)]
    pub roles: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// A seeded subject permission link.
///
/// `target` is a role name for `kind: role` and a UUID for `kind: resource`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkSeed {
    /// Subject kind.
    pub kind: SubjectKind,
    /// Role name or resource UUID.
    pub target: String,
    /// Permission name.
    pub permission: String,
}

// =============================================================================
// Secret Value
// =============================================================================

/// A secret string that never appears in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(String);

impl SecretValue {
    /// Creates a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret itself.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the secret is empty or whitespace.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "***")
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretValue(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> TokenSettings {
        TokenSettings {
            access_secret: Some(SecretValue::new("access-secret")),
            refresh_secret: Some(SecretValue::new("refresh-secret")),
            ..TokenSettings::default()
        }
    }

    #[test]
    fn test_redacted() {
        let mut config = WardenConfig::default();
        config.security.tokens = tokens();
        let json = serde_json::to_string(&config.redacted()).unwrap();
        assert!(!json.contains("access-secret"));
        assert!(json.contains("***"));
    }

    #[test]
    fn test_defaults() {
        let config = WardenConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.security.tokens.access_ttl_hours, 1);
        assert_eq!(config.security.tokens.refresh_ttl_hours, 168);
        assert!(config.directory.is_empty());
    }

    #[test]
    fn test_token_settings_valid() {
        let settings = tokens();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.access_ttl(), Duration::from_secs(3600));
        assert_eq!(settings.refresh_ttl(), Duration::from_secs(604_800));
    }

    #[test]
    fn test_token_settings_missing_secret() {
        let settings = TokenSettings::default();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_token_settings_same_secret() {
        let settings = TokenSettings {
            refresh_secret: Some(SecretValue::new("access-secret")),
            ..tokens()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_token_settings_ttl_order() {
        let settings = TokenSettings {
            access_ttl_hours: 200,
            ..tokens()
        };
        assert!(settings.validate().is_err());

        let settings = TokenSettings {
            access_ttl_hours: 0,
            ..tokens()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_token_settings_ttl_upper_bound() {
        let settings = TokenSettings {
            refresh_ttl_hours: MAX_TTL_HOURS,
            ..tokens()
        };
        assert!(settings.validate().is_ok());

        let settings = TokenSettings {
            refresh_ttl_hours: MAX_TTL_HOURS + 1,
            ..tokens()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Validation { .. })
        ));

        let settings = TokenSettings {
            access_ttl_hours: u64::MAX / 1000,
            refresh_ttl_hours: u64::MAX,
            ..tokens()
        };
        assert!(settings.validate().is_err());
        assert_eq!(settings.refresh_ttl(), Duration::from_secs(u64::MAX));
        assert_eq!(settings.access_ttl(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_secret_value_redacted() {
        let secret = SecretValue::new("hunter2");
        assert_eq!(secret.to_string(), "***");
        assert!(!format!("{:?}", secret).contains("hunter2"));
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn test_seed_unknown_permission() {
        let seed = DirectorySeed {
            roles: vec![RoleSeed {
                name: "admin".into(),
                description: None,
                permissions: vec!["menus.read".into()],
            }],
            ..DirectorySeed::default()
        };
        assert!(seed.validate().is_err());
    }

    #[test]
    fn test_seed_resource_target_must_be_uuid() {
        let seed = DirectorySeed {
            permissions: vec![PermissionSeed {
                name: "menus.read".into(),
                description: None,
            }],
            links: vec![LinkSeed {
                kind: SubjectKind::Resource,
                target: "dashboard".into(),
                permission: "menus.read".into(),
            }],
            ..DirectorySeed::default()
        };
        assert!(seed.validate().is_err());
    }

    #[test]
    fn test_server_base_path() {
        let server = ServerConfig {
            base_path: "api".into(),
            ..ServerConfig::default()
        };
        assert!(server.validate().is_err());
    }
}
