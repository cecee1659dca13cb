// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Access and refresh token issuance and verification.
//!
//! Access and refresh tokens are HMAC-signed JWTs with separate secrets, so a
//! leaked refresh secret cannot mint access tokens and vice versa. Tokens are
//! signed with HS256. Verification accepts any HMAC header (HS256/384/512) and
//! rejects every other algorithm.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use warden_config::{TokenSettings, MAX_TTL_HOURS};
use warden_core::AccountId;

use super::Claims;

/// Algorithm used when signing.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Algorithms accepted when verifying.
pub const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

// =============================================================================
// TokenError
// =============================================================================

/// Token service errors.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Malformed token, bad signature, or foreign algorithm.
    #[error("invalid token: {reason}")]
    Invalid {
        /// What failed.
        reason: String,
    },

    /// Signature is valid but the token is past its expiry.
    #[error("token expired")]
    Expired,

    /// The service is misconfigured.
    #[error("token configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// Encoding failed.
    #[error("failed to sign token: {message}")]
    Signing {
        /// Error message.
        message: String,
    },
}

impl TokenError {
    /// Creates an invalid token error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a signing error.
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }
}

/// Result type for token operations.
pub type TokenResult<T> = Result<T, TokenError>;

// =============================================================================
// TokenConfig
// =============================================================================

/// Secrets and lifetimes of the token service.
#[derive(Clone)]
pub struct TokenConfig {
    access_secret: String,
    refresh_secret: String,
    /// Access token lifetime.
    pub access_ttl: Duration,
    /// Refresh token lifetime.
    pub refresh_ttl: Duration,
    /// Optional issuer, embedded and enforced when set.
    pub issuer: Option<String>,
}

impl TokenConfig {
    /// Creates a configuration with default lifetimes (1h access, 168h refresh).
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl: Duration::from_secs(3600),
            refresh_ttl: Duration::from_secs(168 * 3600),
            issuer: None,
        }
    }

    /// Builds a configuration from loaded settings.
    pub fn from_settings(settings: &TokenSettings) -> TokenResult<Self> {
        let access = settings
            .access_secret
            .as_ref()
            .ok_or_else(|| TokenError::config("access secret is not configured"))?;
        let refresh = settings
            .refresh_secret
            .as_ref()
            .ok_or_else(|| TokenError::config("refresh secret is not configured"))?;

        let mut config = Self::new(access.expose(), refresh.expose())
            .with_access_ttl(settings.access_ttl())
            .with_refresh_ttl(settings.refresh_ttl());
        config.issuer = settings.issuer.clone();
        Ok(config)
    }

    /// Sets the access token lifetime.
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Sets the refresh token lifetime.
    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> TokenResult<()> {
        if self.access_secret.is_empty() {
            return Err(TokenError::config("access secret is empty"));
        }
        if self.refresh_secret.is_empty() {
            return Err(TokenError::config("refresh secret is empty"));
        }
        if self.access_secret == self.refresh_secret {
            return Err(TokenError::config(
                "access and refresh secrets must differ",
            ));
        }
        if self.access_ttl.is_zero() {
            return Err(TokenError::config("access token lifetime is zero"));
        }
        if self.access_ttl >= self.refresh_ttl {
            return Err(TokenError::config(
                "access token lifetime must be shorter than refresh token lifetime",
            ));
        }
        if self.refresh_ttl > Duration::from_secs(MAX_TTL_HOURS * 3600) {
            return Err(TokenError::config(format!(
                "refresh token lifetime cannot exceed {} hours",
                MAX_TTL_HOURS
            )));
        }
        for (name, secret) in [("access", &self.access_secret), ("refresh", &self.refresh_secret)] {
            if secret.len() < 32 {
                tracing::warn!(secret = name, "Token secret is shorter than recommended (32 bytes)");
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("access_secret", &"***")
            .field("refresh_secret", &"***")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("issuer", &self.issuer)
            .finish()
    }
}

// =============================================================================
// TokenPair
// =============================================================================

/// Token class, identified by the secret that signs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived bearer token for API calls.
    Access,
    /// Long-lived token exchanged for a new pair.
    Refresh,
}

/// An access token and its paired refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

// =============================================================================
// TokenService
// =============================================================================

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Stateless signer and verifier for access and refresh tokens.
///
/// Constructed once at startup and shared behind an `Arc`; every method takes
/// `&self` and the service holds no mutable state.
#[derive(Clone)]
pub struct TokenService {
    config: Arc<TokenConfig>,
    access: Arc<SigningKeys>,
    refresh: Arc<SigningKeys>,
    validation: Arc<Validation>,
}

impl TokenService {
    /// Creates a token service. Fails on misconfiguration.
    pub fn new(config: TokenConfig) -> TokenResult<Self> {
        config.validate()?;

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(ref issuer) = config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Ok(Self {
            access: Arc::new(SigningKeys::from_secret(&config.access_secret)),
            refresh: Arc::new(SigningKeys::from_secret(&config.refresh_secret)),
            config: Arc::new(config),
            validation: Arc::new(validation),
        })
    }

    /// Issues a fresh access/refresh pair for an account.
    pub fn issue_pair(&self, account_id: AccountId, email: &str) -> TokenResult<TokenPair> {
        let access = self.claims(account_id, email, self.config.access_ttl);
        let refresh = self.claims(account_id, email, self.config.refresh_ttl);

        Ok(TokenPair {
            access_token: self.sign(TokenKind::Access, &access)?,
            refresh_token: self.sign(TokenKind::Refresh, &refresh)?,
            expires_in: self.config.access_ttl.as_secs(),
        })
    }

    /// Verifies an access token.
    pub fn verify_access(&self, token: &str) -> TokenResult<Claims> {
        self.verify(TokenKind::Access, token)
    }

    /// Verifies a refresh token.
    pub fn verify_refresh(&self, token: &str) -> TokenResult<Claims> {
        self.verify(TokenKind::Refresh, token)
    }

    /// Signs arbitrary claims with the secret of `kind`.
    pub fn sign(&self, kind: TokenKind, claims: &Claims) -> TokenResult<String> {
        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.keys(kind).encoding)
            .map_err(|e| TokenError::signing(e.to_string()))
    }

    /// Returns the access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        self.config.access_ttl
    }

    /// Returns the refresh token lifetime.
    pub fn refresh_ttl(&self) -> Duration {
        self.config.refresh_ttl
    }

    fn claims(&self, account_id: AccountId, email: &str, ttl: Duration) -> Claims {
        let claims = Claims::new(account_id, email, ttl);
        match self.config.issuer {
            Some(ref issuer) => claims.with_issuer(issuer),
            None => claims,
        }
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    // The signature is checked before any claim, so a tampered expired token
    // reports Invalid rather than Expired.
    fn verify(&self, kind: TokenKind, token: &str) -> TokenResult<Claims> {
        decode::<Claims>(token, &self.keys(kind).decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::invalid("bad signature"),
                ErrorKind::InvalidAlgorithm => TokenError::invalid("unexpected algorithm"),
                ErrorKind::InvalidIssuer => TokenError::invalid("unexpected issuer"),
                _ => TokenError::invalid(e.to_string()),
            })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("config", &self.config)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
