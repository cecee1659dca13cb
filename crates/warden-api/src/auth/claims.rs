// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token claims.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warden_core::AccountId;

/// Claims carried by both access and refresh tokens.
///
/// Which secret signed the token decides its class; the payload shape is shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID).
    pub sub: AccountId,

    /// Account email.
    pub email: String,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Unique token identifier. Not checked against any revocation list.
    pub jti: Uuid,

    /// Issuer, present only when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    /// Creates claims valid for `ttl` from now.
    pub fn new(account_id: AccountId, email: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            sub: account_id,
            email: email.into(),
            iat: now,
            exp: now.saturating_add(ttl),
            jti: Uuid::new_v4(),
            iss: None,
        }
    }

    /// Creates claims that expired `age` ago.
    pub fn expired(account_id: AccountId, email: impl Into<String>, age: Duration) -> Self {
        let mut claims = Self::new(account_id, email, Duration::ZERO);
        claims.exp -= age.as_secs() as i64;
        claims.iat = claims.exp - 3600;
        claims
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims() {
        let id = AccountId::new();
        let claims = Claims::new(id, "a@example.com", Duration::from_secs(3600));
        assert_eq!(claims.sub, id);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let claims = Claims::new(AccountId::new(), "a@example.com", Duration::MAX);
        assert_eq!(claims.exp, i64::MAX);
    }

    #[test]
    fn test_unique_jti() {
        let id = AccountId::new();
        let a = Claims::new(id, "a@example.com", Duration::from_secs(60));
        let b = Claims::new(id, "a@example.com", Duration::from_secs(60));
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_expired_claims() {
        let claims = Claims::expired(AccountId::new(), "a@example.com", Duration::from_secs(120));
        assert!(claims.exp < Utc::now().timestamp());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_issuer_skipped_when_absent() {
        let claims = Claims::new(AccountId::new(), "a@example.com", Duration::from_secs(60));
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("iss").is_none());
        assert!(json.get("jti").is_some());
    }
}
