// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Builders
//!
//! Fluent builders for directories and HTTP requests.

use std::collections::HashMap;

use axum::body::Body;
use http::{header, Method, Request};
use warden_core::{Account, AccountId, InMemoryDirectory, Permission, Role, Subject};

use super::fixtures::{email_of, password_hash};

// =============================================================================
// AccountBuilder
// =============================================================================

/// Builder for a seeded account.
#[derive(Debug, Clone)]
pub struct AccountBuilder {
    account: Account,
    password_hash: Option<String>,
    roles: Vec<String>,
}

impl AccountBuilder {
    /// Starts an active, non-superuser account named `username`.
    pub fn new(username: &str) -> Self {
        Self {
            account: Account::new(username, email_of(username)),
            password_hash: None,
            roles: Vec::new(),
        }
    }

    /// Overrides the email address.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.account.email = email.into();
        self
    }

    /// Marks the account as superuser.
    pub fn superuser(mut self) -> Self {
        self.account.is_superuser = true;
        self
    }

    /// Marks the account as inactive.
    pub fn inactive(mut self) -> Self {
        self.account.is_active = false;
        self
    }

    /// Assigns a role by name.
    pub fn role(mut self, name: impl Into<String>) -> Self {
        self.roles.push(name.into());
        self
    }

    /// Uses a specific password hash instead of the fixture password.
    pub fn password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    /// Returns the id the account will be stored under.
    pub fn id(&self) -> AccountId {
        self.account.id
    }
}

// =============================================================================
// DirectoryBuilder
// =============================================================================

/// Builder for an [`InMemoryDirectory`].
///
/// Entities are inserted in dependency order regardless of call order.
#[derive(Debug, Clone, Default)]
pub struct DirectoryBuilder {
    permissions: Vec<String>,
    roles: Vec<(String, Vec<String>)>,
    accounts: Vec<AccountBuilder>,
    links: Vec<(Subject, String)>,
    ids: HashMap<String, AccountId>,
}

impl DirectoryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a permission.
    pub fn permission(mut self, name: impl Into<String>) -> Self {
        self.permissions.push(name.into());
        self
    }

    /// Adds a role granted the named permissions.
    pub fn role<I, S>(mut self, name: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles
            .push((name.into(), permissions.into_iter().map(Into::into).collect()));
        self
    }

    /// Adds an account.
    pub fn account(mut self, account: AccountBuilder) -> Self {
        self.ids.insert(account.account.username.clone(), account.id());
        self.accounts.push(account);
        self
    }

    /// Links a subject to a named permission.
    pub fn link(mut self, subject: Subject, permission: impl Into<String>) -> Self {
        self.links.push((subject, permission.into()));
        self
    }

    /// Returns the id of an account added to this builder.
    ///
    /// # Panics
    ///
    /// Panics if no account with that username was added.
    pub fn account_id(&self, username: &str) -> AccountId {
        *self
            .ids
            .get(username)
            .unwrap_or_else(|| panic!("no account '{}' in builder", username))
    }

    /// Builds the directory.
    ///
    /// # Panics
    ///
    /// Panics on references to unknown roles or permissions.
    pub fn build(&self) -> InMemoryDirectory {
        let directory = InMemoryDirectory::new();

        for name in &self.permissions {
            directory
                .add_permission(Permission::new(name))
                .expect("unique permission");
        }

        for (name, grants) in &self.roles {
            let role_id = directory.add_role(Role::new(name)).expect("unique role");
            for grant in grants {
                let permission = directory
                    .permission_by_name(grant)
                    .unwrap_or_else(|| panic!("unknown permission '{}'", grant));
                directory.grant(role_id, permission.id).expect("grant");
            }
        }

        for seed in &self.accounts {
            let hash = seed
                .password_hash
                .clone()
                .unwrap_or_else(|| password_hash().to_string());
            let account_id = directory
                .add_account(seed.account.clone(), hash)
                .expect("unique account");
            for role in &seed.roles {
                let role = directory
                    .role_by_name(role)
                    .unwrap_or_else(|| panic!("unknown role '{}'", role));
                directory.assign_role(account_id, role.id).expect("assign role");
            }
        }

        for (subject, permission) in &self.links {
            let permission = directory
                .permission_by_name(permission)
                .unwrap_or_else(|| panic!("unknown permission '{}'", permission));
            directory.link(*subject, permission.id).expect("link");
        }

        directory
    }
}

// =============================================================================
// TestRequest
// =============================================================================

/// Builder for HTTP requests against the router.
#[derive(Debug)]
pub struct TestRequest {
    method: Method,
    uri: String,
    authorization: Option<String>,
    body: Option<serde_json::Value>,
}

impl TestRequest {
    /// Starts a GET request.
    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::GET, uri)
    }

    /// Starts a POST request.
    pub fn post(uri: impl Into<String>) -> Self {
        Self::new(Method::POST, uri)
    }

    fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            authorization: None,
            body: None,
        }
    }

    /// Sets `Authorization: Bearer <token>`.
    pub fn bearer(self, token: &str) -> Self {
        self.authorization(format!("Bearer {}", token))
    }

    /// Sets a raw `Authorization` header.
    pub fn authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    /// Sets a JSON body.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Builds the request.
    pub fn build(self) -> Request<Body> {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        if let Some(value) = self.authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let body = match self.body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        builder.body(body).expect("valid test request")
    }
}
