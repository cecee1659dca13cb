// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! A directory seeded with well-known accounts, roles and permissions.
//!
//! | Account  | Roles  | Flags        |
//! |----------|--------|--------------|
//! | `root`   | none   | superuser    |
//! | `alice`  | admin  |              |
//! | `eddie`  | editor |              |
//! | `ivy`    | editor | inactive     |
//! | `nora`   | none   |              |
//!
//! `admin` is granted `menus.read` and `articles.edit`; `editor` is granted
//! `articles.edit`. `reports.view` is reachable only through a link on
//! [`DirectoryFixture::report`].

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use warden_api::auth::password::hash_password;
use warden_api::auth::{TokenConfig, TokenService};
use warden_core::{
    AccountId, Directory, InMemoryDirectory, PermissionId, ResourceId, RoleId, Subject,
};

use super::builders::{AccountBuilder, DirectoryBuilder};

/// Access token secret used by every fixture.
pub const ACCESS_SECRET: &str = "fixture-access-secret-0123456789abcdef";

/// Refresh token secret used by every fixture.
pub const REFRESH_SECRET: &str = "fixture-refresh-secret-0123456789abcdef";

/// Password shared by every fixture account.
pub const PASSWORD: &str = "correct horse battery staple";

/// Returns the argon2 hash of [`PASSWORD`], computed once per process.
pub fn password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).expect("hash fixture password"))
}

// =============================================================================
// Token Fixtures
// =============================================================================

/// Fixture providing token configuration.
pub struct TokenFixtures;

impl TokenFixtures {
    /// Default lifetimes with the fixture secrets.
    pub fn config() -> TokenConfig {
        TokenConfig::new(ACCESS_SECRET, REFRESH_SECRET)
    }

    /// A token service over [`TokenFixtures::config`].
    pub fn service() -> Arc<TokenService> {
        Arc::new(TokenService::new(Self::config()).expect("fixture token config is valid"))
    }

    /// A token service with short lifetimes.
    pub fn short_lived(access: Duration, refresh: Duration) -> Arc<TokenService> {
        let config = Self::config()
            .with_access_ttl(access)
            .with_refresh_ttl(refresh);
        Arc::new(TokenService::new(config).expect("fixture token config is valid"))
    }
}

// =============================================================================
// Directory Fixture
// =============================================================================

/// The seeded directory plus the ids of everything in it.
#[derive(Clone)]
pub struct DirectoryFixture {
    /// The backing store.
    pub store: Arc<InMemoryDirectory>,
    /// `admin` role.
    pub admin_role: RoleId,
    /// `editor` role.
    pub editor_role: RoleId,
    /// `menus.read`, granted to admin.
    pub menus_read: PermissionId,
    /// `articles.edit`, granted to admin and editor.
    pub articles_edit: PermissionId,
    /// `reports.view`, granted to nobody directly.
    pub reports_view: PermissionId,
    /// Resource linked to `reports.view`.
    pub report: ResourceId,
    /// A menu resource with no links.
    pub menu: ResourceId,
    /// Superuser without roles.
    pub root: AccountId,
    /// Admin.
    pub alice: AccountId,
    /// Editor.
    pub editor: AccountId,
    /// Inactive editor.
    pub inactive: AccountId,
    /// Active account without roles.
    pub roleless: AccountId,
}

impl DirectoryFixture {
    /// Builds the standard fixture.
    pub fn seeded() -> Self {
        let report = ResourceId::new();
        let builder = DirectoryBuilder::new()
            .permission("menus.read")
            .permission("articles.edit")
            .permission("reports.view")
            .role("admin", ["menus.read", "articles.edit"])
            .role("editor", ["articles.edit"])
            .account(AccountBuilder::new("root").superuser())
            .account(AccountBuilder::new("alice").role("admin"))
            .account(AccountBuilder::new("eddie").role("editor"))
            .account(AccountBuilder::new("ivy").role("editor").inactive())
            .account(AccountBuilder::new("nora"))
            .link(Subject::Resource(report), "reports.view");

        let store = Arc::new(builder.build());
        let role = |name: &str| store.role_by_name(name).expect("seeded role").id;
        let permission = |name: &str| store.permission_by_name(name).expect("seeded permission").id;

        Self {
            admin_role: role("admin"),
            editor_role: role("editor"),
            menus_read: permission("menus.read"),
            articles_edit: permission("articles.edit"),
            reports_view: permission("reports.view"),
            report,
            menu: ResourceId::new(),
            root: builder.account_id("root"),
            alice: builder.account_id("alice"),
            editor: builder.account_id("eddie"),
            inactive: builder.account_id("ivy"),
            roleless: builder.account_id("nora"),
            store,
        }
    }

    /// Returns a [`Directory`] over the fixture store.
    pub fn directory(&self) -> Directory {
        Directory::from_shared(self.store.clone())
    }
}

impl Default for DirectoryFixture {
    fn default() -> Self {
        Self::seeded()
    }
}

/// Email address a fixture account is created with.
pub fn email_of(username: &str) -> String {
    format!("{}@example.com", username)
}
