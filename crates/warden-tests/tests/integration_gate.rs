// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Gate Integration Tests
//!
//! Exercises [`AuthGate`] directly against the fixture directory.
//!
//! - `test_authn_*`: bearer parsing and account resolution
//! - `test_role_*`: role checks
//! - `test_perm_*`: permission checks, including subject links
//! - `test_store_*`: store failures fail closed

use std::sync::Arc;
use std::time::Duration;

use http::HeaderValue;
use proptest::prelude::*;
use warden_api::auth::{AuthGate, Claims, TokenKind, TokenService};
use warden_api::AuthContext;
use warden_core::{AccountId, Directory, ResourceId, Subject};
use warden_tests::prelude::*;

// =============================================================================
// Test Helpers
// =============================================================================

struct GateFixture {
    fixture: DirectoryFixture,
    tokens: Arc<TokenService>,
    gate: AuthGate,
}

impl GateFixture {
    fn new() -> Self {
        let fixture = DirectoryFixture::seeded();
        let directory = fixture.directory();
        Self::with_directory(fixture, directory)
    }

    fn with_directory(fixture: DirectoryFixture, directory: Directory) -> Self {
        let tokens = TokenFixtures::service();
        let gate = AuthGate::new(tokens.clone(), directory);
        Self {
            fixture,
            tokens,
            gate,
        }
    }

    fn bearer(&self, account_id: AccountId) -> HeaderValue {
        let pair = self.tokens.issue_pair(account_id, "x@example.com").unwrap();
        HeaderValue::from_str(&format!("Bearer {}", pair.access_token)).unwrap()
    }

    async fn context(&self, account_id: AccountId) -> AuthContext {
        let header = self.bearer(account_id);
        self.gate.authenticate(Some(&header)).await.assert_ok()
    }
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_authn_missing_and_empty_header() {
    let f = GateFixture::new();
    f.gate.authenticate(None).await.assert_token_missing();
    f.gate
        .authenticate(Some(&HeaderValue::from_static("")))
        .await
        .assert_token_missing();
}

#[tokio::test]
async fn test_authn_malformed_headers() {
    let f = GateFixture::new();
    for raw in ["Bearer garbage", "Basic dXNlcjpwYXNz", "Bearer", "bearer abc.def.ghi", "Bearer  x"] {
        f.gate
            .authenticate(Some(&HeaderValue::from_static(raw)))
            .await
            .assert_token_invalid();
    }
}

#[tokio::test]
async fn test_authn_expired_token() {
    let f = GateFixture::new();
    let claims = Claims::expired(f.fixture.editor, "x@example.com", Duration::from_secs(5));
    let token = f.tokens.sign(TokenKind::Access, &claims).unwrap();
    let header = HeaderValue::from_str(&format!("Bearer {}", token)).unwrap();

    f.gate.authenticate(Some(&header)).await.assert_token_expired();
}

#[tokio::test]
async fn test_authn_refresh_token_is_not_access() {
    let f = GateFixture::new();
    let pair = f.tokens.issue_pair(f.fixture.editor, "x@example.com").unwrap();
    let header = HeaderValue::from_str(&format!("Bearer {}", pair.refresh_token)).unwrap();

    f.gate.authenticate(Some(&header)).await.assert_token_invalid();
}

#[tokio::test]
async fn test_authn_unknown_account() {
    let f = GateFixture::new();
    let header = f.bearer(AccountId::new());
    f.gate.authenticate(Some(&header)).await.assert_unauthorized();
}

#[tokio::test]
async fn test_authn_inactive_account_is_forbidden() {
    let f = GateFixture::new();
    let header = f.bearer(f.fixture.inactive);
    f.gate.authenticate(Some(&header)).await.assert_forbidden();
}

#[tokio::test]
async fn test_authn_deactivation_applies_to_live_tokens() {
    let f = GateFixture::new();
    let header = f.bearer(f.fixture.editor);
    f.gate.authenticate(Some(&header)).await.assert_ok();

    f.fixture.store.set_active(f.fixture.editor, false).unwrap();
    f.gate.authenticate(Some(&header)).await.assert_forbidden();
}

#[tokio::test]
async fn test_authn_context_snapshot() {
    let f = GateFixture::new();
    let ctx = f.context(f.fixture.alice).await;

    assert_eq!(ctx.account_id, f.fixture.alice);
    assert!(!ctx.is_superuser);
    assert_eq!(ctx.role_names(), vec!["admin"]);
    assert!(ctx.has_permission(f.fixture.menus_read));
    assert!(ctx.has_permission(f.fixture.articles_edit));
    assert!(!ctx.has_permission(f.fixture.reports_view));
}

#[tokio::test]
async fn test_authn_roleless_account_skips_permission_lookup() {
    let fixture = DirectoryFixture::seeded();
    let counting = CountingStore::new(fixture.store.clone());
    let counts = counting.counts();
    let roleless = fixture.roleless;
    let f = GateFixture::with_directory(fixture, counting.directory());

    let ctx = f.context(roleless).await;
    assert!(ctx.roles.is_empty());
    assert!(ctx.permissions.is_empty());
    assert_eq!(CallCounts::get(&counts.roles_of), 1);
    assert_eq!(CallCounts::get(&counts.permissions_of), 0);
}

// =============================================================================
// Roles
// =============================================================================

#[tokio::test]
async fn test_role_case_insensitive() {
    let f = GateFixture::new();
    let ctx = f.context(f.fixture.alice).await;

    f.gate.require_role(&ctx, &["admin"]).assert_ok();
    f.gate.require_role(&ctx, &["Admin"]).assert_ok();
    f.gate.require_role(&ctx, &["ADMIN"]).assert_ok();
}

#[tokio::test]
async fn test_role_any_of() {
    let f = GateFixture::new();
    let ctx = f.context(f.fixture.editor).await;

    f.gate.require_role(&ctx, &["admin"]).assert_forbidden();
    f.gate.require_role(&ctx, &["admin", "editor"]).assert_ok();
    f.gate.require_role::<&str>(&ctx, &[]).assert_forbidden();
}

#[tokio::test]
async fn test_role_superuser_bypass() {
    let f = GateFixture::new();
    let ctx = f.context(f.fixture.root).await;

    assert!(ctx.roles.is_empty());
    f.gate.require_role(&ctx, &["admin"]).assert_ok();
    f.gate.require_superuser(&ctx).assert_ok();
}

#[tokio::test]
async fn test_role_superuser_guard() {
    let f = GateFixture::new();
    let ctx = f.context(f.fixture.alice).await;
    f.gate.require_superuser(&ctx).assert_forbidden();
}

// =============================================================================
// Permissions
// =============================================================================

#[tokio::test]
async fn test_perm_direct_grant_without_link() {
    let fixture = DirectoryFixture::seeded();
    let counting = CountingStore::new(fixture.store.clone());
    let counts = counting.counts();
    let (alice, menu) = (fixture.alice, fixture.menu);
    let f = GateFixture::with_directory(fixture, counting.directory());

    let ctx = f.context(alice).await;
    f.gate
        .require_permission(&ctx, &Subject::Resource(menu), "menus.read")
        .await
        .assert_ok();
    assert_eq!(CallCounts::get(&counts.link_exists), 0);
}

#[tokio::test]
async fn test_perm_missing_grant_and_link() {
    let f = GateFixture::new();
    let ctx = f.context(f.fixture.editor).await;

    f.gate
        .require_permission(&ctx, &Subject::Resource(f.fixture.menu), "menus.read")
        .await
        .assert_forbidden();
}

#[tokio::test]
async fn test_perm_unknown_name_is_forbidden() {
    let f = GateFixture::new();
    let ctx = f.context(f.fixture.alice).await;

    f.gate
        .require_permission(&ctx, &Subject::Resource(f.fixture.menu), "menus.delete")
        .await
        .assert_forbidden();
}

#[tokio::test]
async fn test_perm_superuser_bypass_skips_stores() {
    let fixture = DirectoryFixture::seeded();
    let counting = CountingStore::new(fixture.store.clone());
    let counts = counting.counts();
    let root = fixture.root;
    let f = GateFixture::with_directory(fixture, counting.directory());

    let ctx = f.context(root).await;
    let before = counts.total();
    f.gate
        .require_permission(&ctx, &Subject::Resource(ResourceId::new()), "does.not.exist")
        .await
        .assert_ok();
    assert_eq!(counts.total(), before);
}

#[tokio::test]
async fn test_perm_link_grants_role_holders() {
    let f = GateFixture::new();
    let report = Subject::Resource(f.fixture.report);

    let editor = f.context(f.fixture.editor).await;
    f.gate
        .require_permission(&editor, &report, "reports.view")
        .await
        .assert_ok();

    let roleless = f.context(f.fixture.roleless).await;
    f.gate
        .require_permission(&roleless, &report, "reports.view")
        .await
        .assert_forbidden();
}

#[tokio::test]
async fn test_perm_link_on_other_subject_does_not_grant() {
    let f = GateFixture::new();
    let ctx = f.context(f.fixture.editor).await;

    f.gate
        .require_permission(&ctx, &Subject::Resource(f.fixture.menu), "reports.view")
        .await
        .assert_forbidden();
}

// =============================================================================
// Store Failures
// =============================================================================

#[tokio::test]
async fn test_store_identity_failure_is_internal() {
    let fixture = DirectoryFixture::seeded();
    let directory = FailingStore::identities(fixture.directory());
    let editor = fixture.editor;
    let f = GateFixture::with_directory(fixture, directory);

    let header = f.bearer(editor);
    f.gate.authenticate(Some(&header)).await.assert_server_error();
}

#[tokio::test]
async fn test_store_role_failure_is_internal() {
    let fixture = DirectoryFixture::seeded();
    let directory = FailingStore::roles(fixture.directory());
    let editor = fixture.editor;
    let f = GateFixture::with_directory(fixture, directory);

    let header = f.bearer(editor);
    f.gate.authenticate(Some(&header)).await.assert_server_error();
}

#[tokio::test]
async fn test_store_catalog_failure_is_internal() {
    let fixture = DirectoryFixture::seeded();
    let ok = GateFixture::with_directory(fixture.clone(), fixture.directory());
    let ctx = ok.context(fixture.editor).await;

    let failing = AuthGate::new(ok.tokens.clone(), FailingStore::catalog(fixture.directory()));
    failing
        .require_permission(&ctx, &Subject::Resource(fixture.report), "reports.view")
        .await
        .assert_server_error();
}

#[tokio::test]
async fn test_store_link_failure_only_matters_without_grant() {
    let fixture = DirectoryFixture::seeded();
    let ok = GateFixture::with_directory(fixture.clone(), fixture.directory());
    let alice = ok.context(fixture.alice).await;
    let editor = ok.context(fixture.editor).await;

    let failing = AuthGate::new(ok.tokens.clone(), FailingStore::links(fixture.directory()));
    failing
        .require_permission(&alice, &Subject::Resource(fixture.menu), "menus.read")
        .await
        .assert_ok();
    failing
        .require_permission(&editor, &Subject::Resource(fixture.menu), "menus.read")
        .await
        .assert_server_error();
}

// =============================================================================
// Role-Independent Links
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// A subject link grants to every account holding at least one role,
    /// whichever roles those are and whatever the subject is.
    #[test]
    fn test_perm_link_ignores_which_role(held in 0usize..4, link_role_subject in any::<bool>()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let granted = runtime.block_on(async {
            let roles = ["r0", "r1", "r2", "r3"];
            let mut account = AccountBuilder::new("subject");
            for name in roles.iter().take(held) {
                account = account.role(*name);
            }

            let mut builder = DirectoryBuilder::new().permission("linked.read");
            for name in roles.iter().chain(["outsider"].iter()) {
                builder = builder.role(*name, Vec::<String>::new());
            }
            let account_id = account.id();
            let builder = builder.account(account);
            let store = Arc::new(builder.build());

            let subject = if link_role_subject {
                Subject::Role(store.role_by_name("outsider").unwrap().id)
            } else {
                Subject::Resource(ResourceId::new())
            };
            let permission = store.permission_by_name("linked.read").unwrap().id;
            store.link(subject, permission).unwrap();

            let tokens = TokenFixtures::service();
            let gate = AuthGate::new(tokens.clone(), Directory::from_shared(store));
            let pair = tokens.issue_pair(account_id, "s@example.com").unwrap();
            let header = HeaderValue::from_str(&format!("Bearer {}", pair.access_token)).unwrap();
            let ctx = gate.authenticate(Some(&header)).await.unwrap();

            gate.require_permission(&ctx, &subject, "linked.read").await.is_ok()
        });

        prop_assert_eq!(granted, held > 0);
    }
}
