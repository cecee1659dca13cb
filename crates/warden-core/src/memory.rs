// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory directory implementation.
//!
//! [`InMemoryDirectory`] implements every store trait on top of `DashMap`
//! shards, so concurrent requests never contend on a single global lock. It is
//! used by the bundled server (seeded from configuration) and by tests.
//!
//! # Examples
//!
//! ```
//! use warden_core::memory::InMemoryDirectory;
//! use warden_core::model::{Account, Permission, Role};
//!
//! let dir = InMemoryDirectory::new();
//! let read = dir.add_permission(Permission::new("menus.read")).unwrap();
//! let editor = dir.add_role(Role::new("editor")).unwrap();
//! dir.grant(editor, read).unwrap();
//!
//! let alice = dir.add_account(Account::new("alice", "alice@example.com"), "hash").unwrap();
//! dir.assign_role(alice, editor).unwrap();
//! assert_eq!(dir.stats().accounts, 1);
//! ```

use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::model::{Account, AccountCredentials, Permission, Role, Subject, SubjectPermissionLink};
use crate::store::{CredentialStore, IdentityStore, ModelPermissionStore, PermissionCatalog, RoleStore};
use crate::types::{AccountId, PermissionId, RoleId};

// =============================================================================
// Entries
// =============================================================================

#[derive(Debug, Clone)]
struct AccountEntry {
    account: Account,
    password_hash: String,
    role_ids: Vec<RoleId>,
}

#[derive(Debug, Clone)]
struct RoleEntry {
    role: Role,
    permission_ids: HashSet<PermissionId>,
}

/// Entity counts of a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryStats {
    /// Number of accounts.
    pub accounts: usize,
    /// Number of roles.
    pub roles: usize,
    /// Number of permissions.
    pub permissions: usize,
    /// Number of subject permission links.
    pub links: usize,
}

// =============================================================================
// InMemoryDirectory
// =============================================================================

/// A directory held entirely in process memory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    accounts: DashMap<AccountId, AccountEntry>,
    usernames: DashMap<String, AccountId>,
    roles: DashMap<RoleId, RoleEntry>,
    role_names: DashMap<String, RoleId>,
    permissions: DashMap<PermissionId, Permission>,
    permission_names: DashMap<String, PermissionId>,
    links: DashSet<SubjectPermissionLink>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Permissions
    // -------------------------------------------------------------------------

    /// Adds a permission. Names are unique.
    pub fn add_permission(&self, permission: Permission) -> StoreResult<PermissionId> {
        let id = permission.id;
        match self.permission_names.entry(permission.name.clone()) {
            Entry::Occupied(_) => return Err(StoreError::duplicate("permission", &permission.name)),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
        debug!(permission = %permission.name, "Permission added");
        self.permissions.insert(id, permission);
        Ok(id)
    }

    /// Returns a permission by name.
    pub fn permission_by_name(&self, name: &str) -> Option<Permission> {
        let id = *self.permission_names.get(name)?;
        self.permissions.get(&id).map(|p| p.clone())
    }

    // -------------------------------------------------------------------------
    // Roles
    // -------------------------------------------------------------------------

    /// Adds a role. Names are unique ignoring case.
    pub fn add_role(&self, role: Role) -> StoreResult<RoleId> {
        let id = role.id;
        match self.role_names.entry(role.name.to_lowercase()) {
            Entry::Occupied(_) => return Err(StoreError::duplicate("role", &role.name)),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
        debug!(role = %role.name, "Role added");
        self.roles.insert(
            id,
            RoleEntry {
                role,
                permission_ids: HashSet::new(),
            },
        );
        Ok(id)
    }

    /// Returns a role by name, ignoring case.
    pub fn role_by_name(&self, name: &str) -> Option<Role> {
        let id = *self.role_names.get(&name.to_lowercase())?;
        self.roles.get(&id).map(|e| e.role.clone())
    }

    /// Grants a permission directly to a role.
    pub fn grant(&self, role_id: RoleId, permission_id: PermissionId) -> StoreResult<()> {
        if !self.permissions.contains_key(&permission_id) {
            return Err(StoreError::inconsistent(format!(
                "unknown permission {}",
                permission_id
            )));
        }
        let mut entry = self
            .roles
            .get_mut(&role_id)
            .ok_or_else(|| StoreError::inconsistent(format!("unknown role {}", role_id)))?;
        entry.permission_ids.insert(permission_id);
        Ok(())
    }

    /// Removes a direct grant. Returns `true` if it existed.
    pub fn revoke(&self, role_id: RoleId, permission_id: PermissionId) -> bool {
        self.roles
            .get_mut(&role_id)
            .map(|mut e| e.permission_ids.remove(&permission_id))
            .unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------------

    /// Adds an account with its password hash. Usernames are unique.
    pub fn add_account(
        &self,
        account: Account,
        password_hash: impl Into<String>,
    ) -> StoreResult<AccountId> {
        let id = account.id;
        match self.usernames.entry(account.username.clone()) {
            Entry::Occupied(_) => return Err(StoreError::duplicate("account", &account.username)),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
        debug!(account_id = %id, username = %account.username, "Account added");
        self.accounts.insert(
            id,
            AccountEntry {
                account,
                password_hash: password_hash.into(),
                role_ids: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Assigns a role to an account. Assigning twice is a no-op.
    pub fn assign_role(&self, account_id: AccountId, role_id: RoleId) -> StoreResult<()> {
        if !self.roles.contains_key(&role_id) {
            return Err(StoreError::inconsistent(format!("unknown role {}", role_id)));
        }
        let mut entry = self
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| StoreError::inconsistent(format!("unknown account {}", account_id)))?;
        if !entry.role_ids.contains(&role_id) {
            entry.role_ids.push(role_id);
        }
        Ok(())
    }

    /// Removes every role from an account.
    pub fn clear_roles(&self, account_id: AccountId) {
        if let Some(mut entry) = self.accounts.get_mut(&account_id) {
            entry.role_ids.clear();
        }
    }

    /// Activates or deactivates an account.
    pub fn set_active(&self, account_id: AccountId, active: bool) -> StoreResult<()> {
        let mut entry = self
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| StoreError::inconsistent(format!("unknown account {}", account_id)))?;
        entry.account.is_active = active;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Subject links
    // -------------------------------------------------------------------------

    /// Attaches a permission to a subject.
    pub fn link(&self, subject: Subject, permission_id: PermissionId) -> StoreResult<()> {
        if !self.permissions.contains_key(&permission_id) {
            return Err(StoreError::inconsistent(format!(
                "unknown permission {}",
                permission_id
            )));
        }
        self.links
            .insert(SubjectPermissionLink::new(subject, permission_id));
        Ok(())
    }

    /// Detaches a permission from a subject. Returns `true` if it existed.
    pub fn unlink(&self, subject: Subject, permission_id: PermissionId) -> bool {
        self.links
            .remove(&SubjectPermissionLink::new(subject, permission_id))
            .is_some()
    }

    /// Returns entity counts.
    pub fn stats(&self) -> DirectoryStats {
        DirectoryStats {
            accounts: self.accounts.len(),
            roles: self.roles.len(),
            permissions: self.permissions.len(),
            links: self.links.len(),
        }
    }
}

// =============================================================================
// Store implementations
// =============================================================================

#[async_trait]
impl IdentityStore for InMemoryDirectory {
    async fn find_by_id(&self, id: AccountId) -> StoreResult<Option<Account>> {
        Ok(self.accounts.get(&id).map(|e| e.account.clone()))
    }
}

#[async_trait]
impl CredentialStore for InMemoryDirectory {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<AccountCredentials>> {
        let Some(id) = self.usernames.get(username).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.accounts.get(&id).map(|e| AccountCredentials {
            account: e.account.clone(),
            password_hash: e.password_hash.clone(),
        }))
    }
}

#[async_trait]
impl RoleStore for InMemoryDirectory {
    async fn roles_of(&self, account_id: AccountId) -> StoreResult<Vec<Role>> {
        let role_ids = match self.accounts.get(&account_id) {
            Some(entry) => entry.role_ids.clone(),
            None => return Ok(Vec::new()),
        };

        role_ids
            .iter()
            .map(|id| {
                self.roles
                    .get(id)
                    .map(|e| e.role.clone())
                    .ok_or_else(|| StoreError::inconsistent(format!("dangling role {}", id)))
            })
            .collect()
    }

    async fn permissions_of(&self, role_ids: &[RoleId]) -> StoreResult<Vec<Permission>> {
        let mut ids = HashSet::new();
        for role_id in role_ids {
            if let Some(entry) = self.roles.get(role_id) {
                ids.extend(entry.permission_ids.iter().copied());
            }
        }

        let mut permissions = ids
            .into_iter()
            .map(|id| {
                self.permissions
                    .get(&id)
                    .map(|p| p.clone())
                    .ok_or_else(|| StoreError::inconsistent(format!("dangling permission {}", id)))
            })
            .collect::<StoreResult<Vec<_>>>()?;
        permissions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(permissions)
    }
}

#[async_trait]
impl ModelPermissionStore for InMemoryDirectory {
    async fn exists(&self, subject: &Subject, permission_id: PermissionId) -> StoreResult<bool> {
        Ok(self
            .links
            .contains(&SubjectPermissionLink::new(*subject, permission_id)))
    }
}

#[async_trait]
impl PermissionCatalog for InMemoryDirectory {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<PermissionId>> {
        Ok(self.permission_names.get(name).map(|id| *id))
    }
}

// =============================================================================
// Tests
// =============================================================================
