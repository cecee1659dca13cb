// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Resolved permission sets.

use std::collections::HashMap;

use warden_core::{Permission, PermissionId};

/// The direct role-granted permissions of an account, keyed by permission id.
///
/// Duplicates from overlapping roles collapse to one entry.
#[derive(Debug, Clone, Default)]
pub struct PermissionSet {
    by_id: HashMap<PermissionId, Permission>,
}

impl PermissionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from permissions, deduplicating by id.
    pub fn from_permissions(permissions: impl IntoIterator<Item = Permission>) -> Self {
        let mut set = Self::new();
        for permission in permissions {
            set.add(permission);
        }
        set
    }

    /// Adds a permission. Returns `false` if its id was already present.
    pub fn add(&mut self, permission: Permission) -> bool {
        self.by_id.insert(permission.id, permission).is_none()
    }

    /// Returns `true` if the set holds the permission id.
    pub fn contains(&self, id: PermissionId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Returns the number of permissions.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Returns the permissions sorted by name.
    pub fn sorted(&self) -> Vec<Permission> {
        let mut permissions: Vec<_> = self.by_id.values().cloned().collect();
        permissions.sort_by(|a, b| a.name.cmp(&b.name));
        permissions
    }
}
