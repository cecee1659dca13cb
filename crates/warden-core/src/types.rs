// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identifier types for warden.
//!
//! Every entity in the directory is keyed by a UUID wrapped in its own newtype,
//! so an account id can never be passed where a role id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// Identifier Macro
// =============================================================================

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new time-ordered identifier.
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps an existing UUID.
            #[inline]
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Returns the inner UUID.
            #[inline]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

// =============================================================================
// Identifiers
// =============================================================================

uuid_id! {
    /// Unique identifier of an account.
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_core::types::AccountId;
    ///
    /// let id = AccountId::new();
    /// let parsed: AccountId = id.to_string().parse().unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    AccountId
}

uuid_id! {
    /// Unique identifier of a role.
    RoleId
}

uuid_id! {
    /// Unique identifier of a permission.
    PermissionId
}

uuid_id! {
    /// Unique identifier of a non-role subject, such as a menu entry.
    ResourceId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(AccountId::new(), AccountId::new());
        assert_ne!(RoleId::new(), RoleId::new());
    }

    #[test]
    fn test_id_parse_display() {
        let id = PermissionId::new();
        let parsed: PermissionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<ResourceId>().is_err());
    }

    #[test]
    fn test_id_serde_transparent() {
        let uuid = Uuid::now_v7();
        let id = AccountId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }
}
