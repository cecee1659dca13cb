// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Directory entities: accounts, roles, permissions and subject grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{AccountId, PermissionId, ResourceId, RoleId};

// =============================================================================
// Account
// =============================================================================

/// An account that can authenticate against warden.
///
/// Role assignment is owned by the [`RoleStore`](crate::store::RoleStore),
/// not by the account record itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier.
    pub id: AccountId,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Inactive accounts never pass authentication.
    pub is_active: bool,
    /// Superusers bypass every role and permission check.
    pub is_superuser: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates an active, non-superuser account.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: AccountId::new(),
            username: username.into(),
            email: email.into(),
            is_active: true,
            is_superuser: false,
            created_at: Utc::now(),
        }
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: AccountId) -> Self {
        self.id = id;
        self
    }

    /// Sets the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    /// Sets the superuser flag.
    pub fn with_superuser(mut self, superuser: bool) -> Self {
        self.is_superuser = superuser;
        self
    }
}

/// An account together with its stored password hash.
///
/// Used only by the login flow.
#[derive(Clone)]
pub struct AccountCredentials {
    /// The account.
    pub account: Account,
    /// PHC-formatted password hash.
    pub password_hash: String,
}

impl fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("account", &self.account)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Role & Permission
// =============================================================================

/// A named role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier.
    pub id: RoleId,
    /// Role name, unique and matched case-insensitively.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Role {
    /// Creates a role with a fresh identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RoleId::new(),
            name: name.into(),
            description: None,
        }
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: RoleId) -> Self {
        self.id = id;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Case-insensitive name comparison.
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_core::model::Role;
    ///
    /// assert!(Role::new("admin").matches_name("Admin"));
    /// ```
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// A named permission such as `menus.read`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    /// Permission identifier.
    pub id: PermissionId,
    /// Permission name, unique.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Permission {
    /// Creates a permission with a fresh identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PermissionId::new(),
            name: name.into(),
            description: None,
        }
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: PermissionId) -> Self {
        self.id = id;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// =============================================================================
// Subject
// =============================================================================

/// Discriminant of a [`Subject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    /// A role.
    Role,
    /// Any other resource, e.g. a menu entry.
    Resource,
}

impl SubjectKind {
    /// Returns the kind as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::Role => "role",
            SubjectKind::Resource => "resource",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown subject kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown subject kind: {0}")]
pub struct UnknownSubjectKind(pub String);

impl FromStr for SubjectKind {
    type Err = UnknownSubjectKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "role" => Ok(SubjectKind::Role),
            // menus are the most common resource subject
            "resource" | "menu" => Ok(SubjectKind::Resource),
            _ => Err(UnknownSubjectKind(s.to_string())),
        }
    }
}

/// The target of a polymorphic permission grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Subject {
    /// A role.
    Role(RoleId),
    /// Any other resource.
    Resource(ResourceId),
}

impl Subject {
    /// Returns the subject kind.
    pub fn kind(&self) -> SubjectKind {
        match self {
            Subject::Role(_) => SubjectKind::Role,
            Subject::Resource(_) => SubjectKind::Resource,
        }
    }

    /// Builds a subject from a kind and a raw UUID.
    pub fn from_parts(kind: SubjectKind, id: uuid::Uuid) -> Self {
        match kind {
            SubjectKind::Role => Subject::Role(RoleId::from_uuid(id)),
            SubjectKind::Resource => Subject::Resource(ResourceId::from_uuid(id)),
        }
    }

    /// Returns the raw UUID of the subject.
    pub fn uuid(&self) -> uuid::Uuid {
        match self {
            Subject::Role(id) => *id.as_uuid(),
            Subject::Resource(id) => *id.as_uuid(),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.uuid())
    }
}

/// "This subject has this permission", independent of role grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectPermissionLink {
    /// Granted subject.
    pub subject: Subject,
    /// Granted permission.
    pub permission_id: PermissionId,
}

impl SubjectPermissionLink {
    /// Creates a link.
    pub fn new(subject: Subject, permission_id: PermissionId) -> Self {
        Self {
            subject,
            permission_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_name_case_insensitive() {
        let role = Role::new("Admin");
        assert!(role.matches_name("admin"));
        assert!(role.matches_name("ADMIN"));
        assert!(!role.matches_name("editor"));
    }

    #[test]
    fn test_account_defaults() {
        let account = Account::new("alice", "alice@example.com");
        assert!(account.is_active);
        assert!(!account.is_superuser);
    }

    #[test]
    fn test_subject_kind_parse() {
        assert_eq!("role".parse::<SubjectKind>().unwrap(), SubjectKind::Role);
        assert_eq!("Menu".parse::<SubjectKind>().unwrap(), SubjectKind::Resource);
        assert!("group".parse::<SubjectKind>().is_err());
    }

    #[test]
    fn test_subject_from_parts() {
        let id = uuid::Uuid::now_v7();
        let subject = Subject::from_parts(SubjectKind::Resource, id);
        assert_eq!(subject.kind(), SubjectKind::Resource);
        assert_eq!(subject.uuid(), id);
        assert_eq!(subject.to_string(), format!("resource:{}", id));
    }

    #[test]
    fn test_subject_serde() {
        let id = RoleId::new();
        let json = serde_json::to_value(Subject::Role(id)).unwrap();
        assert_eq!(json["kind"], "role");
        assert_eq!(json["id"], id.to_string());
    }

    #[test]
    fn test_credentials_debug_redacts_hash() {
        let creds = AccountCredentials {
            account: Account::new("bob", "bob@example.com"),
            password_hash: "$argon2id$secret".to_string(),
        };
        assert!(!format!("{:?}", creds).contains("argon2id"));
    }
}
