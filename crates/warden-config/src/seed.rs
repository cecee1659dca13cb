// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Populates an [`InMemoryDirectory`] from a [`DirectorySeed`].

use tracing::info;
use uuid::Uuid;
use warden_core::{
    Account, InMemoryDirectory, Permission, ResourceId, Role, Subject, SubjectKind,
};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::DirectorySeed;

impl DirectorySeed {
    /// Builds a fresh directory from this seed.
    pub fn build(&self) -> ConfigResult<InMemoryDirectory> {
        let directory = InMemoryDirectory::new();
        self.apply(&directory)?;
        Ok(directory)
    }

    /// Inserts every seeded entity into `directory`.
    ///
    /// Permissions are inserted first, then roles with their grants, then
    /// accounts with their role assignments, then links.
    pub fn apply(&self, directory: &InMemoryDirectory) -> ConfigResult<()> {
        self.validate()?;

        for seed in &self.permissions {
            let mut permission = Permission::new(&seed.name);
            permission.description = seed.description.clone();
            directory.add_permission(permission)?;
        }

        for seed in &self.roles {
            let mut role = Role::new(&seed.name);
            role.description = seed.description.clone();
            let role_id = directory.add_role(role)?;
            for name in &seed.permissions {
                let permission = directory
                    .permission_by_name(name)
                    .ok_or_else(|| ConfigError::seed(format!("unknown permission '{}'", name)))?;
                directory.grant(role_id, permission.id)?;
            }
        }

        for seed in &self.accounts {
            let account = Account::new(&seed.username, &seed.email)
                .with_active(seed.active)
                .with_superuser(seed.superuser);
            let account_id = directory.add_account(account, seed.password_hash.expose())?;
            for name in &seed.roles {
                let role = directory
                    .role_by_name(name)
                    .ok_or_else(|| ConfigError::seed(format!("unknown role '{}'", name)))?;
                directory.assign_role(account_id, role.id)?;
            }
        }

        for seed in &self.links {
            let permission = directory
                .permission_by_name(&seed.permission)
                .ok_or_else(|| ConfigError::seed(format!("unknown permission '{}'", seed.permission)))?;
            let subject = match seed.kind {
                SubjectKind::Role => {
                    let role = directory
                        .role_by_name(&seed.target)
                        .ok_or_else(|| ConfigError::seed(format!("unknown role '{}'", seed.target)))?;
                    Subject::Role(role.id)
                }
                SubjectKind::Resource => {
                    let id = Uuid::parse_str(&seed.target).map_err(|e| {
                        ConfigError::seed(format!("invalid resource id '{}': {}", seed.target, e))
                    })?;
                    Subject::Resource(ResourceId::from_uuid(id))
                }
            };
            directory.link(subject, permission.id)?;
        }

        let stats = directory.stats();
        info!(
            accounts = stats.accounts,
            roles = stats.roles,
            permissions = stats.permissions,
            links = stats.links,
            "Directory seeded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AccountSeed, LinkSeed, PermissionSeed, RoleSeed, SecretValue};
    use warden_core::{CredentialStore, ModelPermissionStore, RoleStore};

    fn seed() -> DirectorySeed {
        DirectorySeed {
            permissions: vec![
                PermissionSeed {
                    name: "menus.read".into(),
                    description: None,
                },
                PermissionSeed {
                    name: "menus.write".into(),
                    description: Some("Edit menus".into()),
                },
            ],
            roles: vec![RoleSeed {
                name: "editor".into(),
                description: None,
                permissions: vec!["menus.read".into()],
            }],
            accounts: vec![AccountSeed {
                username: "alice".into(),
                email: "alice@example.com".into(),
                password_hash: SecretValue::new("$argon2id$v=19$stub"),
                active: true,
                superuser: false,
                roles: vec!["Editor".into()],
            }],
            links: vec![LinkSeed {
                kind: SubjectKind::Resource,
                target: "018f0f4e-8d2a-7c55-9a0e-3f1d2b6c4a10".into(),
                permission: "menus.write".into(),
            }],
        }
    }

    #[tokio::test]
    async fn test_build_directory() {
        let directory = seed().build().unwrap();
        let stats = directory.stats();
        assert_eq!(stats.accounts, 1);
        assert_eq!(stats.roles, 1);
        assert_eq!(stats.permissions, 2);
        assert_eq!(stats.links, 1);

        let creds = directory.find_by_username("alice").await.unwrap().unwrap();
        let roles = directory.roles_of(creds.account.id).await.unwrap();
        assert_eq!(roles[0].name, "editor");
    }

    #[tokio::test]
    async fn test_resource_link_seeded() {
        let directory = seed().build().unwrap();
        let write = directory.permission_by_name("menus.write").unwrap();
        let menu = Subject::Resource(ResourceId::from_uuid(
            Uuid::parse_str("018f0f4e-8d2a-7c55-9a0e-3f1d2b6c4a10").unwrap(),
        ));
        assert!(directory.exists(&menu, write.id).await.unwrap());
    }

    #[test]
    fn test_duplicate_role_rejected() {
        let mut seed = seed();
        seed.roles.push(RoleSeed {
            name: "EDITOR".into(),
            description: None,
            permissions: vec![],
        });
        assert!(matches!(seed.build(), Err(ConfigError::Seed { .. })));
    }
}
