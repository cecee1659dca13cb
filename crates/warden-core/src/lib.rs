// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-core
//!
//! Domain types and directory abstractions for the warden auth core.
//!
//! - **Types**: UUID newtypes `AccountId`, `RoleId`, `PermissionId`, `ResourceId`
//! - **Model**: `Account`, `Role`, `Permission`, `Subject`, `SubjectPermissionLink`
//! - **Store**: async collaborator traits consumed by the request gate
//! - **Memory**: a concurrent in-memory implementation of every store
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use warden_core::memory::InMemoryDirectory;
//! use warden_core::store::Directory;
//!
//! let directory = Directory::from_shared(Arc::new(InMemoryDirectory::new()));
//! # let _ = directory;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod memory;
pub mod model;
pub mod store;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use memory::{DirectoryStats, InMemoryDirectory};
pub use model::{
    Account, AccountCredentials, Permission, Role, Subject, SubjectKind, SubjectPermissionLink,
    UnknownSubjectKind,
};
pub use store::{
    CredentialStore, Directory, IdentityStore, ModelPermissionStore, PermissionCatalog, RoleStore,
};
pub use types::{AccountId, PermissionId, ResourceId, RoleId};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
