//! # Binauth
//!
//! `binauth` is a bitmask-based authorization engine. An application
//! declares named permission scopes (e.g. "tasks", "reports"), each
//! holding up to 32 discrete boolean actions packed into a single `u32`,
//! and checks whether a subject's stored integer level satisfies one or
//! more required actions.
//!
//! Key concepts:
//!
//! 1. **Scope**: a named bundle of up to 32 boolean actions representing
//!    one area of functionality, validated once at declaration.
//!
//! 2. **Action**: one boolean capability within a scope, represented as a
//!    single bit.
//!
//! 3. **Level**: the bitmask integer recording which actions a subject
//!    holds in one scope.
//!
//! 4. **Grant**: the persisted (subject, scope, level) record, generic
//!    over the subject identifier and the record shape.
//!
//! The manager and registries are pure and in-memory; persistence is an
//! async boundary behind [`store::GrantBackend`], and a TTL'd
//! [`cache::PermissionCache`] shields the backend from repeated lookups.
//!
//! ```
//! use binauth::{PermissionsManager, ScopeRegistry};
//! use std::collections::HashMap;
//!
//! let tasks = ScopeRegistry::builder("tasks")
//!     .category("Content")
//!     .described_action("CREATE", 1 << 0, "Create new tasks")
//!     .described_action("READ", 1 << 1, "View tasks")
//!     .build()
//!     .unwrap();
//!
//! let manager = PermissionsManager::new([tasks]);
//!
//! let mut subject = HashMap::new();
//! subject.insert("tasks".to_string(), 1u32);
//!
//! let create = manager.get_actions("tasks").unwrap()[0].clone();
//! assert!(manager.check_permission(&subject, "tasks", &create).unwrap());
//! ```

pub mod cache;
pub mod check;
pub mod error;
pub mod model;
pub mod schema;
pub mod store;

// Re-export key types and traits for convenience
pub use cache::PermissionCache;
pub use check::{PermissionsManager, SubjectPermissions};
pub use error::{CheckError, Error, RegistryError, Result, StoreError};
pub use model::{Action, ScopeBuilder, ScopeRegistry, MAX_ACTIONS_PER_SCOPE};
pub use schema::{ActionSchema, CategorySchema, ScopeSchema};
pub use store::{Grant, GrantBackend, InMemoryGrantStore, PermissionRecord, PermissionStore};

#[cfg(feature = "sqlite")]
pub use store::SqliteGrantStore;
