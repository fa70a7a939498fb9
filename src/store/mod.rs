//! Grant storage.
//!
//! This module provides the persistence abstraction for permission
//! levels: one integer per (subject, scope) pair, with read, overwrite,
//! bitwise grant/revoke, and delete operations. The store itself owns no
//! state; it composes a [`GrantBackend`] (the durable store) with a
//! [`PermissionsManager`] (for scope validation).
//!
//! Consistency: `grant_actions` and `revoke_actions` are read-modify-write
//! and are not atomic at this layer. Two concurrent calls on the same
//! (subject, scope) pair resolve as last-write-wins unless the backend
//! serializes them (row locking, or per-key serialization by the caller).
//! Callers that mutate permissions must also invalidate the subject's
//! [`PermissionCache`] entry before reporting success.
//!
//! [`PermissionCache`]: crate::cache::PermissionCache

mod in_memory;
mod record;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use in_memory::InMemoryGrantStore;
pub use record::{Grant, PermissionRecord};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteGrantStore;

use std::collections::HashMap;
use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::check::PermissionsManager;
use crate::error::{CheckError, StoreError};
use crate::model::Action;

/// Durable storage for grant records.
///
/// Implementations wrap whatever session or connection handle the
/// caller supplies. Transaction lifecycle (commit/rollback) stays with
/// the caller; each method here must be atomic on its own, so a call
/// cancelled mid-flight leaves no half-written level.
#[async_trait]
pub trait GrantBackend<R: PermissionRecord>: Send + Sync {
    /// Fetch the record for one (subject, scope) pair, if any.
    async fn fetch(&self, subject: &R::SubjectId, scope: &str) -> Result<Option<R>, StoreError>;

    /// Fetch every record the subject has, across all scopes.
    async fn fetch_all(&self, subject: &R::SubjectId) -> Result<Vec<R>, StoreError>;

    /// Insert or update a record, keyed on (subject, scope).
    ///
    /// Never duplicates rows; returns the persisted record.
    async fn upsert(&self, record: R) -> Result<R, StoreError>;

    /// Delete one record. Returns whether a record existed.
    async fn delete(&self, subject: &R::SubjectId, scope: &str) -> Result<bool, StoreError>;

    /// Delete every record for the subject. Returns the count deleted.
    async fn delete_all(&self, subject: &R::SubjectId) -> Result<u64, StoreError>;
}

/// Stateless façade over a grant backend plus the manager.
///
/// Generic over the subject identifier (through the record type) and
/// the persisted record shape; [`Grant`] is the default record.
pub struct PermissionStore<B, R = Grant<String>>
where
    R: PermissionRecord,
    B: GrantBackend<R>,
{
    backend: B,
    manager: Arc<PermissionsManager>,
    _record: PhantomData<fn() -> R>,
}

impl<B, R> PermissionStore<B, R>
where
    R: PermissionRecord,
    B: GrantBackend<R>,
{
    /// Create a store over a backend, using `manager` for scope
    /// validation.
    pub fn new(backend: B, manager: Arc<PermissionsManager>) -> Self {
        Self {
            backend,
            manager,
            _record: PhantomData,
        }
    }

    /// The manager used for scope validation.
    pub fn manager(&self) -> &PermissionsManager {
        &self.manager
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The subject's stored level for a scope, or `None` when no grant
    /// exists. Fails if the scope is unknown to the manager.
    pub async fn get_user_permission(
        &self,
        subject: &R::SubjectId,
        scope: &str,
    ) -> Result<Option<u32>, StoreError> {
        self.manager.get_registry(scope)?;
        Ok(self.backend.fetch(subject, scope).await?.map(|r| r.level()))
    }

    /// Overwrite the subject's level for a scope unconditionally.
    ///
    /// Creates the grant when absent, updates it in place otherwise;
    /// extra fields on an existing record are preserved.
    pub async fn set_permission(
        &self,
        subject: R::SubjectId,
        scope: &str,
        level: u32,
    ) -> Result<R, StoreError> {
        self.manager.get_registry(scope)?;
        let record = match self.backend.fetch(&subject, scope).await? {
            Some(mut existing) => {
                existing.set_level(level);
                existing
            }
            None => R::new(subject, scope.to_string(), level),
        };
        debug!(scope, level, "set permission");
        self.backend.upsert(record).await
    }

    /// OR the given actions into the subject's level (0 when absent).
    pub async fn grant_actions(
        &self,
        subject: R::SubjectId,
        scope: &str,
        actions: &[&Action],
    ) -> Result<R, StoreError> {
        let mask = self.validate_actions(scope, actions)?;
        let current = self
            .backend
            .fetch(&subject, scope)
            .await?
            .map(|r| r.level())
            .unwrap_or(0);
        debug!(scope, mask, current, "grant actions");
        self.set_permission(subject, scope, current | mask).await
    }

    /// AND-NOT the given actions out of the subject's level.
    ///
    /// A revoke that changes nothing still rewrites the row; the grant
    /// is never deleted here.
    pub async fn revoke_actions(
        &self,
        subject: R::SubjectId,
        scope: &str,
        actions: &[&Action],
    ) -> Result<R, StoreError> {
        let mask = self.validate_actions(scope, actions)?;
        let current = self
            .backend
            .fetch(&subject, scope)
            .await?
            .map(|r| r.level())
            .unwrap_or(0);
        debug!(scope, mask, current, "revoke actions");
        self.set_permission(subject, scope, current & !mask).await
    }

    /// Delete the subject's grant for one scope. Returns whether a
    /// grant existed.
    pub async fn delete_permission(
        &self,
        subject: &R::SubjectId,
        scope: &str,
    ) -> Result<bool, StoreError> {
        self.manager.get_registry(scope)?;
        let deleted = self.backend.delete(subject, scope).await?;
        debug!(scope, deleted, "delete permission");
        Ok(deleted)
    }

    /// Delete every grant the subject has. Returns the count deleted.
    pub async fn delete_all_permissions(
        &self,
        subject: &R::SubjectId,
    ) -> Result<u64, StoreError> {
        let count = self.backend.delete_all(subject).await?;
        debug!(count, "delete all permissions");
        Ok(count)
    }

    /// Scope-name → level for every grant the subject has.
    ///
    /// Scopes without a grant are simply omitted.
    pub async fn get_all_user_permissions(
        &self,
        subject: &R::SubjectId,
    ) -> Result<HashMap<String, u32>, StoreError> {
        let records = self.backend.fetch_all(subject).await?;
        Ok(records
            .into_iter()
            .map(|r| (r.scope_name().to_string(), r.level()))
            .collect())
    }

    /// Whether the subject holds one action in a scope.
    ///
    /// An absent grant counts as level 0 here, softer than the
    /// manager's check which treats a missing entry as an error: these
    /// wrappers are boolean guards, not audits.
    pub async fn has_permission(
        &self,
        subject: &R::SubjectId,
        scope: &str,
        action: &Action,
    ) -> Result<bool, StoreError> {
        let mask = self.validate_actions(scope, &[action])?;
        let level = self.stored_level(subject, scope).await?;
        Ok(level & mask != 0)
    }

    /// Whether the subject holds every one of the given actions.
    pub async fn has_all_permissions(
        &self,
        subject: &R::SubjectId,
        scope: &str,
        actions: &[&Action],
    ) -> Result<bool, StoreError> {
        let mask = self.validate_actions(scope, actions)?;
        let level = self.stored_level(subject, scope).await?;
        Ok(level & mask == mask)
    }

    /// Whether the subject holds at least one of the given actions.
    pub async fn has_any_permission(
        &self,
        subject: &R::SubjectId,
        scope: &str,
        actions: &[&Action],
    ) -> Result<bool, StoreError> {
        let mask = self.validate_actions(scope, actions)?;
        let level = self.stored_level(subject, scope).await?;
        Ok(level & mask != 0)
    }

    async fn stored_level(
        &self,
        subject: &R::SubjectId,
        scope: &str,
    ) -> Result<u32, StoreError> {
        Ok(self
            .backend
            .fetch(subject, scope)
            .await?
            .map(|r| r.level())
            .unwrap_or(0))
    }

    fn validate_actions(&self, scope: &str, actions: &[&Action]) -> Result<u32, StoreError> {
        let registry = self.manager.get_registry(scope)?;
        let mut mask = 0u32;
        for action in actions {
            if !registry.contains(action) {
                return Err(CheckError::UndefinedAction {
                    scope: scope.to_string(),
                    action: action.name().to_string(),
                    value: action.value(),
                }
                .into());
            }
            mask |= action.value();
        }
        Ok(mask)
    }
}

impl<B, R> PermissionStore<B, R>
where
    R: PermissionRecord,
    R::SubjectId: Display,
    B: GrantBackend<R>,
{
    /// Check one action and turn a denial into a
    /// [`CheckError::PermissionDenied`] naming the subject.
    pub async fn require_permission(
        &self,
        subject: &R::SubjectId,
        scope: &str,
        action: &Action,
    ) -> Result<(), StoreError> {
        if self.has_permission(subject, scope, action).await? {
            Ok(())
        } else {
            Err(CheckError::PermissionDenied {
                scope: scope.to_string(),
                action: action.name().to_string(),
                subject_id: Some(subject.to_string()),
            }
            .into())
        }
    }
}
