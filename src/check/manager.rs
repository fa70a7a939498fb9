//! Permissions manager.
//!
//! The manager aggregates scope registries and answers permission checks
//! against a subject's stored levels. It is pure and in-memory: all
//! lookups are reads of state fixed at construction, so a built manager
//! is safe to share across threads without synchronization.

use std::collections::HashMap;

use tracing::debug;

use crate::error::CheckError;
use crate::model::{Action, ScopeRegistry};
use crate::schema::{ActionSchema, CategorySchema, ScopeSchema};

use super::SubjectPermissions;

/// Aggregates scope registries and performs permission checks.
pub struct PermissionsManager {
    registries: Vec<ScopeRegistry>,
    // Scope name -> index into `registries`. First registration wins.
    index: HashMap<String, usize>,
}

impl PermissionsManager {
    /// Create a manager from registries, in registration order.
    ///
    /// Duplicate scope names are a caller error; if present, lookups
    /// resolve to the first registration.
    pub fn new(registries: impl IntoIterator<Item = ScopeRegistry>) -> Self {
        let registries: Vec<ScopeRegistry> = registries.into_iter().collect();
        let mut index = HashMap::with_capacity(registries.len());
        for (i, registry) in registries.iter().enumerate() {
            index.entry(registry.name().to_string()).or_insert(i);
        }
        Self { registries, index }
    }

    /// Registered scope names, in registration order.
    pub fn scopes(&self) -> Vec<&str> {
        self.registries.iter().map(|r| r.name()).collect()
    }

    /// Look up the registry for a scope.
    pub fn get_registry(&self, scope: &str) -> Result<&ScopeRegistry, CheckError> {
        self.index
            .get(scope)
            .map(|&i| &self.registries[i])
            .ok_or_else(|| CheckError::UndefinedScope(scope.to_string()))
    }

    /// All actions declared for a scope, in declaration order.
    pub fn get_actions(&self, scope: &str) -> Result<&[Action], CheckError> {
        Ok(self.get_registry(scope)?.get_actions())
    }

    /// Check whether the subject holds one action in a scope.
    ///
    /// A subject with no entry for the scope at all is an error
    /// ([`CheckError::MissingScope`]), distinct from an entry with the
    /// action's bit unset, which is `Ok(false)`.
    pub fn check_permission<S: SubjectPermissions>(
        &self,
        subject: &S,
        scope: &str,
        action: &Action,
    ) -> Result<bool, CheckError> {
        let level = self.resolve_level(subject, scope, &[action])?;
        let granted = level & action.value() != 0;
        debug!(scope, action = action.name(), granted, "permission check");
        Ok(granted)
    }

    /// Check several actions in one scope with a single mask compare.
    ///
    /// With `require_all`, every action's bit must be set
    /// (`level & mask == mask`); otherwise one set bit suffices
    /// (`level & mask != 0`).
    pub fn check_permissions<'a, S: SubjectPermissions>(
        &self,
        subject: &S,
        scope: &str,
        actions: impl IntoIterator<Item = &'a Action>,
        require_all: bool,
    ) -> Result<bool, CheckError> {
        let actions: Vec<&Action> = actions.into_iter().collect();
        let level = self.resolve_level(subject, scope, &actions)?;
        let mask = actions.iter().fold(0u32, |m, a| m | a.value());
        let granted = if require_all {
            level & mask == mask
        } else {
            level & mask != 0
        };
        debug!(scope, mask, require_all, granted, "permission check");
        Ok(granted)
    }

    /// Check one action and turn a denial into an error.
    ///
    /// Useful at request boundaries where a failed check should become a
    /// "permission denied" condition rather than a boolean.
    pub fn require_permission<S: SubjectPermissions>(
        &self,
        subject: &S,
        scope: &str,
        action: &Action,
    ) -> Result<(), CheckError> {
        if self.check_permission(subject, scope, action)? {
            Ok(())
        } else {
            Err(CheckError::PermissionDenied {
                scope: scope.to_string(),
                action: action.name().to_string(),
                subject_id: None,
            })
        }
    }

    /// Serializable schema of every category, scope, and action.
    ///
    /// Categories, scopes, and actions appear in declaration order; two
    /// scopes sharing a category merge under one category entry.
    pub fn get_permissions_schema(&self) -> Vec<CategorySchema> {
        let mut categories: Vec<CategorySchema> = Vec::new();
        for registry in &self.registries {
            let scope_schema = ScopeSchema {
                name: registry.name().to_string(),
                description: registry.description().to_string(),
                actions: registry
                    .get_actions()
                    .iter()
                    .map(|a| ActionSchema {
                        name: a.name().to_string(),
                        value: a.value(),
                        description: a.description().to_string(),
                    })
                    .collect(),
            };
            match categories
                .iter_mut()
                .find(|c| c.name == registry.category())
            {
                Some(category) => category.scopes.push(scope_schema),
                None => categories.push(CategorySchema {
                    name: registry.category().to_string(),
                    scopes: vec![scope_schema],
                }),
            }
        }
        categories
    }

    // Resolve the scope, verify every action belongs to it, and read the
    // subject's level for it.
    fn resolve_level<S: SubjectPermissions>(
        &self,
        subject: &S,
        scope: &str,
        actions: &[&Action],
    ) -> Result<u32, CheckError> {
        let registry = self.get_registry(scope)?;
        for action in actions {
            if !registry.contains(action) {
                return Err(CheckError::UndefinedAction {
                    scope: scope.to_string(),
                    action: action.name().to_string(),
                    value: action.value(),
                });
            }
        }
        subject
            .permission_level(scope)
            .ok_or_else(|| CheckError::MissingScope {
                scope: scope.to_string(),
            })
    }
}
