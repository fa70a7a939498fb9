//! Serializable discovery schema.
//!
//! Admin and discovery UIs consume this tree to render which scopes and
//! actions exist. It is produced by
//! [`PermissionsManager::get_permissions_schema`] and mirrors declaration
//! order throughout.
//!
//! [`PermissionsManager::get_permissions_schema`]: crate::check::PermissionsManager::get_permissions_schema

use serde::{Deserialize, Serialize};

/// One category of scopes.
///
/// Scopes declared without a category land under `"General"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySchema {
    pub name: String,
    pub scopes: Vec<ScopeSchema>,
}

/// One scope and its actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSchema {
    pub name: String,
    pub description: String,
    pub actions: Vec<ActionSchema>,
}

/// One action within a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSchema {
    pub name: String,
    pub value: u32,
    /// `""` when the action was declared without a description.
    pub description: String,
}
