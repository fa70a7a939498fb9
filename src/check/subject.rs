//! Subject abstraction.
//!
//! The manager checks permissions for any value that can report a
//! per-scope permission level. How the subject was authenticated is not
//! this crate's concern.

use std::collections::HashMap;
use std::sync::Arc;

/// A subject whose per-scope permission levels can be read.
///
/// Returning `None` means the subject has no entry for the scope at
/// all, which the manager treats differently from an entry with no bits
/// set (see [`PermissionsManager::check_permission`]).
///
/// [`PermissionsManager::check_permission`]: crate::check::PermissionsManager::check_permission
pub trait SubjectPermissions {
    /// The subject's stored level for the given scope, if any.
    fn permission_level(&self, scope: &str) -> Option<u32>;
}

impl SubjectPermissions for HashMap<String, u32> {
    fn permission_level(&self, scope: &str) -> Option<u32> {
        self.get(scope).copied()
    }
}

impl<T: SubjectPermissions + ?Sized> SubjectPermissions for &T {
    fn permission_level(&self, scope: &str) -> Option<u32> {
        (**self).permission_level(scope)
    }
}

impl<T: SubjectPermissions + ?Sized> SubjectPermissions for Arc<T> {
    fn permission_level(&self, scope: &str) -> Option<u32> {
        (**self).permission_level(scope)
    }
}
