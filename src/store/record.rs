//! Persisted grant records.
//!
//! The store is generic over the record shape it persists. A record
//! must expose the three canonical fields (subject id, scope name,
//! level); anything else it carries is the caller's business and must
//! come with caller-defined defaults.

use serde::{Deserialize, Serialize};

/// A persisted permission record.
///
/// Implementors may carry extra fields beyond the canonical three;
/// [`PermissionRecord::new`] is responsible for filling those with
/// defaults when the store creates a record on first grant.
pub trait PermissionRecord: Send + Sync {
    /// The caller-chosen subject identifier type.
    type SubjectId: Clone + Send + Sync;

    /// Create a record for a (subject, scope) pair, with defaults for
    /// any extra fields.
    fn new(subject_id: Self::SubjectId, scope_name: String, level: u32) -> Self;

    fn subject_id(&self) -> &Self::SubjectId;

    fn scope_name(&self) -> &str;

    fn level(&self) -> u32;

    fn set_level(&mut self, level: u32);
}

/// The canonical three-column grant record.
///
/// This is the default record type; it is one [`PermissionRecord`]
/// implementation among many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant<S> {
    pub subject_id: S,
    pub scope_name: String,
    pub level: u32,
}

impl<S: Clone + Send + Sync> PermissionRecord for Grant<S> {
    type SubjectId = S;

    fn new(subject_id: S, scope_name: String, level: u32) -> Self {
        Self {
            subject_id,
            scope_name,
            level,
        }
    }

    fn subject_id(&self) -> &S {
        &self.subject_id
    }

    fn scope_name(&self) -> &str {
        &self.scope_name
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn set_level(&mut self, level: u32) {
        self.level = level;
    }
}
