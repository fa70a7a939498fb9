//! Permission checking.
//!
//! This module provides the permissions manager and the subject
//! abstraction it checks against.

pub mod manager;
pub mod subject;

pub use manager::PermissionsManager;
pub use subject::SubjectPermissions;
