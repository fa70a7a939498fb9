//! Error types for the binauth permission system.
//!
//! This module defines the error hierarchy used throughout the crate.
//! Configuration errors surface at scope declaration time, lookup errors
//! surface at check time, and storage errors propagate from the backing
//! store unchanged.

use thiserror::Error;

/// Root error type for the permission system.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Check error: {0}")]
    Check(#[from] CheckError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors raised while declaring a permission scope.
///
/// These are configuration errors: they are fatal, surface once at
/// startup, and are never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid action value {value}: action values must be positive powers of 2")]
    InvalidActionValue {
        /// The offending value as declared (may be negative).
        value: i64,
    },

    #[error("Invalid action value at bit position {position}: the highest allowed bit position is 31")]
    BitPositionTooHigh {
        /// The bit position of the offending value.
        position: u32,
    },

    #[error("Scope \"{scope}\" declares {count} actions; the maximum is {max}", max = crate::model::MAX_ACTIONS_PER_SCOPE)]
    TooManyActions { scope: String, count: usize },

    #[error("Scope \"{scope}\" declares no actions; at least one is required")]
    NoActions { scope: String },

    #[error("Scope name must be a non-empty string")]
    EmptyScopeName,

    #[error("Scope \"{scope}\" declares duplicate action name \"{name}\"")]
    DuplicateActionName { scope: String, name: String },

    #[error("Scope \"{scope}\" declares duplicate action value {value}")]
    DuplicateActionValue { scope: String, value: u32 },
}

/// Errors raised while checking permissions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckError {
    #[error("Undefined scope: {0}")]
    UndefinedScope(String),

    #[error("Action \"{action}\" ({value}) is not valid for scope \"{scope}\"")]
    UndefinedAction {
        scope: String,
        action: String,
        value: u32,
    },

    #[error("Subject does not have permissions for scope \"{scope}\"")]
    MissingScope { scope: String },

    #[error("Permission denied: {scope}:{action}{suffix}", suffix = .subject_id.as_deref().map(|id| format!(" for user {id}")).unwrap_or_default())]
    PermissionDenied {
        scope: String,
        action: String,
        subject_id: Option<String>,
    },
}

/// Errors raised at the storage boundary.
///
/// The core adds no retry logic; transient backend failures are the
/// caller's concern.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Check error: {0}")]
    Check(#[from] CheckError),
}

impl StoreError {
    /// Wrap a backend error without altering it.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}

/// Convenience alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
