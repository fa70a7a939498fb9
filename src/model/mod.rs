//! Permission scope models.
//!
//! This module defines the scope and action types and their
//! declaration-time validation.

pub mod action;
pub mod scope;

pub use action::Action;
pub use scope::{ScopeBuilder, ScopeRegistry, MAX_ACTIONS_PER_SCOPE};
