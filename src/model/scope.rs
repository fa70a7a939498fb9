//! Permission scope registry.
//!
//! This module defines the scope registry: an immutable, validated bundle
//! of up to 32 actions representing one area of functionality.

use std::collections::HashSet;

use crate::error::RegistryError;

use super::Action;

/// Maximum number of actions a single scope may declare.
///
/// A scope's permission level is a `u32`, so a scope holds at most one
/// action per bit.
pub const MAX_ACTIONS_PER_SCOPE: usize = 32;

/// An immutable, validated permission scope.
///
/// A scope bundles a name, a category used for grouping in discovery
/// UIs, a human description, and an ordered set of actions. All
/// invariants are checked once, when [`ScopeBuilder::build`] runs;
/// a registry that exists is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRegistry {
    name: String,
    category: String,
    description: String,
    actions: Vec<Action>,
    all: u32,
}

impl ScopeRegistry {
    /// Start declaring a scope with the given name.
    pub fn builder(name: impl Into<String>) -> ScopeBuilder {
        ScopeBuilder::new(name)
    }

    /// The scope's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scope's category, `"General"` when undeclared.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The scope's human description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The level with every action in this scope granted.
    ///
    /// Equal to the bitwise OR of every declared action value.
    pub fn all_permissions(&self) -> u32 {
        self.all
    }

    /// Combine the given actions into a single level mask.
    ///
    /// The result is the bitwise OR of the action values, so it is
    /// order-independent.
    pub fn combine<'a>(&self, actions: impl IntoIterator<Item = &'a Action>) -> u32 {
        actions.into_iter().fold(0, |mask, a| mask | a.value())
    }

    /// All actions, in declaration order.
    pub fn get_actions(&self) -> &[Action] {
        &self.actions
    }

    /// Look up an action by name.
    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.name() == name)
    }

    /// Whether the given action was declared in this scope.
    ///
    /// An action from another scope does not belong here even when its
    /// raw value collides with one of ours.
    pub fn contains(&self, action: &Action) -> bool {
        action.scope() == self.name
            && self
                .actions
                .iter()
                .any(|a| a.value() == action.value() && a.name() == action.name())
    }
}

/// Builder that validates and constructs a [`ScopeRegistry`].
///
/// Declared actions keep their declaration order. Validation happens in
/// [`build`](Self::build); any violation is a [`RegistryError`] rather
/// than a runtime failure later on.
#[derive(Debug, Clone)]
pub struct ScopeBuilder {
    name: String,
    category: Option<String>,
    description: String,
    actions: Vec<(String, i64, String)>,
}

impl ScopeBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
            description: String::new(),
            actions: Vec::new(),
        }
    }

    /// Set the scope's category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the scope's human description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare an action without a description.
    pub fn action(self, name: impl Into<String>, value: i64) -> Self {
        self.described_action(name, value, "")
    }

    /// Declare an action with a description.
    pub fn described_action(
        mut self,
        name: impl Into<String>,
        value: i64,
        description: impl Into<String>,
    ) -> Self {
        self.actions.push((name.into(), value, description.into()));
        self
    }

    /// Validate the declaration and build the immutable registry.
    pub fn build(self) -> Result<ScopeRegistry, RegistryError> {
        if self.name.is_empty() {
            return Err(RegistryError::EmptyScopeName);
        }
        if self.actions.is_empty() {
            return Err(RegistryError::NoActions { scope: self.name });
        }
        if self.actions.len() > MAX_ACTIONS_PER_SCOPE {
            return Err(RegistryError::TooManyActions {
                scope: self.name,
                count: self.actions.len(),
            });
        }

        let mut seen_names = HashSet::new();
        let mut seen_values = HashSet::new();
        let mut actions = Vec::with_capacity(self.actions.len());
        let mut all = 0u32;

        for (name, raw, description) in self.actions {
            let value = validate_action_value(raw)?;
            if !seen_names.insert(name.clone()) {
                return Err(RegistryError::DuplicateActionName {
                    scope: self.name,
                    name,
                });
            }
            if !seen_values.insert(value) {
                return Err(RegistryError::DuplicateActionValue {
                    scope: self.name,
                    value,
                });
            }
            all |= value;
            actions.push(Action::new(name, value, description, self.name.clone()));
        }

        Ok(ScopeRegistry {
            name: self.name,
            category: self.category.unwrap_or_else(|| "General".to_string()),
            description: self.description,
            actions,
            all,
        })
    }
}

/// Check that a declared value is a single bit within the 32-bit level.
fn validate_action_value(value: i64) -> Result<u32, RegistryError> {
    if value <= 0 {
        return Err(RegistryError::InvalidActionValue { value });
    }
    let unsigned = value as u64;
    if !unsigned.is_power_of_two() {
        return Err(RegistryError::InvalidActionValue { value });
    }
    let position = unsigned.trailing_zeros();
    if position > 31 {
        return Err(RegistryError::BitPositionTooHigh { position });
    }
    Ok(unsigned as u32)
}
