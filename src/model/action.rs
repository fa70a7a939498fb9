//! Action model.
//!
//! An action is one boolean capability within a scope, represented as a
//! single bit of the scope's 32-bit permission level.

/// A named action within a permission scope.
///
/// The value is always exactly one bit (a power of two in `1..=2^31`);
/// this is enforced when the owning scope is built. An action remembers
/// the scope it was declared in so that passing it to a check against a
/// different scope is detectable even when the raw values collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    name: String,
    value: u32,
    description: String,
    scope: String,
}

impl Action {
    pub(crate) fn new(
        name: impl Into<String>,
        value: u32,
        description: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            description: description.into(),
            scope: scope.into(),
        }
    }

    /// The action's name, as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The action's bit value.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// The action's human description, `""` when undeclared.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The name of the scope this action was declared in.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The bit position of this action's value.
    pub fn bit_position(&self) -> u32 {
        self.value.trailing_zeros()
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.scope, self.name)
    }
}
