//! Invariant checking for deterministic simulation testing.
//!
//! Invariants are properties that must always hold during execution. Unlike
//! example-based tests that check specific scenarios, invariants verify
//! behavioral properties across every event sequence a test generates.
//!
//! # Architecture
//!
//! Observable state is extracted from the App into a [`SystemSnapshot`], then
//! every registered [`Invariant`] runs against it.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = SystemSnapshot::from_app(&app);
//! registry.check_all(&snapshot)?;
//! ```

mod checks;
mod snapshot;

pub use checks::{
    ContactReferencesKnown, MessageIdsIncreasing, NotificationIdsIncreasing, SelectedContactKnown,
    SelectedHasNoUnread, StatusMonotonicity, StatusOnlyForSent,
};
pub use snapshot::SystemSnapshot;

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// An invariant that can be checked against app state.
pub trait Invariant: Send + Sync {
    /// Invariant name for error reporting.
    fn name(&self) -> &'static str;

    /// Check the invariant against the current state.
    ///
    /// Returns `Ok(())` if the invariant holds, or a [`Violation`]
    /// describing what went wrong.
    fn check(&self, state: &SystemSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with every standard invariant.
    ///
    /// Includes:
    /// - [`SelectedContactKnown`]: the open conversation exists
    /// - [`SelectedHasNoUnread`]: the open conversation has nothing unread
    /// - [`MessageIdsIncreasing`]: ids strictly increase per conversation
    /// - [`StatusOnlyForSent`]: status entries match sent messages
    /// - [`StatusMonotonicity`]: delivery status never regresses
    /// - [`ContactReferencesKnown`]: no state for unknown contacts
    /// - [`NotificationIdsIncreasing`]: notification ids are unique
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(SelectedContactKnown);
        registry.add(SelectedHasNoUnread);
        registry.add(MessageIdsIncreasing);
        registry.add(StatusOnlyForSent);
        registry.add(StatusMonotonicity);
        registry.add(ContactReferencesKnown);
        registry.add(NotificationIdsIncreasing);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against the given state.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, state: &SystemSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Check all invariants, panicking on any violation.
    ///
    /// Use this in tests where you want immediate failure with context.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, state: &SystemSnapshot, context: &str) {
        if let Err(violations) = self.check_all(state) {
            for violation in &violations {
                tracing::error!(invariant = violation.invariant, "{context}: {}", violation.message);
            }
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_invariants() {
        let registry = InvariantRegistry::standard();
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn empty_state_passes() {
        let registry = InvariantRegistry::standard();
        assert!(registry.check_all(&SystemSnapshot::default()).is_ok());
    }

    #[test]
    fn all_violations_are_reported() {
        let mut state = SystemSnapshot::default();
        state.selected = Some(3);
        state.unread.insert(3, 1);

        let violations = InvariantRegistry::standard().check_all(&state).unwrap_err();
        let names: Vec<_> = violations.iter().map(|v| v.invariant).collect();

        assert!(names.contains(&"selected_contact_known"));
        assert!(names.contains(&"selected_has_no_unread"));
        assert!(names.contains(&"contact_references_known"));
    }

    #[test]
    #[should_panic(expected = "Invariant violation at render 7")]
    fn assert_all_panics_with_context() {
        let mut state = SystemSnapshot::default();
        state.selected = Some(9);

        InvariantRegistry::standard().assert_all(&state, "at render 7");
    }
}
