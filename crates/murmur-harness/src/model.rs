//! Reference model for model-based testing.
//!
//! A deliberately naive re-statement of the bookkeeping rules: message
//! counts, unread counts, favorites and selection. Operations are applied to
//! both the model and the real app, and their observable states compared.

use std::collections::{BTreeMap, BTreeSet};

use murmur_app::{App, ContactId};
use murmur_core::Environment;

use crate::operation::{Operation, contact_id};

/// Observable bookkeeping shared by the model and the real app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// Open conversation.
    pub selected: Option<ContactId>,
    /// Number of messages per conversation (non-empty ones only).
    pub message_counts: BTreeMap<ContactId, usize>,
    /// Unread counts (non-zero ones only).
    pub unread: BTreeMap<ContactId, u32>,
    /// Favorites.
    pub favorites: BTreeSet<ContactId>,
}

impl ObservableState {
    /// Extract from the real app.
    pub fn from_app<E: Environment>(app: &App<E>) -> Self {
        Self {
            selected: app.selected(),
            message_counts: app
                .conversations()
                .iter()
                .filter(|(_, m)| !m.is_empty())
                .map(|(id, m)| (*id, m.len()))
                .collect(),
            unread: app
                .unread_counts()
                .iter()
                .filter(|(_, n)| **n > 0)
                .map(|(k, v)| (*k, *v))
                .collect(),
            favorites: app.favorites().clone(),
        }
    }
}

/// Reference model of the conversation bookkeeping.
#[derive(Debug, Clone)]
pub struct ModelWorld {
    contacts: BTreeSet<ContactId>,
    state: ObservableState,
}

impl ModelWorld {
    /// Model with the given contacts and initial state.
    pub fn new(contacts: impl IntoIterator<Item = ContactId>, initial: ObservableState) -> Self {
        Self { contacts: contacts.into_iter().collect(), state: initial }
    }

    /// Current observable state.
    pub fn observable(&self) -> &ObservableState {
        &self.state
    }

    /// Apply an operation.
    pub fn apply(&mut self, op: &Operation) {
        match *op {
            Operation::Select(slot) => {
                let id = contact_id(slot);
                if self.contacts.contains(&id) {
                    self.state.selected = Some(id);
                    self.state.unread.remove(&id);
                } else {
                    self.state.selected = None;
                }
            },
            Operation::ClearSelection => self.state.selected = None,
            Operation::Send { contact, text } => {
                let id = contact_id(contact);
                if self.contacts.contains(&id) && !text.to_text().trim().is_empty() {
                    *self.state.message_counts.entry(id).or_default() += 1;
                }
            },
            Operation::Receive { contact, .. } => {
                let id = contact_id(contact);
                if self.contacts.contains(&id) {
                    *self.state.message_counts.entry(id).or_default() += 1;
                    if self.state.selected != Some(id) {
                        *self.state.unread.entry(id).or_default() += 1;
                    }
                }
            },
            Operation::ToggleFavorite(slot) => {
                let id = contact_id(slot);
                if self.contacts.contains(&id) && !self.state.favorites.remove(&id) {
                    self.state.favorites.insert(id);
                }
            },
            // Navigation has its own routing rules; the model only covers
            // direct selection.
            Operation::Navigate(_)
            | Operation::ToggleDarkMode
            | Operation::Draft(_)
            | Operation::Search(_)
            | Operation::Sort(_)
            | Operation::SetOnline(_)
            | Operation::Dismiss(_)
            | Operation::ClearNotifications
            | Operation::ToggleSetting(_)
            | Operation::ReportError
            | Operation::Advance(_) => {},
        }
    }

    /// Whether the model can predict the effect of `op`.
    pub fn covers(op: &Operation) -> bool {
        !matches!(op, Operation::Navigate(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::SmallText;

    #[test]
    fn receive_counts_unread_only_when_closed() {
        let initial = ObservableState {
            selected: None,
            message_counts: BTreeMap::new(),
            unread: BTreeMap::new(),
            favorites: BTreeSet::new(),
        };
        let mut model = ModelWorld::new([1, 2], initial);
        let text = SmallText { seed: 0, size_class: 2 };

        model.apply(&Operation::Select(1));
        model.apply(&Operation::Receive { contact: 1, text });
        model.apply(&Operation::Receive { contact: 2, text });
        model.apply(&Operation::Receive { contact: 5, text });

        assert_eq!(model.observable().unread, BTreeMap::from([(2, 1)]));
        assert_eq!(model.observable().message_counts, BTreeMap::from([(1, 1), (2, 1)]));
    }
}
