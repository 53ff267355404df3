//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use murmur_app::Sender;

use super::{Invariant, InvariantResult, SystemSnapshot, Violation};

/// The open conversation must belong to a known contact.
pub struct SelectedContactKnown;

impl Invariant for SelectedContactKnown {
    fn name(&self) -> &'static str {
        "selected_contact_known"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        match state.selected {
            Some(id) if !state.contacts.contains(&id) => Err(Violation {
                invariant: self.name(),
                message: format!("selected contact {id} not in {:?}", state.contacts),
            }),
            _ => Ok(()),
        }
    }
}

/// The open conversation has nothing unread.
pub struct SelectedHasNoUnread;

impl Invariant for SelectedHasNoUnread {
    fn name(&self) -> &'static str {
        "selected_has_no_unread"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let Some(id) = state.selected else {
            return Ok(());
        };
        match state.unread.get(&id) {
            Some(&count) if count > 0 => Err(Violation {
                invariant: self.name(),
                message: format!("selected contact {id} has {count} unread"),
            }),
            _ => Ok(()),
        }
    }
}

/// Message ids are strictly increasing in append order.
///
/// Strictly increasing implies unique within the conversation.
pub struct MessageIdsIncreasing;

impl Invariant for MessageIdsIncreasing {
    fn name(&self) -> &'static str {
        "message_ids_increasing"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (contact, messages) in &state.conversations {
            for window in messages.windows(2) {
                if window[1].0 <= window[0].0 {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!(
                            "contact {contact}: message id {} follows {}",
                            window[1].0, window[0].0
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Delivery status exists exactly for sent messages.
pub struct StatusOnlyForSent;

impl Invariant for StatusOnlyForSent {
    fn name(&self) -> &'static str {
        "status_only_for_sent"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (contact, messages) in &state.conversations {
            for (id, sender) in messages {
                let has_status = state.statuses.contains_key(&(*contact, *id));
                if has_status != (*sender == Sender::Sent) {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!(
                            "contact {contact} message {id} ({sender:?}) status present: {has_status}"
                        ),
                    });
                }
            }
        }
        let orphan = state.statuses.keys().find(|(contact, id)| {
            !state.conversations.get(contact).is_some_and(|m| m.iter().any(|(m, _)| m == id))
        });
        if let Some((contact, id)) = orphan {
            return Err(Violation {
                invariant: self.name(),
                message: format!("status for missing message {contact}/{id}"),
            });
        }
        Ok(())
    }
}

/// Delivery status never regresses.
pub struct StatusMonotonicity;

impl Invariant for StatusMonotonicity {
    fn name(&self) -> &'static str {
        "status_monotonicity"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for ((contact, id), history) in &state.status_history {
            for window in history.windows(2) {
                if window[1] < window[0] {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!(
                            "message {contact}/{id}: status went {:?} → {:?}",
                            window[0], window[1]
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Favorites and unread counts refer to known contacts.
pub struct ContactReferencesKnown;

impl Invariant for ContactReferencesKnown {
    fn name(&self) -> &'static str {
        "contact_references_known"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let unknown = state
            .favorites
            .iter()
            .chain(state.unread.keys())
            .chain(state.conversations.keys())
            .chain(state.typing.iter())
            .find(|id| !state.contacts.contains(id));
        match unknown {
            Some(id) => Err(Violation {
                invariant: self.name(),
                message: format!("state refers to unknown contact {id}"),
            }),
            None => Ok(()),
        }
    }
}

/// Notification ids are strictly increasing, hence unique.
pub struct NotificationIdsIncreasing;

impl Invariant for NotificationIdsIncreasing {
    fn name(&self) -> &'static str {
        "notification_ids_increasing"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for window in state.notifications.windows(2) {
            if window[1] <= window[0] {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("notification {} follows {}", window[1], window[0]),
                });
            }
        }
        Ok(())
    }
}
