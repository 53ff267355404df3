//! Observable state extracted from an [`App`] for invariant checking.

use std::collections::{BTreeMap, BTreeSet};

use murmur_app::{App, ContactId, DeliveryPhase, MessageId, Sender};
use murmur_core::Environment;

/// Point-in-time view of the state the invariants reason about.
///
/// `status_history` accumulates across snapshots: build each snapshot with
/// [`SystemSnapshot::capture`], passing the previous one, to track how every
/// delivery status evolved.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Known contact ids.
    pub contacts: BTreeSet<ContactId>,
    /// Open conversation.
    pub selected: Option<ContactId>,
    /// Unread counts.
    pub unread: BTreeMap<ContactId, u32>,
    /// Favorite contacts.
    pub favorites: BTreeSet<ContactId>,
    /// Message ids and senders per conversation, in append order.
    pub conversations: BTreeMap<ContactId, Vec<(MessageId, Sender)>>,
    /// Current delivery phase per sent message.
    pub statuses: BTreeMap<(ContactId, MessageId), DeliveryPhase>,
    /// Every distinct phase observed per sent message, in order.
    pub status_history: BTreeMap<(ContactId, MessageId), Vec<DeliveryPhase>>,
    /// Notification ids, oldest first.
    pub notifications: Vec<u64>,
    /// Contacts shown as typing.
    pub typing: BTreeSet<ContactId>,
}

impl SystemSnapshot {
    /// Snapshot of `app` with no history.
    pub fn from_app<E: Environment>(app: &App<E>) -> Self {
        Self::capture(app, None)
    }

    /// Snapshot of `app`, extending the status history of `previous`.
    pub fn capture<E: Environment>(app: &App<E>, previous: Option<&SystemSnapshot>) -> Self {
        let conversations = app
            .conversations()
            .iter()
            .map(|(id, messages)| (*id, messages.iter().map(|m| (m.id, m.sender)).collect()))
            .collect();

        let statuses: BTreeMap<_, _> = app
            .statuses()
            .iter()
            .flat_map(|(c, s)| s.iter().map(move |(m, status)| ((*c, *m), status.phase())))
            .collect();

        let mut status_history = previous.map(|p| p.status_history.clone()).unwrap_or_default();
        for (key, phase) in &statuses {
            let history = status_history.entry(*key).or_default();
            if history.last() != Some(phase) {
                history.push(*phase);
            }
        }

        Self {
            contacts: app.contacts().iter().map(|c| c.id).collect(),
            selected: app.selected(),
            unread: app.unread_counts().clone(),
            favorites: app.favorites().clone(),
            conversations,
            statuses,
            status_history,
            notifications: app.state().notifications.iter().map(|n| n.id).collect(),
            typing: app.state().typing.clone(),
        }
    }
}
