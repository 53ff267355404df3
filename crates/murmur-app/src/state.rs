//! Observable application state types.
//!
//! These structures are the view model: everything a front end needs to draw
//! the contact list and the chat pane, and everything that gets persisted.
//! They carry no behavior beyond small helpers; the [`crate::App`] state
//! machine owns every transition.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::notifications::NotificationQueue;

/// Contact identifier.
pub type ContactId = u64;

/// Message identifier, unique within one conversation.
pub type MessageId = u64;

/// A contact in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Stable contact id.
    pub id: ContactId,
    /// Display name.
    pub name: String,
    /// Text of the latest message in the conversation, if any.
    pub last_message: Option<String>,
    /// Send time of the latest message (unix millis), if any.
    pub last_message_at: Option<u64>,
}

impl Contact {
    /// Contact with no conversation preview yet.
    pub fn new(id: ContactId, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), last_message: None, last_message_at: None }
    }
}

/// Which side of the conversation wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Written by the local user.
    Sent,
    /// Written by the contact.
    Received,
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Id, unique within the conversation.
    pub id: MessageId,
    /// Message body as typed.
    pub text: String,
    /// Author side.
    pub sender: Sender,
    /// Human-readable send time.
    pub timestamp: String,
    /// Send time in unix millis. Missing in older persisted data.
    #[serde(default)]
    pub sent_at: u64,
}

/// Delivery lifecycle phase of an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeliveryPhase {
    /// Neither delivered nor read.
    Pending,
    /// Delivered, not yet read.
    Delivered,
    /// Delivered and read.
    Read,
}

/// Persisted delivery flags of an outgoing message.
///
/// `read` implies `delivered`. Use [`DeliveryStatus::advance_to`] to move
/// forward; the status never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryStatus {
    /// Reached the recipient.
    pub delivered: bool,
    /// Seen by the recipient.
    pub read: bool,
}

impl DeliveryStatus {
    /// Freshly sent, nothing acknowledged.
    pub const PENDING: Self = Self { delivered: false, read: false };

    /// Current phase. A persisted `read` without `delivered` counts as read.
    pub fn phase(self) -> DeliveryPhase {
        if self.read {
            DeliveryPhase::Read
        } else if self.delivered {
            DeliveryPhase::Delivered
        } else {
            DeliveryPhase::Pending
        }
    }

    /// Move forward to `phase`. Returns `false` (and changes nothing) if the
    /// status is already at or past it.
    pub fn advance_to(&mut self, phase: DeliveryPhase) -> bool {
        if phase <= self.phase() {
            return false;
        }
        self.delivered = true;
        self.read = phase == DeliveryPhase::Read;
        true
    }
}

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Something completed.
    Success,
    /// Something failed. Always shown.
    Error,
    /// Informational.
    Info,
    /// Degraded but working.
    Warning,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Unique, strictly increasing id (creation time in unix millis).
    pub id: u64,
    /// Severity.
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Human-readable creation time.
    pub timestamp: String,
}

/// User preferences. Missing fields in persisted data take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Name shown for the local user.
    pub display_name: String,
    /// Show non-error notifications.
    pub notifications: bool,
    /// Run the simulated typing indicator.
    pub simulate_typing: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self { display_name: "Me".to_string(), notifications: true, simulate_typing: true }
    }
}

/// Application-wide status.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Persisted state is still being read.
    pub loading: bool,
    /// Most recent error message. `None` if nothing has failed.
    pub last_error: Option<String>,
    /// Whether the app considers itself online.
    pub online: bool,
    /// Contacts currently shown as typing.
    pub typing: BTreeSet<ContactId>,
    /// Visible notifications, oldest first.
    pub notifications: NotificationQueue,
}

impl AppState {
    pub(crate) fn new() -> Self {
        Self { online: true, ..Self::default() }
    }
}

/// Human-readable timestamp for unix millis, `dd/mm/yyyy, hh:mm:ss` UTC.
pub fn display_timestamp(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|t| t.format("%d/%m/%Y, %H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_advances_without_regressing() {
        let mut status = DeliveryStatus::PENDING;

        assert!(status.advance_to(DeliveryPhase::Delivered));
        assert_eq!(status, DeliveryStatus { delivered: true, read: false });

        assert!(status.advance_to(DeliveryPhase::Read));
        assert_eq!(status, DeliveryStatus { delivered: true, read: true });

        assert!(!status.advance_to(DeliveryPhase::Delivered));
        assert!(!status.advance_to(DeliveryPhase::Pending));
        assert_eq!(status.phase(), DeliveryPhase::Read);
    }

    #[test]
    fn read_without_delivered_counts_as_read() {
        let status = DeliveryStatus { delivered: false, read: true };
        assert_eq!(status.phase(), DeliveryPhase::Read);
    }

    #[test]
    fn settings_fill_missing_fields() {
        let settings: UserSettings = serde_json::from_str(r#"{"display_name":"Ana"}"#).unwrap();
        assert_eq!(settings.display_name, "Ana");
        assert!(settings.notifications);
        assert!(settings.simulate_typing);
    }

    #[test]
    fn message_wire_shape() {
        let message = Message {
            id: 1,
            text: "hola".to_string(),
            sender: Sender::Sent,
            timestamp: "01/01/2024, 00:00:00".to_string(),
            sent_at: 1_704_067_200_000,
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["sender"], "sent");

        let legacy: Message = serde_json::from_str(
            r#"{"id":1,"text":"Foto","sender":"received","timestamp":"x"}"#,
        )
        .unwrap();
        assert_eq!(legacy.sent_at, 0);
    }

    #[test]
    fn timestamp_format() {
        assert_eq!(display_timestamp(1_704_067_200_000), "01/01/2024, 00:00:00");
    }
}
