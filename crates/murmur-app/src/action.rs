//! Application side-effects.
//!
//! [`AppAction`] values are instructions produced by the [`crate::App`] state
//! machine for the runtime to execute. The app never touches storage or the
//! screen itself.

use std::fmt;

use crate::{route::Route, state::ContactId};

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Write the current value of a persisted key.
    Persist(StoreKey),

    /// The requested path did not resolve; the front end should show this
    /// route instead.
    Redirect(Route),

    /// The local user started or stopped typing in a conversation.
    LocalTyping {
        /// Conversation being typed into.
        contact_id: ContactId,
        /// `true` on the first keystroke of a burst, `false` when it ends.
        typing: bool,
    },

    /// Quit the application.
    Quit,
}

/// Persisted entries, one JSON value each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    /// Conversations by contact.
    Messages,
    /// Theme flag.
    DarkMode,
    /// Favorite contact ids.
    Favorites,
    /// Unread counts by contact.
    UnreadCounts,
    /// Delivery status by contact and message.
    MessageStatus,
    /// User preferences.
    Settings,
}

impl StoreKey {
    /// Every key, in load order.
    pub const ALL: [StoreKey; 6] = [
        StoreKey::Messages,
        StoreKey::DarkMode,
        StoreKey::Favorites,
        StoreKey::UnreadCounts,
        StoreKey::MessageStatus,
        StoreKey::Settings,
    ];

    /// Key name in the store.
    pub fn as_str(self) -> &'static str {
        match self {
            StoreKey::Messages => "chat-messages",
            StoreKey::DarkMode => "dark-mode",
            StoreKey::Favorites => "favorites",
            StoreKey::UnreadCounts => "unread-counts",
            StoreKey::MessageStatus => "message-status",
            StoreKey::Settings => "user-settings",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
