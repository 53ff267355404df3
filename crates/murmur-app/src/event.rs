//! Application input events.
//!
//! [`AppEvent`] is the complete set of inputs that drive the [`crate::App`]
//! state machine. Events come from the user (through a front end), from the
//! simulated remote side, from the runtime (ticks, storage failures), or from
//! tests.

use crate::{
    action::StoreKey,
    search::SortMode,
    state::{ContactId, UserSettings},
};

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Fire every timer due at the current time.
    Tick,

    /// Open a conversation.
    SelectConversation {
        /// Contact to open.
        contact_id: ContactId,
    },

    /// Close the open conversation.
    ClearSelection,

    /// Go to a path (`/`, `/chat/{id}`, ...).
    Navigate {
        /// Path to resolve.
        path: String,
    },

    /// Send a message as the local user.
    SendMessage {
        /// Recipient.
        contact_id: ContactId,
        /// Message body.
        text: String,
    },

    /// A contact wrote to the local user.
    MessageReceived {
        /// Author.
        contact_id: ContactId,
        /// Message body.
        text: String,
    },

    /// Add or remove a contact from favorites.
    ToggleFavorite {
        /// Contact to toggle.
        contact_id: ContactId,
    },

    /// Flip the theme.
    ToggleDarkMode,

    /// Replace user preferences.
    UpdateSettings(UserSettings),

    /// Set the contact search term.
    SetSearch(String),

    /// Set the contact list ordering.
    SetSort(SortMode),

    /// The draft in the open conversation changed.
    DraftChanged {
        /// Current draft text.
        text: String,
    },

    /// Connectivity changed.
    ConnectivityChanged {
        /// `true` when back online.
        online: bool,
    },

    /// Dismiss one notification.
    DismissNotification {
        /// Notification id.
        id: u64,
    },

    /// Dismiss every notification.
    ClearNotifications,

    /// Writing a persisted key failed.
    StorageFailed {
        /// Key that failed.
        key: StoreKey,
        /// Error description.
        reason: String,
    },

    /// Report an error to the user.
    Error {
        /// Error description.
        message: String,
    },

    /// The app is going away; cancel pending work.
    Shutdown,
}
