//! Operations for property, model-based and fuzz testing.
//!
//! Operations are small and composable so generators can explore interesting
//! combinations. Contact ids range slightly past the seeded contacts so
//! unknown-contact paths are exercised too.

use std::time::Duration;

use arbitrary::Arbitrary;
use murmur_app::{App, AppAction, AppEvent, ContactId, SortMode, UserSettings};

use crate::SimEnv;

/// Contact selector; maps onto ids `0..=8` (seeded contacts are 1-7).
pub type ContactSlot = u8;

/// Operations that can be applied to the app.
#[derive(Debug, Clone, Arbitrary)]
pub enum Operation {
    /// Open a conversation.
    Select(ContactSlot),
    /// Close the open conversation.
    ClearSelection,
    /// Navigate to one of a fixed set of paths.
    Navigate(u8),
    /// Send a message.
    Send {
        /// Recipient.
        contact: ContactSlot,
        /// Body.
        text: SmallText,
    },
    /// Receive a message.
    Receive {
        /// Author.
        contact: ContactSlot,
        /// Body.
        text: SmallText,
    },
    /// Toggle a favorite.
    ToggleFavorite(ContactSlot),
    /// Flip the theme.
    ToggleDarkMode,
    /// Change the draft.
    Draft(SmallText),
    /// Set the search term.
    Search(SmallText),
    /// Set the sort mode.
    Sort(u8),
    /// Go online or offline.
    SetOnline(bool),
    /// Dismiss the n-th visible notification.
    Dismiss(u8),
    /// Dismiss every notification.
    ClearNotifications,
    /// Flip one user setting.
    ToggleSetting(bool),
    /// Report an error.
    ReportError,
    /// Let virtual time pass (in units of 100ms), then tick.
    Advance(u8),
}

/// Compact text content.
///
/// `size_class` picks the length (empty, whitespace, short, long); `seed`
/// picks the characters, including some with diacritics.
#[derive(Debug, Clone, Copy, Arbitrary)]
pub struct SmallText {
    /// Character seed.
    pub seed: u8,
    /// Length class, 0-3.
    pub size_class: u8,
}

const ALPHABET: [char; 12] = ['a', 'e', 'j', 'o', 's', 'é', 'í', 'ñ', 'Á', ' ', '¿', '?'];

const PATHS: [&str; 8] =
    ["/", "/chat/1", "/chat/7", "/chat/99", "/chat/abc", "/contacts", "/settings", "/home"];

impl SmallText {
    /// Expand to a string.
    pub fn to_text(self) -> String {
        let len = match self.size_class % 4 {
            0 => return String::new(),
            1 => return "   ".to_string(),
            2 => 3,
            _ => 24,
        };
        (0..len)
            .map(|i| ALPHABET[usize::from(self.seed.wrapping_add(i)) % ALPHABET.len()])
            .collect()
    }
}

/// Map a slot onto a contact id.
pub fn contact_id(slot: ContactSlot) -> ContactId {
    ContactId::from(slot % 9)
}

impl Operation {
    /// Apply to `app`, returning every action produced.
    pub fn apply(&self, app: &mut App<SimEnv>) -> Vec<AppAction> {
        match *self {
            Operation::Advance(units) => {
                app.env().advance(Duration::from_millis(u64::from(units) * 100));
                app.handle(AppEvent::Tick)
            },
            Operation::Dismiss(n) => {
                let len = app.state().notifications.len();
                if len == 0 {
                    return Vec::new();
                }
                let id = app.state().notifications.iter().nth(usize::from(n) % len).map(|n| n.id);
                match id {
                    Some(id) => app.handle(AppEvent::DismissNotification { id }),
                    None => Vec::new(),
                }
            },
            Operation::ToggleSetting(notifications) => {
                let mut settings: UserSettings = app.settings().clone();
                if notifications {
                    settings.notifications = !settings.notifications;
                } else {
                    settings.simulate_typing = !settings.simulate_typing;
                }
                app.handle(AppEvent::UpdateSettings(settings))
            },
            _ => match self.to_event() {
                Some(event) => app.handle(event),
                None => Vec::new(),
            },
        }
    }

    /// The plain event this operation maps to. `None` for operations that
    /// need app state or the clock.
    pub fn to_event(&self) -> Option<AppEvent> {
        let event = match *self {
            Operation::Select(slot) => AppEvent::SelectConversation { contact_id: contact_id(slot) },
            Operation::ClearSelection => AppEvent::ClearSelection,
            Operation::Navigate(n) => {
                AppEvent::Navigate { path: PATHS[usize::from(n) % PATHS.len()].to_string() }
            },
            Operation::Send { contact, text } => {
                AppEvent::SendMessage { contact_id: contact_id(contact), text: text.to_text() }
            },
            Operation::Receive { contact, text } => {
                AppEvent::MessageReceived { contact_id: contact_id(contact), text: text.to_text() }
            },
            Operation::ToggleFavorite(slot) => {
                AppEvent::ToggleFavorite { contact_id: contact_id(slot) }
            },
            Operation::ToggleDarkMode => AppEvent::ToggleDarkMode,
            Operation::Draft(text) => AppEvent::DraftChanged { text: text.to_text() },
            Operation::Search(text) => AppEvent::SetSearch(text.to_text()),
            Operation::Sort(n) => AppEvent::SetSort(match n % 3 {
                0 => SortMode::Name,
                1 => SortMode::Recent,
                _ => SortMode::Unread,
            }),
            Operation::SetOnline(online) => AppEvent::ConnectivityChanged { online },
            Operation::ClearNotifications => AppEvent::ClearNotifications,
            Operation::ReportError => AppEvent::Error { message: "simulated failure".to_string() },
            Operation::Dismiss(_) | Operation::ToggleSetting(_) | Operation::Advance(_) => {
                return None;
            },
        };
        Some(event)
    }
}
