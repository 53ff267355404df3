//! Mapping between app state and the key-value store.
//!
//! Each [`StoreKey`] holds one JSON value. Reads never fail: a missing key
//! keeps the default and a malformed one keeps the default with a warning.

use std::collections::{BTreeMap, BTreeSet};

use murmur_core::{
    Environment, KeyValueStore, StorageError,
    storage::{load_or, save},
};

use crate::{
    App,
    action::StoreKey,
    state::{ContactId, DeliveryStatus, Message, MessageId, UserSettings},
};

/// Conversations by contact.
pub type Conversations = BTreeMap<ContactId, Vec<Message>>;

/// Delivery status by contact, then message.
pub type StatusMap = BTreeMap<ContactId, BTreeMap<MessageId, DeliveryStatus>>;

/// Everything that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// `chat-messages`
    pub conversations: Conversations,
    /// `dark-mode`
    pub dark_mode: bool,
    /// `favorites`
    pub favorites: BTreeSet<ContactId>,
    /// `unread-counts`
    pub unread: BTreeMap<ContactId, u32>,
    /// `message-status`
    pub statuses: StatusMap,
    /// `user-settings`
    pub settings: UserSettings,
}

/// Read every key from `store`, keeping `defaults` for missing or malformed
/// entries.
pub fn load<S: KeyValueStore>(store: &S, defaults: Snapshot) -> Snapshot {
    let Snapshot { conversations, dark_mode, favorites, unread, statuses, settings } = defaults;
    let snapshot = Snapshot {
        conversations: load_or(store, StoreKey::Messages.as_str(), conversations),
        dark_mode: load_or(store, StoreKey::DarkMode.as_str(), dark_mode),
        favorites: load_or(store, StoreKey::Favorites.as_str(), favorites),
        unread: load_or(store, StoreKey::UnreadCounts.as_str(), unread),
        statuses: load_or(store, StoreKey::MessageStatus.as_str(), statuses),
        settings: load_or(store, StoreKey::Settings.as_str(), settings),
    };
    tracing::debug!(
        "loaded persisted state: {} conversations, {} favorites",
        snapshot.conversations.len(),
        snapshot.favorites.len()
    );
    snapshot
}

/// Write the current value of `key` to `store`.
///
/// # Errors
///
/// Returns the store's error; the app state is not touched.
pub fn write<E, S>(app: &App<E>, store: &S, key: StoreKey) -> Result<(), StorageError>
where
    E: Environment,
    S: KeyValueStore,
{
    let name = key.as_str();
    match key {
        StoreKey::Messages => save(store, name, app.conversations()),
        StoreKey::DarkMode => save(store, name, &app.dark_mode()),
        StoreKey::Favorites => save(store, name, app.favorites()),
        StoreKey::UnreadCounts => save(store, name, app.unread_counts()),
        StoreKey::MessageStatus => save(store, name, app.statuses()),
        StoreKey::Settings => save(store, name, app.settings()),
    }
}

/// Write every key.
///
/// # Errors
///
/// Stops at the first failed key and returns it with the error.
pub fn write_all<E, S>(app: &App<E>, store: &S) -> Result<(), (StoreKey, StorageError)>
where
    E: Environment,
    S: KeyValueStore,
{
    for key in StoreKey::ALL {
        write(app, store, key).map_err(|e| (key, e))?;
    }
    Ok(())
}
