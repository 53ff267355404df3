//! Application state machine.
//!
//! This module defines the [`App`] state machine, which owns every piece of
//! conversation state and is completely decoupled from rendering and storage.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute. Time
//! and randomness come from the injected [`Environment`], so the same code runs
//! under a virtual clock in simulation.
//!
//! # Responsibilities
//!
//! - Conversations, message ids and the delivery status pipeline.
//! - Unread counts, favorites, selection and route sync.
//! - Local typing debounce and simulated remote typing.
//! - Notifications and their auto-dismiss timers.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fmt,
};

use murmur_core::Environment;

use crate::{
    AppAction, AppConfig, AppEvent,
    action::StoreKey,
    config::{ConfigError, Seed},
    persist::{Conversations, Snapshot, StatusMap},
    route::{self, Resolution, Route},
    search::{self, ContactSummary, SortMode},
    state::{
        AppState, Contact, ContactId, DeliveryPhase, DeliveryStatus, Message, MessageId,
        NotificationKind, Sender, UserSettings, display_timestamp,
    },
    timers::{TimerId, TimerQueue},
    typing::{self, LocalTyping},
};

/// Scheduled work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Deliver { contact_id: ContactId, message_id: MessageId, phase: DeliveryPhase },
    SimulateTyping,
    LocalTypingIdle,
    DismissNotification(u64),
}

/// Application state machine.
///
/// Processes events and produces actions. No I/O: fully testable in
/// simulation.
pub struct App<E: Environment> {
    env: E,
    config: AppConfig,
    contacts: Vec<Contact>,
    conversations: Conversations,
    statuses: StatusMap,
    favorites: BTreeSet<ContactId>,
    unread: BTreeMap<ContactId, u32>,
    /// Open conversation. `None` on the home screen.
    selected: Option<ContactId>,
    route: Route,
    search: String,
    sort: SortMode,
    dark_mode: bool,
    settings: UserSettings,
    state: AppState,
    timers: TimerQueue<E::Instant, Timer>,
    local_typing: LocalTyping,
    typing_timer: Option<TimerId>,
    dismiss_timers: HashMap<u64, TimerId>,
}

impl<E: Environment> fmt::Debug for App<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("contacts", &self.contacts.len())
            .field("selected", &self.selected)
            .field("route", &self.route)
            .field("pending_timers", &self.timers.len())
            .finish_non_exhaustive()
    }
}

impl<E: Environment> App<E> {
    /// App over the demo contacts and conversations.
    ///
    /// # Errors
    ///
    /// Returns the first constraint `config` violates.
    pub fn new(env: E, config: AppConfig) -> Result<Self, ConfigError> {
        let seed = Seed::demo(env.wall_clock_millis());
        Self::with_seed(env, config, seed)
    }

    /// App over explicit contacts and conversations.
    ///
    /// Unread counts start at the number of received messages per
    /// conversation.
    ///
    /// # Errors
    ///
    /// Returns the first constraint `config` violates. A zero
    /// `typing_interval` would otherwise reschedule forever inside one tick.
    pub fn with_seed(env: E, config: AppConfig, seed: Seed) -> Result<Self, ConfigError> {
        config.validate()?;
        let Seed { contacts, conversations } = seed;
        let unread = received_counts(&conversations);

        let mut app = Self {
            env,
            config,
            contacts,
            conversations: BTreeMap::new(),
            statuses: BTreeMap::new(),
            favorites: BTreeSet::new(),
            unread,
            selected: None,
            route: Route::Home,
            search: String::new(),
            sort: SortMode::default(),
            dark_mode: false,
            settings: UserSettings::default(),
            state: AppState::new(),
            timers: TimerQueue::new(),
            local_typing: LocalTyping::default(),
            typing_timer: None,
            dismiss_timers: HashMap::new(),
        };
        app.set_conversations(conversations);
        app.schedule_typing_simulation();
        Ok(app)
    }

    /// Current state as a persistable snapshot.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            conversations: self.conversations.clone(),
            dark_mode: self.dark_mode,
            favorites: self.favorites.clone(),
            unread: self.unread.clone(),
            statuses: self.statuses.clone(),
            settings: self.settings.clone(),
        }
    }

    /// Mark persisted state as loading.
    pub fn begin_loading(&mut self) {
        self.state.loading = true;
    }

    /// Replace persisted state with `snapshot`.
    ///
    /// Data for unknown contacts and status entries without a matching sent
    /// message are dropped. Sent messages that are not yet read are
    /// rescheduled through the delivery pipeline.
    pub fn restore(&mut self, snapshot: Snapshot) {
        let Snapshot { conversations, dark_mode, favorites, unread, statuses, settings } = snapshot;

        let known: BTreeSet<ContactId> = self.contacts.iter().map(|c| c.id).collect();
        let conversations: Conversations = conversations
            .into_iter()
            .filter(|(id, _)| {
                let keep = known.contains(id);
                if !keep {
                    tracing::warn!("dropping persisted conversation for unknown contact {id}");
                }
                keep
            })
            .map(|(id, messages)| (id, increasing_ids(id, messages)))
            .collect();

        self.timers.clear();
        self.typing_timer = None;
        self.dismiss_timers.clear();
        self.local_typing = LocalTyping::default();
        self.state.notifications.clear();
        self.state.typing.clear();

        self.set_conversations(conversations);
        self.dark_mode = dark_mode;
        self.favorites = favorites.into_iter().filter(|id| known.contains(id)).collect();
        self.unread = unread.into_iter().filter(|(id, _)| known.contains(id)).collect();
        self.settings = settings;

        self.statuses = BTreeMap::new();
        for (contact_id, messages) in &self.conversations {
            for message in messages.iter().filter(|m| m.sender == Sender::Sent) {
                let status = statuses
                    .get(contact_id)
                    .and_then(|s| s.get(&message.id))
                    .copied()
                    .unwrap_or(DeliveryStatus::PENDING);
                self.statuses.entry(*contact_id).or_default().insert(message.id, status);
            }
        }
        let pending: Vec<_> = self
            .statuses
            .iter()
            .flat_map(|(c, s)| s.iter().map(move |(m, status)| (*c, *m, status.phase())))
            .filter(|(_, _, phase)| *phase < DeliveryPhase::Read)
            .collect();
        for (contact_id, message_id, phase) in pending {
            self.schedule_delivery(contact_id, message_id, phase);
        }

        if let Some(selected) = self.selected {
            if known.contains(&selected) {
                self.unread.insert(selected, 0);
            } else {
                self.selected = None;
                self.route = Route::Home;
            }
        }

        self.schedule_typing_simulation();
        self.state.loading = false;
        tracing::info!(
            "restored {} conversations, {} timers pending",
            self.conversations.len(),
            self.timers.len()
        );
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        let actions = match event {
            AppEvent::Tick => self.fire_due_timers(),
            AppEvent::SelectConversation { contact_id } => self.select_conversation(contact_id),
            AppEvent::ClearSelection => self.clear_selection(),
            AppEvent::Navigate { path } => self.navigate(&path),
            AppEvent::SendMessage { contact_id, text } => self.send_message(contact_id, text),
            AppEvent::MessageReceived { contact_id, text } => {
                self.receive_message(contact_id, text)
            },
            AppEvent::ToggleFavorite { contact_id } => self.toggle_favorite(contact_id),
            AppEvent::ToggleDarkMode => {
                self.dark_mode = !self.dark_mode;
                vec![AppAction::Persist(StoreKey::DarkMode), AppAction::Render]
            },
            AppEvent::UpdateSettings(settings) => self.update_settings(settings),
            AppEvent::SetSearch(term) => {
                self.search = term;
                vec![AppAction::Render]
            },
            AppEvent::SetSort(mode) => {
                self.sort = mode;
                vec![AppAction::Render]
            },
            AppEvent::DraftChanged { text } => self.draft_changed(&text),
            AppEvent::ConnectivityChanged { online } => self.set_online(online),
            AppEvent::DismissNotification { id } => self.dismiss_notification(id),
            AppEvent::ClearNotifications => self.clear_notifications(),
            AppEvent::StorageFailed { key, reason } => {
                tracing::error!("failed to persist {key}: {reason}");
                self.report_error("Storage error", format!("Could not save {key}: {reason}"))
            },
            AppEvent::Error { message } => self.report_error("Error", message),
            AppEvent::Shutdown => self.shutdown(),
        };
        dedup(actions)
    }

    fn select_conversation(&mut self, contact_id: ContactId) -> Vec<AppAction> {
        if self.contact(contact_id).is_none() {
            tracing::warn!("select of unknown contact {contact_id}");
            return self.contact_not_found(contact_id.to_string());
        }

        let mut actions = Vec::new();
        if self.selected != Some(contact_id) {
            actions.extend(self.local_typing.stop(&mut self.timers));
        }
        self.selected = Some(contact_id);
        self.route = Route::Chat(contact_id);

        if self.unread.insert(contact_id, 0).is_some_and(|n| n > 0) {
            actions.push(AppAction::Persist(StoreKey::UnreadCounts));
        }
        tracing::debug!("selected conversation {contact_id}");
        actions.push(AppAction::Render);
        actions
    }

    fn contact_not_found(&mut self, raw_id: String) -> Vec<AppAction> {
        let mut actions = self.local_typing.stop(&mut self.timers);
        self.selected = None;
        self.route = Route::Home;
        self.notify(
            NotificationKind::Error,
            "Contact not found",
            format!("There is no conversation with contact {raw_id}"),
        );
        actions.extend([AppAction::Redirect(Route::Home), AppAction::Render]);
        actions
    }

    fn clear_selection(&mut self) -> Vec<AppAction> {
        let mut actions = self.local_typing.stop(&mut self.timers);
        self.selected = None;
        self.route = Route::Home;
        actions.push(AppAction::Render);
        actions
    }

    fn navigate(&mut self, path: &str) -> Vec<AppAction> {
        match route::resolve(path) {
            Resolution::Matched(Route::Home) => self.clear_selection(),
            Resolution::Matched(Route::Chat(id)) => self.select_conversation(id),
            Resolution::Matched(placeholder) => {
                self.route = placeholder;
                vec![AppAction::Render]
            },
            Resolution::InvalidContact(raw) => {
                tracing::warn!("navigation to invalid contact id {raw:?}");
                self.contact_not_found(raw)
            },
            Resolution::Redirect { from, to } => {
                tracing::debug!("redirecting {from} to {to}");
                let mut actions = if to == Route::Home { self.clear_selection() } else { vec![] };
                self.route = to;
                actions.insert(0, AppAction::Redirect(to));
                actions.push(AppAction::Render);
                actions
            },
        }
    }

    fn send_message(&mut self, contact_id: ContactId, text: String) -> Vec<AppAction> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        if self.contact(contact_id).is_none() {
            tracing::warn!("send to unknown contact {contact_id} ignored");
            return Vec::new();
        }

        let message_id = self.append_message(contact_id, text, Sender::Sent);
        self.statuses.entry(contact_id).or_default().insert(message_id, DeliveryStatus::PENDING);
        self.schedule_delivery(contact_id, message_id, DeliveryPhase::Pending);
        tracing::debug!("sent message {message_id} to contact {contact_id}");

        let mut actions = self.local_typing.stop(&mut self.timers);
        actions.extend([
            AppAction::Persist(StoreKey::Messages),
            AppAction::Persist(StoreKey::MessageStatus),
            AppAction::Render,
        ]);
        actions
    }

    fn receive_message(&mut self, contact_id: ContactId, text: String) -> Vec<AppAction> {
        let Some(name) = self.contact(contact_id).map(|c| c.name.clone()) else {
            tracing::warn!("message from unknown contact {contact_id} dropped");
            return Vec::new();
        };

        let preview = text.clone();
        let message_id = self.append_message(contact_id, text, Sender::Received);
        self.state.typing.remove(&contact_id);
        tracing::debug!("received message {message_id} from contact {contact_id}");

        let mut actions = vec![AppAction::Persist(StoreKey::Messages)];
        if self.selected != Some(contact_id) {
            let unread = self.unread.entry(contact_id).or_default();
            *unread = unread.saturating_add(1);
            actions.push(AppAction::Persist(StoreKey::UnreadCounts));
            self.notify(NotificationKind::Info, format!("New message from {name}"), preview);
        }
        actions.push(AppAction::Render);
        actions
    }

    fn toggle_favorite(&mut self, contact_id: ContactId) -> Vec<AppAction> {
        if self.contact(contact_id).is_none() {
            tracing::debug!("favorite toggle for unknown contact {contact_id} ignored");
            return Vec::new();
        }
        if !self.favorites.remove(&contact_id) {
            self.favorites.insert(contact_id);
        }
        vec![AppAction::Persist(StoreKey::Favorites), AppAction::Render]
    }

    fn update_settings(&mut self, settings: UserSettings) -> Vec<AppAction> {
        let typing_changed = settings.simulate_typing != self.settings.simulate_typing;
        self.settings = settings;

        if typing_changed {
            if self.settings.simulate_typing {
                self.schedule_typing_simulation();
            } else {
                if let Some(id) = self.typing_timer.take() {
                    self.timers.cancel(id);
                }
                self.state.typing.clear();
            }
        }
        vec![AppAction::Persist(StoreKey::Settings), AppAction::Render]
    }

    fn draft_changed(&mut self, text: &str) -> Vec<AppAction> {
        let Some(contact_id) = self.selected else {
            return Vec::new();
        };
        let deadline = self.env.now() + self.config.typing_idle;
        let actions = self.local_typing.keystroke(
            contact_id,
            text.is_empty(),
            &mut self.timers,
            |timers| timers.schedule(deadline, Timer::LocalTypingIdle),
        );
        for action in &actions {
            tracing::debug!("local typing: {action:?}");
        }
        actions
    }

    fn set_online(&mut self, online: bool) -> Vec<AppAction> {
        if self.state.online == online {
            return Vec::new();
        }
        self.state.online = online;
        tracing::info!("connectivity changed: online={online}");
        if online {
            self.notify(NotificationKind::Success, "Back online", "Connection restored");
        } else {
            self.notify(
                NotificationKind::Warning,
                "You are offline",
                "Messages will be kept locally",
            );
        }
        vec![AppAction::Render]
    }

    fn dismiss_notification(&mut self, id: u64) -> Vec<AppAction> {
        if let Some(timer) = self.dismiss_timers.remove(&id) {
            self.timers.cancel(timer);
        }
        match self.state.notifications.remove(id) {
            Some(_) => vec![AppAction::Render],
            None => Vec::new(),
        }
    }

    fn clear_notifications(&mut self) -> Vec<AppAction> {
        for id in self.state.notifications.clear() {
            if let Some(timer) = self.dismiss_timers.remove(&id) {
                self.timers.cancel(timer);
            }
        }
        vec![AppAction::Render]
    }

    fn report_error(&mut self, title: &str, message: String) -> Vec<AppAction> {
        self.state.last_error = Some(message.clone());
        self.notify(NotificationKind::Error, title, message);
        vec![AppAction::Render]
    }

    fn shutdown(&mut self) -> Vec<AppAction> {
        let mut actions = self.local_typing.stop(&mut self.timers);
        self.timers.clear();
        self.typing_timer = None;
        self.dismiss_timers.clear();
        tracing::info!("shutting down");
        actions.push(AppAction::Quit);
        actions
    }

    fn fire_due_timers(&mut self) -> Vec<AppAction> {
        let now = self.env.now();
        let mut actions = Vec::new();

        while let Some((id, timer)) = self.timers.pop_due(now) {
            match timer {
                Timer::Deliver { contact_id, message_id, phase } => {
                    let advanced = self
                        .statuses
                        .get_mut(&contact_id)
                        .and_then(|s| s.get_mut(&message_id))
                        .is_some_and(|status| status.advance_to(phase));
                    if advanced {
                        tracing::debug!("message {contact_id}/{message_id} now {phase:?}");
                        actions.extend([AppAction::Persist(StoreKey::MessageStatus), AppAction::Render]);
                    }
                },
                Timer::SimulateTyping => {
                    self.typing_timer = None;
                    if self.settings.simulate_typing {
                        if let Some((contact_id, typing)) = typing::simulate_tick(
                            &self.env,
                            &self.contacts,
                            &mut self.state.typing,
                            self.config.typing_probability,
                        ) {
                            tracing::debug!("contact {contact_id} typing={typing}");
                            actions.push(AppAction::Render);
                        }
                        self.schedule_typing_simulation();
                    }
                },
                Timer::LocalTypingIdle => actions.extend(self.local_typing.idle_elapsed(id)),
                Timer::DismissNotification(notification) => {
                    self.dismiss_timers.remove(&notification);
                    if self.state.notifications.remove(notification).is_some() {
                        actions.push(AppAction::Render);
                    }
                },
            }
        }
        actions
    }

    /// Push a notification, honoring the user's preference for non-errors.
    fn notify(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Option<u64> {
        if kind != NotificationKind::Error && !self.settings.notifications {
            return None;
        }
        let now_millis = self.env.wall_clock_millis();
        let id = self.state.notifications.push(kind, title, message, now_millis);
        if let Some(ttl) = self.config.notification_ttl {
            let timer = self.timers.schedule(self.env.now() + ttl, Timer::DismissNotification(id));
            self.dismiss_timers.insert(id, timer);
        }
        Some(id)
    }

    fn append_message(&mut self, contact_id: ContactId, text: String, sender: Sender) -> MessageId {
        let now_millis = self.env.wall_clock_millis();
        let conversation = self.conversations.entry(contact_id).or_default();
        let message_id = conversation.iter().map(|m| m.id).max().map_or(1, |id| id.saturating_add(1));
        conversation.push(Message {
            id: message_id,
            text,
            sender,
            timestamp: display_timestamp(now_millis),
            sent_at: now_millis,
        });
        self.refresh_preview(contact_id);
        message_id
    }

    fn set_conversations(&mut self, conversations: Conversations) {
        self.conversations = conversations;
        let ids: Vec<ContactId> = self.contacts.iter().map(|c| c.id).collect();
        for id in ids {
            self.refresh_preview(id);
        }
    }

    fn refresh_preview(&mut self, contact_id: ContactId) {
        let latest = self.conversations.get(&contact_id).and_then(|c| c.last());
        if let Some(contact) = self.contacts.iter_mut().find(|c| c.id == contact_id) {
            contact.last_message = latest.map(|m| m.text.clone());
            contact.last_message_at = latest.map(|m| m.sent_at);
        }
    }

    fn schedule_delivery(&mut self, contact_id: ContactId, message_id: MessageId, from: DeliveryPhase) {
        let now = self.env.now();
        if from < DeliveryPhase::Delivered {
            self.timers.schedule(now + self.config.delivered_after, Timer::Deliver {
                contact_id,
                message_id,
                phase: DeliveryPhase::Delivered,
            });
        }
        if from < DeliveryPhase::Read {
            let delay = if from == DeliveryPhase::Delivered {
                self.config.read_after.saturating_sub(self.config.delivered_after)
            } else {
                self.config.read_after
            };
            self.timers.schedule(now + delay, Timer::Deliver {
                contact_id,
                message_id,
                phase: DeliveryPhase::Read,
            });
        }
    }

    fn schedule_typing_simulation(&mut self) {
        if !self.settings.simulate_typing || self.typing_timer.is_some() {
            return;
        }
        let deadline = self.env.now() + self.config.typing_interval;
        self.typing_timer = Some(self.timers.schedule(deadline, Timer::SimulateTyping));
    }

    /// Environment the app reads time and randomness from.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Timing configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// All contacts, in seed order.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Contact by id.
    pub fn contact(&self, contact_id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == contact_id)
    }

    /// Messages exchanged with `contact_id`, oldest first.
    pub fn conversation(&self, contact_id: ContactId) -> &[Message] {
        self.conversations.get(&contact_id).map_or(&[], Vec::as_slice)
    }

    /// Every conversation.
    pub fn conversations(&self) -> &Conversations {
        &self.conversations
    }

    /// Delivery status of a sent message.
    pub fn status(&self, contact_id: ContactId, message_id: MessageId) -> Option<DeliveryStatus> {
        self.statuses.get(&contact_id)?.get(&message_id).copied()
    }

    /// Every delivery status.
    pub fn statuses(&self) -> &StatusMap {
        &self.statuses
    }

    /// Favorite contacts.
    pub fn favorites(&self) -> &BTreeSet<ContactId> {
        &self.favorites
    }

    /// Whether `contact_id` is a favorite.
    pub fn is_favorite(&self, contact_id: ContactId) -> bool {
        self.favorites.contains(&contact_id)
    }

    /// Unread count for `contact_id`.
    pub fn unread_count(&self, contact_id: ContactId) -> u32 {
        self.unread.get(&contact_id).copied().unwrap_or(0)
    }

    /// Every unread count.
    pub fn unread_counts(&self) -> &BTreeMap<ContactId, u32> {
        &self.unread
    }

    /// Open conversation.
    pub fn selected(&self) -> Option<ContactId> {
        self.selected
    }

    /// Contact of the open conversation.
    pub fn selected_contact(&self) -> Option<&Contact> {
        self.selected.and_then(|id| self.contact(id))
    }

    /// Current screen.
    pub fn route(&self) -> Route {
        self.route
    }

    /// Contact search term.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Contact list ordering.
    pub fn sort_mode(&self) -> SortMode {
        self.sort
    }

    /// Theme flag.
    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// User preferences.
    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    /// Loading, error, connectivity, typing and notifications.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Whether `contact_id` is shown as typing.
    pub fn is_typing(&self, contact_id: ContactId) -> bool {
        self.state.typing.contains(&contact_id)
    }

    /// Conversation the local user is typing in.
    pub fn local_typing(&self) -> Option<ContactId> {
        self.local_typing.active()
    }

    /// Number of live timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Contact list rows after search and sort.
    pub fn contact_list(&self) -> Vec<ContactSummary<'_>> {
        let rows = self
            .contacts
            .iter()
            .map(|contact| ContactSummary {
                contact,
                unread: self.unread_count(contact.id),
                favorite: self.is_favorite(contact.id),
                typing: self.is_typing(contact.id),
            })
            .collect();
        let mut rows = search::filter(rows, &self.search);
        search::sort(&mut rows, self.sort);
        rows
    }
}

fn received_counts(conversations: &Conversations) -> BTreeMap<ContactId, u32> {
    conversations
        .iter()
        .map(|(id, messages)| {
            let received = messages.iter().filter(|m| m.sender == Sender::Received).count();
            (*id, u32::try_from(received).unwrap_or(u32::MAX))
        })
        .filter(|(_, n)| *n > 0)
        .collect()
}

/// Keep only messages whose ids strictly increase and leave room for a
/// successor.
fn increasing_ids(contact_id: ContactId, messages: Vec<Message>) -> Vec<Message> {
    let total = messages.len();
    let mut last: Option<MessageId> = None;
    let kept: Vec<Message> = messages
        .into_iter()
        .filter(|m| {
            let keep = m.id < MessageId::MAX && last.is_none_or(|prev| m.id > prev);
            if keep {
                last = Some(m.id);
            }
            keep
        })
        .collect();
    if kept.len() < total {
        tracing::warn!(
            "dropped {} persisted messages with invalid ids for contact {contact_id}",
            total - kept.len()
        );
    }
    kept
}

/// Drop repeated persist and render actions, keeping first occurrences.
fn dedup(actions: Vec<AppAction>) -> Vec<AppAction> {
    let mut out: Vec<AppAction> = Vec::with_capacity(actions.len());
    for action in actions {
        let repeatable = matches!(action, AppAction::LocalTyping { .. });
        if repeatable || !out.contains(&action) {
            out.push(action);
        }
    }
    // render last so it sees every preceding effect
    if let Some(pos) = out.iter().position(|a| *a == AppAction::Render) {
        let render = out.remove(pos);
        let quit = out.iter().position(|a| *a == AppAction::Quit).unwrap_or(out.len());
        out.insert(quit, render);
    }
    out
}
