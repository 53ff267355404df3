//! Input state and key handling for the TUI.
//!
//! This module owns all text input state (buffer, cursor) and turns key
//! presses into [`AppEvent`]s. Command parsing happens here on Enter.

use murmur_app::{App, AppEvent};
use murmur_core::Environment;

use crate::commands::{self, Command};

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key (send or run command).
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Tab key (cycle sort mode).
    Tab,
    /// Escape key (quit).
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow (previous contact).
    Up,
    /// Down arrow (next contact).
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// Input state for the TUI.
///
/// Manages the draft buffer and cursor position. The cursor counts
/// characters, not bytes, so accented input edits cleanly.
#[derive(Debug, Default)]
pub struct InputState {
    buffer: String,
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position, in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handle a key press.
    ///
    /// Returns the events to feed into the app; empty for keys that only
    /// move the cursor.
    pub fn handle_key<E: Environment>(&mut self, key: KeyInput, app: &App<E>) -> Vec<AppEvent> {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor = self.cursor.saturating_add(1);
                self.draft_changed()
            },
            KeyInput::Backspace => {
                if self.cursor == 0 {
                    return vec![];
                }
                self.cursor = self.cursor.saturating_sub(1);
                let at = self.byte_offset(self.cursor);
                self.buffer.remove(at);
                self.draft_changed()
            },
            KeyInput::Delete => {
                if self.cursor >= self.len() {
                    return vec![];
                }
                let at = self.byte_offset(self.cursor);
                self.buffer.remove(at);
                self.draft_changed()
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                vec![]
            },
            KeyInput::Right => {
                self.cursor = self.cursor.saturating_add(1).min(self.len());
                vec![]
            },
            KeyInput::Home => {
                self.cursor = 0;
                vec![]
            },
            KeyInput::End => {
                self.cursor = self.len();
                vec![]
            },
            KeyInput::Enter => self.handle_enter(app),
            KeyInput::Tab => vec![AppEvent::SetSort(app.sort_mode().next())],
            KeyInput::Up => Self::move_selection(app, false),
            KeyInput::Down => Self::move_selection(app, true),
            KeyInput::Esc => vec![AppEvent::Shutdown],
        }
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(i, _)| i)
    }

    /// Commands never count as typing.
    fn draft_changed(&self) -> Vec<AppEvent> {
        let text = if self.buffer.starts_with('/') { String::new() } else { self.buffer.clone() };
        vec![AppEvent::DraftChanged { text }]
    }

    /// Handle Enter key - parse command and translate into app events.
    fn handle_enter<E: Environment>(&mut self, app: &App<E>) -> Vec<AppEvent> {
        let text = std::mem::take(&mut self.buffer);
        self.cursor = 0;

        if text.trim().is_empty() {
            return vec![];
        }

        match commands::parse(&text) {
            Command::Message { content } => match app.selected() {
                Some(contact_id) => vec![AppEvent::SendMessage { contact_id, text: content }],
                None => no_conversation(),
            },
            Command::Search { term } => vec![AppEvent::SetSearch(term)],
            Command::Sort { mode } => {
                vec![AppEvent::SetSort(mode.unwrap_or_else(|| app.sort_mode().next()))]
            },
            Command::Favorite { contact_id } => match contact_id.or(app.selected()) {
                Some(contact_id) => vec![AppEvent::ToggleFavorite { contact_id }],
                None => no_conversation(),
            },
            Command::Navigate { path } => vec![AppEvent::Navigate { path }],
            Command::ToggleTheme => vec![AppEvent::ToggleDarkMode],
            Command::ClearNotifications => vec![AppEvent::ClearNotifications],
            Command::Connectivity { online } => vec![AppEvent::ConnectivityChanged { online }],
            Command::Receive { content } => match app.selected() {
                Some(contact_id) => vec![AppEvent::MessageReceived { contact_id, text: content }],
                None => no_conversation(),
            },
            Command::Quit => vec![AppEvent::Shutdown],
            Command::Unknown { input } => {
                vec![AppEvent::Error { message: format!("Unknown command: {input}") }]
            },
            Command::InvalidArgs { command, error } => {
                vec![AppEvent::Error { message: format!("/{command}: {error}") }]
            },
        }
    }

    /// Step through the visible contact list, wrapping at both ends.
    fn move_selection<E: Environment>(app: &App<E>, forward: bool) -> Vec<AppEvent> {
        let ids: Vec<_> = app.contact_list().iter().map(|row| row.contact.id).collect();
        let Some(&last) = ids.last() else {
            return vec![];
        };
        let current = app.selected().and_then(|id| ids.iter().position(|&c| c == id));

        let next = match (current, forward) {
            (None, true) => ids.first().copied(),
            (None, false) => Some(last),
            (Some(i), true) => ids.get(i.saturating_add(1)).or(ids.first()).copied(),
            (Some(0), false) => Some(last),
            (Some(i), false) => ids.get(i.saturating_sub(1)).copied(),
        };

        next.map(|contact_id| AppEvent::SelectConversation { contact_id }).into_iter().collect()
    }
}

fn no_conversation() -> Vec<AppEvent> {
    vec![AppEvent::Error { message: "Open a conversation first".to_string() }]
}

#[cfg(test)]
mod tests {
    use murmur_app::{AppConfig, Seed, SortMode};
    use murmur_core::env::test_utils::MockEnv;

    use super::*;

    fn app() -> App<MockEnv> {
        App::with_seed(MockEnv::new(), AppConfig::default(), Seed::contacts_only()).unwrap()
    }

    fn type_str(input: &mut InputState, app: &App<MockEnv>, text: &str) -> Vec<AppEvent> {
        text.chars().flat_map(|c| input.handle_key(KeyInput::Char(c), app)).collect()
    }

    #[test]
    fn char_input_adds_to_buffer() {
        let mut input = InputState::new();
        let app = app();

        let events = type_str(&mut input, &app, "hi");

        assert_eq!(input.buffer(), "hi");
        assert_eq!(input.cursor(), 2);
        assert_eq!(events.last(), Some(&AppEvent::DraftChanged { text: "hi".to_string() }));
    }

    #[test]
    fn backspace_handles_multibyte_chars() {
        let mut input = InputState::new();
        let app = app();

        type_str(&mut input, &app, "año");
        input.handle_key(KeyInput::Left, &app);
        let events = input.handle_key(KeyInput::Backspace, &app);

        assert_eq!(input.buffer(), "ao");
        assert_eq!(input.cursor(), 1);
        assert_eq!(events, vec![AppEvent::DraftChanged { text: "ao".to_string() }]);
    }

    #[test]
    fn commands_do_not_count_as_typing() {
        let mut input = InputState::new();
        let app = app();

        let events = type_str(&mut input, &app, "/th");

        assert!(events.iter().all(|e| *e == AppEvent::DraftChanged { text: String::new() }));
    }

    #[test]
    fn cursor_movement() {
        let mut input = InputState::new();
        let app = app();
        type_str(&mut input, &app, "abc");

        input.handle_key(KeyInput::Home, &app);
        assert_eq!(input.cursor(), 0);

        input.handle_key(KeyInput::End, &app);
        assert_eq!(input.cursor(), 3);

        input.handle_key(KeyInput::Left, &app);
        assert_eq!(input.cursor(), 2);

        input.handle_key(KeyInput::Right, &app);
        input.handle_key(KeyInput::Right, &app);
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn enter_sends_to_open_conversation() {
        let mut input = InputState::new();
        let mut app = app();
        app.handle(AppEvent::SelectConversation { contact_id: 3 });
        type_str(&mut input, &app, "hola");

        let events = input.handle_key(KeyInput::Enter, &app);

        assert_eq!(events, vec![AppEvent::SendMessage { contact_id: 3, text: "hola".to_string() }]);
        assert!(input.buffer().is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn enter_without_conversation_reports_error() {
        let mut input = InputState::new();
        let app = app();
        type_str(&mut input, &app, "hola");

        let events = input.handle_key(KeyInput::Enter, &app);

        assert!(matches!(events.as_slice(), [AppEvent::Error { .. }]));
    }

    #[test]
    fn blank_enter_does_nothing() {
        let mut input = InputState::new();
        let app = app();
        type_str(&mut input, &app, "   ");

        assert!(input.handle_key(KeyInput::Enter, &app).is_empty());
    }

    #[test]
    fn commands_translate_to_events() {
        let mut input = InputState::new();
        let app = app();

        type_str(&mut input, &app, "/sort unread");
        assert_eq!(input.handle_key(KeyInput::Enter, &app), vec![AppEvent::SetSort(
            SortMode::Unread
        )]);

        type_str(&mut input, &app, "/fav 2");
        assert_eq!(input.handle_key(KeyInput::Enter, &app), vec![AppEvent::ToggleFavorite {
            contact_id: 2
        }]);

        type_str(&mut input, &app, "/go /settings");
        assert_eq!(input.handle_key(KeyInput::Enter, &app), vec![AppEvent::Navigate {
            path: "/settings".to_string()
        }]);

        type_str(&mut input, &app, "/bogus");
        assert_eq!(input.handle_key(KeyInput::Enter, &app), vec![AppEvent::Error {
            message: "Unknown command: /bogus".to_string()
        }]);
    }

    #[test]
    fn tab_cycles_sort_mode() {
        let mut input = InputState::new();
        let app = app();

        assert_eq!(input.handle_key(KeyInput::Tab, &app), vec![AppEvent::SetSort(
            SortMode::Recent
        )]);
    }

    #[test]
    fn arrows_walk_the_visible_list() {
        let mut input = InputState::new();
        let mut app = app();

        let down = input.handle_key(KeyInput::Down, &app);
        assert_eq!(down, vec![AppEvent::SelectConversation { contact_id: 1 }]);
        for event in down {
            app.handle(event);
        }

        // Andrea is first by name, so Up wraps to Valentina.
        assert_eq!(input.handle_key(KeyInput::Up, &app), vec![AppEvent::SelectConversation {
            contact_id: 7
        }]);
        assert_eq!(input.handle_key(KeyInput::Down, &app), vec![AppEvent::SelectConversation {
            contact_id: 2
        }]);
    }

    #[test]
    fn arrows_do_nothing_for_empty_list() {
        let mut input = InputState::new();
        let mut app = app();
        app.handle(AppEvent::SetSearch("zzz".to_string()));

        assert!(input.handle_key(KeyInput::Down, &app).is_empty());
    }

    #[test]
    fn esc_quits() {
        let mut input = InputState::new();
        let app = app();

        assert_eq!(input.handle_key(KeyInput::Esc, &app), vec![AppEvent::Shutdown]);
    }
}
