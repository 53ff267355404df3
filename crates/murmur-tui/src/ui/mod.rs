//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod chat;
mod contacts;
mod input;
mod status;

use murmur_app::{App, NotificationKind};
use murmur_core::Environment;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Block,
};

use crate::input::InputState;

/// Colors for the light and dark themes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Theme {
    pub fg: Color,
    pub bg: Color,
    pub accent: Color,
    pub muted: Color,
}

impl Theme {
    const DARK: Theme =
        Theme { fg: Color::White, bg: Color::Black, accent: Color::Cyan, muted: Color::DarkGray };
    const LIGHT: Theme =
        Theme { fg: Color::Black, bg: Color::White, accent: Color::Blue, muted: Color::Gray };

    pub fn for_app<E: Environment>(app: &App<E>) -> Self {
        if app.dark_mode() { Self::DARK } else { Self::LIGHT }
    }

    pub fn base(self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn notification(self, kind: NotificationKind) -> Color {
        match kind {
            NotificationKind::Success => Color::Green,
            NotificationKind::Error => Color::Red,
            NotificationKind::Info => self.accent,
            NotificationKind::Warning => Color::Yellow,
        }
    }
}

/// Render the entire UI.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>, input: &InputState) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let theme = Theme::for_app(app);
    frame.render_widget(Block::default().style(theme.base()), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, app, theme, *main_area);
    input::render(frame, app, input, theme, *input_area);
    status::render(frame, app, theme, *status_area);
}

/// Render the main area (contact sidebar + conversation).
fn render_main_area<E: Environment>(frame: &mut Frame, app: &App<E>, theme: Theme, area: Rect) {
    const CONTACT_SIDEBAR_WIDTH: u16 = 30;
    const CHAT_AREA_MIN_WIDTH: u16 = 20;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(CONTACT_SIDEBAR_WIDTH),
            Constraint::Min(CHAT_AREA_MIN_WIDTH),
        ])
        .split(area);

    let [contacts_area, chat_area] = chunks.as_ref() else {
        return;
    };

    contacts::render(frame, app, theme, *contacts_area);
    chat::render(frame, app, theme, *chat_area);
}
