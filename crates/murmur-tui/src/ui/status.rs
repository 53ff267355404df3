//! Status bar
//!
//! Displays connectivity, loading state and the latest notification.

use murmur_app::App;
use murmur_core::Environment;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Theme;

/// Render the status bar.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>, theme: Theme, area: Rect) {
    let state = app.state();
    let connectivity = if state.online {
        Span::styled("Online", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("Offline", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    };

    let mut spans = vec![Span::raw(" "), connectivity];
    if state.loading {
        spans.push(Span::styled(" | Loading...", Style::default().fg(Color::Yellow)));
    }

    if let Some(latest) = state.notifications.latest() {
        let more = state.notifications.len().saturating_sub(1);
        let suffix = if more > 0 { format!(" (+{more})") } else { String::new() };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("{}: {}{suffix}", latest.title, latest.message),
            Style::default().fg(theme.notification(latest.kind)),
        ));
    } else {
        spans.push(Span::styled(
            " | Tab: sort  Up/Down: select  Esc: quit",
            Style::default().fg(theme.muted),
        ));
    }

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.muted).fg(theme.fg));

    frame.render_widget(paragraph, area);
}
