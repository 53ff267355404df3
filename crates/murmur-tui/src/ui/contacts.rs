//! Contact sidebar
//!
//! Displays the filtered, sorted contact list with unread counts,
//! favorites and typing indicators.

use murmur_app::{App, search};
use murmur_core::Environment;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use super::Theme;

const ACTIVE_PREFIX: &str = ">";
const INACTIVE_PREFIX: &str = " ";
const FAVORITE_MARKER: &str = "*";
const TYPING_MARKER: &str = " ...";

/// Render the contact sidebar.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>, theme: Theme, area: Rect) {
    let title = if app.search().is_empty() {
        format!(" Contacts ({}) ", app.sort_mode())
    } else {
        format!(" Contacts ({}) /{}/ ", app.sort_mode(), app.search())
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let rows = app.contact_list();
    let items: Vec<ListItem> = if rows.is_empty() {
        vec![ListItem::new(Span::styled("No contacts found", Style::default().fg(theme.muted)))]
    } else {
        rows.iter()
            .map(|row| {
                let active = app.selected() == Some(row.contact.id);
                let name_style = if active {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else if row.unread > 0 {
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.fg)
                };

                let mut spans = vec![
                    Span::raw(if active { ACTIVE_PREFIX } else { INACTIVE_PREFIX }),
                    Span::styled(
                        format!("{:<2} ", search::initials(&row.contact.name)),
                        Style::default().fg(theme.muted),
                    ),
                    Span::styled(row.contact.name.clone(), name_style),
                ];
                if row.favorite {
                    spans.push(Span::styled(FAVORITE_MARKER, Style::default().fg(Color::Yellow)));
                }
                if row.unread > 0 {
                    spans.push(Span::styled(
                        format!(" ({})", row.unread),
                        Style::default().fg(Color::Red),
                    ));
                }
                if row.typing {
                    spans.push(Span::styled(TYPING_MARKER, Style::default().fg(theme.muted)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect()
    };

    frame.render_widget(List::new(items).block(block), area);
}
