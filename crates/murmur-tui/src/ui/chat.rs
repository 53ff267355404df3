//! Conversation area
//!
//! Displays the open conversation with delivery ticks, or the placeholder
//! screens.

use murmur_app::{App, DeliveryPhase, Route, Sender};
use murmur_core::Environment;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::Theme;

const BORDER_SIZE: u16 = 2;

/// Render the conversation area.
pub fn render<E: Environment>(frame: &mut Frame, app: &App<E>, theme: Theme, area: Rect) {
    match app.route() {
        Route::Settings => render_settings(frame, app, theme, area),
        Route::Contacts => render_placeholder(frame, " Contacts ", theme, area),
        Route::Home | Route::Chat(_) => render_conversation(frame, app, theme, area),
    }
}

fn render_conversation<E: Environment>(
    frame: &mut Frame,
    app: &App<E>,
    theme: Theme,
    area: Rect,
) {
    let Some(contact) = app.selected_contact() else {
        let block = Block::default().borders(Borders::ALL).title(" No conversation ");
        let hint = Paragraph::new("Select a contact with Up/Down, or /go /chat/<id>")
            .style(Style::default().fg(theme.muted))
            .block(block);
        frame.render_widget(hint, area);
        return;
    };

    let title = if app.is_typing(contact.id) {
        format!(" {} is typing... ", contact.name)
    } else {
        format!(" {} ", contact.name)
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let sender_style = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
    let items: Vec<ListItem> = app
        .conversation(contact.id)
        .iter()
        .map(|msg| {
            let (who, marker) = match msg.sender {
                Sender::Sent => {
                    let phase = app.status(contact.id, msg.id).map(|s| s.phase());
                    (app.settings().display_name.as_str(), ticks(phase))
                },
                Sender::Received => (contact.name.as_str(), ""),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("[{}] ", msg.timestamp), Style::default().fg(theme.muted)),
                Span::styled(format!("<{who}>"), sender_style),
                Span::raw(" "),
                Span::raw(msg.text.clone()),
                Span::styled(marker, Style::default().fg(theme.muted)),
            ]))
        })
        .collect();

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

fn ticks(phase: Option<DeliveryPhase>) -> &'static str {
    match phase {
        None | Some(DeliveryPhase::Pending) => " ·",
        Some(DeliveryPhase::Delivered) => " ✓",
        Some(DeliveryPhase::Read) => " ✓✓",
    }
}

fn render_settings<E: Environment>(frame: &mut Frame, app: &App<E>, theme: Theme, area: Rect) {
    let settings = app.settings();
    let on_off = |flag: bool| if flag { "on" } else { "off" };
    let lines = vec![
        Line::from(format!("Display name:    {}", settings.display_name)),
        Line::from(format!("Notifications:   {}", on_off(settings.notifications))),
        Line::from(format!("Simulate typing: {}", on_off(settings.simulate_typing))),
        Line::from(format!("Dark mode:       {}", on_off(app.dark_mode()))),
    ];
    let block = Block::default().borders(Borders::ALL).title(" Settings ");
    frame.render_widget(Paragraph::new(lines).style(theme.base()).block(block), area);
}

fn render_placeholder(frame: &mut Frame, title: &str, theme: Theme, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let body = Paragraph::new("Nothing here yet. /go / to return.")
        .style(Style::default().fg(theme.muted))
        .block(block);
    frame.render_widget(body, area);
}
