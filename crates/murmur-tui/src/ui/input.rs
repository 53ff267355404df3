//! Input line
//!
//! Displays the draft buffer with cursor.

use murmur_app::App;
use murmur_core::Environment;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
};

use super::Theme;
use crate::input::InputState;

const PROMPT_WIDTH: u16 = 3; // "> "
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the input line.
pub fn render<E: Environment>(
    frame: &mut Frame,
    app: &App<E>,
    input: &InputState,
    theme: Theme,
    area: Rect,
) {
    let title = app
        .selected_contact()
        .map_or_else(|| " Command ".to_string(), |c| format!(" Message {} ", c.name));
    let block = Block::default().borders(Borders::ALL).title(title);

    let input_text = format!("> {}", input.buffer());
    let paragraph = Paragraph::new(input_text).style(Style::default().fg(theme.fg)).block(block);

    frame.render_widget(paragraph, area);

    let available_width = area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING);
    let cursor_offset = (input.cursor() as u16).min(available_width);

    let cursor_x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);
    let cursor_x = cursor_x.min(max_x);

    frame.set_cursor_position((cursor_x, cursor_y));
}
