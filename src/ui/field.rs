//! Single-line form field rendering.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::domain::text_input_state::TextInputState;

use super::styles;

/// Prompt symbol shown before the input text.
const PROMPT_SYMBOL: &str = "> ";

/// Renders a bordered field titled `label`. The terminal cursor is placed in
/// the focused field.
pub fn render_field(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    input: &TextInputState,
    placeholder: &str,
    is_focused: bool,
) {
    let border_style = if is_focused {
        styles::active_field_border_style()
    } else {
        styles::inactive_field_border_style()
    };

    let paragraph = Paragraph::new(build_field_line(input, placeholder)).block(
        Block::default()
            .title(label.to_owned())
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);

    if is_focused {
        let offset = cursor_offset(input).min(u16::MAX as usize) as u16;
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(PROMPT_SYMBOL.len() as u16)
            .saturating_add(offset);
        let cursor_y = area.y.saturating_add(1);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

pub(super) fn build_field_line(input: &TextInputState, placeholder: &str) -> Line<'static> {
    let prompt = Span::styled(PROMPT_SYMBOL.to_owned(), styles::input_prompt_style());

    if input.is_empty() {
        Line::from(vec![
            prompt,
            Span::styled(placeholder.to_owned(), styles::input_placeholder_style()),
        ])
    } else {
        Line::from(vec![
            prompt,
            Span::styled(input.text().to_owned(), styles::input_text_style()),
        ])
    }
}

/// Display columns between the start of the text and the cursor.
fn cursor_offset(input: &TextInputState) -> usize {
    let before: String = input.text().chars().take(input.cursor_position()).collect();
    before.width()
}
