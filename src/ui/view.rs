use std::time::Instant;

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::{
    locale::Text,
    shell_state::{Overlay, ShellState},
};

use super::{dialogs, styles};

const BRAND: &str = "TechVision";

/// Landing actions as `(key, label)`.
const LANDING_ACTIONS: [(&str, Text); 5] = [
    ("l", Text::ActionSignIn),
    ("b", Text::ActionBook),
    ("m", Text::ActionConsultations),
    ("o", Text::ActionSignOut),
    ("q", Text::ActionQuit),
];

pub fn render(frame: &mut Frame<'_>, state: &ShellState, now: Instant, today: NaiveDate) {
    let [content_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .areas(frame.area());

    render_landing(frame, content_area, state);
    frame.render_widget(Paragraph::new(status_line(state, now)), status_area);

    let locale = state.locale();
    match state.overlay() {
        Some(Overlay::Auth) => {
            dialogs::render_auth_dialog(frame, state.auth(), locale, state.reveal_issued_code())
        }
        Some(Overlay::Booking) => {
            dialogs::render_booking_dialog(frame, state.booking(), locale, today)
        }
        Some(Overlay::Consultations) => {
            dialogs::render_consultations_dialog(frame, state.consultations(), locale)
        }
        None => {}
    }
}

fn render_landing(frame: &mut Frame<'_>, area: Rect, state: &ShellState) {
    let locale = state.locale();
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(BRAND, styles::brand_style())),
        Line::default(),
        Line::from(Span::styled(
            locale.text(Text::LandingTagline),
            styles::accent_style(),
        )),
        Line::from(locale.text(Text::LandingPitch)),
        Line::default(),
    ];
    lines.extend(LANDING_ACTIONS.iter().map(|(key, label)| {
        Line::from(vec![
            Span::styled(format!("  {key}  "), styles::key_hint_style()),
            Span::styled(locale.text(*label), styles::muted_style()),
        ])
    }));

    let landing = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(landing, area);
}

fn status_line(state: &ShellState, now: Instant) -> String {
    let locale = state.locale();
    let identity = if state.is_signed_in(now) {
        locale.text(Text::SignedIn)
    } else {
        locale.text(Text::SignedOut)
    };
    let hint = match state.overlay() {
        None => "l: sign in | b: book | m: my consultations | o: sign out | q: quit",
        Some(Overlay::Auth) => "Enter: submit | Esc: close",
        Some(Overlay::Booking) => "Tab: next field | Enter: book | Esc: close",
        Some(Overlay::Consultations) => "j/k: navigate | Esc: close",
    };

    format!("{identity} | {hint}")
}
