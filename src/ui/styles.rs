//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// Landing screen styles
// =============================================================================

/// Firm name in the header.
pub fn brand_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Tagline badge above the pitch.
pub fn accent_style() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Secondary copy and key hints (dimmed).
pub fn muted_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Key names inside hints, e.g. `b`.
pub fn key_hint_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

// =============================================================================
// Dialog styles
// =============================================================================

pub fn dialog_border_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn active_field_border_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn inactive_field_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Selected contact-method tab.
pub fn active_tab_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn inactive_tab_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn input_prompt_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn input_placeholder_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Inline dialog errors.
pub fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

pub fn success_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

/// Code echoed by a demonstration endpoint.
pub fn demo_code_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

// =============================================================================
// Consultation list styles
// =============================================================================

pub fn list_highlight_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
}

pub fn consultation_status_style() -> Style {
    Style::default().fg(Color::Green)
}
