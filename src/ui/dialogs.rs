//! Modal dialogs drawn over the landing screen.

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::domain::{
    auth_flow::{AuthFlow, AuthStep},
    booking_flow::{earliest_date, BookingField, BookingFlow, BookingPhase},
    consultation_list_state::{ConsultationListState, ConsultationListUiState},
    contact::ContactMethod,
    locale::{Locale, Text},
    remote::Consultation,
};

use super::{field::render_field, styles};

const DIALOG_WIDTH: u16 = 64;

pub fn render_auth_dialog(
    frame: &mut Frame<'_>,
    auth: &AuthFlow,
    locale: Locale,
    reveal_issued_code: bool,
) {
    let inner = open_dialog(frame, locale.text(Text::AuthTitle), 14);
    let [header_area, field_area, status_area, hint_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(inner);

    match auth.step() {
        AuthStep::Input { method } => {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(locale.text(Text::AuthPromptInput)),
                    Line::default(),
                    method_tabs_line(*method, locale),
                ])
                .wrap(Wrap { trim: true }),
                header_area,
            );
            let (input, placeholder) = match method {
                ContactMethod::Email => (auth.email(), "name@example.com"),
                ContactMethod::Phone => (auth.phone(), "+7 (999) 123-45-67"),
            };
            render_field(frame, field_area, method_label(*method, locale), input, placeholder, true);
        }
        AuthStep::Verify { code, .. } => {
            frame.render_widget(
                Paragraph::new(verify_header_lines(auth, locale, reveal_issued_code))
                    .wrap(Wrap { trim: true }),
                header_area,
            );
            render_field(
                frame,
                field_area,
                locale.text(Text::FieldCode),
                code,
                "______",
                true,
            );
        }
    }

    let progress_key = if auth.is_verifying() {
        Text::Verifying
    } else {
        Text::Sending
    };
    let progress = auth.is_busy().then(|| locale.text(progress_key));
    frame.render_widget(
        Paragraph::new(status_line(auth.error().map(|e| e.message(locale)), progress))
            .wrap(Wrap { trim: true }),
        status_area,
    );

    let hints = if auth.is_verifying() {
        Text::AuthHintsVerify
    } else {
        Text::AuthHintsInput
    };
    frame.render_widget(
        Paragraph::new(Span::styled(locale.text(hints), styles::muted_style())),
        hint_area,
    );
}

fn method_label(method: ContactMethod, locale: Locale) -> &'static str {
    match method {
        ContactMethod::Email => locale.text(Text::FieldEmail),
        ContactMethod::Phone => locale.text(Text::FieldPhone),
    }
}

fn method_tabs_line(active: ContactMethod, locale: Locale) -> Line<'static> {
    let tab = |method: ContactMethod| {
        let style = if method == active {
            styles::active_tab_style()
        } else {
            styles::inactive_tab_style()
        };
        Span::styled(format!(" {} ", method_label(method, locale)), style)
    };

    Line::from(vec![tab(ContactMethod::Email), Span::raw(" "), tab(ContactMethod::Phone)])
}

fn verify_header_lines(auth: &AuthFlow, locale: Locale, reveal_issued_code: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(locale.text(Text::AuthPromptVerify))];

    if let Some(contact) = auth.verifying_contact() {
        lines.push(Line::from(Span::styled(
            format!("{} {}", locale.text(Text::CodeSentTo), contact.value),
            styles::muted_style(),
        )));
    }

    if reveal_issued_code {
        if let Some(code) = auth.issued_code() {
            lines.push(Line::from(Span::styled(
                format!("{} {code}", locale.text(Text::DemoCode)),
                styles::demo_code_style(),
            )));
        }
    }

    lines
}

pub fn render_booking_dialog(
    frame: &mut Frame<'_>,
    booking: &BookingFlow,
    locale: Locale,
    today: NaiveDate,
) {
    let inner = open_dialog(frame, locale.text(Text::BookingTitle), 19);

    if let BookingPhase::Succeeded { confirmation, .. } = booking.phase() {
        frame.render_widget(
            Paragraph::new(booking_success_lines(confirmation.as_ref(), locale))
                .wrap(Wrap { trim: true }),
            inner,
        );
        return;
    }

    let [prompt_area, date_area, time_area, description_area, status_area, hint_area] =
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .areas(inner);

    frame.render_widget(
        Paragraph::new(vec![
            Line::from(locale.text(Text::BookingPrompt)),
            Line::from(Span::styled(
                format!("{} {}", locale.text(Text::EarliestDate), earliest_date(today)),
                styles::muted_style(),
            )),
        ])
        .wrap(Wrap { trim: true }),
        prompt_area,
    );

    let focus = booking.focus();
    render_field(
        frame,
        date_area,
        locale.text(Text::FieldDate),
        booking.date(),
        "YYYY-MM-DD",
        focus == BookingField::Date,
    );
    render_field(
        frame,
        time_area,
        locale.text(Text::FieldTime),
        booking.time(),
        "HH:MM",
        focus == BookingField::Time,
    );
    render_field(
        frame,
        description_area,
        locale.text(Text::FieldDescription),
        booking.description(),
        "",
        focus == BookingField::Description,
    );

    frame.render_widget(
        Paragraph::new(status_line(
            booking.error().map(|e| e.message(locale)),
            booking.is_busy().then(|| locale.text(Text::Sending)),
        ))
        .wrap(Wrap { trim: true }),
        status_area,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            locale.text(Text::BookingHints),
            styles::muted_style(),
        )),
        hint_area,
    );
}

fn booking_success_lines(confirmation: Option<&Consultation>, locale: Locale) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            locale.text(Text::BookingCreated),
            styles::success_style(),
        )),
        Line::from(locale.text(Text::BookingFollowUp)),
    ];

    if let Some(consultation) = confirmation {
        lines.push(Line::default());
        lines.push(consultation_line(consultation, usize::MAX));
    }

    lines
}

pub fn render_consultations_dialog(
    frame: &mut Frame<'_>,
    consultations: &ConsultationListState,
    locale: Locale,
) {
    let inner = open_dialog(frame, locale.text(Text::ConsultationsTitle), 16);
    let [list_area, hint_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .areas(inner);

    match consultations.ui_state() {
        ConsultationListUiState::Loading => {
            frame.render_widget(Paragraph::new(locale.text(Text::Loading)), list_area)
        }
        ConsultationListUiState::Empty => frame.render_widget(
            Paragraph::new(locale.text(Text::ConsultationsEmpty)),
            list_area,
        ),
        ConsultationListUiState::Error(error) => frame.render_widget(
            Paragraph::new(Span::styled(error.message(locale), styles::error_style()))
                .wrap(Wrap { trim: true }),
            list_area,
        ),
        ConsultationListUiState::Ready => {
            let width = list_area.width as usize;
            let items: Vec<ListItem<'static>> = consultations
                .consultations()
                .iter()
                .map(|consultation| ListItem::new(consultation_line(consultation, width)))
                .collect();

            let mut list_state = ListState::default();
            list_state.select(consultations.selected_index());
            frame.render_stateful_widget(
                List::new(items).highlight_style(styles::list_highlight_style()),
                list_area,
                &mut list_state,
            );
        }
    }

    frame.render_widget(
        Paragraph::new(Span::styled(
            locale.text(Text::ConsultationsHints),
            styles::muted_style(),
        )),
        hint_area,
    );
}

/// `2024-06-01 14:00 [pending] description`, with the description cut to fit.
fn consultation_line(consultation: &Consultation, width: usize) -> Line<'static> {
    let time: String = consultation.time.chars().take(5).collect();
    let mut spans = vec![Span::raw(format!("{} {}", consultation.date, time))];
    let mut used = consultation.date.width() + 1 + time.width();

    if !consultation.status.is_empty() {
        let status = format!(" [{}]", consultation.status);
        used += status.width();
        spans.push(Span::styled(status, styles::consultation_status_style()));
    }

    if !consultation.description.is_empty() {
        let room = width.saturating_sub(used + 1);
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            truncate_to_width(&consultation.description, room),
            styles::muted_style(),
        ));
    }

    Line::from(spans)
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_owned();
    }

    let mut out = String::new();
    let budget = max_width.saturating_sub(3);
    for ch in text.chars() {
        let mut candidate = out.clone();
        candidate.push(ch);
        if candidate.width() > budget {
            break;
        }
        out = candidate;
    }
    out.push_str("...");
    out
}

fn status_line(error: Option<String>, progress: Option<&'static str>) -> Line<'static> {
    match (error, progress) {
        (_, Some(progress)) => Line::from(Span::styled(progress, styles::muted_style())),
        (Some(error), None) => Line::from(Span::styled(error, styles::error_style())),
        (None, None) => Line::default(),
    }
}

/// Clears a centered box, draws its frame and returns the inner area.
fn open_dialog(frame: &mut Frame<'_>, title: &str, height: u16) -> Rect {
    let area = centered_rect(frame.area(), DIALOG_WIDTH, height);
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(styles::dialog_border_style());
    let inner = block.inner(area);

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    inner
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
