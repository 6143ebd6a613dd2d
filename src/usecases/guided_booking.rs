//! Line-oriented booking and consultation listing for `consult book` and
//! `consult bookings`.

use std::{io, time::Instant};

use chrono::NaiveDate;

use crate::domain::{
    booking_flow::{earliest_date, BookingField, BookingFlow, BookingPhase, SubmitOutcome},
    consultation_list_state::{ConsultationListState, ConsultationListUiState},
    dialog_error::{DialogError, ValidationError},
    identity::IdentitySession,
    locale::{Locale, Text},
    remote::Consultation,
    shell_state::ShellSettings,
};

use super::{
    guided_auth::{report_cancelled, with_attempts_left, AuthTerminal, RetryPolicy},
    remote::ConsultationBackend,
};

/// Booking fields given on the command line; missing ones are prompted for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    pub date: Option<String>,
    pub time: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuidedBookingOutcome {
    Booked(Option<Consultation>),
    NeedsAuth,
    Abandoned,
}

pub fn run_guided_booking(
    terminal: &mut dyn AuthTerminal,
    backend: &dyn ConsultationBackend,
    session: &IdentitySession,
    mut draft: BookingDraft,
    settings: &ShellSettings,
    retry_policy: &RetryPolicy,
    today: NaiveDate,
) -> io::Result<GuidedBookingOutcome> {
    let locale = settings.locale;
    let mut flow = BookingFlow::new(settings.success_delay);

    terminal.print_line(locale.text(Text::BookingTitle))?;
    terminal.print_line(&format!(
        "{} {}",
        locale.text(Text::EarliestDate),
        earliest_date(today)
    ))?;

    for attempt in 1..=retry_policy.booking_attempts {
        let Some(description) = field_value(
            terminal,
            locale,
            draft.description.take(),
            Text::DescriptionPrompt,
        )?
        else {
            return Ok(GuidedBookingOutcome::Abandoned);
        };
        let Some(date) = field_value(terminal, locale, draft.date.take(), Text::DatePrompt)? else {
            return Ok(GuidedBookingOutcome::Abandoned);
        };
        let Some(time) = field_value(terminal, locale, draft.time.take(), Text::TimePrompt)? else {
            return Ok(GuidedBookingOutcome::Abandoned);
        };
        flow.set_field(BookingField::Description, &description);
        flow.set_field(BookingField::Date, &date);
        flow.set_field(BookingField::Time, &time);

        let now = Instant::now();
        match flow.submit(session, now, today) {
            SubmitOutcome::NeedsAuth => {
                terminal.print_line(locale.text(Text::BookingNeedsAuth))?;
                return Ok(GuidedBookingOutcome::NeedsAuth);
            }
            SubmitOutcome::Dispatch(command) => {
                terminal.print_line(locale.text(Text::Sending))?;
                let result = backend.create_booking(&command.token, &command.request);
                flow.apply_booked(command.ticket, result, now);
            }
            SubmitOutcome::Blocked => {}
        }

        if let BookingPhase::Succeeded { confirmation, .. } = flow.phase() {
            terminal.print_line(locale.text(Text::BookingCreated))?;
            terminal.print_line(locale.text(Text::BookingFollowUp))?;
            if let Some(consultation) = confirmation {
                terminal.print_line(&format_consultation(consultation))?;
            }
            return Ok(GuidedBookingOutcome::Booked(confirmation.clone()));
        }

        // Only an oversized description is asked for again.
        if flow.error() != Some(&DialogError::Validation(ValidationError::DescriptionTooLong)) {
            draft.description = Some(description);
        }

        let attempts_left = retry_policy.booking_attempts.saturating_sub(attempt);
        let message = flow
            .error()
            .map(|error| format!("{}: {}", error.code(), error.message(locale)))
            .unwrap_or_else(|| locale.text(Text::BookingFieldsRequired).to_owned());
        terminal.print_line(&with_attempts_left(&message, locale, attempts_left))?;
    }

    Ok(GuidedBookingOutcome::Abandoned)
}

fn field_value(
    terminal: &mut dyn AuthTerminal,
    locale: Locale,
    given: Option<String>,
    prompt: Text,
) -> io::Result<Option<String>> {
    if let Some(value) = given {
        return Ok(Some(value));
    }

    let value = terminal.prompt_line(locale.text(prompt))?;
    if value.is_none() {
        report_cancelled(terminal, locale)?;
    }
    Ok(value)
}

/// Fetches and prints the signed-in user's consultations. Returns `false`
/// when the list could not be loaded.
pub fn print_consultations(
    terminal: &mut dyn AuthTerminal,
    backend: &dyn ConsultationBackend,
    session: &IdentitySession,
    locale: Locale,
) -> io::Result<bool> {
    let Some(token) = session.live_token(Instant::now()) else {
        terminal.print_line(locale.text(Text::SignedOut))?;
        return Ok(false);
    };

    let mut list = ConsultationListState::default();
    let ticket = list.begin_loading();
    terminal.print_line(locale.text(Text::Loading))?;
    list.apply_listed(ticket, backend.list_consultations(token));

    terminal.print_line(locale.text(Text::ConsultationsTitle))?;
    match list.ui_state() {
        ConsultationListUiState::Ready => {
            for consultation in list.consultations() {
                terminal.print_line(&format_consultation(consultation))?;
            }
            Ok(true)
        }
        ConsultationListUiState::Empty => {
            terminal.print_line(locale.text(Text::ConsultationsEmpty))?;
            Ok(true)
        }
        ConsultationListUiState::Error(error) => {
            terminal.print_line(&format!("{}: {}", error.code(), error.message(locale)))?;
            Ok(false)
        }
        ConsultationListUiState::Loading => Ok(false),
    }
}

/// One-line summary: `#7 2024-06-01 14:00 [pending] description`.
pub fn format_consultation(consultation: &Consultation) -> String {
    let time: String = consultation.time.chars().take(5).collect();
    let mut line = format!("#{} {} {}", consultation.id, consultation.date, time);

    if !consultation.status.is_empty() {
        line.push_str(&format!(" [{}]", consultation.status));
    }
    if !consultation.description.is_empty() {
        line.push(' ');
        line.push_str(&consultation.description);
    }

    line
}
