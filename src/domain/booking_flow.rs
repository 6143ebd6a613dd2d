//! Consultation booking form: date, time and an optional description.
//!
//! Submitting requires a live identity token; without one the caller is
//! told to start sign-in and no request is built. A successful booking
//! shows a confirmation for `success_delay`, after which `tick` reports the
//! dialog closed and all fields are cleared.

use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveTime};

use super::{
    auth_flow::map_backend_error,
    dialog_error::{DialogError, NetworkFailure, ValidationError},
    identity::{IdentitySession, IdentityToken},
    remote::{
        BackendError, BookingRequest, Consultation, ReplyOutcome, RequestTicket, TicketCounter,
    },
    text_input_state::TextInputState,
};

pub const DEFAULT_SUCCESS_DELAY: Duration = Duration::from_secs(2);

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";
const DATE_LENGTH: usize = 10;
const TIME_LENGTH: usize = 5;
const DESCRIPTION_MAX_LENGTH: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingField {
    #[default]
    Date,
    Time,
    Description,
}

impl BookingField {
    pub fn next(self) -> Self {
        match self {
            Self::Date => Self::Time,
            Self::Time => Self::Description,
            Self::Description => Self::Date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingPhase {
    Editing,
    Succeeded {
        close_at: Instant,
        confirmation: Option<Consultation>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBookingCommand {
    pub ticket: RequestTicket,
    pub token: IdentityToken,
    pub request: BookingRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No live identity token: close this dialog and start sign-in.
    NeedsAuth,
    /// Submit is disabled or the form failed validation.
    Blocked,
    Dispatch(CreateBookingCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Closed,
}

#[derive(Debug, Clone)]
pub struct BookingFlow {
    success_delay: Duration,
    date: TextInputState,
    time: TextInputState,
    description: TextInputState,
    focus: BookingField,
    phase: BookingPhase,
    pending: Option<RequestTicket>,
    tickets: TicketCounter,
    error: Option<DialogError>,
}

impl Default for BookingFlow {
    fn default() -> Self {
        Self::new(DEFAULT_SUCCESS_DELAY)
    }
}

impl BookingFlow {
    pub fn new(success_delay: Duration) -> Self {
        Self {
            success_delay,
            date: TextInputState::with_max_length(DATE_LENGTH),
            time: TextInputState::with_max_length(TIME_LENGTH),
            description: TextInputState::with_max_length(DESCRIPTION_MAX_LENGTH),
            focus: BookingField::default(),
            phase: BookingPhase::Editing,
            pending: None,
            tickets: TicketCounter::default(),
            error: None,
        }
    }

    pub fn date(&self) -> &TextInputState {
        &self.date
    }

    pub fn time(&self) -> &TextInputState {
        &self.time
    }

    pub fn description(&self) -> &TextInputState {
        &self.description
    }

    pub fn focus(&self) -> BookingField {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focused_input_mut(&mut self) -> Option<&mut TextInputState> {
        if self.is_succeeded() {
            return None;
        }

        Some(match self.focus {
            BookingField::Date => &mut self.date,
            BookingField::Time => &mut self.time,
            BookingField::Description => &mut self.description,
        })
    }

    pub fn set_field(&mut self, field: BookingField, value: &str) {
        match field {
            BookingField::Date => self.date.set_text(value),
            BookingField::Time => self.time.set_text(value),
            BookingField::Description => self.description.set_text(value),
        }
    }

    pub fn phase(&self) -> &BookingPhase {
        &self.phase
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self.phase, BookingPhase::Succeeded { .. })
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&DialogError> {
        self.error.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_busy() && !self.is_succeeded() && !self.date.is_empty() && !self.time.is_empty()
    }

    pub fn submit(
        &mut self,
        session: &IdentitySession,
        now: Instant,
        today: NaiveDate,
    ) -> SubmitOutcome {
        if !self.can_submit() {
            return SubmitOutcome::Blocked;
        }

        let Some(token) = session.live_token(now) else {
            tracing::info!(code = "BOOKING_AUTH_REQUIRED", "booking requires sign-in");
            return SubmitOutcome::NeedsAuth;
        };

        let request = match self.validated_request(today) {
            Ok(request) => request,
            Err(error) => {
                self.error = Some(DialogError::Validation(error));
                return SubmitOutcome::Blocked;
            }
        };

        let ticket = self.tickets.issue();
        self.pending = Some(ticket);
        self.error = None;

        tracing::debug!(ticket = ticket.id(), date = %request.date, "booking submitted");

        SubmitOutcome::Dispatch(CreateBookingCommand {
            ticket,
            token: token.clone(),
            request,
        })
    }

    fn validated_request(&self, today: NaiveDate) -> Result<BookingRequest, ValidationError> {
        let date = parse_date(self.date.text()).ok_or(ValidationError::InvalidDate)?;
        if date < earliest_date(today) {
            return Err(ValidationError::PastDate);
        }
        let time = parse_time(self.time.text()).ok_or(ValidationError::InvalidTime)?;
        if self.description.exceeds_max_length() {
            return Err(ValidationError::DescriptionTooLong);
        }

        Ok(BookingRequest {
            date: date.format(DATE_FORMAT).to_string(),
            time: time.format(TIME_FORMAT).to_string(),
            description: self.description.text().to_owned(),
        })
    }

    pub fn apply_booked(
        &mut self,
        ticket: RequestTicket,
        result: Result<Option<Consultation>, BackendError>,
        now: Instant,
    ) -> ReplyOutcome {
        if self.pending != Some(ticket) {
            tracing::debug!(ticket = ticket.id(), "discarding stale booking reply");
            return ReplyOutcome::Stale;
        }
        self.pending = None;

        match result {
            Ok(confirmation) => {
                tracing::info!(code = "BOOKING_CREATED", "consultation booked");
                self.phase = BookingPhase::Succeeded {
                    close_at: now + self.success_delay,
                    confirmation,
                };
                self.error = None;
            }
            Err(error) => {
                self.error = Some(map_backend_error(error, NetworkFailure::CreateBooking));
            }
        }

        ReplyOutcome::Applied
    }

    /// Advances the success timer. `Closed` means the dialog should close;
    /// the form is already cleared.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        match self.phase {
            BookingPhase::Succeeded { close_at, .. } if now >= close_at => {
                self.reset();
                TickOutcome::Closed
            }
            _ => TickOutcome::Idle,
        }
    }

    pub fn reset(&mut self) {
        self.date.clear();
        self.time.clear();
        self.description.clear();
        self.focus = BookingField::default();
        self.phase = BookingPhase::Editing;
        self.pending = None;
        self.error = None;
    }
}

/// First date the form accepts: the current calendar day.
pub fn earliest_date(today: NaiveDate) -> NaiveDate {
    today
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    (raw.chars().count() == DATE_LENGTH)
        .then(|| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok())
        .flatten()
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    (raw.chars().count() == TIME_LENGTH)
        .then(|| NaiveTime::parse_from_str(raw, TIME_FORMAT).ok())
        .flatten()
}
