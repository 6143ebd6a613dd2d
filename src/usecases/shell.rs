use std::time::Instant;

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::{
    auth_flow::VerifyOutcome,
    booking_flow::{SubmitOutcome, TickOutcome},
    events::{AppEvent, KeyInput, RemoteReply},
    shell_state::{Overlay, ShellSettings, ShellState},
};

use super::{
    contracts::{Clock, RemoteDispatcher, ShellOrchestrator},
    remote::RemoteRequest,
};

/// Wall clock: monotonic instants plus the local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

pub struct DefaultShellOrchestrator<D, C = SystemClock>
where
    D: RemoteDispatcher,
    C: Clock,
{
    state: ShellState,
    dispatcher: D,
    clock: C,
}

impl<D: RemoteDispatcher> DefaultShellOrchestrator<D, SystemClock> {
    pub fn new(settings: &ShellSettings, dispatcher: D) -> Self {
        Self::with_clock(settings, dispatcher, SystemClock)
    }
}

impl<D, C> DefaultShellOrchestrator<D, C>
where
    D: RemoteDispatcher,
    C: Clock,
{
    pub fn with_clock(settings: &ShellSettings, dispatcher: D, clock: C) -> Self {
        Self {
            state: ShellState::new(settings),
            dispatcher,
            clock,
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Result<()> {
        if key.ctrl && key.key == "c" {
            self.state.stop();
            return Ok(());
        }

        match self.state.overlay() {
            None => self.handle_landing_key(&key),
            Some(Overlay::Auth) => self.handle_auth_key(&key),
            Some(Overlay::Booking) => self.handle_booking_key(&key),
            Some(Overlay::Consultations) => self.handle_consultations_key(&key),
        }
    }

    fn handle_landing_key(&mut self, key: &KeyInput) -> Result<()> {
        if key.ctrl {
            return Ok(());
        }

        match key.key.as_str() {
            "q" => self.state.stop(),
            "l" => self.state.open_auth(false),
            "b" => self.state.open_booking(),
            "m" => self.open_consultations()?,
            "o" => {
                self.state.sign_out();
                tracing::info!(code = "SESSION_SIGNED_OUT", "signed out");
            }
            _ => {}
        }

        Ok(())
    }

    fn handle_auth_key(&mut self, key: &KeyInput) -> Result<()> {
        if key.key == "esc" {
            self.state.close_overlay();
            return Ok(());
        }

        if self.state.auth().is_verifying() {
            return self.handle_verify_key(key);
        }

        let auth = self.state.auth_mut();
        match key.key.as_str() {
            "left" | "right" => auth.select_method(auth.method().toggled()),
            "backspace" => {
                if let Some(input) = auth.contact_input_mut() {
                    input.delete_char_before();
                }
            }
            "enter" => {
                if let Some(command) = auth.request_code() {
                    self.dispatcher.dispatch(RemoteRequest::SendCode(command))?;
                }
            }
            _ => {
                if let Some(ch) = typed_char(key) {
                    if let Some(input) = auth.contact_input_mut() {
                        input.insert_char(ch);
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_verify_key(&mut self, key: &KeyInput) -> Result<()> {
        let auth = self.state.auth_mut();

        if key.ctrl && key.key == "b" {
            auth.back();
            return Ok(());
        }

        match key.key.as_str() {
            "backspace" => auth.erase_code_char(),
            "enter" => {
                if let Some(command) = auth.verify() {
                    self.dispatcher
                        .dispatch(RemoteRequest::VerifyCode(command))?;
                }
            }
            _ => {
                if let Some(ch) = typed_char(key) {
                    auth.type_code_char(ch);
                }
            }
        }

        Ok(())
    }

    fn handle_booking_key(&mut self, key: &KeyInput) -> Result<()> {
        match key.key.as_str() {
            "esc" => self.state.close_overlay(),
            "tab" => self.state.booking_mut().focus_next(),
            "enter" => self.submit_booking()?,
            "backspace" => {
                if let Some(input) = self.state.booking_mut().focused_input_mut() {
                    input.delete_char_before();
                }
            }
            "left" => {
                if let Some(input) = self.state.booking_mut().focused_input_mut() {
                    input.move_cursor_left();
                }
            }
            "right" => {
                if let Some(input) = self.state.booking_mut().focused_input_mut() {
                    input.move_cursor_right();
                }
            }
            _ => {
                if let Some(ch) = typed_char(key) {
                    if let Some(input) = self.state.booking_mut().focused_input_mut() {
                        input.insert_char(ch);
                    }
                }
            }
        }

        Ok(())
    }

    fn submit_booking(&mut self) -> Result<()> {
        let now = self.clock.now();
        let today = self.clock.today();
        let session = self.state.session().clone();

        match self.state.booking_mut().submit(&session, now, today) {
            SubmitOutcome::Dispatch(command) => {
                self.dispatcher
                    .dispatch(RemoteRequest::CreateBooking(command))?;
            }
            SubmitOutcome::NeedsAuth => self.state.open_auth(true),
            SubmitOutcome::Blocked => {}
        }

        Ok(())
    }

    fn handle_consultations_key(&mut self, key: &KeyInput) -> Result<()> {
        match key.key.as_str() {
            "esc" | "q" => self.state.close_overlay(),
            "j" | "down" => self.state.consultations_mut().select_next(),
            "k" | "up" => self.state.consultations_mut().select_previous(),
            "r" => self.load_consultations()?,
            _ => {}
        }

        Ok(())
    }

    fn open_consultations(&mut self) -> Result<()> {
        if !self.state.is_signed_in(self.clock.now()) {
            self.state.open_auth(false);
            return Ok(());
        }

        self.state.open_consultations();
        self.load_consultations()
    }

    fn load_consultations(&mut self) -> Result<()> {
        let now = self.clock.now();
        let Some(token) = self.state.session().live_token(now).cloned() else {
            self.state.open_auth(false);
            return Ok(());
        };

        let ticket = self.state.consultations_mut().begin_loading();
        self.dispatcher
            .dispatch(RemoteRequest::ListConsultations { ticket, token })
    }

    fn handle_tick(&mut self) {
        let now = self.clock.now();

        if self.state.booking_mut().tick(now) == TickOutcome::Closed
            && self.state.overlay() == Some(Overlay::Booking)
        {
            self.state.close_overlay();
        }

        self.state.session_mut().expire_if_stale(now);
    }

    fn handle_reply(&mut self, reply: RemoteReply) {
        let now = self.clock.now();

        match reply {
            RemoteReply::CodeSent { ticket, result } => {
                self.state.auth_mut().apply_code_sent(ticket, result);
            }
            RemoteReply::Verified { ticket, result } => {
                if let VerifyOutcome::Verified(token) =
                    self.state.auth_mut().apply_verified(ticket, result)
                {
                    tracing::info!(code = "SESSION_SIGNED_IN", "identity token received");
                    self.state.complete_sign_in(token, now);
                }
            }
            RemoteReply::Booked { ticket, result } => {
                self.state.booking_mut().apply_booked(ticket, result, now);
            }
            RemoteReply::ConsultationsListed { ticket, result } => {
                self.state.consultations_mut().apply_listed(ticket, result);
            }
        }
    }
}

impl<D, C> ShellOrchestrator for DefaultShellOrchestrator<D, C>
where
    D: RemoteDispatcher,
    C: Clock,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => self.handle_tick(),
            AppEvent::QuitRequested => self.state.stop(),
            AppEvent::InputKey(key) => self.handle_key(key)?,
            AppEvent::Remote(reply) => self.handle_reply(reply),
        }

        Ok(())
    }
}

fn typed_char(key: &KeyInput) -> Option<char> {
    if key.ctrl {
        return None;
    }

    let mut chars = key.key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}
