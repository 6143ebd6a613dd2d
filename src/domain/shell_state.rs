use std::time::{Duration, Instant};

use super::{
    auth_flow::AuthFlow,
    booking_flow::{BookingFlow, DEFAULT_SUCCESS_DELAY},
    consultation_list_state::ConsultationListState,
    contact::ValidationRules,
    identity::{IdentitySession, IdentityToken},
    locale::Locale,
};

/// Which modal is drawn over the landing screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Auth,
    Booking,
    Consultations,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSettings {
    pub locale: Locale,
    pub reveal_issued_code: bool,
    pub rules: ValidationRules,
    pub success_delay: Duration,
    pub session_ttl: Option<Duration>,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            reveal_issued_code: false,
            rules: ValidationRules::default(),
            success_delay: DEFAULT_SUCCESS_DELAY,
            session_ttl: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShellState {
    running: bool,
    locale: Locale,
    reveal_issued_code: bool,
    overlay: Option<Overlay>,
    auth: AuthFlow,
    booking: BookingFlow,
    consultations: ConsultationListState,
    session: IdentitySession,
    /// Set when sign-in was opened by the booking gate.
    resume_booking_after_auth: bool,
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new(&ShellSettings::default())
    }
}

impl ShellState {
    pub fn new(settings: &ShellSettings) -> Self {
        Self {
            running: true,
            locale: settings.locale,
            reveal_issued_code: settings.reveal_issued_code,
            overlay: None,
            auth: AuthFlow::new(settings.rules),
            booking: BookingFlow::new(settings.success_delay),
            consultations: ConsultationListState::default(),
            session: IdentitySession::with_ttl(settings.session_ttl),
            resume_booking_after_auth: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn reveal_issued_code(&self) -> bool {
        self.reveal_issued_code
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    pub fn auth(&self) -> &AuthFlow {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut AuthFlow {
        &mut self.auth
    }

    pub fn booking(&self) -> &BookingFlow {
        &self.booking
    }

    pub fn booking_mut(&mut self) -> &mut BookingFlow {
        &mut self.booking
    }

    pub fn consultations(&self) -> &ConsultationListState {
        &self.consultations
    }

    pub fn consultations_mut(&mut self) -> &mut ConsultationListState {
        &mut self.consultations
    }

    pub fn session(&self) -> &IdentitySession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut IdentitySession {
        &mut self.session
    }

    pub fn is_signed_in(&self, now: Instant) -> bool {
        self.session.is_signed_in(now)
    }

    /// Opens sign-in. `for_booking` reopens the booking form once signed in.
    pub fn open_auth(&mut self, for_booking: bool) {
        self.close_overlay();
        self.overlay = Some(Overlay::Auth);
        self.resume_booking_after_auth = for_booking;
    }

    pub fn open_booking(&mut self) {
        self.close_overlay();
        self.overlay = Some(Overlay::Booking);
    }

    pub fn open_consultations(&mut self) {
        self.close_overlay();
        self.overlay = Some(Overlay::Consultations);
    }

    /// Closes the current overlay and clears its transient state.
    pub fn close_overlay(&mut self) {
        match self.overlay.take() {
            Some(Overlay::Auth) => {
                self.auth.reset();
                self.resume_booking_after_auth = false;
            }
            Some(Overlay::Booking) => self.booking.reset(),
            Some(Overlay::Consultations) => self.consultations.reset(),
            None => {}
        }
    }

    /// Stores the token, closes sign-in, and resumes booking if that is what
    /// triggered it.
    pub fn complete_sign_in(&mut self, token: IdentityToken, now: Instant) {
        let resume_booking = self.resume_booking_after_auth;
        self.session.sign_in(token, now);
        self.close_overlay();

        if resume_booking {
            self.open_booking();
        }
    }

    pub fn sign_out(&mut self) {
        self.session.sign_out();
        self.close_overlay();
    }
}
