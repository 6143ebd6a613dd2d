//! Passwordless sign-in: request a one-time code, then confirm it.
//!
//! The flow performs no I/O. `request_code` and `verify` hand back commands
//! stamped with a [`RequestTicket`]; the caller executes them and feeds the
//! replies to `apply_code_sent` / `apply_verified`. A reply is applied only
//! if its ticket is still pending, so anything arriving after `back`,
//! `reset` or a newer request is dropped.

use super::{
    contact::{sanitize_code_input, Contact, ContactMethod, ValidationRules},
    dialog_error::{DialogError, NetworkFailure, ValidationError},
    identity::IdentityToken,
    remote::{BackendError, CodeDelivery, ReplyOutcome, RequestTicket, TicketCounter},
    text_input_state::TextInputState,
};

const CONTACT_MAX_LENGTH: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStep {
    Input {
        method: ContactMethod,
    },
    Verify {
        contact: Contact,
        issued_code: Option<String>,
        code: TextInputState,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendCodeCommand {
    pub ticket: RequestTicket,
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCodeCommand {
    pub ticket: RequestTicket,
    pub contact: Contact,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Stale,
    Failed,
    Verified(IdentityToken),
}

#[derive(Debug, Clone)]
pub struct AuthFlow {
    rules: ValidationRules,
    step: AuthStep,
    email: TextInputState,
    phone: TextInputState,
    pending: Option<RequestTicket>,
    /// Contact the in-flight `send_code` was addressed to.
    requested_contact: Option<Contact>,
    tickets: TicketCounter,
    error: Option<DialogError>,
}

impl Default for AuthFlow {
    fn default() -> Self {
        Self::new(ValidationRules::default())
    }
}

impl AuthFlow {
    pub fn new(rules: ValidationRules) -> Self {
        Self {
            rules,
            step: AuthStep::Input {
                method: ContactMethod::default(),
            },
            email: TextInputState::with_max_length(CONTACT_MAX_LENGTH),
            phone: TextInputState::with_max_length(CONTACT_MAX_LENGTH),
            pending: None,
            requested_contact: None,
            tickets: TicketCounter::default(),
            error: None,
        }
    }

    pub fn step(&self) -> &AuthStep {
        &self.step
    }

    pub fn is_verifying(&self) -> bool {
        matches!(self.step, AuthStep::Verify { .. })
    }

    /// The contact method of the current tab or of the attempt being verified.
    pub fn method(&self) -> ContactMethod {
        match &self.step {
            AuthStep::Input { method } => *method,
            AuthStep::Verify { contact, .. } => contact.method,
        }
    }

    pub fn email(&self) -> &TextInputState {
        &self.email
    }

    pub fn phone(&self) -> &TextInputState {
        &self.phone
    }

    pub fn error(&self) -> Option<&DialogError> {
        self.error.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn select_method(&mut self, method: ContactMethod) {
        if let AuthStep::Input { method: current } = &mut self.step {
            *current = method;
        }
    }

    /// Editable contact field for the active tab; `None` outside `Input`.
    pub fn contact_input_mut(&mut self) -> Option<&mut TextInputState> {
        match self.step {
            AuthStep::Input {
                method: ContactMethod::Email,
            } => Some(&mut self.email),
            AuthStep::Input {
                method: ContactMethod::Phone,
            } => Some(&mut self.phone),
            AuthStep::Verify { .. } => None,
        }
    }

    pub fn set_contact_value(&mut self, value: &str) {
        if let Some(input) = self.contact_input_mut() {
            input.set_text(value);
        }
    }

    fn active_draft(&self, method: ContactMethod) -> &TextInputState {
        match method {
            ContactMethod::Email => &self.email,
            ContactMethod::Phone => &self.phone,
        }
    }

    fn is_valid_draft(&self, method: ContactMethod) -> bool {
        let draft = self.active_draft(method);
        !draft.exceeds_max_length() && self.rules.is_valid_contact(method, draft.text())
    }

    pub fn can_request_code(&self) -> bool {
        match &self.step {
            AuthStep::Input { method } => {
                !self.is_busy() && self.is_valid_draft(*method)
            }
            AuthStep::Verify { .. } => false,
        }
    }

    /// Starts `Input -> Verify`. Returns the request to send, or `None` when
    /// the draft is invalid (an inline error is set) or a request is in flight.
    pub fn request_code(&mut self) -> Option<SendCodeCommand> {
        let AuthStep::Input { method } = self.step else {
            return None;
        };
        if self.is_busy() {
            return None;
        }

        if !self.is_valid_draft(method) {
            let error = match method {
                ContactMethod::Email => ValidationError::InvalidEmail,
                ContactMethod::Phone => ValidationError::InvalidPhone,
            };
            self.error = Some(DialogError::Validation(error));
            return None;
        }

        self.error = None;
        let ticket = self.tickets.issue();
        let contact = Contact {
            method,
            value: self.active_draft(method).text().to_owned(),
        };
        self.pending = Some(ticket);
        self.requested_contact = Some(contact.clone());

        tracing::debug!(
            ticket = ticket.id(),
            method = method.as_label(),
            "one-time code requested"
        );

        Some(SendCodeCommand { ticket, contact })
    }

    pub fn apply_code_sent(
        &mut self,
        ticket: RequestTicket,
        result: Result<CodeDelivery, BackendError>,
    ) -> ReplyOutcome {
        if !self.take_pending(ticket) {
            return ReplyOutcome::Stale;
        }

        let Some(contact) = self.requested_contact.take() else {
            return ReplyOutcome::Stale;
        };

        match result {
            Ok(delivery) => {
                self.step = AuthStep::Verify {
                    contact,
                    issued_code: delivery.echoed_code,
                    code: TextInputState::with_max_length(self.rules.code_length),
                };
                self.error = None;
            }
            Err(error) => self.error = Some(map_backend_error(error, NetworkFailure::SendCode)),
        }

        ReplyOutcome::Applied
    }

    pub fn code(&self) -> Option<&str> {
        match &self.step {
            AuthStep::Verify { code, .. } => Some(code.text()),
            AuthStep::Input { .. } => None,
        }
    }

    /// Code echoed back by a demonstration endpoint, if any.
    pub fn issued_code(&self) -> Option<&str> {
        match &self.step {
            AuthStep::Verify { issued_code, .. } => issued_code.as_deref(),
            AuthStep::Input { .. } => None,
        }
    }

    pub fn verifying_contact(&self) -> Option<&Contact> {
        match &self.step {
            AuthStep::Verify { contact, .. } => Some(contact),
            AuthStep::Input { .. } => None,
        }
    }

    /// Replaces the code with the digits of `raw`, truncated to the code length.
    pub fn enter_code(&mut self, raw: &str) {
        let sanitized = sanitize_code_input(raw, self.rules.code_length);
        if let AuthStep::Verify { code, .. } = &mut self.step {
            code.set_text(&sanitized);
        }
    }

    /// Types one character into the code field; non-digits are ignored.
    pub fn type_code_char(&mut self, ch: char) {
        if !ch.is_ascii_digit() {
            return;
        }
        if let AuthStep::Verify { code, .. } = &mut self.step {
            code.insert_char(ch);
        }
    }

    pub fn erase_code_char(&mut self) {
        if let AuthStep::Verify { code, .. } = &mut self.step {
            code.delete_char_before();
        }
    }

    pub fn can_verify(&self) -> bool {
        !self.is_busy()
            && self
                .code()
                .is_some_and(|code| self.rules.is_complete_code(code))
    }

    pub fn verify(&mut self) -> Option<VerifyCodeCommand> {
        if self.is_busy() {
            return None;
        }
        let AuthStep::Verify { contact, code, .. } = &self.step else {
            return None;
        };

        if !self.rules.is_complete_code(code.text()) {
            self.error = Some(DialogError::Validation(ValidationError::IncompleteCode));
            return None;
        }

        let command = VerifyCodeCommand {
            ticket: self.tickets.issue(),
            contact: contact.clone(),
            code: code.text().to_owned(),
        };
        self.pending = Some(command.ticket);
        self.error = None;

        tracing::debug!(ticket = command.ticket.id(), "one-time code submitted");

        Some(command)
    }

    pub fn apply_verified(
        &mut self,
        ticket: RequestTicket,
        result: Result<IdentityToken, BackendError>,
    ) -> VerifyOutcome {
        if !self.take_pending(ticket) || !self.is_verifying() {
            return VerifyOutcome::Stale;
        }

        match result {
            Ok(token) => {
                self.reset();
                VerifyOutcome::Verified(token)
            }
            Err(error) => {
                self.error = Some(map_backend_error(error, NetworkFailure::VerifyCode));
                VerifyOutcome::Failed
            }
        }
    }

    /// `Verify -> Input`: drops the issued code and typed digits.
    pub fn back(&mut self) {
        if let AuthStep::Verify { contact, .. } = &self.step {
            self.step = AuthStep::Input {
                method: contact.method,
            };
            self.pending = None;
            self.requested_contact = None;
            self.error = None;
        }
    }

    /// Dialog closed: everything transient is cleared and any in-flight
    /// reply will be ignored.
    pub fn reset(&mut self) {
        self.step = AuthStep::Input {
            method: ContactMethod::default(),
        };
        self.email.clear();
        self.phone.clear();
        self.pending = None;
        self.requested_contact = None;
        self.error = None;
    }

    fn take_pending(&mut self, ticket: RequestTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            return true;
        }

        tracing::debug!(ticket = ticket.id(), "discarding stale auth reply");
        false
    }
}

pub(crate) fn map_backend_error(error: BackendError, failure: NetworkFailure) -> DialogError {
    match error {
        BackendError::Transport(details) => {
            tracing::warn!(
                code = "REMOTE_TRANSPORT_FAILED",
                operation = ?failure,
                details = %details,
                "remote call failed"
            );
            DialogError::Network(failure)
        }
        BackendError::Rejected(message) => DialogError::Server(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow_with_email(email: &str) -> AuthFlow {
        let mut flow = AuthFlow::default();
        flow.set_contact_value(email);
        flow
    }

    fn into_verify(flow: &mut AuthFlow, echoed: Option<&str>) -> SendCodeCommand {
        let command = flow.request_code().expect("request should be issued");
        let outcome = flow.apply_code_sent(
            command.ticket,
            Ok(CodeDelivery {
                echoed_code: echoed.map(str::to_owned),
            }),
        );
        assert_eq!(outcome, ReplyOutcome::Applied);
        command
    }

    #[test]
    fn invalid_email_never_issues_request() {
        let mut flow = flow_with_email("user.test.com");

        assert!(!flow.can_request_code());
        assert!(flow.request_code().is_none());
        assert!(!flow.is_busy());
        assert!(matches!(flow.step(), AuthStep::Input { .. }));
        assert_eq!(
            flow.error(),
            Some(&DialogError::Validation(ValidationError::InvalidEmail))
        );
    }

    #[test]
    fn overlong_email_is_rejected_instead_of_cut() {
        let local = "a".repeat(CONTACT_MAX_LENGTH);
        let mut flow = flow_with_email(&format!("{local}@test.com"));

        assert!(!flow.can_request_code());
        assert!(flow.request_code().is_none());
        assert_eq!(
            flow.error(),
            Some(&DialogError::Validation(ValidationError::InvalidEmail))
        );
    }

    #[test]
    fn invalid_phone_reports_phone_error() {
        let mut flow = AuthFlow::default();
        flow.select_method(ContactMethod::Phone);
        flow.set_contact_value("123-456-789");

        assert!(flow.request_code().is_none());
        assert_eq!(
            flow.error(),
            Some(&DialogError::Validation(ValidationError::InvalidPhone))
        );
    }

    #[test]
    fn drafts_survive_tab_switching() {
        let mut flow = flow_with_email("user@test.com");
        flow.select_method(ContactMethod::Phone);
        flow.set_contact_value("+7 999 123 45 67");
        flow.select_method(ContactMethod::Email);

        assert_eq!(flow.email().text(), "user@test.com");
        assert_eq!(flow.phone().text(), "+7 999 123 45 67");
        assert!(flow.can_request_code());
    }

    #[test]
    fn request_carries_selected_contact() {
        let mut flow = AuthFlow::default();
        flow.select_method(ContactMethod::Phone);
        flow.set_contact_value("+7 (999) 123-45-67");

        let command = flow.request_code().expect("request should be issued");

        assert_eq!(command.contact, Contact::phone("+7 (999) 123-45-67"));
        assert!(flow.is_busy());
        assert!(!flow.can_request_code());
        assert!(flow.request_code().is_none());
    }

    #[test]
    fn successful_send_moves_to_verify_and_keeps_contact() {
        let mut flow = flow_with_email("user@test.com");
        into_verify(&mut flow, Some("482913"));

        assert!(flow.is_verifying());
        assert_eq!(
            flow.verifying_contact(),
            Some(&Contact::email("user@test.com"))
        );
        assert_eq!(flow.issued_code(), Some("482913"));
        assert_eq!(flow.code(), Some(""));
        assert!(!flow.is_busy());
    }

    #[test]
    fn verify_step_uses_contact_the_code_was_sent_to() {
        let mut flow = flow_with_email("user@test.com");
        let command = flow.request_code().expect("request should be issued");
        flow.set_contact_value("edited@test.com");

        flow.apply_code_sent(command.ticket, Ok(CodeDelivery::default()));

        assert_eq!(
            flow.verifying_contact(),
            Some(&Contact::email("user@test.com"))
        );
    }

    #[test]
    fn transport_failure_on_send_stays_in_input() {
        let mut flow = flow_with_email("user@test.com");
        let command = flow.request_code().expect("request should be issued");

        flow.apply_code_sent(
            command.ticket,
            Err(BackendError::Transport("connection refused".into())),
        );

        assert!(!flow.is_verifying());
        assert!(!flow.is_busy());
        assert_eq!(
            flow.error(),
            Some(&DialogError::Network(NetworkFailure::SendCode))
        );
    }

    #[test]
    fn business_error_on_send_is_shown_verbatim() {
        let mut flow = flow_with_email("user@test.com");
        let command = flow.request_code().expect("request should be issued");

        flow.apply_code_sent(
            command.ticket,
            Err(BackendError::Rejected("Email or phone required".into())),
        );

        assert!(!flow.is_verifying());
        assert_eq!(
            flow.error(),
            Some(&DialogError::Server("Email or phone required".into()))
        );
    }

    #[test]
    fn code_field_holds_only_leading_digits() {
        let mut flow = flow_with_email("user@test.com");
        into_verify(&mut flow, None);

        flow.enter_code("48-29 13 77");
        assert_eq!(flow.code(), Some("482913"));

        flow.erase_code_char();
        flow.type_code_char('x');
        flow.type_code_char('3');
        flow.type_code_char('9');
        assert_eq!(flow.code(), Some("482913"));
    }

    #[test]
    fn verify_requires_full_code() {
        let mut flow = flow_with_email("user@test.com");
        into_verify(&mut flow, None);
        flow.enter_code("4829");

        assert!(!flow.can_verify());
        assert!(flow.verify().is_none());
        assert_eq!(
            flow.error(),
            Some(&DialogError::Validation(ValidationError::IncompleteCode))
        );
    }

    #[test]
    fn back_returns_to_input_without_code_and_drops_pending_reply() {
        let mut flow = flow_with_email("user@test.com");
        into_verify(&mut flow, Some("482913"));
        flow.enter_code("482913");
        let command = flow.verify().expect("verify should be issued");

        flow.back();

        assert!(!flow.is_verifying());
        assert!(!flow.is_busy());
        assert_eq!(flow.code(), None);
        assert_eq!(flow.issued_code(), None);
        assert_eq!(flow.email().text(), "user@test.com");
        assert_eq!(
            flow.apply_verified(command.ticket, Ok(IdentityToken::new("u1"))),
            VerifyOutcome::Stale
        );
    }

    #[test]
    fn verify_mismatch_is_reported_by_endpoint() {
        let mut flow = flow_with_email("user@test.com");
        into_verify(&mut flow, Some("482913"));
        flow.enter_code("111111");
        let command = flow.verify().expect("client does not compare codes");

        let outcome = flow.apply_verified(
            command.ticket,
            Err(BackendError::Rejected("Invalid code".into())),
        );

        assert_eq!(outcome, VerifyOutcome::Failed);
        assert!(flow.is_verifying());
        assert_eq!(flow.error(), Some(&DialogError::Server("Invalid code".into())));
    }

    #[test]
    fn transport_failure_on_verify_stays_in_verify() {
        let mut flow = flow_with_email("user@test.com");
        into_verify(&mut flow, None);
        flow.enter_code("482913");
        let command = flow.verify().expect("verify should be issued");

        flow.apply_verified(
            command.ticket,
            Err(BackendError::Transport("timeout".into())),
        );

        assert!(flow.is_verifying());
        assert_eq!(flow.code(), Some("482913"));
        assert_eq!(
            flow.error(),
            Some(&DialogError::Network(NetworkFailure::VerifyCode))
        );
    }

    #[test]
    fn reply_from_previous_send_cannot_advance_new_attempt() {
        let mut flow = flow_with_email("user@test.com");
        let stale = flow.request_code().expect("first request");
        flow.reset();

        flow.set_contact_value("other@test.com");
        let fresh = flow.request_code().expect("second request");

        assert_eq!(
            flow.apply_code_sent(
                stale.ticket,
                Ok(CodeDelivery {
                    echoed_code: Some("000000".into())
                })
            ),
            ReplyOutcome::Stale
        );
        assert!(!flow.is_verifying());
        assert!(flow.is_busy());

        flow.apply_code_sent(
            fresh.ticket,
            Ok(CodeDelivery {
                echoed_code: Some("123456".into()),
            }),
        );
        assert_eq!(flow.issued_code(), Some("123456"));
    }

    #[test]
    fn reset_clears_everything_and_ignores_late_reply() {
        let mut flow = flow_with_email("user@test.com");
        let command = flow.request_code().expect("request should be issued");

        flow.reset();

        assert_eq!(flow.email().text(), "");
        assert!(!flow.is_busy());
        assert_eq!(
            flow.apply_code_sent(command.ticket, Ok(CodeDelivery::default())),
            ReplyOutcome::Stale
        );
        assert!(!flow.is_verifying());
        assert!(flow.error().is_none());
    }

    #[test]
    fn end_to_end_email_sign_in_delivers_token() {
        let mut flow = flow_with_email("user@test.com");
        let send = flow.request_code().expect("send should be issued");
        assert_eq!(send.contact, Contact::email("user@test.com"));

        flow.apply_code_sent(
            send.ticket,
            Ok(CodeDelivery {
                echoed_code: Some("482913".into()),
            }),
        );
        flow.enter_code("482913");

        let verify = flow.verify().expect("verify should be issued");
        assert_eq!(verify.code, "482913");
        assert_eq!(verify.contact, Contact::email("user@test.com"));

        let outcome = flow.apply_verified(verify.ticket, Ok(IdentityToken::new("u1")));

        assert_eq!(outcome, VerifyOutcome::Verified(IdentityToken::new("u1")));
        assert!(!flow.is_verifying());
        assert_eq!(flow.email().text(), "");
        assert!(flow.error().is_none());
    }
}
