//! Contract with the remote code and booking endpoints.

use crate::domain::{
    auth_flow::{SendCodeCommand, VerifyCodeCommand},
    booking_flow::CreateBookingCommand,
    contact::Contact,
    events::RemoteReply,
    identity::IdentityToken,
    remote::{BackendError, BookingRequest, CodeDelivery, Consultation, RequestTicket},
};

/// Blocking access to the two endpoints. Implementations decide transport.
pub trait ConsultationBackend {
    fn send_code(&self, contact: &Contact) -> Result<CodeDelivery, BackendError>;

    fn verify_code(&self, contact: &Contact, code: &str) -> Result<IdentityToken, BackendError>;

    fn create_booking(
        &self,
        token: &IdentityToken,
        request: &BookingRequest,
    ) -> Result<Option<Consultation>, BackendError>;

    fn list_consultations(&self, token: &IdentityToken)
        -> Result<Vec<Consultation>, BackendError>;
}

impl<T: ConsultationBackend + ?Sized> ConsultationBackend for &T {
    fn send_code(&self, contact: &Contact) -> Result<CodeDelivery, BackendError> {
        (*self).send_code(contact)
    }

    fn verify_code(&self, contact: &Contact, code: &str) -> Result<IdentityToken, BackendError> {
        (*self).verify_code(contact, code)
    }

    fn create_booking(
        &self,
        token: &IdentityToken,
        request: &BookingRequest,
    ) -> Result<Option<Consultation>, BackendError> {
        (*self).create_booking(token, request)
    }

    fn list_consultations(
        &self,
        token: &IdentityToken,
    ) -> Result<Vec<Consultation>, BackendError> {
        (*self).list_consultations(token)
    }
}

/// A backend call produced by one of the flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRequest {
    SendCode(SendCodeCommand),
    VerifyCode(VerifyCodeCommand),
    CreateBooking(CreateBookingCommand),
    ListConsultations {
        ticket: RequestTicket,
        token: IdentityToken,
    },
}

impl RemoteRequest {
    pub fn ticket(&self) -> RequestTicket {
        match self {
            Self::SendCode(command) => command.ticket,
            Self::VerifyCode(command) => command.ticket,
            Self::CreateBooking(command) => command.ticket,
            Self::ListConsultations { ticket, .. } => *ticket,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::SendCode(_) => "send_code",
            Self::VerifyCode(_) => "verify_code",
            Self::CreateBooking(_) => "create_booking",
            Self::ListConsultations { .. } => "list_consultations",
        }
    }
}

/// Runs one request against `backend` and tags the outcome with its ticket.
pub fn execute(backend: &dyn ConsultationBackend, request: RemoteRequest) -> RemoteReply {
    match request {
        RemoteRequest::SendCode(command) => RemoteReply::CodeSent {
            ticket: command.ticket,
            result: backend.send_code(&command.contact),
        },
        RemoteRequest::VerifyCode(command) => RemoteReply::Verified {
            ticket: command.ticket,
            result: backend.verify_code(&command.contact, &command.code),
        },
        RemoteRequest::CreateBooking(command) => RemoteReply::Booked {
            ticket: command.ticket,
            result: backend.create_booking(&command.token, &command.request),
        },
        RemoteRequest::ListConsultations { ticket, token } => RemoteReply::ConsultationsListed {
            ticket,
            result: backend.list_consultations(&token),
        },
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::{cell::RefCell, collections::VecDeque};

    use super::*;

    /// Scripted backend: pops one queued result per call and records calls.
    #[derive(Default)]
    pub struct ScriptedBackend {
        pub send_results: RefCell<VecDeque<Result<CodeDelivery, BackendError>>>,
        pub verify_results: RefCell<VecDeque<Result<IdentityToken, BackendError>>>,
        pub booking_results: RefCell<VecDeque<Result<Option<Consultation>, BackendError>>>,
        pub list_results: RefCell<VecDeque<Result<Vec<Consultation>, BackendError>>>,
        pub calls: RefCell<Vec<String>>,
    }

    impl ScriptedBackend {
        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl ConsultationBackend for ScriptedBackend {
        fn send_code(&self, contact: &Contact) -> Result<CodeDelivery, BackendError> {
            self.calls
                .borrow_mut()
                .push(format!("send_code:{}", contact.value));
            self.send_results
                .borrow_mut()
                .pop_front()
                .expect("missing send_code result")
        }

        fn verify_code(
            &self,
            contact: &Contact,
            code: &str,
        ) -> Result<IdentityToken, BackendError> {
            self.calls
                .borrow_mut()
                .push(format!("verify_code:{}:{code}", contact.value));
            self.verify_results
                .borrow_mut()
                .pop_front()
                .expect("missing verify_code result")
        }

        fn create_booking(
            &self,
            token: &IdentityToken,
            request: &BookingRequest,
        ) -> Result<Option<Consultation>, BackendError> {
            self.calls.borrow_mut().push(format!(
                "create_booking:{}:{}:{}",
                token.as_str(),
                request.date,
                request.time
            ));
            self.booking_results
                .borrow_mut()
                .pop_front()
                .expect("missing create_booking result")
        }

        fn list_consultations(
            &self,
            token: &IdentityToken,
        ) -> Result<Vec<Consultation>, BackendError> {
            self.calls
                .borrow_mut()
                .push(format!("list_consultations:{}", token.as_str()));
            self.list_results
                .borrow_mut()
                .pop_front()
                .expect("missing list_consultations result")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{fakes::ScriptedBackend, *};
    use crate::domain::remote::TicketCounter;

    #[test]
    fn execute_tags_reply_with_request_ticket() {
        let backend = ScriptedBackend::default();
        backend
            .send_results
            .borrow_mut()
            .push_back(Ok(CodeDelivery::default()));
        let ticket = TicketCounter::default().issue();

        let reply = execute(
            &backend,
            RemoteRequest::SendCode(SendCodeCommand {
                ticket,
                contact: Contact::email("user@test.com"),
            }),
        );

        assert_eq!(
            reply,
            RemoteReply::CodeSent {
                ticket,
                result: Ok(CodeDelivery::default()),
            }
        );
        assert_eq!(backend.calls.borrow().as_slice(), ["send_code:user@test.com"]);
    }
}
