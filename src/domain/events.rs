use super::{
    identity::IdentityToken,
    remote::{BackendError, CodeDelivery, Consultation, RequestTicket},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    QuitRequested,
    InputKey(KeyInput),
    Remote(RemoteReply),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }
}

/// Outcome of a backend call, tagged with the ticket of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteReply {
    CodeSent {
        ticket: RequestTicket,
        result: Result<CodeDelivery, BackendError>,
    },
    Verified {
        ticket: RequestTicket,
        result: Result<IdentityToken, BackendError>,
    },
    Booked {
        ticket: RequestTicket,
        result: Result<Option<Consultation>, BackendError>,
    },
    ConsultationsListed {
        ticket: RequestTicket,
        result: Result<Vec<Consultation>, BackendError>,
    },
}
