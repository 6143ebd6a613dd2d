//! Data exchanged with the remote code and booking endpoints.

use serde::Serialize;
use thiserror::Error;

/// Identifies one outgoing request. A flow applies a reply only while the
/// reply's ticket is the one it is still waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Issues strictly increasing tickets; never rewinds, even across resets.
#[derive(Debug, Clone, Default)]
pub struct TicketCounter {
    next: u64,
}

impl TicketCounter {
    pub fn issue(&mut self) -> RequestTicket {
        self.next += 1;
        RequestTicket(self.next)
    }
}

/// Whether a reply was applied or discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    Applied,
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// No usable reply: connection, timeout, or an unreadable body.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The endpoint answered with an `error` field.
    #[error("rejected by endpoint: {0}")]
    Rejected(String),
}

/// Successful reply to `send_code`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeDelivery {
    /// Present only on demonstration endpoints that echo the code back.
    pub echoed_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRequest {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub description: String,
}

/// A consultation as stored by the booking endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Consultation {
    pub id: String,
    pub date: String,
    pub time: String,
    pub description: String,
    pub status: String,
    pub created_at: String,
}
