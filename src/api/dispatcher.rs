use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Result};

use crate::{
    domain::events::RemoteReply,
    infra::error::AppError,
    usecases::{
        contracts::RemoteDispatcher,
        remote::{self, ConsultationBackend, RemoteRequest},
    },
};

const DISPATCHER_STARTED: &str = "REMOTE_DISPATCHER_STARTED";
const DISPATCHER_STOPPED: &str = "REMOTE_DISPATCHER_STOPPED";
const DISPATCHER_SHUTDOWN_FAILED: &str = "REMOTE_DISPATCHER_SHUTDOWN_FAILED";
const DISPATCHER_REPLY_DROPPED: &str = "REMOTE_DISPATCHER_REPLY_DROPPED";
const DISPATCHER_DETACHED: &str = "REMOTE_DISPATCHER_DETACHED";

/// Runs backend calls one at a time on a worker thread and sends each reply
/// back over `reply_tx`.
///
/// Dropping it closes the queue. An idle worker is joined; a worker still
/// inside a request is detached and exits once that call returns, so
/// shutdown never waits out a request timeout.
#[derive(Debug)]
pub struct ThreadDispatcher {
    request_tx: Option<Sender<RemoteRequest>>,
    worker: Option<JoinHandle<()>>,
    in_flight: Arc<AtomicUsize>,
}

impl ThreadDispatcher {
    pub fn start<B>(backend: B, reply_tx: Sender<RemoteReply>) -> Result<Self, AppError>
    where
        B: ConsultationBackend + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<RemoteRequest>();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let worker_in_flight = Arc::clone(&in_flight);
        let worker = thread::Builder::new()
            .name("consult-remote".to_owned())
            .spawn(move || run_worker(backend, request_rx, reply_tx, &worker_in_flight))
            .map_err(|source| AppError::DispatcherStart { source })?;

        tracing::info!(code = DISPATCHER_STARTED, "remote dispatcher started");

        Ok(Self {
            request_tx: Some(request_tx),
            worker: Some(worker),
            in_flight,
        })
    }
}

impl RemoteDispatcher for ThreadDispatcher {
    fn dispatch(&mut self, request: RemoteRequest) -> Result<()> {
        let request_tx = self
            .request_tx
            .as_ref()
            .ok_or_else(|| anyhow!("remote dispatcher is shut down"))?;

        tracing::debug!(
            kind = request.kind(),
            ticket = request.ticket().id(),
            "remote request queued"
        );

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        request_tx.send(request).map_err(|_| {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            anyhow!("remote dispatcher worker has exited")
        })
    }
}

impl Drop for ThreadDispatcher {
    fn drop(&mut self) {
        self.request_tx.take();

        let Some(worker) = self.worker.take() else {
            return;
        };

        let pending = self.in_flight.load(Ordering::SeqCst);
        if pending > 0 {
            tracing::info!(
                code = DISPATCHER_DETACHED,
                pending,
                "remote dispatcher detached with requests in flight"
            );
            return;
        }

        if let Err(error) = worker.join() {
            tracing::warn!(
                code = DISPATCHER_SHUTDOWN_FAILED,
                error = ?error,
                "remote dispatcher worker panicked on shutdown"
            );
        }
    }
}

fn run_worker<B: ConsultationBackend>(
    backend: B,
    request_rx: Receiver<RemoteRequest>,
    reply_tx: Sender<RemoteReply>,
    in_flight: &AtomicUsize,
) {
    for request in request_rx {
        let kind = request.kind();
        let reply = remote::execute(&backend, request);
        in_flight.fetch_sub(1, Ordering::SeqCst);

        if reply_tx.send(reply).is_err() {
            tracing::warn!(
                code = DISPATCHER_REPLY_DROPPED,
                kind,
                "reply receiver is gone; stopping dispatcher"
            );
            return;
        }
    }

    tracing::info!(code = DISPATCHER_STOPPED, "remote dispatcher stopped");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::{
        auth_flow::SendCodeCommand,
        contact::Contact,
        identity::IdentityToken,
        remote::{
            BackendError, BookingRequest, CodeDelivery, Consultation, TicketCounter,
        },
    };

    struct EchoBackend;

    impl ConsultationBackend for EchoBackend {
        fn send_code(&self, contact: &Contact) -> Result<CodeDelivery, BackendError> {
            Ok(CodeDelivery {
                echoed_code: Some(format!("for:{}", contact.value)),
            })
        }

        fn verify_code(&self, _: &Contact, _: &str) -> Result<IdentityToken, BackendError> {
            Err(BackendError::Rejected("Invalid code".into()))
        }

        fn create_booking(
            &self,
            _: &IdentityToken,
            _: &BookingRequest,
        ) -> Result<Option<Consultation>, BackendError> {
            Ok(None)
        }

        fn list_consultations(
            &self,
            _: &IdentityToken,
        ) -> Result<Vec<Consultation>, BackendError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn replies_arrive_in_request_order_with_tickets() {
        let (reply_tx, reply_rx) = mpsc::channel();
        let mut dispatcher = ThreadDispatcher::start(EchoBackend, reply_tx).expect("start");
        let mut tickets = TicketCounter::default();
        let first = tickets.issue();
        let second = tickets.issue();

        dispatcher
            .dispatch(RemoteRequest::SendCode(SendCodeCommand {
                ticket: first,
                contact: Contact::email("a@b.io"),
            }))
            .expect("dispatch first");
        dispatcher
            .dispatch(RemoteRequest::ListConsultations {
                ticket: second,
                token: IdentityToken::new("u1"),
            })
            .expect("dispatch second");

        let timeout = Duration::from_secs(2);
        let first_reply = reply_rx.recv_timeout(timeout).expect("first reply");
        let second_reply = reply_rx.recv_timeout(timeout).expect("second reply");

        assert_eq!(
            first_reply,
            RemoteReply::CodeSent {
                ticket: first,
                result: Ok(CodeDelivery {
                    echoed_code: Some("for:a@b.io".into()),
                }),
            }
        );
        assert_eq!(
            second_reply,
            RemoteReply::ConsultationsListed {
                ticket: second,
                result: Ok(Vec::new()),
            }
        );
    }

    #[test]
    fn drop_joins_worker_and_closes_reply_channel() {
        let (reply_tx, reply_rx) = mpsc::channel();
        let dispatcher = ThreadDispatcher::start(EchoBackend, reply_tx).expect("start");

        drop(dispatcher);

        assert!(reply_rx.recv().is_err());
    }

    /// Blocks in `send_code` until released, after announcing it has started.
    struct GatedBackend {
        entered: Sender<()>,
        release: Receiver<()>,
    }

    impl ConsultationBackend for GatedBackend {
        fn send_code(&self, _: &Contact) -> Result<CodeDelivery, BackendError> {
            let _ = self.entered.send(());
            let _ = self.release.recv();
            Ok(CodeDelivery::default())
        }

        fn verify_code(&self, _: &Contact, _: &str) -> Result<IdentityToken, BackendError> {
            Err(BackendError::Transport("unused".into()))
        }

        fn create_booking(
            &self,
            _: &IdentityToken,
            _: &BookingRequest,
        ) -> Result<Option<Consultation>, BackendError> {
            Err(BackendError::Transport("unused".into()))
        }

        fn list_consultations(
            &self,
            _: &IdentityToken,
        ) -> Result<Vec<Consultation>, BackendError> {
            Err(BackendError::Transport("unused".into()))
        }
    }

    #[test]
    fn drop_does_not_wait_for_request_in_flight() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let (reply_tx, _reply_rx) = mpsc::channel();
        let backend = GatedBackend {
            entered: entered_tx,
            release: release_rx,
        };
        let mut dispatcher = ThreadDispatcher::start(backend, reply_tx).expect("start");

        dispatcher
            .dispatch(RemoteRequest::SendCode(SendCodeCommand {
                ticket: TicketCounter::default().issue(),
                contact: Contact::email("a@b.io"),
            }))
            .expect("dispatch");
        entered_rx
            .recv_timeout(Duration::from_secs(2))
            .expect("worker should start the request");

        let started = std::time::Instant::now();
        drop(dispatcher);

        assert!(started.elapsed() < Duration::from_secs(1));
        let _ = release_tx.send(());
    }
}
