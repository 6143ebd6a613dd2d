use super::{
    auth_flow::map_backend_error,
    dialog_error::{DialogError, NetworkFailure},
    remote::{BackendError, Consultation, ReplyOutcome, RequestTicket, TicketCounter},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsultationListUiState {
    Loading,
    Ready,
    Empty,
    Error(DialogError),
}

/// The signed-in user's consultations, newest first as the endpoint sends them.
#[derive(Debug, Clone)]
pub struct ConsultationListState {
    ui_state: ConsultationListUiState,
    consultations: Vec<Consultation>,
    selected_index: Option<usize>,
    pending: Option<RequestTicket>,
    tickets: TicketCounter,
}

impl Default for ConsultationListState {
    fn default() -> Self {
        Self {
            ui_state: ConsultationListUiState::Loading,
            consultations: Vec::new(),
            selected_index: None,
            pending: None,
            tickets: TicketCounter::default(),
        }
    }
}

impl ConsultationListState {
    pub fn ui_state(&self) -> &ConsultationListUiState {
        &self.ui_state
    }

    pub fn consultations(&self) -> &[Consultation] {
        &self.consultations
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Marks the list as loading and returns the ticket for the fetch.
    pub fn begin_loading(&mut self) -> RequestTicket {
        let ticket = self.tickets.issue();
        self.pending = Some(ticket);
        self.ui_state = ConsultationListUiState::Loading;
        self.consultations.clear();
        self.selected_index = None;
        ticket
    }

    pub fn apply_listed(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<Consultation>, BackendError>,
    ) -> ReplyOutcome {
        if self.pending != Some(ticket) {
            return ReplyOutcome::Stale;
        }
        self.pending = None;

        match result {
            Ok(consultations) if consultations.is_empty() => {
                self.ui_state = ConsultationListUiState::Empty;
            }
            Ok(consultations) => {
                self.ui_state = ConsultationListUiState::Ready;
                self.consultations = consultations;
                self.selected_index = Some(0);
            }
            Err(error) => {
                self.ui_state = ConsultationListUiState::Error(map_backend_error(
                    error,
                    NetworkFailure::ListBookings,
                ));
            }
        }

        ReplyOutcome::Applied
    }

    pub fn select_next(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        let last_index = self.consultations.len().saturating_sub(1);
        self.selected_index = Some(std::cmp::min(index.saturating_add(1), last_index));
    }

    pub fn select_previous(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        self.selected_index = Some(index.saturating_sub(1));
    }

    pub fn reset(&mut self) {
        self.pending = None;
        self.ui_state = ConsultationListUiState::Loading;
        self.consultations.clear();
        self.selected_index = None;
    }
}
