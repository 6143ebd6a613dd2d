use std::time::Instant;

use anyhow::Result;
use chrono::NaiveDate;

use crate::{
    domain::{events::AppEvent, shell_state::ShellState},
    usecases::remote::RemoteRequest,
};

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
}

/// Hands a backend call off to be executed; the reply arrives later as an
/// `AppEvent::Remote`.
pub trait RemoteDispatcher {
    fn dispatch(&mut self, request: RemoteRequest) -> Result<()>;
}

/// Source of the current instant and calendar date.
pub trait Clock {
    fn now(&self) -> Instant;
    fn today(&self) -> NaiveDate;
}
