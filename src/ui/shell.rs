use std::time::Instant;

use anyhow::Result;

use crate::usecases::{
    context::AppContext,
    contracts::{AppEventSource, ShellOrchestrator},
};

use super::{terminal::TerminalSession, view};

pub fn start(
    context: &AppContext,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
) -> Result<()> {
    tracing::info!(
        log_level = %context.config.logging.level,
        locale = ?context.config.ui.locale,
        auth_url = %context.config.endpoints.auth_url,
        booking_url = %context.config.endpoints.booking_url,
        log_dir = %context.layout.log_dir.display(),
        "starting TUI shell"
    );

    let mut terminal = TerminalSession::new()?;

    while orchestrator.state().is_running() {
        let now = Instant::now();
        let today = chrono::Local::now().date_naive();
        terminal.draw(|frame| view::render(frame, orchestrator.state(), now, today))?;

        if let Some(event) = event_source.next_event()? {
            orchestrator.handle_event(event)?;
        }
    }

    tracing::info!("TUI shell stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            events::{AppEvent, KeyInput},
            shell_state::ShellSettings,
        },
        ui::event_source::MockEventSource,
        usecases::{contracts::RemoteDispatcher, remote::RemoteRequest, shell::DefaultShellOrchestrator},
    };

    struct NoopDispatcher;

    impl RemoteDispatcher for NoopDispatcher {
        fn dispatch(&mut self, _request: RemoteRequest) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn mock_source_produces_quit_event() {
        let mut source = MockEventSource::from(vec![AppEvent::QuitRequested]);
        let event = source.next_event().expect("must read mock event");

        assert_eq!(event, Some(AppEvent::QuitRequested));
    }

    #[test]
    fn orchestrator_drains_source_until_quit_key() {
        let mut source = MockEventSource::from(vec![
            AppEvent::Tick,
            AppEvent::InputKey(KeyInput::new("q", false)),
        ]);
        let mut orchestrator =
            DefaultShellOrchestrator::new(&ShellSettings::default(), NoopDispatcher);

        while let Some(event) = source.next_event().expect("must read mock event") {
            orchestrator
                .handle_event(event)
                .expect("must handle event");
        }

        assert!(!orchestrator.state().is_running());
    }
}
