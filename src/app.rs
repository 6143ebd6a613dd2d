use std::time::Instant;

use anyhow::Result;

use crate::{
    api::{self, client::HttpBackend},
    cli::{Cli, Command},
    domain::{self, identity::IdentitySession, shell_state::ShellSettings},
    infra, ui,
    usecases::{
        self, bootstrap,
        context::AppContext,
        guided_auth::{run_guided_auth, AuthTerminal, RetryPolicy, StdTerminal},
        guided_booking::{print_consultations, run_guided_booking, BookingDraft, GuidedBookingOutcome},
        remote::ConsultationBackend,
    },
};

const GUIDED_SIGN_IN_ABANDONED: &str = "AUTH_GUIDED_SIGN_IN_ABANDONED";

pub fn run(cli: Cli) -> Result<()> {
    let context = bootstrap::bootstrap(cli.config.as_deref())?;

    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        api = api::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    match cli.command_or_default() {
        Command::Run => {
            let mut shell = bootstrap::compose_shell(&context)?;
            ui::shell::start(&context, &mut shell.event_source, &mut shell.orchestrator)?;
        }
        Command::Login => {
            let backend = HttpBackend::new(&context.config.endpoints)?;
            let mut terminal = StdTerminal;
            if let Some(session) = sign_in(&context, &mut terminal, &backend)? {
                if let Some(token) = session.live_token(Instant::now()) {
                    terminal.print_line(&format!("Identity token: {}", token.as_str()))?;
                }
            }
        }
        Command::Book {
            date,
            time,
            description,
        } => {
            let backend = HttpBackend::new(&context.config.endpoints)?;
            let mut terminal = StdTerminal;
            let Some(session) = sign_in(&context, &mut terminal, &backend)? else {
                return Ok(());
            };

            let outcome = run_guided_booking(
                &mut terminal,
                &backend,
                &session,
                BookingDraft {
                    date,
                    time,
                    description,
                },
                &context.config.shell_settings(),
                &RetryPolicy::default(),
                chrono::Local::now().date_naive(),
            )?;
            tracing::info!(
                booked = matches!(outcome, GuidedBookingOutcome::Booked(_)),
                "guided booking finished"
            );
        }
        Command::Bookings => {
            let backend = HttpBackend::new(&context.config.endpoints)?;
            let mut terminal = StdTerminal;
            let Some(session) = sign_in(&context, &mut terminal, &backend)? else {
                return Ok(());
            };

            print_consultations(
                &mut terminal,
                &backend,
                &session,
                context.config.ui.locale,
            )?;
        }
    }

    Ok(())
}

/// Runs guided sign-in and wraps the token in a session carrying the
/// configured expiry policy.
fn sign_in(
    context: &AppContext,
    terminal: &mut dyn AuthTerminal,
    backend: &dyn ConsultationBackend,
) -> Result<Option<IdentitySession>> {
    let settings: ShellSettings = context.config.shell_settings();

    let Some(token) = run_guided_auth(terminal, backend, &settings, &RetryPolicy::default())?
    else {
        tracing::info!(code = GUIDED_SIGN_IN_ABANDONED, "guided sign-in not completed");
        return Ok(None);
    };

    let mut session = IdentitySession::with_ttl(settings.session_ttl);
    session.sign_in(token, Instant::now());
    Ok(Some(session))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{
        domain::{identity::IdentityToken, remote::CodeDelivery},
        infra::{config::AppConfig, storage_layout::StorageLayout},
        usecases::{guided_auth::fakes::FakeTerminal, remote::fakes::ScriptedBackend},
    };

    fn context(config: AppConfig) -> AppContext {
        AppContext::new(
            config,
            StorageLayout {
                config_dir: PathBuf::from("/tmp/consult"),
                log_dir: PathBuf::from("/tmp/consult/logs"),
            },
            None,
        )
    }

    #[test]
    fn sign_in_applies_configured_session_ttl() {
        let mut config = AppConfig::default();
        config.session.token_ttl_secs = Some(0);
        let backend = ScriptedBackend::default();
        backend
            .send_results
            .borrow_mut()
            .push_back(Ok(CodeDelivery::default()));
        backend
            .verify_results
            .borrow_mut()
            .push_back(Ok(IdentityToken::new("u1")));
        let mut terminal = FakeTerminal::new(vec![Some(""), Some("user@test.com"), Some("482913")]);

        let session = sign_in(&context(config), &mut terminal, &backend)
            .expect("sign-in should run")
            .expect("session returned");

        assert!(!session.is_signed_in(Instant::now()));
    }

    #[test]
    fn sign_in_returns_none_on_cancel() {
        let backend = ScriptedBackend::default();
        let mut terminal = FakeTerminal::new(vec![None]);

        let session = sign_in(&context(AppConfig::default()), &mut terminal, &backend)
            .expect("sign-in should run");

        assert!(session.is_none());
    }
}
