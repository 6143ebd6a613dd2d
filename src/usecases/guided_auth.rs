//! Line-oriented sign-in for `consult login`, `book` and `bookings`.

use std::io;

use crate::domain::{
    auth_flow::{AuthFlow, VerifyOutcome},
    contact::ContactMethod,
    identity::IdentityToken,
    locale::{Locale, Text},
    shell_state::ShellSettings,
};

use super::remote::ConsultationBackend;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub contact_attempts: usize,
    pub code_attempts: usize,
    pub booking_attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            contact_attempts: 3,
            code_attempts: 3,
            booking_attempts: 3,
        }
    }
}

pub trait AuthTerminal {
    fn print_line(&mut self, line: &str) -> io::Result<()>;
    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

pub struct StdTerminal;

impl AuthTerminal for StdTerminal {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        println!("{line}");
        Ok(())
    }

    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        use std::io::Write;

        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        let bytes = io::stdin().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_owned()))
    }

    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match rpassword::prompt_password(prompt) {
            Ok(secret) => Ok(Some(secret.trim().to_owned())),
            Err(source) if source.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(source) => Err(source),
        }
    }
}

/// Prints the end-of-input notice shared by the guided prompts.
pub(crate) fn report_cancelled(terminal: &mut dyn AuthTerminal, locale: Locale) -> io::Result<()> {
    terminal.print_line(locale.text(Text::InputCancelled))
}

/// `"<message>. Attempts left: N"`, without doubling a trailing period.
pub(crate) fn with_attempts_left(message: &str, locale: Locale, attempts_left: usize) -> String {
    format!(
        "{}. {} {attempts_left}",
        message.trim_end_matches('.'),
        locale.text(Text::AttemptsLeft)
    )
}

/// Walks the user through contact entry and code verification. `None` means
/// the user cancelled or ran out of attempts.
pub fn run_guided_auth(
    terminal: &mut dyn AuthTerminal,
    backend: &dyn ConsultationBackend,
    settings: &ShellSettings,
    retry_policy: &RetryPolicy,
) -> io::Result<Option<IdentityToken>> {
    let locale = settings.locale;
    let mut flow = AuthFlow::new(settings.rules);

    terminal.print_line(locale.text(Text::AuthTitle))?;

    let Some(method) = collect_method(terminal, locale, retry_policy.contact_attempts)? else {
        return Ok(None);
    };
    flow.select_method(method);

    if !request_code(terminal, backend, &mut flow, settings, retry_policy.contact_attempts)? {
        return Ok(None);
    }

    let Some(token) = collect_code(terminal, backend, &mut flow, settings, retry_policy.code_attempts)?
    else {
        return Ok(None);
    };

    terminal.print_line(locale.text(Text::SignedIn))?;
    Ok(Some(token))
}

fn collect_method(
    terminal: &mut dyn AuthTerminal,
    locale: Locale,
    attempts: usize,
) -> io::Result<Option<ContactMethod>> {
    for attempt in 1..=attempts {
        let Some(answer) = terminal.prompt_line(locale.text(Text::MethodPrompt))? else {
            report_cancelled(terminal, locale)?;
            return Ok(None);
        };

        match answer.to_lowercase().as_str() {
            "" | "e" | "email" => return Ok(Some(ContactMethod::Email)),
            "p" | "phone" | "т" | "телефон" => return Ok(Some(ContactMethod::Phone)),
            _ => terminal.print_line(&with_attempts_left(
                locale.text(Text::MethodRetry),
                locale,
                attempts.saturating_sub(attempt),
            ))?,
        }
    }

    Ok(None)
}

fn request_code(
    terminal: &mut dyn AuthTerminal,
    backend: &dyn ConsultationBackend,
    flow: &mut AuthFlow,
    settings: &ShellSettings,
    attempts: usize,
) -> io::Result<bool> {
    let locale = settings.locale;
    let label = match flow.method() {
        ContactMethod::Email => locale.text(Text::EmailPrompt),
        ContactMethod::Phone => locale.text(Text::PhonePrompt),
    };

    for attempt in 1..=attempts {
        let Some(value) = terminal.prompt_line(label)? else {
            report_cancelled(terminal, locale)?;
            return Ok(false);
        };
        flow.set_contact_value(&value);

        if let Some(command) = flow.request_code() {
            terminal.print_line(locale.text(Text::Sending))?;
            let result = backend.send_code(&command.contact);
            flow.apply_code_sent(command.ticket, result);
        }

        if let Some(contact) = flow.verifying_contact() {
            terminal.print_line(&format!(
                "{} {}",
                locale.text(Text::CodeSentTo),
                contact.value
            ))?;
            if settings.reveal_issued_code {
                if let Some(code) = flow.issued_code() {
                    terminal.print_line(&format!("{} {code}", locale.text(Text::DemoCode)))?;
                }
            }
            return Ok(true);
        }

        report_error(terminal, flow, settings, attempts.saturating_sub(attempt))?;
    }

    Ok(false)
}

fn collect_code(
    terminal: &mut dyn AuthTerminal,
    backend: &dyn ConsultationBackend,
    flow: &mut AuthFlow,
    settings: &ShellSettings,
    attempts: usize,
) -> io::Result<Option<IdentityToken>> {
    let locale = settings.locale;

    for attempt in 1..=attempts {
        terminal.print_line(locale.text(Text::AuthPromptVerify))?;
        let Some(raw) = terminal.prompt_secret(locale.text(Text::CodePrompt))? else {
            report_cancelled(terminal, locale)?;
            return Ok(None);
        };
        flow.enter_code(&raw);

        if let Some(command) = flow.verify() {
            terminal.print_line(locale.text(Text::Verifying))?;
            let result = backend.verify_code(&command.contact, &command.code);
            if let VerifyOutcome::Verified(token) = flow.apply_verified(command.ticket, result) {
                return Ok(Some(token));
            }
        }

        report_error(terminal, flow, settings, attempts.saturating_sub(attempt))?;
    }

    Ok(None)
}

fn report_error(
    terminal: &mut dyn AuthTerminal,
    flow: &AuthFlow,
    settings: &ShellSettings,
    attempts_left: usize,
) -> io::Result<()> {
    if let Some(error) = flow.error() {
        let message = format!("{}: {}", error.code(), error.message(settings.locale));
        terminal.print_line(&with_attempts_left(&message, settings.locale, attempts_left))?;
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::collections::VecDeque;

    use super::*;

    /// Replays scripted answers; `None` simulates EOF.
    pub struct FakeTerminal {
        pub inputs: VecDeque<Option<String>>,
        pub output: Vec<String>,
        pub prompts: Vec<String>,
    }

    impl FakeTerminal {
        pub fn new(inputs: Vec<Option<&str>>) -> Self {
            Self {
                inputs: inputs
                    .into_iter()
                    .map(|item| item.map(|value| value.to_owned()))
                    .collect(),
                output: Vec::new(),
                prompts: Vec::new(),
            }
        }

        pub fn printed(&self, needle: &str) -> bool {
            self.output.iter().any(|line| line.contains(needle))
        }
    }

    impl AuthTerminal for FakeTerminal {
        fn print_line(&mut self, line: &str) -> io::Result<()> {
            self.output.push(line.to_owned());
            Ok(())
        }

        fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
            self.prompts.push(prompt.to_owned());
            Ok(self.inputs.pop_front().flatten())
        }

        fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
            self.prompts.push(prompt.to_owned());
            Ok(self.inputs.pop_front().flatten())
        }
    }
}
