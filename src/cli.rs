use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "consult",
    about = "Sign in and book IT consultations from the terminal (CLI + TUI)"
)]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Start the TUI shell
    Run,
    /// Sign in with a one-time code and print the identity token
    Login,
    /// Sign in, then book a consultation
    Book {
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// Time as HH:MM
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Sign in, then list your consultations
    Bookings,
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn defaults_to_run_when_command_is_missing() {
        let cli = Cli::parse_from(["consult"]);

        assert_eq!(cli.command_or_default(), Command::Run);
    }

    #[test]
    fn parses_explicit_run_command_with_config() {
        let cli = Cli::parse_from(["consult", "run", "--config", "custom.toml"]);

        assert_eq!(cli.command_or_default(), Command::Run);
        assert_eq!(
            cli.config
                .as_deref()
                .map(|p| p.to_string_lossy().to_string()),
            Some("custom.toml".to_owned())
        );
    }

    #[test]
    fn parses_book_with_partial_fields() {
        let cli = Cli::parse_from(["consult", "book", "--date", "2024-06-01"]);

        assert_eq!(
            cli.command_or_default(),
            Command::Book {
                date: Some("2024-06-01".to_owned()),
                time: None,
                description: None,
            }
        );
    }

    #[test]
    fn parses_login_and_bookings() {
        assert_eq!(
            Cli::parse_from(["consult", "login"]).command_or_default(),
            Command::Login
        );
        assert_eq!(
            Cli::parse_from(["consult", "bookings"]).command_or_default(),
            Command::Bookings
        );
    }
}
