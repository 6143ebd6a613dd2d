//! Errors a dialog shows inline. None of them are fatal to the application.

use super::locale::{Locale, Text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    InvalidEmail,
    InvalidPhone,
    IncompleteCode,
    InvalidDate,
    PastDate,
    InvalidTime,
    DescriptionTooLong,
}

/// Which remote operation failed at the transport level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailure {
    SendCode,
    VerifyCode,
    CreateBooking,
    ListBookings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    /// Rejected before any request was made.
    Validation(ValidationError),
    /// The request never produced a usable reply.
    Network(NetworkFailure),
    /// Business rejection; message is passed through verbatim.
    Server(String),
}

impl DialogError {
    pub fn message(&self, locale: Locale) -> String {
        match self {
            Self::Validation(error) => locale.text(validation_text(*error)).to_owned(),
            Self::Network(failure) => locale.text(network_text(*failure)).to_owned(),
            Self::Server(message) => message.clone(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "DIALOG_VALIDATION_ERROR",
            Self::Network(_) => "DIALOG_NETWORK_ERROR",
            Self::Server(_) => "DIALOG_SERVER_ERROR",
        }
    }
}

fn validation_text(error: ValidationError) -> Text {
    match error {
        ValidationError::InvalidEmail => Text::InvalidEmail,
        ValidationError::InvalidPhone => Text::InvalidPhone,
        ValidationError::IncompleteCode => Text::IncompleteCode,
        ValidationError::InvalidDate => Text::InvalidDate,
        ValidationError::PastDate => Text::PastDate,
        ValidationError::InvalidTime => Text::InvalidTime,
        ValidationError::DescriptionTooLong => Text::DescriptionTooLong,
    }
}

fn network_text(failure: NetworkFailure) -> Text {
    match failure {
        NetworkFailure::SendCode => Text::SendCodeFailed,
        NetworkFailure::VerifyCode => Text::VerifyCodeFailed,
        NetworkFailure::CreateBooking => Text::CreateBookingFailed,
        NetworkFailure::ListBookings => Text::ListBookingsFailed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_not_localised() {
        let error = DialogError::Server("Invalid code".to_owned());

        assert_eq!(error.message(Locale::Ru), "Invalid code");
        assert_eq!(error.message(Locale::En), "Invalid code");
    }

    #[test]
    fn network_message_follows_locale() {
        let error = DialogError::Network(NetworkFailure::VerifyCode);

        assert_eq!(error.message(Locale::En), "Error verifying code");
        assert_eq!(error.message(Locale::Ru), "Ошибка проверки кода");
    }
}
