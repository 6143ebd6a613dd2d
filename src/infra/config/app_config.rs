use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{contact::ValidationRules, locale::Locale, shell_state::ShellSettings};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub endpoints: EndpointsConfig,
    pub validation: ValidationConfig,
    pub booking: BookingConfig,
    pub auth: AuthConfig,
    pub session: SessionConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    pub fn shell_settings(&self) -> ShellSettings {
        ShellSettings {
            locale: self.ui.locale,
            reveal_issued_code: self.auth.reveal_issued_code,
            rules: self.validation.rules(),
            success_delay: Duration::from_millis(self.booking.success_delay_ms),
            session_ttl: self.session.token_ttl_secs.map(Duration::from_secs),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file_prefix: "consult.log".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointsConfig {
    pub auth_url: String,
    pub booking_url: String,
    pub identity_header: String,
    pub request_timeout_ms: u64,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            auth_url: "https://functions.poehali.dev/fa068b12-cf81-465a-aec3-348b02b97852"
                .to_owned(),
            booking_url: "https://functions.poehali.dev/90f085fc-8cff-4b93-807b-81e2bde94b6d"
                .to_owned(),
            identity_header: "X-User-Id".to_owned(),
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationConfig {
    pub phone_min_digits: usize,
    pub code_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        let rules = ValidationRules::default();
        Self {
            phone_min_digits: rules.phone_min_digits,
            code_length: rules.code_length,
        }
    }
}

impl ValidationConfig {
    pub fn rules(&self) -> ValidationRules {
        ValidationRules {
            phone_min_digits: self.phone_min_digits,
            code_length: self.code_length,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingConfig {
    pub success_delay_ms: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            success_delay_ms: 2_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AuthConfig {
    /// Show a code echoed back by a demonstration endpoint.
    pub reveal_issued_code: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SessionConfig {
    pub token_ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UiConfig {
    pub locale: Locale,
}
