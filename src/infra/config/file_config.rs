use serde::Deserialize;

use crate::{
    domain::locale::Locale,
    infra::config::{
        AppConfig, AuthConfig, BookingConfig, EndpointsConfig, LogConfig, SessionConfig,
        UiConfig, ValidationConfig,
    },
};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub endpoints: Option<FileEndpointsConfig>,
    pub validation: Option<FileValidationConfig>,
    pub booking: Option<FileBookingConfig>,
    pub auth: Option<FileAuthConfig>,
    pub session: Option<FileSessionConfig>,
    pub ui: Option<FileUiConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(endpoints) = self.endpoints {
            endpoints.merge_into(&mut config.endpoints);
        }

        if let Some(validation) = self.validation {
            validation.merge_into(&mut config.validation);
        }

        if let Some(booking) = self.booking {
            booking.merge_into(&mut config.booking);
        }

        if let Some(auth) = self.auth {
            auth.merge_into(&mut config.auth);
        }

        if let Some(session) = self.session {
            session.merge_into(&mut config.session);
        }

        if let Some(ui) = self.ui {
            ui.merge_into(&mut config.ui);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
    pub file_prefix: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }

        if let Some(file_prefix) = self.file_prefix {
            config.file_prefix = file_prefix;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileEndpointsConfig {
    pub auth_url: Option<String>,
    pub booking_url: Option<String>,
    pub identity_header: Option<String>,
    pub request_timeout_ms: Option<u64>,
}

impl FileEndpointsConfig {
    fn merge_into(self, config: &mut EndpointsConfig) {
        if let Some(auth_url) = self.auth_url {
            config.auth_url = auth_url;
        }

        if let Some(booking_url) = self.booking_url {
            config.booking_url = booking_url;
        }

        if let Some(identity_header) = self.identity_header {
            config.identity_header = identity_header;
        }

        if let Some(timeout_ms) = self.request_timeout_ms {
            config.request_timeout_ms = timeout_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileValidationConfig {
    pub phone_min_digits: Option<usize>,
    pub code_length: Option<usize>,
}

impl FileValidationConfig {
    fn merge_into(self, config: &mut ValidationConfig) {
        if let Some(phone_min_digits) = self.phone_min_digits {
            config.phone_min_digits = phone_min_digits;
        }

        if let Some(code_length) = self.code_length {
            config.code_length = code_length;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileBookingConfig {
    pub success_delay_ms: Option<u64>,
}

impl FileBookingConfig {
    fn merge_into(self, config: &mut BookingConfig) {
        if let Some(delay_ms) = self.success_delay_ms {
            config.success_delay_ms = delay_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileAuthConfig {
    pub reveal_issued_code: Option<bool>,
}

impl FileAuthConfig {
    fn merge_into(self, config: &mut AuthConfig) {
        if let Some(reveal) = self.reveal_issued_code {
            config.reveal_issued_code = reveal;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileSessionConfig {
    pub token_ttl_secs: Option<u64>,
}

impl FileSessionConfig {
    fn merge_into(self, config: &mut SessionConfig) {
        if let Some(ttl) = self.token_ttl_secs {
            config.token_ttl_secs = Some(ttl);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileUiConfig {
    pub locale: Option<Locale>,
}

impl FileUiConfig {
    fn merge_into(self, config: &mut UiConfig) {
        if let Some(locale) = self.locale {
            config.locale = locale;
        }
    }
}
