mod app_config;
mod file_config;
mod loader;

pub use app_config::{
    AppConfig, AuthConfig, BookingConfig, EndpointsConfig, LogConfig, SessionConfig, UiConfig,
    ValidationConfig,
};
pub use loader::load;
