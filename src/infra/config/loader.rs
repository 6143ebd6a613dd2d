use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::infra::{
    config::{file_config::FileConfig, AppConfig},
    error::AppError,
};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

pub fn load(path: Option<&Path>) -> Result<AppConfig, AppError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = AppConfig::default();

    if !config_path.exists() {
        return Ok(config);
    }

    let raw = fs::read_to_string(&config_path).map_err(|source| AppError::ConfigRead {
        path: config_path.clone(),
        source,
    })?;

    let file_config: FileConfig = toml::from_str(&raw).map_err(|source| AppError::ConfigParse {
        path: config_path,
        source,
    })?;

    file_config.merge_into(&mut config);
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), AppError> {
    if config.validation.code_length == 0 {
        return Err(AppError::ConfigInvalid {
            field: "validation.code_length",
            details: "must be at least 1".into(),
        });
    }

    if config.validation.phone_min_digits == 0 {
        return Err(AppError::ConfigInvalid {
            field: "validation.phone_min_digits",
            details: "must be at least 1".into(),
        });
    }

    for (field, url) in [
        ("endpoints.auth_url", &config.endpoints.auth_url),
        ("endpoints.booking_url", &config.endpoints.booking_url),
    ] {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(AppError::ConfigInvalid {
                field,
                details: format!("expected an http(s) URL, got {url:?}"),
            });
        }
    }

    if config.endpoints.identity_header.trim().is_empty() {
        return Err(AppError::ConfigInvalid {
            field: "endpoints.identity_header",
            details: "must not be empty".into(),
        });
    }

    Ok(())
}
