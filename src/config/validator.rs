use thiserror::Error;

use crate::config::{ApiSettings, LoggingSettings, ServerSettings, Settings};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_api(&settings.api) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_server(&settings.server) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_logging(&settings.logging) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_api(api: &ApiSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if api.base_url.trim().is_empty() {
            errors.push(ValidationError::MissingField("api.base_url".to_string()));
        } else if !(api.base_url.starts_with("http://") || api.base_url.starts_with("https://")) {
            errors.push(ValidationError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: "URL must start with http:// or https://".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &ServerSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_logging(logging: &LoggingSettings) -> Result<(), Vec<ValidationError>> {
        let level = logging.level.to_ascii_lowercase();
        if LOG_LEVELS.contains(&level.as_str()) {
            Ok(())
        } else {
            Err(vec![ValidationError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Expected one of {}", LOG_LEVELS.join(", ")),
            }])
        }
    }
}
