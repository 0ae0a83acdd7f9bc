//! Configuration validation module.
//!
//! Fails fast on configuration the interceptor cannot work with, rather than
//! producing garbled log lines at request time.

use crate::{AppConfig, InterceptorConfig, ServerConfig};
use calllog_core::TelemetryConfig;
use std::fmt;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// A required text setting is empty.
    EmptySetting { name: String },
    /// An exclusion marker is empty and would exclude every operation.
    EmptyExclusionMarker { index: usize },
    /// The base prefix is non-empty but does not end with the separator.
    PrefixWithoutSeparator { prefix: String, separator: String },
    /// Port number is invalid.
    InvalidPort { value: u16 },
    /// Log format is not recognised.
    InvalidLogFormat { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySetting { name } => write!(f, "Setting '{}' must not be empty", name),
            Self::EmptyExclusionMarker { index } => {
                write!(f, "Exclusion marker #{} is empty and would exclude every operation", index)
            }
            Self::PrefixWithoutSeparator { prefix, separator } => {
                write!(
                    f,
                    "Base prefix '{}' must end with the separator '{}'",
                    prefix, separator
                )
            }
            Self::InvalidPort { value } => write!(f, "Invalid port: {} (must be 1-65535)", value),
            Self::InvalidLogFormat { value } => {
                write!(f, "Invalid log format: '{}' (valid: pretty, json)", value)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    const VALID_LOG_FORMATS: &'static [&'static str] = &["pretty", "json"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_interceptor(&config.interceptor, &mut errors);
        Self::validate_server(&config.server, &mut errors);
        Self::validate_telemetry(&config.telemetry, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validates interceptor configuration.
    pub fn validate_interceptor(config: &InterceptorConfig, errors: &mut Vec<ConfigValidationError>) {
        for (name, value) in [
            ("separator", &config.separator),
            ("handler_segment", &config.handler_segment),
            ("unknown_module", &config.unknown_module),
        ] {
            if value.is_empty() {
                errors.push(ConfigValidationError::EmptySetting {
                    name: name.to_string(),
                });
            }
        }

        for (index, marker) in config.exclusion_markers.iter().enumerate() {
            if marker.is_empty() {
                errors.push(ConfigValidationError::EmptyExclusionMarker { index });
            }
        }

        if !config.base_prefix.is_empty()
            && !config.separator.is_empty()
            && !config.base_prefix.ends_with(&config.separator)
        {
            errors.push(ConfigValidationError::PrefixWithoutSeparator {
                prefix: config.base_prefix.clone(),
                separator: config.separator.clone(),
            });
        }
    }

    fn validate_server(config: &ServerConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.port == 0 {
            errors.push(ConfigValidationError::InvalidPort { value: config.port });
        }
    }

    fn validate_telemetry(config: &TelemetryConfig, errors: &mut Vec<ConfigValidationError>) {
        let format = config.log_format.to_ascii_lowercase();
        if !Self::VALID_LOG_FORMATS.contains(&format.as_str()) {
            errors.push(ConfigValidationError::InvalidLogFormat {
                value: config.log_format.clone(),
            });
        }
    }
}
