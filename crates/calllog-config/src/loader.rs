//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use calllog_core::CallLogError;
use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "CALLLOG";

/// Variable selecting the environment-specific TOML layer.
pub const ENVIRONMENT_VAR: &str = "CALLLOG_ENVIRONMENT";

const DEFAULT_ENVIRONMENT: &str = "development";

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. `CALLLOG_<SECTION>__<KEY>` environment variables
    pub fn new(config_dir: impl Into<String>) -> Result<Self, CallLogError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, CallLogError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    ///
    /// An invalid configuration is rejected and the current one is kept.
    pub async fn reload(&self) -> Result<(), CallLogError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Loads configuration from the specified directory and the process environment.
    fn load_config(config_dir: &str) -> Result<AppConfig, CallLogError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = std::env::var(ENVIRONMENT_VAR)
            .unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string());

        load_layers(config_dir, &environment, environment_overrides())
    }

    /// Gets a specific configuration value by key path.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

/// Merges the TOML layers for `environment` with `overrides` and validates the result.
fn load_layers(
    config_dir: &str,
    environment: &str,
    overrides: Environment,
) -> Result<AppConfig, CallLogError> {
    info!("Loading configuration for environment: {}", environment);

    let mut builder = Config::builder();
    for layer in ["default", environment, "local"] {
        let path = Path::new(config_dir).join(format!("{}.toml", layer));
        if path.exists() {
            debug!("Loading config from: {}", path.display());
            builder = builder.add_source(File::from(path).required(false));
        }
    }

    let app_config: AppConfig = builder
        .add_source(overrides)
        .build()
        .and_then(|config| config.try_deserialize())
        .map_err(config_error_to_calllog_error)?;

    ConfigValidator::validate(&app_config).map_err(|errors| {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        CallLogError::Configuration(joined)
    })?;

    Ok(app_config)
}

/// `CALLLOG_<SECTION>__<KEY>` variables, e.g. `CALLLOG_INTERCEPTOR__FAILURE_POLICY`.
///
/// `CALLLOG_INTERCEPTOR__EXCLUSION_MARKERS` takes a comma-separated list.
fn environment_overrides() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("interceptor.exclusion_markers")
        .try_parsing(true)
}

fn config_error_to_calllog_error(err: ConfigError) -> CallLogError {
    CallLogError::Configuration(err.to_string())
}
