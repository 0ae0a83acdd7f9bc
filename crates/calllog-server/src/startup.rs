//! Server startup utilities.

use calllog_config::AppConfig;
use tracing::info;

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("REST API:  http://{}", config.server.addr());
    info!("Health:    http://{}/health", config.server.addr());
    info!("Handlers:  prefix '{}', segment '{}'", config.interceptor.base_prefix, config.interceptor.handler_segment);
    info!("Policy:    {}", config.interceptor.failure_policy);
    info!("{}", separator);
}
