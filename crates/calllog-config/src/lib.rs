//! # Calllog Config
//!
//! Configuration management for the Calllog interceptor and its host server.
//! Supports layered configuration from files, environment variables,
//! and runtime refresh.

mod app_config;
mod interceptor_config;
mod loader;
mod validation;

pub use app_config::*;
pub use interceptor_config::*;
pub use loader::*;
pub use validation::*;
