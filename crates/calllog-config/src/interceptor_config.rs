//! Interceptor configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the interceptor does after logging a handler failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Swallow the failure and hand the dispatcher the result type's default value.
    #[default]
    MaskAndDefault,
    /// Propagate the failure to the dispatcher after logging it.
    LogAndRethrow,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaskAndDefault => write!(f, "mask_and_default"),
            Self::LogAndRethrow => write!(f, "log_and_rethrow"),
        }
    }
}

/// Interceptor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterceptorConfig {
    /// Prefix stripped from the target type name before taking the module segment.
    pub base_prefix: String,
    /// Path separator inside fully qualified type names.
    pub separator: String,
    /// Package segment that marks a type as part of the handler group.
    pub handler_segment: String,
    /// Operations whose name contains any of these markers are not intercepted.
    pub exclusion_markers: Vec<String>,
    /// Module value logged when derivation fails.
    pub unknown_module: String,
    /// Behavior after a handler failure has been logged.
    pub failure_policy: FailurePolicy,
    /// Delimiter between `name=value` pairs on the parameter line.
    pub parameter_delimiter: String,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            base_prefix: "org.example.".to_string(),
            separator: ".".to_string(),
            handler_segment: "controller".to_string(),
            exclusion_markers: vec!["upload".to_string()],
            unknown_module: "unknown".to_string(),
            failure_policy: FailurePolicy::MaskAndDefault,
            parameter_delimiter: ", ".to_string(),
        }
    }
}
