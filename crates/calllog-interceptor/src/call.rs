//! Request-scoped record of one intercepted handler call.

use calllog_core::{HandlerFailure, RequestInfo};
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// One serialized handler argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Declared parameter name.
    pub name: String,
    /// Serialized value.
    pub value: String,
}

impl Parameter {
    /// Creates a parameter.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// A single in-flight handler invocation.
///
/// Built when the interceptor is entered and dropped when the request ends.
#[derive(Debug, Clone)]
pub struct InterceptedCall {
    /// Inbound request metadata.
    pub request: RequestInfo,
    /// Fully qualified handler type name.
    pub target_type_name: String,
    /// Handler operation name.
    pub target_operation_name: String,
    /// Module derived from the type name, or the unknown-module marker.
    pub module_name: String,
    /// Arguments in declaration order.
    pub parameters: Vec<Parameter>,
    /// Wall-clock time the handler was entered.
    pub started_at: Option<DateTime<Utc>>,
    /// Time spent inside the handler.
    pub elapsed: Option<Duration>,
    /// Classified failure, if the handler raised.
    pub failure: Option<HandlerFailure>,
}

impl InterceptedCall {
    /// Joins the parameters as `name=value` pairs.
    #[must_use]
    pub fn parameter_line(&self, delimiter: &str) -> String {
        self.parameters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(delimiter)
    }

    /// Records how the handler invocation ended.
    pub fn record_outcome(
        &mut self,
        started_at: DateTime<Utc>,
        elapsed: Duration,
        failure: Option<HandlerFailure>,
    ) {
        self.started_at = Some(started_at);
        self.elapsed = Some(elapsed);
        self.failure = failure;
    }
}

/// Renders a duration as milliseconds with microsecond precision.
#[must_use]
pub fn format_millis(elapsed: Duration) -> String {
    format!("{:.3}", elapsed.as_secs_f64() * 1000.0)
}
