//! Capabilities the interceptor consumes from its host.
//!
//! None of these are implemented by the interceptor itself. The REST adapter
//! ships default implementations; tests supply in-memory doubles.

use crate::{ArgValue, CallLogResult};
use serde::{Deserialize, Serialize};

/// Request metadata captured from the inbound HTTP call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    /// Full request URL (scheme, host and path).
    pub url: String,
    /// HTTP method.
    pub method: String,
    /// Remote address of the caller.
    pub caller_address: String,
}

impl RequestInfo {
    /// Creates request metadata.
    pub fn new(
        url: impl Into<String>,
        method: impl Into<String>,
        caller_address: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            caller_address: caller_address.into(),
        }
    }
}

/// Accessor for the request currently being dispatched.
///
/// Only valid within the dynamic extent of one dispatched call. Outside of it,
/// implementations must return [`crate::CallLogError::MissingRequestContext`].
pub trait RequestContextAccessor: Send + Sync {
    /// Returns the request bound to the current logical call.
    fn current_request(&self) -> CallLogResult<RequestInfo>;
}

/// Renders a single argument value as text for the parameter log line.
///
/// Must be free of side effects and deterministic.
pub trait ValueSerializer: Send + Sync {
    /// Serializes one argument value.
    fn serialize(&self, value: &ArgValue) -> CallLogResult<String>;
}

/// Converts a raised failure into a printable stack trace.
pub trait StackTraceFormatter: Send + Sync {
    /// Formats the failure, including its cause chain where available.
    fn format(&self, failure: &anyhow::Error) -> String;
}

/// A structured key/value attached to a log line.
pub type LogField<'a> = (&'static str, &'a str);

/// Append-only log sink. Return values are never consulted.
pub trait LogSink: Send + Sync {
    /// Emits an info-level line.
    fn info(&self, message: &str, fields: &[LogField<'_>]);

    /// Emits an error-level line.
    fn error(&self, message: &str, fields: &[LogField<'_>]);

    /// Flushes buffered output. Called once at shutdown.
    fn flush(&self) {}
}
