//! Unified error types for the interceptor and its host adapters.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unified error type for Calllog.
///
/// Only `MissingRequestContext`, `ParameterMismatch` and (under the
/// log-and-rethrow policy) `Handler` ever leave the interceptor. The other
/// variants are recovered inside it or raised by configuration loading.
#[derive(Error, Debug)]
pub enum CallLogError {
    // ============ Interception Errors ============
    /// No request context is active for the current call.
    #[error("No active request context for the current call")]
    MissingRequestContext,

    /// The target type name does not carry the base prefix followed by a separator.
    #[error("Cannot derive module from '{type_name}' with prefix '{prefix}'")]
    ModuleDerivation { type_name: String, prefix: String },

    /// Declared parameter names and supplied argument values differ in length.
    #[error("Parameter mismatch: {names} declared names but {values} argument values")]
    ParameterMismatch { names: usize, values: usize },

    /// An argument value could not be rendered for logging.
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ============ Handler Errors ============
    /// The wrapped handler failed.
    #[error("Handler failed: {failure}")]
    Handler {
        failure: HandlerFailure,
        cause: anyhow::Error,
    },

    // ============ Infrastructure Errors ============
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CallLogError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ParameterMismatch { .. } => 400,
            Self::MissingRequestContext
            | Self::ModuleDerivation { .. }
            | Self::Serialization(_)
            | Self::Handler { .. }
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingRequestContext => "MISSING_REQUEST_CONTEXT",
            Self::ModuleDerivation { .. } => "MODULE_DERIVATION_ERROR",
            Self::ParameterMismatch { .. } => "PARAMETER_MISMATCH",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Handler { .. } => "HANDLER_FAILURE",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a module derivation error.
    #[must_use]
    pub fn module_derivation(type_name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::ModuleDerivation {
            type_name: type_name.into(),
            prefix: prefix.into(),
        }
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization<T: Into<String>>(message: T) -> Self {
        Self::Serialization(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the classified handler failure, if this error carries one.
    #[must_use]
    pub const fn handler_failure(&self) -> Option<&HandlerFailure> {
        match self {
            Self::Handler { failure, .. } => Some(failure),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CallLogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Classified record of a failure raised by a wrapped handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerFailure {
    /// Type name of the handler's declared error type, `panic`, or `cancelled`.
    ///
    /// Handlers returning `anyhow::Error` are all recorded as `anyhow::Error`;
    /// the concrete cause appears in the message and stack trace.
    pub type_name: String,
    /// Human-readable text, possibly empty.
    pub message: String,
    /// Formatted stack trace.
    pub stack_trace: String,
}

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `CallLogError`.
    #[must_use]
    pub fn from_error(error: &CallLogError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

impl From<&CallLogError> for ErrorResponse {
    fn from(error: &CallLogError) -> Self {
        Self::from_error(error)
    }
}
