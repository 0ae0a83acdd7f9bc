//! Failure classification.

use calllog_core::{CallLogError, HandlerFailure, StackTraceFormatter};
use std::any::Any;
use std::sync::Arc;

/// Type name recorded for a handler that panicked.
pub const PANIC_TYPE_NAME: &str = "panic";

/// Type name recorded for a handler whose future was dropped before completing.
pub const CANCELLED_TYPE_NAME: &str = "cancelled";

/// Turns raised failures into `(type, message, stack trace)` records.
///
/// There is no taxonomy beyond the type name: every failure is classified
/// and logged the same way.
#[derive(Clone)]
pub struct FailureClassifier {
    formatter: Arc<dyn StackTraceFormatter>,
}

impl FailureClassifier {
    /// Creates a classifier using the given stack trace formatter.
    pub fn new(formatter: Arc<dyn StackTraceFormatter>) -> Self {
        Self { formatter }
    }

    /// Classifies a failure returned by the handler.
    ///
    /// The type name is the handler's declared error type `E`, not the
    /// variant or the root cause behind it.
    pub fn classify<E>(&self, err: E) -> (HandlerFailure, anyhow::Error)
    where
        E: Into<anyhow::Error>,
    {
        let type_name = std::any::type_name::<E>();
        let cause = err.into();
        let failure = HandlerFailure {
            type_name: type_name.to_string(),
            message: cause.to_string(),
            stack_trace: self.formatter.format(&cause),
        };
        (failure, cause)
    }

    /// Classifies a panic payload caught while the handler ran.
    pub fn classify_panic(&self, payload: &(dyn Any + Send)) -> (HandlerFailure, anyhow::Error) {
        let cause = anyhow::anyhow!(panic_message(payload));
        let failure = HandlerFailure {
            type_name: PANIC_TYPE_NAME.to_string(),
            message: cause.to_string(),
            stack_trace: self.formatter.format(&cause),
        };
        (failure, cause)
    }

    /// Classifies a failure and wraps it as a [`CallLogError::Handler`].
    pub fn into_error<E>(&self, err: E) -> CallLogError
    where
        E: Into<anyhow::Error>,
    {
        let (failure, cause) = self.classify(err);
        CallLogError::Handler { failure, cause }
    }
}

/// Failure record for a handler abandoned mid-flight.
#[must_use]
pub fn cancellation_failure() -> HandlerFailure {
    let message = "handler dropped before completion".to_string();
    HandlerFailure {
        type_name: CANCELLED_TYPE_NAME.to_string(),
        stack_trace: message.clone(),
        message,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ChainFormatter, InsufficientFunds};

    fn classifier() -> FailureClassifier {
        FailureClassifier::new(Arc::new(ChainFormatter))
    }

    #[test]
    fn test_classify_typed_error() {
        let (failure, cause) = classifier().classify(InsufficientFunds);
        assert!(failure.type_name.ends_with("InsufficientFunds"));
        assert_eq!(failure.message, "insufficient funds");
        assert!(failure.stack_trace.contains("insufficient funds"));
        assert_eq!(cause.to_string(), "insufficient funds");
    }

    #[test]
    fn test_classify_keeps_context_chain() {
        let err = anyhow::Error::new(InsufficientFunds).context("charging invoice 42");
        let (failure, _) = classifier().classify(err);
        assert_eq!(failure.type_name, "anyhow::Error");
        assert_eq!(failure.message, "charging invoice 42");
        assert!(failure.stack_trace.contains("insufficient funds"));
    }

    #[test]
    fn test_type_name_is_declared_error_type() {
        #[derive(Debug, thiserror::Error)]
        enum LedgerError {
            #[error("ledger locked")]
            Locked,
        }

        let (failure, _) = classifier().classify(LedgerError::Locked);
        assert!(failure.type_name.ends_with("LedgerError"));
        assert_eq!(failure.message, "ledger locked");

        let (failure, _) = classifier().classify(anyhow::Error::new(LedgerError::Locked));
        assert_eq!(failure.type_name, "anyhow::Error");
        assert!(failure.stack_trace.contains("ledger locked"));
    }

    #[test]
    fn test_classify_empty_message() {
        let (failure, _) = classifier().classify(anyhow::anyhow!(""));
        assert_eq!(failure.message, "");
    }

    #[test]
    fn test_classify_panic_payloads() {
        let static_payload: Box<dyn Any + Send> = Box::new("boom");
        let (failure, _) = classifier().classify_panic(static_payload.as_ref());
        assert_eq!(failure.type_name, PANIC_TYPE_NAME);
        assert_eq!(failure.message, "boom");

        let owned_payload: Box<dyn Any + Send> = Box::new(String::from("index out of range"));
        let (failure, _) = classifier().classify_panic(owned_payload.as_ref());
        assert_eq!(failure.message, "index out of range");

        let opaque_payload: Box<dyn Any + Send> = Box::new(7_u8);
        let (failure, _) = classifier().classify_panic(opaque_payload.as_ref());
        assert_eq!(failure.message, "Box<dyn Any>");
    }

    #[test]
    fn test_into_error() {
        let err = classifier().into_error(InsufficientFunds);
        let failure = err.handler_failure().unwrap();
        assert_eq!(failure.message, "insufficient funds");
        assert_eq!(err.error_code(), "HANDLER_FAILURE");
    }

    #[test]
    fn test_cancellation_failure() {
        let failure = cancellation_failure();
        assert_eq!(failure.type_name, CANCELLED_TYPE_NAME);
        assert!(!failure.message.is_empty());
    }
}
