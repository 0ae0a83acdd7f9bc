//! Argument values handed to the interceptor by the dispatcher.

use serde::Serialize;
use serde_json::Value;

/// A single handler argument, captured for logging.
///
/// Arguments are converted to a JSON tree when the dispatcher builds them, so
/// the interceptor never needs to know the handler's concrete parameter types.
/// A value that cannot be converted is kept as an error and rendered as a
/// marker by the serializer instead of failing the whole call.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Structured value.
    Json(Value),
    /// The value could not be captured; holds the reason.
    Unserializable(String),
}

impl ArgValue {
    /// Captures any serializable value.
    pub fn of<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => Self::Json(json),
            Err(e) => Self::Unserializable(e.to_string()),
        }
    }
}

impl From<Value> for ArgValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}
