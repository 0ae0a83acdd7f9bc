//! JSON argument serializer.

use calllog_core::{ArgValue, CallLogError, CallLogResult, ValueSerializer};
use serde_json::Value;

/// Renders arguments as compact JSON.
///
/// Top-level strings are written bare, so `"10.50"` logs as `10.50`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonValueSerializer;

impl ValueSerializer for JsonValueSerializer {
    fn serialize(&self, value: &ArgValue) -> CallLogResult<String> {
        match value {
            ArgValue::Json(Value::String(text)) => Ok(text.clone()),
            ArgValue::Json(other) => Ok(serde_json::to_string(other)?),
            ArgValue::Unserializable(reason) => Err(CallLogError::serialization(reason.clone())),
        }
    }
}
