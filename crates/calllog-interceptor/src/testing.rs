//! In-memory doubles for the host capabilities.

use calllog_core::{
    ArgValue, CallLogError, CallLogResult, LogField, LogSink, RequestContextAccessor,
    RequestInfo, StackTraceFormatter, ValueSerializer,
};
use parking_lot::Mutex;
use serde_json::Value;

/// One captured log line.
#[derive(Debug, Clone)]
pub struct Record {
    pub is_error: bool,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl Record {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Log sink that keeps every line in memory.
#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<Record>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.message.clone()).collect()
    }

    pub fn errors(&self) -> usize {
        self.records.lock().iter().filter(|r| r.is_error).count()
    }

    fn push(&self, is_error: bool, message: &str, fields: &[LogField<'_>]) {
        self.records.lock().push(Record {
            is_error,
            message: message.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        });
    }
}

impl LogSink for RecordingSink {
    fn info(&self, message: &str, fields: &[LogField<'_>]) {
        self.push(false, message, fields);
    }

    fn error(&self, message: &str, fields: &[LogField<'_>]) {
        self.push(true, message, fields);
    }
}

/// Request context returning a fixed request, or none at all.
pub struct FixedContext(Option<RequestInfo>);

impl FixedContext {
    pub fn missing() -> Self {
        Self(None)
    }
}

impl Default for FixedContext {
    fn default() -> Self {
        Self(Some(RequestInfo::new(
            "http://localhost:8080/billing/invoices",
            "POST",
            "127.0.0.1",
        )))
    }
}

impl RequestContextAccessor for FixedContext {
    fn current_request(&self) -> CallLogResult<RequestInfo> {
        self.0.clone().ok_or(CallLogError::MissingRequestContext)
    }
}

/// Strings bare, everything else compact JSON.
pub struct JsonTextSerializer;

impl ValueSerializer for JsonTextSerializer {
    fn serialize(&self, value: &ArgValue) -> CallLogResult<String> {
        match value {
            ArgValue::Json(Value::String(text)) => Ok(text.clone()),
            ArgValue::Json(other) => Ok(serde_json::to_string(other)?),
            ArgValue::Unserializable(reason) => Err(CallLogError::serialization(reason.clone())),
        }
    }
}

/// Formats the cause chain, one cause per line.
pub struct ChainFormatter;

impl StackTraceFormatter for ChainFormatter {
    fn format(&self, failure: &anyhow::Error) -> String {
        failure
            .chain()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("insufficient funds")]
pub struct InsufficientFunds;
