//! Log line emission.

use crate::{format_millis, InterceptedCall};
use calllog_core::{CallLogError, HandlerFailure, LogSink};
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Formats and sends the interceptor's log lines to the sink.
#[derive(Clone)]
pub struct LogEmitter {
    sink: Arc<dyn LogSink>,
    parameter_delimiter: String,
}

impl LogEmitter {
    /// Creates an emitter writing to `sink`.
    pub fn new(sink: Arc<dyn LogSink>, parameter_delimiter: impl Into<String>) -> Self {
        Self {
            sink,
            parameter_delimiter: parameter_delimiter.into(),
        }
    }

    /// Emits the request URL, method, caller address and target identity lines.
    pub fn request(&self, call: &InterceptedCall) {
        self.sink.info("Request URL", &[("url", call.request.url.as_str())]);
        self.sink.info("HTTP method", &[("method", call.request.method.as_str())]);
        self.sink
            .info("Caller address", &[("ip", call.request.caller_address.as_str())]);
        self.sink.info(
            "Target handler",
            &[
                ("type", call.target_type_name.as_str()),
                ("operation", call.target_operation_name.as_str()),
                ("module", call.module_name.as_str()),
            ],
        );
    }

    /// Emits the parameter list line.
    pub fn parameters(&self, call: &InterceptedCall) {
        let line = call.parameter_line(&self.parameter_delimiter);
        self.sink.info("Parameters", &[("params", line.as_str())]);
    }

    /// Emits the stack trace line followed by the type and message line.
    pub fn failure(&self, failure: &HandlerFailure) {
        self.sink
            .error("Handler raised", &[("stack_trace", failure.stack_trace.as_str())]);
        self.sink
            .error("Handler failure", &[("exception", failure.to_string().as_str())]);
    }

    /// Emits the reason an interception could not proceed.
    pub fn aborted(&self, error: &CallLogError) {
        self.sink
            .error("Interception aborted", &[("error", error.to_string().as_str())]);
    }

    /// Emits the failure lines, if the call failed, and the completion summary.
    pub fn finished(&self, call: &InterceptedCall) {
        if let Some(failure) = &call.failure {
            self.failure(failure);
        }
        self.completion(
            &call.target_type_name,
            &call.target_operation_name,
            &call.request.url,
            call.started_at,
            call.elapsed.unwrap_or_default(),
        );
    }

    /// Emits the completion summary.
    pub fn completion(
        &self,
        type_name: &str,
        operation: &str,
        url: &str,
        started_at: Option<DateTime<Utc>>,
        elapsed: Duration,
    ) {
        let message = format!("{}.{} completed", type_name, operation);
        let started_at = started_at.map(|at| at.to_rfc3339_opts(SecondsFormat::Micros, true));
        let elapsed_ms = format_millis(elapsed);

        let mut fields = vec![("url", url)];
        if let Some(started_at) = &started_at {
            fields.push(("started_at", started_at.as_str()));
        }
        fields.push(("elapsed_ms", elapsed_ms.as_str()));
        self.sink.info(&message, &fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSink;
    use crate::Parameter;
    use calllog_core::RequestInfo;

    fn call() -> InterceptedCall {
        InterceptedCall {
            request: RequestInfo::new("http://localhost/invoices", "POST", "10.0.0.7"),
            target_type_name: "org.example.billing.controller.InvoiceHandler".to_string(),
            target_operation_name: "create".to_string(),
            module_name: "billing".to_string(),
            parameters: vec![Parameter::new("id", "42")],
            started_at: None,
            elapsed: None,
            failure: None,
        }
    }

    #[test]
    fn test_request_lines() {
        let sink = Arc::new(RecordingSink::default());
        let emitter = LogEmitter::new(sink.clone(), ", ");
        emitter.request(&call());

        assert_eq!(
            sink.messages(),
            vec!["Request URL", "HTTP method", "Caller address", "Target handler"]
        );
        let records = sink.records();
        assert_eq!(records[3].field("module"), Some("billing"));
        assert_eq!(records[3].field("operation"), Some("create"));
        assert_eq!(records[2].field("ip"), Some("10.0.0.7"));
    }

    #[test]
    fn test_parameter_line() {
        let sink = Arc::new(RecordingSink::default());
        LogEmitter::new(sink.clone(), "; ").parameters(&call());
        assert_eq!(sink.records()[0].field("params"), Some("id=42"));
    }

    #[test]
    fn test_failure_lines_are_errors() {
        let sink = Arc::new(RecordingSink::default());
        LogEmitter::new(sink.clone(), ", ").failure(&HandlerFailure {
            type_name: "InsufficientFunds".to_string(),
            message: "insufficient funds".to_string(),
            stack_trace: "trace".to_string(),
        });

        let records = sink.records();
        assert!(records.iter().all(|r| r.is_error));
        assert_eq!(records[0].field("stack_trace"), Some("trace"));
        assert_eq!(
            records[1].field("exception"),
            Some("InsufficientFunds: insufficient funds")
        );
    }

    #[test]
    fn test_completion_line() {
        let sink = Arc::new(RecordingSink::default());
        LogEmitter::new(sink.clone(), ", ").completion(
            "a.controller.B",
            "run",
            "http://x/run",
            None,
            Duration::from_micros(1_250),
        );

        let records = sink.records();
        let record = &records[0];
        assert_eq!(record.message, "a.controller.B.run completed");
        assert_eq!(record.field("url"), Some("http://x/run"));
        assert_eq!(record.field("elapsed_ms"), Some("1.250"));
        assert_eq!(record.field("started_at"), None);
        assert!(!record.is_error);
    }

    #[test]
    fn test_finished_renders_from_call_record() {
        let sink = Arc::new(RecordingSink::default());
        let mut call = call();
        let started_at = Utc::now();
        call.record_outcome(
            started_at,
            Duration::from_micros(3_125),
            Some(HandlerFailure {
                type_name: "InsufficientFunds".to_string(),
                message: "insufficient funds".to_string(),
                stack_trace: "trace".to_string(),
            }),
        );

        LogEmitter::new(sink.clone(), ", ").finished(&call);

        assert_eq!(
            sink.messages(),
            vec![
                "Handler raised",
                "Handler failure",
                "org.example.billing.controller.InvoiceHandler.create completed",
            ]
        );
        let records = sink.records();
        let summary = &records[2];
        assert_eq!(summary.field("url"), Some("http://localhost/invoices"));
        assert_eq!(summary.field("elapsed_ms"), Some("3.125"));
        assert_eq!(
            summary.field("started_at").map(str::to_string),
            Some(started_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        );
    }

    #[test]
    fn test_finished_without_failure_logs_only_summary() {
        let sink = Arc::new(RecordingSink::default());
        let mut call = call();
        call.record_outcome(Utc::now(), Duration::from_millis(2), None);

        LogEmitter::new(sink.clone(), ", ").finished(&call);

        assert_eq!(sink.errors(), 0);
        assert_eq!(sink.records()[0].field("elapsed_ms"), Some("2.000"));
    }
}
