//! Common test infrastructure for HTTP interception tests.

use axum::{
    body::Body,
    extract::{ConnectInfo, Path, State},
    http::{header::HOST, Request},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use calllog_config::{FailurePolicy, InterceptorConfig};
use calllog_core::{ArgValue, LogField, LogSink};
use calllog_interceptor::{CallInterceptor, Capabilities};
use calllog_rest::{ok, AppError, ErrorChainFormatter, JsonValueSerializer, TaskLocalRequestContext};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;

pub const INVOICE_CONTROLLER: &str = "org.example.billing.controller.InvoiceController";

/// One captured log line.
#[derive(Debug, Clone)]
pub struct Line {
    pub is_error: bool,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl Line {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Log sink that keeps every line in memory.
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<Line>>,
}

impl MemorySink {
    pub fn lines(&self) -> Vec<Line> {
        self.lines.lock().clone()
    }

    pub fn find(&self, message: &str) -> Option<Line> {
        self.lines.lock().iter().find(|l| l.message == message).cloned()
    }

    fn push(&self, is_error: bool, message: &str, fields: &[LogField<'_>]) {
        self.lines.lock().push(Line {
            is_error,
            message: message.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        });
    }
}

impl LogSink for MemorySink {
    fn info(&self, message: &str, fields: &[LogField<'_>]) {
        self.push(false, message, fields);
    }

    fn error(&self, message: &str, fields: &[LogField<'_>]) {
        self.push(true, message, fields);
    }
}

#[derive(Debug, thiserror::Error)]
#[error("insufficient funds")]
pub struct InsufficientFunds;

#[derive(Clone)]
pub struct TestState {
    pub interceptor: CallInterceptor,
}

async fn create_invoice(State(state): State<TestState>, Path(id): Path<u64>) -> Response {
    state
        .interceptor
        .intercept(
            INVOICE_CONTROLLER,
            "create",
            &["id"],
            &[ArgValue::of(&id)],
            || async move { Ok::<_, InsufficientFunds>(ok(id)) },
        )
        .await
        .unwrap_or_else(|e| AppError(e).into_response())
}

async fn charge_invoice(State(state): State<TestState>, Path(id): Path<u64>) -> Response {
    state
        .interceptor
        .intercept(
            INVOICE_CONTROLLER,
            "charge",
            &["id"],
            &[ArgValue::of(&id)],
            || async move { Err::<Response, _>(InsufficientFunds) },
        )
        .await
        .unwrap_or_else(|e| AppError(e).into_response())
}

/// Interceptor wired to the real request context and an in-memory sink.
pub fn interceptor(policy: FailurePolicy) -> (CallInterceptor, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::default());
    let config = InterceptorConfig {
        failure_policy: policy,
        ..InterceptorConfig::default()
    };
    let interceptor = CallInterceptor::new(
        &config,
        Capabilities {
            request_context: Arc::new(TaskLocalRequestContext),
            serializer: Arc::new(JsonValueSerializer),
            stack_trace_formatter: Arc::new(ErrorChainFormatter),
            log_sink: sink.clone(),
        },
    );
    (interceptor, sink)
}

/// Billing routes without any middleware applied.
pub fn billing_routes(interceptor: CallInterceptor) -> Router {
    Router::new()
        .route("/billing/invoices/:id", post(create_invoice))
        .route("/billing/invoices/:id/charge", post(charge_invoice))
        .with_state(TestState { interceptor })
}

/// POST request as it arrives from a connected client.
pub fn post_request(path: &str) -> Request<Body> {
    let mut request = Request::builder()
        .method("POST")
        .uri(path)
        .header(HOST, "billing.example.test")
        .body(Body::empty())
        .unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 20], 51_000))));
    request
}
