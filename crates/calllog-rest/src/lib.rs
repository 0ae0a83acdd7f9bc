//! # Calllog REST
//!
//! Axum adapter for the Calllog interceptor.
//! Binds each inbound request to the task handling it and provides the
//! default host capabilities: tracing log sink, JSON argument serializer
//! and error-chain stack trace formatter.

pub mod context;
pub mod formatter;
pub mod responses;
pub mod router;
pub mod serializer;
pub mod sink;

pub use context::*;
pub use formatter::*;
pub use responses::*;
pub use router::*;
pub use serializer::*;
pub use sink::*;

use calllog_interceptor::Capabilities;
use std::sync::Arc;

/// Capabilities backed by the request-context middleware and `tracing`.
#[must_use]
pub fn default_capabilities() -> Capabilities {
    Capabilities {
        request_context: Arc::new(TaskLocalRequestContext),
        serializer: Arc::new(JsonValueSerializer),
        stack_trace_formatter: Arc::new(ErrorChainFormatter),
        log_sink: Arc::new(TracingLogSink),
    }
}
