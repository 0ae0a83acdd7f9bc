//! `tracing`-backed log sink.

use calllog_core::{LogField, LogSink};
use std::io::Write;
use tracing::{error, info, warn};

/// Target every interceptor line is logged under.
pub const LOG_TARGET: &str = "call_log";

/// Log sink writing through the process-wide `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn info(&self, message: &str, fields: &[LogField<'_>]) {
        info!(target: LOG_TARGET, fields = %render_fields(fields), "{}", message);
    }

    fn error(&self, message: &str, fields: &[LogField<'_>]) {
        error!(target: LOG_TARGET, fields = %render_fields(fields), "{}", message);
    }

    fn flush(&self) {
        flush_output(&mut std::io::stdout());
    }
}

fn flush_output(output: &mut impl Write) {
    if let Err(e) = output.flush() {
        warn!(target: LOG_TARGET, "Failed to flush log output: {}", e);
    }
}

/// Renders fields as space-separated `key=value` pairs.
#[must_use]
pub fn render_fields(fields: &[LogField<'_>]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(" ")
}
