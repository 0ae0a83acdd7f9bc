//! Stack trace formatting.

use calllog_core::StackTraceFormatter;

/// Formats a failure with its full cause chain.
///
/// Uses `anyhow`'s report format, which appends the captured backtrace when
/// `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorChainFormatter;

impl StackTraceFormatter for ErrorChainFormatter {
    fn format(&self, failure: &anyhow::Error) -> String {
        format!("{:?}", failure)
    }
}
