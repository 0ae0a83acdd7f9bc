//! Result type aliases for Calllog.

use crate::CallLogError;

/// A specialized `Result` type for Calllog operations.
pub type CallLogResult<T> = Result<T, CallLogError>;
