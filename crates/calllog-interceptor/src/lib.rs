//! # Calllog Interceptor
//!
//! Request-interception logging layer for a handler group.
//!
//! Every in-scope handler call is wrapped in one linear pipeline:
//! match, pre-log request metadata and arguments, invoke under a timer,
//! log a classified failure if the handler raised, and always finish with a
//! single completion summary line.

pub mod call;
pub mod emitter;
pub mod extractor;
pub mod failure;
pub mod interceptor;
pub mod invoker;
pub mod matcher;

#[cfg(test)]
pub(crate) mod testing;

pub use call::*;
pub use emitter::*;
pub use extractor::*;
pub use failure::*;
pub use interceptor::*;
pub use invoker::*;
pub use matcher::*;
