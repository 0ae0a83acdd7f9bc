//! # Calllog Core
//!
//! Core types, traits, and error definitions for the Calllog handler interceptor.
//! This crate defines the capabilities the interceptor consumes from its host
//! (request context, value serialization, stack trace formatting, log sink)
//! and the error taxonomy shared by every layer.

pub mod argument;
pub mod error;
pub mod result;
pub mod telemetry;
pub mod traits;

pub use argument::*;
pub use error::*;
pub use result::*;
pub use telemetry::*;
pub use traits::*;
