//! # Calllog Server Library
//!
//! Billing demo application whose controllers run behind the call
//! interceptor, plus startup helpers for the binary.

pub mod app;
pub mod billing;
pub mod startup;
