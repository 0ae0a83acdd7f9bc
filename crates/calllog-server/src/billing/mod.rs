//! Billing handler group.

pub mod controller;
mod store;

pub use controller::{router, InvoiceController};
pub use store::{Invoice, InvoiceStore, NewInvoice};

use thiserror::Error;

/// Failures raised by billing handlers.
#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Invoice {0} not found")]
    NotFound(u64),

    #[error("Insufficient funds: balance {balance}, due {due}")]
    InsufficientFunds { balance: u64, due: u64 },

    #[error("Invoice {0} is already paid")]
    AlreadyPaid(u64),
}
