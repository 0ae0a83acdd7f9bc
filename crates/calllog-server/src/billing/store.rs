//! In-memory invoice store.

use super::BillingError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A stored invoice. Amounts are in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: u64,
    pub customer: String,
    pub amount: u64,
    pub paid: bool,
    pub attachments: Vec<String>,
}

/// Request body for creating an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInvoice {
    pub customer: String,
    pub amount: u64,
}

#[derive(Default)]
pub struct InvoiceStore {
    next_id: AtomicU64,
    invoices: RwLock<HashMap<u64, Invoice>>,
}

impl InvoiceStore {
    pub fn create(&self, new: NewInvoice) -> Invoice {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let invoice = Invoice {
            id,
            customer: new.customer,
            amount: new.amount,
            paid: false,
            attachments: Vec::new(),
        };
        self.invoices.write().insert(id, invoice.clone());
        invoice
    }

    pub fn get(&self, id: u64) -> Result<Invoice, BillingError> {
        self.invoices
            .read()
            .get(&id)
            .cloned()
            .ok_or(BillingError::NotFound(id))
    }

    /// Marks the invoice paid if `balance` covers it.
    pub fn charge(&self, id: u64, balance: u64) -> Result<Invoice, BillingError> {
        let mut invoices = self.invoices.write();
        let invoice = invoices.get_mut(&id).ok_or(BillingError::NotFound(id))?;
        if invoice.paid {
            return Err(BillingError::AlreadyPaid(id));
        }
        if balance < invoice.amount {
            return Err(BillingError::InsufficientFunds {
                balance,
                due: invoice.amount,
            });
        }
        invoice.paid = true;
        Ok(invoice.clone())
    }

    pub fn attach(&self, id: u64, name: String) -> Result<Invoice, BillingError> {
        let mut invoices = self.invoices.write();
        let invoice = invoices.get_mut(&id).ok_or(BillingError::NotFound(id))?;
        invoice.attachments.push(name);
        Ok(invoice.clone())
    }
}
