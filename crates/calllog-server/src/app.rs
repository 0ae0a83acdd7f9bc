//! Application assembly.

use crate::billing::{self, InvoiceController, InvoiceStore};
use axum::Router;
use calllog_config::AppConfig;
use calllog_interceptor::{CallInterceptor, Capabilities};
use calllog_rest::create_router;
use std::sync::Arc;

/// Builds the full router with the given host capabilities.
pub fn build_app(config: &AppConfig, capabilities: Capabilities) -> Router {
    let interceptor = CallInterceptor::new(&config.interceptor, capabilities);
    let controller = InvoiceController::new(Arc::new(InvoiceStore::default()), interceptor);
    create_router(billing::router(controller))
}
