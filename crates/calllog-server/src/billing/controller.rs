//! Invoice controller.
//!
//! Every handler hands its real work to the interceptor as a thunk, along
//! with its declared parameter names and argument values.

use super::{BillingError, InvoiceStore, NewInvoice};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use calllog_core::{ArgValue, CallLogResult};
use calllog_interceptor::CallInterceptor;
use calllog_rest::{ok, AppError};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Type name the interceptor sees for this controller.
pub const TYPE_NAME: &str = concat!(module_path!(), "::InvoiceController");

/// Invoice handlers sharing one store and one interceptor.
#[derive(Clone)]
pub struct InvoiceController {
    store: Arc<InvoiceStore>,
    interceptor: CallInterceptor,
}

#[derive(Debug, Deserialize)]
pub struct ChargeQuery {
    pub balance: u64,
}

impl InvoiceController {
    pub fn new(store: Arc<InvoiceStore>, interceptor: CallInterceptor) -> Self {
        Self { store, interceptor }
    }
}

/// Creates the billing router.
pub fn router(controller: InvoiceController) -> Router {
    Router::new()
        .route("/billing/invoices", post(create_invoice))
        .route("/billing/invoices/:id", get(get_invoice))
        .route("/billing/invoices/:id/charge", post(charge_invoice))
        .route("/billing/invoices/:id/attachments", post(upload_attachment))
        .with_state(controller)
}

fn respond(result: CallLogResult<Response>) -> Response {
    result.unwrap_or_else(|e| AppError(e).into_response())
}

async fn create_invoice(
    State(controller): State<InvoiceController>,
    Json(request): Json<NewInvoice>,
) -> Response {
    debug!("Create invoice request: {}", request.customer);

    let args = [ArgValue::of(&request)];
    let store = controller.store.clone();
    respond(
        controller
            .interceptor
            .intercept(TYPE_NAME, "create_invoice", &["request"], &args, || async move {
                Ok::<_, BillingError>(ok(store.create(request)))
            })
            .await,
    )
}

async fn get_invoice(
    State(controller): State<InvoiceController>,
    Path(id): Path<u64>,
) -> Response {
    let store = controller.store.clone();
    respond(
        controller
            .interceptor
            .intercept(TYPE_NAME, "get_invoice", &["id"], &[ArgValue::of(&id)], || async move {
                store.get(id).map(ok)
            })
            .await,
    )
}

async fn charge_invoice(
    State(controller): State<InvoiceController>,
    Path(id): Path<u64>,
    Query(query): Query<ChargeQuery>,
) -> Response {
    let args = [ArgValue::of(&id), ArgValue::of(&query.balance)];
    let store = controller.store.clone();
    respond(
        controller
            .interceptor
            .intercept(TYPE_NAME, "charge_invoice", &["id", "balance"], &args, || async move {
                store.charge(id, query.balance).map(ok)
            })
            .await,
    )
}

/// Attachment bodies never reach the logs: the operation name carries the
/// exclusion marker.
async fn upload_attachment(
    State(controller): State<InvoiceController>,
    Path(id): Path<u64>,
    name: String,
) -> Response {
    let store = controller.store.clone();
    respond(
        controller
            .interceptor
            .intercept(
                TYPE_NAME,
                "upload_attachment",
                &["id", "name"],
                &[ArgValue::of(&id), ArgValue::of(&name)],
                || async move { store.attach(id, name).map(ok) },
            )
            .await,
    )
}
