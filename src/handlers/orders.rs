use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::order::{Order, SubmissionReceipt};
use crate::domain::validation::CheckoutForm;
use crate::errors::AppError;
use crate::summary::format_rub;

use super::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub success: bool,
    pub order_id: String,
    pub total_price: u64,
    /// Total as shown on the confirmation screen, e.g. "2 000 ₽".
    pub total_display: String,
}

/// POST /checkout
///
/// Validates the form, places an order for the current cart and empties the
/// cart once the order is accepted. A failed submission leaves the cart as
/// it was so the customer can retry.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CheckoutForm,
    responses(
        (status = 201, description = "Order placed", body = CheckoutResponse),
        (status = 409, description = "Another submission is still pending"),
        (status = 422, description = "Invalid form or empty cart"),
        (status = 502, description = "Order endpoint failed, cart kept"),
    ),
    tag = "orders"
)]
pub async fn checkout(
    state: web::Data<AppState>,
    body: web::Json<CheckoutForm>,
) -> Result<HttpResponse, AppError> {
    let form = body.into_inner();
    let outcome = state.checkout.checkout(&state.cart, &form).await?;

    Ok(HttpResponse::Created().json(CheckoutResponse {
        success: outcome.receipt.success,
        order_id: outcome.receipt.order_id,
        total_price: outcome.order.total_price,
        total_display: format_rub(outcome.order.total_price),
    }))
}

/// GET /orders
///
/// Every order recorded in the local order log, oldest first.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "Recorded orders", body = [Order]),
        (status = 503, description = "Order log unreadable"),
    ),
    tag = "orders"
)]
pub async fn list_orders(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let orders = state.orders.list()?;
    Ok(HttpResponse::Ok().json(orders))
}

/// POST /api/create-order
///
/// Order intake endpoint: records the posted order and acknowledges it with
/// `{ success, orderId }`. This is what the HTTP submission backend talks to.
#[utoipa::path(
    post,
    path = "/api/create-order",
    request_body = Order,
    responses(
        (status = 200, description = "Order recorded", body = SubmissionReceipt),
        (status = 503, description = "Order log unwritable"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<Order>,
) -> Result<HttpResponse, AppError> {
    let order = body.into_inner();
    state.orders.append(&order)?;
    log::info!("Order {} received", order.order_id);

    Ok(HttpResponse::Ok().json(SubmissionReceipt {
        success: true,
        order_id: order.order_id,
    }))
}
