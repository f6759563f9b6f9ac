use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::cart_store::CartStore;
use crate::domain::cart::{CartLine, ProductRef};
use crate::domain::errors::CartError;
use crate::errors::AppError;
use crate::summary::tooltip_text;

use super::{lock_cart, AppState};

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLine>,
    pub total_quantity: u64,
    pub total_price: u64,
    /// Tooltip text, e.g. "2 товара, 2 000 ₽".
    pub summary: String,
    /// False when the change is live but could not be written to storage.
    pub persisted: bool,
}

impl CartResponse {
    fn from_store(store: &CartStore, persisted: bool) -> Self {
        let total_quantity = store.total_quantity();
        let total_price = store.total_price();
        Self {
            items: store.snapshot(),
            total_quantity,
            total_price,
            summary: tooltip_text(total_quantity, total_price),
            persisted,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuantityResponse {
    pub id: String,
    pub quantity: u32,
}

fn respond(store: &CartStore, outcome: Result<(), CartError>) -> HttpResponse {
    let persisted = match outcome {
        Ok(()) => true,
        Err(e) => {
            log::warn!("{}", e);
            false
        }
    };
    HttpResponse::Ok().json(CartResponse::from_store(store, persisted))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /cart
#[utoipa::path(
    get,
    path = "/cart",
    responses((status = 200, description = "Current cart", body = CartResponse)),
    tag = "cart"
)]
pub async fn get_cart(state: web::Data<AppState>) -> HttpResponse {
    let store = lock_cart(&state);
    HttpResponse::Ok().json(CartResponse::from_store(&store, true))
}

/// POST /cart/items
///
/// Adds one unit of the product, creating the line on first add.
#[utoipa::path(
    post,
    path = "/cart/items",
    request_body = ProductRef,
    responses(
        (status = 200, description = "Cart after the add", body = CartResponse),
        (status = 422, description = "Price out of range"),
    ),
    tag = "cart"
)]
pub async fn add_item(
    state: web::Data<AppState>,
    body: web::Json<ProductRef>,
) -> Result<HttpResponse, AppError> {
    let mut store = lock_cart(&state);
    let outcome = match store.add_item(body.into_inner()) {
        Ok(_) => Ok(()),
        Err(e @ CartError::PriceOutOfRange { .. }) => {
            return Err(AppError::InvalidProduct(e.to_string()))
        }
        Err(e) => Err(e),
    };
    Ok(respond(&store, outcome))
}

/// GET /cart/items/{id}
///
/// Quantity of one product, for product pages that show their own counter.
#[utoipa::path(
    get,
    path = "/cart/items/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product is in the cart", body = QuantityResponse),
        (status = 404, description = "Product is not in the cart"),
    ),
    tag = "cart"
)]
pub async fn get_item(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let quantity = lock_cart(&state).quantity_of(&id).ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(QuantityResponse { id, quantity }))
}

/// DELETE /cart/items/{id}
#[utoipa::path(
    delete,
    path = "/cart/items/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses((status = 200, description = "Cart after the removal", body = CartResponse)),
    tag = "cart"
)]
pub async fn remove_item(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let mut store = lock_cart(&state);
    let outcome = store.remove_item(&path);
    respond(&store, outcome)
}

/// POST /cart/items/{id}/increase
#[utoipa::path(
    post,
    path = "/cart/items/{id}/increase",
    params(("id" = String, Path, description = "Product id")),
    responses((status = 200, description = "Cart after the change", body = CartResponse)),
    tag = "cart"
)]
pub async fn increase_item(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let mut store = lock_cart(&state);
    let outcome = store.increase_quantity(&path);
    respond(&store, outcome)
}

/// POST /cart/items/{id}/decrease
///
/// The line disappears when its last unit is taken away.
#[utoipa::path(
    post,
    path = "/cart/items/{id}/decrease",
    params(("id" = String, Path, description = "Product id")),
    responses((status = 200, description = "Cart after the change", body = CartResponse)),
    tag = "cart"
)]
pub async fn decrease_item(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let mut store = lock_cart(&state);
    let outcome = store.decrease_quantity(&path);
    respond(&store, outcome)
}

/// DELETE /cart
#[utoipa::path(
    delete,
    path = "/cart",
    responses((status = 200, description = "Emptied cart", body = CartResponse)),
    tag = "cart"
)]
pub async fn clear_cart(state: web::Data<AppState>) -> HttpResponse {
    let mut store = lock_cart(&state);
    let outcome = store.clear();
    respond(&store, outcome)
}
