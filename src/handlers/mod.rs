pub mod cart;
pub mod orders;

use std::sync::{Mutex, MutexGuard, PoisonError};

use utoipa::OpenApi;

use crate::application::cart_store::CartStore;
use crate::application::checkout::CheckoutFlow;
use crate::domain::ports::IdGenerator;
use crate::infrastructure::backends::ConfiguredBackend;
use crate::infrastructure::snapshot::OrderLog;

pub type AppCheckout = CheckoutFlow<Box<dyn IdGenerator>, ConfiguredBackend>;

/// Shared by every worker. The cart mutex is only held for synchronous
/// sections, never across an await.
pub struct AppState {
    pub cart: Mutex<CartStore>,
    pub checkout: AppCheckout,
    pub orders: OrderLog,
}

pub(crate) fn lock_cart(state: &AppState) -> MutexGuard<'_, CartStore> {
    state.cart.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        cart::get_cart,
        cart::add_item,
        cart::get_item,
        cart::remove_item,
        cart::increase_item,
        cart::decrease_item,
        cart::clear_cart,
        orders::checkout,
        orders::list_orders,
        orders::create_order,
    ),
    tags(
        (name = "cart", description = "Shopping cart"),
        (name = "orders", description = "Checkout and order log"),
    )
)]
pub struct ApiDoc;
