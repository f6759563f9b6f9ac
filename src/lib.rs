pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod summary;

use std::sync::{Arc, Mutex};

use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use tokio::sync::broadcast::{self, error::RecvError};
use utoipa::OpenApi;

use application::cart_store::{CartEvent, CartStore, TOOLTIP_DISMISS_AFTER};
use application::checkout::CheckoutFlow;
use config::{AppConfig, BackendConfig, OrderIdStyle};
use domain::errors::StorageError;
use domain::ports::IdGenerator;
use infrastructure::backends::{ConfiguredBackend, HttpBackend, SimulatedBackend};
use infrastructure::id_generator::{TimestampIdGenerator, UuidIdGenerator};
use infrastructure::snapshot::{CartSnapshotStore, OrderLog, SharedStore};
use infrastructure::storage::{FileStore, MemoryStore};

pub use handlers::{ApiDoc, AppState};

/// Wires storage, the cart and the checkout flow from configuration. The
/// cart starts from whatever the snapshot slot already holds.
pub fn build_state(config: &AppConfig) -> Result<AppState, StorageError> {
    let store: SharedStore = match &config.storage_dir {
        Some(dir) => Arc::new(FileStore::open(dir)?),
        None => Arc::new(MemoryStore::new()),
    };
    Ok(build_state_with_store(config, store))
}

pub fn build_state_with_store(config: &AppConfig, store: SharedStore) -> AppState {
    let orders = OrderLog::new(store.clone(), config.order_log_key.clone());
    let cart = CartStore::load(CartSnapshotStore::new(store, config.cart_key.clone()));

    let backend = match &config.backend {
        BackendConfig::Simulated { latency } => {
            ConfiguredBackend::Simulated(SimulatedBackend::new(orders.clone(), *latency))
        }
        BackendConfig::Http { url } => ConfiguredBackend::Http(HttpBackend::new(url.clone())),
    };
    let ids: Box<dyn IdGenerator> = match config.order_id_style {
        OrderIdStyle::Timestamp => Box::new(TimestampIdGenerator),
        OrderIdStyle::Uuid => Box::new(UuidIdGenerator),
    };

    AppState {
        cart: Mutex::new(cart),
        checkout: CheckoutFlow::new(config.checkout_profile, ids, backend),
        orders,
    }
}

/// Logs cart notifications, standing in for a widget that redraws on every
/// change and hides its tooltip after `TOOLTIP_DISMISS_AFTER`.
pub async fn log_cart_events(mut events: broadcast::Receiver<CartEvent>) {
    loop {
        match events.recv().await {
            Ok(CartEvent::Changed {
                total_quantity,
                total_price,
            }) => log::debug!("Cart now {} item(s), {}", total_quantity, total_price),
            Ok(CartEvent::ShowTooltip { line }) => {
                log::debug!("Tooltip shown for {} (x{})", line.id, line.quantity);
                actix_web::rt::spawn(async move {
                    tokio::time::sleep(TOOLTIP_DISMISS_AFTER).await;
                    log::debug!("Tooltip for {} dismissed", line.id);
                });
            }
            Err(RecvError::Lagged(skipped)) => {
                log::warn!("Cart event listener skipped {} event(s)", skipped)
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Registers every route on an actix-web service config, so the server and
/// tests share one routing table.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use handlers::{cart, orders};

    cfg.service(
        web::scope("/cart")
            .route("", web::get().to(cart::get_cart))
            .route("", web::delete().to(cart::clear_cart))
            .route("/items", web::post().to(cart::add_item))
            .route("/items/{id}", web::get().to(cart::get_item))
            .route("/items/{id}", web::delete().to(cart::remove_item))
            .route("/items/{id}/increase", web::post().to(cart::increase_item))
            .route("/items/{id}/decrease", web::post().to(cart::decrease_item)),
    )
    .route("/checkout", web::post().to(orders::checkout))
    .route("/orders", web::get().to(orders::list_orders))
    .route("/api/create-order", web::post().to(orders::create_order))
    .route(
        "/api-docs/openapi.json",
        web::get().to(|| async { HttpResponse::Ok().json(ApiDoc::openapi()) }),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: web::Data<AppState>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind((host.to_string(), port))?
    .run())
}
