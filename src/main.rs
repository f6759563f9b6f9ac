use actix_web::web;
use dotenvy::dotenv;
use storefront_cart::config::AppConfig;
use storefront_cart::{build_server, build_state, log_cart_events};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    let state = build_state(&config).map_err(std::io::Error::other)?;

    log::info!(
        "Cart restored with {} item(s); checkout profile {:?}",
        state.cart.lock().map(|c| c.total_quantity()).unwrap_or_default(),
        config.checkout_profile
    );
    let events = state
        .cart
        .lock()
        .map(|c| c.subscribe())
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    actix_web::rt::spawn(log_cart_events(events));

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(web::Data::new(state), &config.host, config.port)?.await
}
