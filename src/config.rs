use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::validation::CheckoutProfile;
use crate::infrastructure::backends::DEFAULT_SIMULATED_LATENCY;
use crate::infrastructure::snapshot::{DEFAULT_CART_KEY, DEFAULT_ORDER_LOG_KEY};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
    #[error("Cart and order log cannot share the storage key '{0}'")]
    KeyCollision(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    Simulated { latency: Duration },
    Http { url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderIdStyle {
    Timestamp,
    Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` keeps everything in memory.
    pub storage_dir: Option<PathBuf>,
    pub cart_key: String,
    pub order_log_key: String,
    pub backend: BackendConfig,
    pub checkout_profile: CheckoutProfile,
    pub order_id_style: OrderIdStyle,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());
        let invalid = |var: &'static str, value: &str| ConfigError::Invalid {
            var,
            value: value.to_string(),
        };

        let host = get("HOST").unwrap_or("0.0.0.0").to_string();
        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| invalid("PORT", raw))?,
            None => 8080,
        };

        let cart_key = get("CART_STORAGE_KEY").unwrap_or(DEFAULT_CART_KEY).to_string();
        let order_log_key = get("ORDER_LOG_KEY")
            .unwrap_or(DEFAULT_ORDER_LOG_KEY)
            .to_string();
        if cart_key == order_log_key {
            return Err(ConfigError::KeyCollision(cart_key));
        }

        let backend = match get("SUBMISSION_BACKEND").unwrap_or("simulated") {
            "simulated" => {
                let latency = match get("SUBMISSION_LATENCY_MS") {
                    Some(raw) => Duration::from_millis(
                        raw.parse()
                            .map_err(|_| invalid("SUBMISSION_LATENCY_MS", raw))?,
                    ),
                    None => DEFAULT_SIMULATED_LATENCY,
                };
                BackendConfig::Simulated { latency }
            }
            "http" => BackendConfig::Http {
                url: get("SUBMISSION_URL")
                    .ok_or(ConfigError::Missing("SUBMISSION_URL"))?
                    .to_string(),
            },
            other => return Err(invalid("SUBMISSION_BACKEND", other)),
        };

        let checkout_profile = match get("CHECKOUT_PROFILE") {
            Some(raw) => raw.parse().map_err(|_| invalid("CHECKOUT_PROFILE", raw))?,
            None => CheckoutProfile::default(),
        };

        let order_id_style = match get("ORDER_ID_STYLE").unwrap_or("timestamp") {
            "timestamp" => OrderIdStyle::Timestamp,
            "uuid" => OrderIdStyle::Uuid,
            other => return Err(invalid("ORDER_ID_STYLE", other)),
        };

        Ok(Self {
            host,
            port,
            storage_dir: get("CART_STORAGE_DIR").map(PathBuf::from),
            cart_key,
            order_log_key,
            backend,
            checkout_profile,
            order_id_style,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_vars(HashMap::new()).expect("defaults");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage_dir, None);
        assert_eq!(config.cart_key, DEFAULT_CART_KEY);
        assert_eq!(config.order_log_key, DEFAULT_ORDER_LOG_KEY);
        assert_eq!(
            config.backend,
            BackendConfig::Simulated {
                latency: Duration::from_millis(1500)
            }
        );
        assert_eq!(config.checkout_profile, CheckoutProfile::Delivery);
        assert_eq!(config.order_id_style, OrderIdStyle::Timestamp);
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_vars(vars(&[
            ("PORT", "9000"),
            ("CART_STORAGE_DIR", "/tmp/cart"),
            ("SUBMISSION_BACKEND", "http"),
            ("SUBMISSION_URL", "http://localhost:9000/api/create-order"),
            ("CHECKOUT_PROFILE", "phone_payment"),
            ("ORDER_ID_STYLE", "uuid"),
        ]))
        .expect("config");
        assert_eq!(config.port, 9000);
        assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/cart")));
        assert_eq!(
            config.backend,
            BackendConfig::Http {
                url: "http://localhost:9000/api/create-order".to_string()
            }
        );
        assert_eq!(config.checkout_profile, CheckoutProfile::PhonePayment);
        assert_eq!(config.order_id_style, OrderIdStyle::Uuid);
    }

    #[test]
    fn rejects_bad_port() {
        let err = AppConfig::from_vars(vars(&[("PORT", "eighty")])).expect_err("bad port");
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn http_backend_needs_url() {
        let err = AppConfig::from_vars(vars(&[("SUBMISSION_BACKEND", "http")]))
            .expect_err("missing url");
        assert_eq!(err, ConfigError::Missing("SUBMISSION_URL"));
    }

    #[test]
    fn cart_and_log_keys_must_differ() {
        let err = AppConfig::from_vars(vars(&[
            ("CART_STORAGE_KEY", "shared"),
            ("ORDER_LOG_KEY", "shared"),
        ]))
        .expect_err("collision");
        assert_eq!(err, ConfigError::KeyCollision("shared".to_string()));
    }
}
