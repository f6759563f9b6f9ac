use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::cart::{Cart, CartLine};
use crate::domain::errors::StorageError;
use crate::domain::order::Order;
use crate::domain::ports::KeyValueStore;

pub const DEFAULT_CART_KEY: &str = "filmshdd_cart";
pub const DEFAULT_ORDER_LOG_KEY: &str = "filmshdd_orders";

pub type SharedStore = Arc<dyn KeyValueStore>;

fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw).map(Some).map_err(|e| StorageError::Decode {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Encode {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.set(key, &raw)
}

// ── Cart snapshot slot ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct CartSnapshotStore {
    store: SharedStore,
    key: String,
}

impl CartSnapshotStore {
    pub fn new(store: SharedStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Overwrites the slot with the cart as a JSON array of lines.
    pub fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        write_json(self.store.as_ref(), &self.key, cart)
    }

    /// A missing slot is an empty cart. Malformed content is a
    /// `StorageError::Decode`; callers reset to empty.
    pub fn load(&self) -> Result<Cart, StorageError> {
        let Some(lines) = read_json::<Vec<CartLine>>(self.store.as_ref(), &self.key)? else {
            return Ok(Cart::new());
        };
        Cart::from_lines(lines).map_err(|e| StorageError::Decode {
            key: self.key.clone(),
            reason: e.to_string(),
        })
    }
}

// ── Order log slot ───────────────────────────────────────────────────────────

/// Append-only list of accepted orders, kept apart from the cart slot.
#[derive(Clone)]
pub struct OrderLog {
    store: SharedStore,
    key: String,
}

impl OrderLog {
    pub fn new(store: SharedStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn append(&self, order: &Order) -> Result<(), StorageError> {
        let mut orders = self.list()?;
        orders.push(order.clone());
        write_json(self.store.as_ref(), &self.key, &orders)
    }

    pub fn list(&self) -> Result<Vec<Order>, StorageError> {
        let orders: Option<Vec<Order>> = read_json(self.store.as_ref(), &self.key)?;
        Ok(orders.unwrap_or_default())
    }
}
