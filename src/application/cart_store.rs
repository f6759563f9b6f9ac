use std::time::Duration;

use tokio::sync::broadcast;

use crate::domain::cart::{Cart, CartLine, ProductRef};
use crate::domain::errors::CartError;
use crate::infrastructure::snapshot::CartSnapshotStore;

/// How long a subscriber should keep the "added to cart" tooltip visible.
pub const TOOLTIP_DISMISS_AFTER: Duration = Duration::from_secs(2);

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// Sent after every mutating operation.
    Changed {
        total_quantity: u64,
        total_price: u64,
    },
    /// Sent after `add_item`; the subscriber owns the dismiss timer.
    ShowTooltip { line: CartLine },
}

/// Sole owner of the live cart. Every mutation persists the whole cart and
/// then notifies subscribers before returning; nothing in between awaits.
pub struct CartStore {
    cart: Cart,
    snapshots: CartSnapshotStore,
    events: broadcast::Sender<CartEvent>,
}

impl CartStore {
    /// Starts from whatever the snapshot slot holds, or empty if it is
    /// missing or unreadable.
    pub fn load(snapshots: CartSnapshotStore) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let mut store = Self {
            cart: Cart::new(),
            snapshots,
            events,
        };
        store.cart = store.read_snapshot();
        store
    }

    /// Replaces the live cart with the persisted snapshot.
    pub fn load_from_store(&mut self) {
        self.cart = self.read_snapshot();
        self.notify_changed();
    }

    fn read_snapshot(&self) -> Cart {
        match self.snapshots.load() {
            Ok(cart) => cart,
            Err(e) => {
                log::warn!("Discarding stored cart: {}", e);
                Cart::new()
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    pub fn add_item(&mut self, product: ProductRef) -> Result<CartLine, CartError> {
        if !product.has_valid_price() {
            return Err(CartError::PriceOutOfRange {
                id: product.id,
                price: product.price,
            });
        }
        let line = self.cart.add(product).clone();
        log::debug!("Cart: {} x{}", line.id, line.quantity);
        let result = self.commit();
        self.emit(CartEvent::ShowTooltip { line: line.clone() });
        result.map(|()| line)
    }

    /// Absent ids are not an error.
    pub fn remove_item(&mut self, id: &str) -> Result<(), CartError> {
        if self.cart.remove(id) {
            log::debug!("Cart: removed {}", id);
        }
        self.commit()
    }

    pub fn increase_quantity(&mut self, id: &str) -> Result<(), CartError> {
        if !self.cart.increase(id) {
            return Ok(());
        }
        self.commit()
    }

    /// Removes the line instead of letting its quantity reach 0.
    pub fn decrease_quantity(&mut self, id: &str) -> Result<(), CartError> {
        if !self.cart.decrease(id) {
            return Ok(());
        }
        self.commit()
    }

    pub fn clear(&mut self) -> Result<(), CartError> {
        self.cart.clear();
        log::debug!("Cart cleared");
        self.commit()
    }

    /// Takes an accepted order's quantities out of the cart. Units added
    /// while the order was in flight stay.
    pub fn settle_order(&mut self, ordered: &[CartLine]) -> Result<(), CartError> {
        self.cart.remove_ordered(ordered);
        log::debug!("Cart settled against {} ordered line(s)", ordered.len());
        self.commit()
    }

    pub fn total_price(&self) -> u64 {
        self.cart.total_price()
    }

    pub fn total_quantity(&self) -> u64 {
        self.cart.total_quantity()
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn quantity_of(&self, id: &str) -> Option<u32> {
        self.cart.get(id).map(|l| l.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn snapshot(&self) -> Vec<CartLine> {
        self.cart.snapshot()
    }

    /// The in-memory change stands even when the write fails; the error
    /// tells the caller the stored copy is stale.
    fn commit(&mut self) -> Result<(), CartError> {
        let saved = self.snapshots.save(&self.cart);
        self.notify_changed();
        saved.map_err(|e| {
            log::error!("Cart persisted state is stale: {}", e);
            CartError::StorageWrite(e)
        })
    }

    fn notify_changed(&self) {
        self.emit(CartEvent::Changed {
            total_quantity: self.cart.total_quantity(),
            total_price: self.cart.total_price(),
        });
    }

    fn emit(&self, event: CartEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
