use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Highest unit price the cart accepts, in whole rubles.
pub const MAX_PRICE: u64 = 100_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Quantity for '{0}' does not fit in a cart line")]
pub struct QuantityOverflow(pub String);

/// What a "buy" control hands to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductRef {
    pub id: String,
    pub title: String,
    /// Whole rubles.
    pub price: u64,
    pub image: String,
}

impl ProductRef {
    pub fn has_valid_price(&self) -> bool {
        self.price <= MAX_PRICE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub id: String,
    pub title: String,
    pub price: u64,
    pub image: String,
    pub quantity: u32,
}

impl CartLine {
    fn from_product(product: ProductRef) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            quantity: 1,
        }
    }

    /// Saturates instead of overflowing on absurd stored prices.
    pub fn subtotal(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

/// Ordered cart lines, unique by id, every quantity at least 1.
///
/// Serializes as a bare JSON array so the persisted snapshot reads
/// `[{id, title, price, image, quantity}, ...]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from untrusted lines (e.g. a decoded snapshot),
    /// dropping zero-quantity lines and merging duplicate ids.
    pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, QuantityOverflow> {
        let mut cart = Self::new();
        for line in lines.into_iter().filter(|l| l.quantity > 0) {
            match cart.find_mut(&line.id) {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .checked_add(line.quantity)
                        .ok_or_else(|| QuantityOverflow(line.id.clone()))?;
                }
                None => cart.lines.push(line),
            }
        }
        Ok(cart)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn get(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.id == id)
    }

    /// Increments an existing line or appends a new one with quantity 1.
    /// Returns the line as it stands afterwards.
    pub fn add(&mut self, product: ProductRef) -> &CartLine {
        let idx = match self.lines.iter().position(|l| l.id == product.id) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = line.quantity.saturating_add(1);
                idx
            }
            None => {
                self.lines.push(CartLine::from_product(product));
                self.lines.len() - 1
            }
        };
        &self.lines[idx]
    }

    /// Returns whether a line was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        self.lines.len() != before
    }

    /// Returns whether the line existed.
    pub fn increase(&mut self, id: &str) -> bool {
        match self.find_mut(id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// A line at quantity 1 is removed rather than dropping to 0.
    /// Returns whether the line existed.
    pub fn decrease(&mut self, id: &str) -> bool {
        match self.find_mut(id) {
            Some(line) if line.quantity > 1 => {
                line.quantity -= 1;
                true
            }
            Some(_) => self.remove(id),
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Takes the ordered quantities out of the cart, leaving anything added
    /// after the order was built.
    pub fn remove_ordered(&mut self, ordered: &[CartLine]) {
        for item in ordered {
            if let Some(line) = self.find_mut(&item.id) {
                line.quantity = line.quantity.saturating_sub(item.quantity);
            }
        }
        self.lines.retain(|l| l.quantity > 0);
    }

    pub fn total_price(&self) -> u64 {
        self.lines
            .iter()
            .fold(0, |total, line| total.saturating_add(line.subtotal()))
    }

    pub fn total_quantity(&self) -> u64 {
        self.lines
            .iter()
            .fold(0, |total, line| total.saturating_add(u64::from(line.quantity)))
    }

    /// Owned copy of the lines, detached from later mutation.
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.lines.clone()
    }
}
