use chrono::Utc;

use crate::domain::cart::CartLine;
use crate::domain::errors::OrderError;
use crate::domain::order::{CustomerInfo, Order, OrderStatus, PaymentMethod};
use crate::domain::ports::IdGenerator;

pub struct OrderBuilder<G> {
    ids: G,
}

impl<G: IdGenerator> OrderBuilder<G> {
    pub fn new(ids: G) -> Self {
        Self { ids }
    }

    /// Freezes `items` into a pending order. Empty input is rejected before
    /// an id is drawn.
    pub fn build(
        &self,
        items: &[CartLine],
        customer: CustomerInfo,
        payment_method: Option<PaymentMethod>,
    ) -> Result<Order, OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyCart);
        }
        Ok(Order {
            order_id: self.ids.next_id(),
            items: items.to_vec(),
            total_price: items
                .iter()
                .fold(0, |total: u64, line| total.saturating_add(line.subtotal())),
            customer,
            payment_method,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        })
    }
}
