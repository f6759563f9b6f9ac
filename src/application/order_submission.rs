use crate::domain::errors::SubmissionError;
use crate::domain::order::{Order, SubmissionReceipt};
use crate::domain::ports::SubmissionBackend;

pub struct OrderSubmissionService<B> {
    backend: B,
}

impl<B: SubmissionBackend> OrderSubmissionService<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Hands the order to the backend and checks the receipt belongs to it.
    /// Does not touch the cart; clearing on success is the caller's job.
    pub async fn submit(&self, order: &Order) -> Result<SubmissionReceipt, SubmissionError> {
        log::debug!("Submitting order {}", order.order_id);
        let receipt = match self.backend.submit(order).await {
            Ok(receipt) => receipt,
            Err(e) => {
                log::error!("Order {} failed: {}", order.order_id, e);
                return Err(e);
            }
        };
        if receipt.order_id != order.order_id {
            log::error!(
                "Order {} acknowledged as {}",
                order.order_id,
                receipt.order_id
            );
            return Err(SubmissionError::Rejected(format!(
                "receipt for {} does not match order {}",
                receipt.order_id, order.order_id
            )));
        }
        Ok(receipt)
    }
}
