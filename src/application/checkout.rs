use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::errors::{CheckoutError, OrderError};
use crate::domain::order::{Order, SubmissionReceipt};
use crate::domain::ports::{IdGenerator, SubmissionBackend};
use crate::domain::validation::{CheckoutForm, CheckoutProfile};

use super::cart_store::CartStore;
use super::order_builder::OrderBuilder;
use super::order_submission::OrderSubmissionService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    Idle,
    Validating,
    Submitting,
    Confirmed,
}

#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub receipt: SubmissionReceipt,
    pub order: Order,
}

/// Holds the submit control "disabled" for as long as it lives.
struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitGuard(flag))
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Validate, build, submit, and take the ordered items out of the cart only
/// once the order is accepted. At most one attempt runs at a time.
pub struct CheckoutFlow<G, B> {
    profile: CheckoutProfile,
    builder: OrderBuilder<G>,
    submission: OrderSubmissionService<B>,
    submitting: AtomicBool,
    phase: Mutex<CheckoutPhase>,
}

impl<G: IdGenerator, B: SubmissionBackend> CheckoutFlow<G, B> {
    pub fn new(profile: CheckoutProfile, ids: G, backend: B) -> Self {
        Self {
            profile,
            builder: OrderBuilder::new(ids),
            submission: OrderSubmissionService::new(backend),
            submitting: AtomicBool::new(false),
            phase: Mutex::new(CheckoutPhase::Idle),
        }
    }

    pub fn phase(&self) -> CheckoutPhase {
        *lock(&self.phase)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    fn set_phase(&self, phase: CheckoutPhase) {
        *lock(&self.phase) = phase;
    }

    pub async fn checkout(
        &self,
        cart: &Mutex<CartStore>,
        form: &CheckoutForm,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let _guard =
            SubmitGuard::acquire(&self.submitting).ok_or(CheckoutError::AlreadySubmitting)?;

        self.set_phase(CheckoutPhase::Validating);
        let valid = match self.profile.validate(form) {
            Ok(valid) => valid,
            Err(e) => {
                self.set_phase(CheckoutPhase::Idle);
                return Err(e.into());
            }
        };

        let items = lock(cart).snapshot();
        let order = match self
            .builder
            .build(&items, valid.customer, valid.payment_method)
        {
            Ok(order) => order,
            Err(OrderError::EmptyCart) => {
                self.set_phase(CheckoutPhase::Idle);
                return Err(OrderError::EmptyCart.into());
            }
        };

        self.set_phase(CheckoutPhase::Submitting);
        match self.submission.submit(&order).await {
            Ok(receipt) => {
                if let Err(e) = lock(cart).settle_order(&order.items) {
                    log::warn!(
                        "Order {} placed but cart update not persisted: {}",
                        order.order_id,
                        e
                    );
                }
                self.set_phase(CheckoutPhase::Confirmed);
                Ok(CheckoutOutcome { receipt, order })
            }
            Err(e) => {
                self.set_phase(CheckoutPhase::Idle);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::Notify;

    use super::*;
    use crate::domain::cart::ProductRef;
    use crate::domain::errors::{Field, SubmissionError};
    use crate::infrastructure::backends::SimulatedBackend;
    use crate::infrastructure::id_generator::TimestampIdGenerator;
    use crate::infrastructure::snapshot::{
        CartSnapshotStore, OrderLog, DEFAULT_CART_KEY, DEFAULT_ORDER_LOG_KEY,
    };
    use crate::infrastructure::storage::MemoryStore;

    struct GatedBackend(Arc<Notify>);

    impl SubmissionBackend for GatedBackend {
        async fn submit(&self, order: &Order) -> Result<SubmissionReceipt, SubmissionError> {
            self.0.notified().await;
            Ok(SubmissionReceipt {
                success: true,
                order_id: order.order_id.clone(),
            })
        }
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            name: "Ivan".to_string(),
            contact: "@ivan".to_string(),
            address: "Moscow, Tverskaya 1".to_string(),
            payment_method: None,
        }
    }

    fn cart_over(memory: &MemoryStore) -> Mutex<CartStore> {
        let mut store = CartStore::load(CartSnapshotStore::new(
            Arc::new(memory.clone()),
            DEFAULT_CART_KEY,
        ));
        store
            .add_item(ProductRef {
                id: "p1".to_string(),
                title: "A".to_string(),
                price: 1000,
                image: "x".to_string(),
            })
            .expect("add");
        Mutex::new(store)
    }

    type SimulatedFlow = CheckoutFlow<TimestampIdGenerator, SimulatedBackend>;

    fn simulated_flow(memory: &MemoryStore) -> SimulatedFlow {
        let log = OrderLog::new(Arc::new(memory.clone()), DEFAULT_ORDER_LOG_KEY);
        CheckoutFlow::new(
            CheckoutProfile::Delivery,
            TimestampIdGenerator,
            SimulatedBackend::new(log, Duration::ZERO),
        )
    }

    #[tokio::test]
    async fn invalid_form_touches_nothing() {
        let memory = MemoryStore::new();
        let cart = cart_over(&memory);
        let flow = simulated_flow(&memory);
        let mut bad = form();
        bad.name = "I".to_string();

        let err = flow.checkout(&cart, &bad).await.expect_err("invalid");

        assert!(matches!(err, CheckoutError::Validation(ref v) if v.has(Field::Name)));
        assert_eq!(flow.phase(), CheckoutPhase::Idle);
        assert_eq!(lock(&cart).total_quantity(), 1);
        assert!(!flow.is_submitting());
    }

    #[tokio::test]
    async fn empty_cart_is_rejected_before_building() {
        let memory = MemoryStore::new();
        let cart = cart_over(&memory);
        lock(&cart).clear().expect("clear");
        let flow = simulated_flow(&memory);

        let err = flow.checkout(&cart, &form()).await.expect_err("empty");

        assert!(matches!(err, CheckoutError::Order(OrderError::EmptyCart)));
        assert_eq!(flow.phase(), CheckoutPhase::Idle);
    }

    #[tokio::test]
    async fn success_clears_cart_and_confirms() {
        let memory = MemoryStore::new();
        let cart = cart_over(&memory);
        let flow = simulated_flow(&memory);

        let outcome = flow.checkout(&cart, &form()).await.expect("checkout");

        assert_eq!(outcome.receipt.order_id, outcome.order.order_id);
        assert_eq!(outcome.order.total_price, 1000);
        assert!(lock(&cart).is_empty());
        assert_eq!(flow.phase(), CheckoutPhase::Confirmed);
    }

    #[tokio::test]
    async fn failure_keeps_cart_for_retry() {
        let memory = MemoryStore::new();
        let cart = cart_over(&memory);
        let flow = simulated_flow(&memory);
        memory.set_reject_writes(true);

        let err = flow.checkout(&cart, &form()).await.expect_err("should fail");
        assert!(matches!(err, CheckoutError::Submission(_)));
        assert_eq!(lock(&cart).quantity_of("p1"), Some(1));
        assert_eq!(flow.phase(), CheckoutPhase::Idle);

        memory.set_reject_writes(false);
        flow.checkout(&cart, &form()).await.expect("retry succeeds");
        assert!(lock(&cart).is_empty());
    }

    #[tokio::test]
    async fn second_submit_while_pending_is_refused() {
        let memory = MemoryStore::new();
        let cart = Arc::new(cart_over(&memory));
        let gate = Arc::new(Notify::new());
        let flow = Arc::new(CheckoutFlow::new(
            CheckoutProfile::Delivery,
            TimestampIdGenerator,
            GatedBackend(gate.clone()),
        ));

        let pending = {
            let (flow, cart) = (flow.clone(), cart.clone());
            tokio::spawn(async move { flow.checkout(&cart, &form()).await })
        };
        while flow.phase() != CheckoutPhase::Submitting {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        let err = flow.checkout(&cart, &form()).await.expect_err("refused");
        assert!(matches!(err, CheckoutError::AlreadySubmitting));
        assert_eq!(lock(&cart).quantity_of("p1"), Some(1));

        gate.notify_one();
        pending.await.expect("join").expect("first checkout");
        assert!(!flow.is_submitting());
        assert!(lock(&cart).is_empty());
    }

    #[tokio::test]
    async fn items_added_while_pending_survive_success() {
        let memory = MemoryStore::new();
        let cart = Arc::new(cart_over(&memory));
        let gate = Arc::new(Notify::new());
        let flow = Arc::new(CheckoutFlow::new(
            CheckoutProfile::Delivery,
            TimestampIdGenerator,
            GatedBackend(gate.clone()),
        ));

        let pending = {
            let (flow, cart) = (flow.clone(), cart.clone());
            tokio::spawn(async move { flow.checkout(&cart, &form()).await })
        };
        while flow.phase() != CheckoutPhase::Submitting {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        {
            let mut store = lock(&cart);
            for id in ["p1", "p2"] {
                store
                    .add_item(ProductRef {
                        id: id.to_string(),
                        title: "late".to_string(),
                        price: 300,
                        image: "y".to_string(),
                    })
                    .expect("add");
            }
        }

        gate.notify_one();
        let outcome = pending.await.expect("join").expect("checkout");

        assert_eq!(outcome.order.items.len(), 1);
        assert_eq!(outcome.order.items[0].quantity, 1);
        let store = lock(&cart);
        assert_eq!(store.quantity_of("p1"), Some(1));
        assert_eq!(store.quantity_of("p2"), Some(1));
        assert_eq!(store.total_quantity(), 2);
    }
}
