use std::time::Duration;

use crate::domain::errors::SubmissionError;
use crate::domain::order::{Order, SubmissionReceipt};
use crate::domain::ports::SubmissionBackend;

use super::snapshot::OrderLog;

pub const DEFAULT_SIMULATED_LATENCY: Duration = Duration::from_millis(1500);

// ── Simulated backend ────────────────────────────────────────────────────────

/// Stand-in for an order API: waits out a fixed latency, then records the
/// order in the local order log.
#[derive(Clone)]
pub struct SimulatedBackend {
    log: OrderLog,
    latency: Duration,
}

impl SimulatedBackend {
    pub fn new(log: OrderLog, latency: Duration) -> Self {
        Self { log, latency }
    }
}

impl SubmissionBackend for SimulatedBackend {
    async fn submit(&self, order: &Order) -> Result<SubmissionReceipt, SubmissionError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.log.append(order)?;
        log::info!(
            "Order {} recorded ({} lines, total {})",
            order.order_id,
            order.items.len(),
            order.total_price
        );
        Ok(SubmissionReceipt {
            success: true,
            order_id: order.order_id.clone(),
        })
    }
}

// ── HTTP backend ─────────────────────────────────────────────────────────────

/// Posts the order as JSON and expects `{ success, orderId }` back.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    url: String,
}

impl HttpBackend {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl SubmissionBackend for HttpBackend {
    async fn submit(&self, order: &Order) -> Result<SubmissionReceipt, SubmissionError> {
        let resp = self
            .client
            .post(&self.url)
            .json(order)
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SubmissionError::Rejected(format!("{status}: {body}")));
        }

        let receipt: SubmissionReceipt = resp
            .json()
            .await
            .map_err(|e| SubmissionError::Transport(format!("unreadable response: {e}")))?;
        if !receipt.success {
            return Err(SubmissionError::Rejected(format!(
                "order {} not accepted",
                receipt.order_id
            )));
        }
        Ok(receipt)
    }
}

// ── Runtime selection ────────────────────────────────────────────────────────

/// The backend chosen by configuration at startup.
#[derive(Clone)]
pub enum ConfiguredBackend {
    Simulated(SimulatedBackend),
    Http(HttpBackend),
}

impl SubmissionBackend for ConfiguredBackend {
    async fn submit(&self, order: &Order) -> Result<SubmissionReceipt, SubmissionError> {
        match self {
            ConfiguredBackend::Simulated(backend) => backend.submit(order).await,
            ConfiguredBackend::Http(backend) => backend.submit(order).await,
        }
    }
}
