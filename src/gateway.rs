//! Transport gateway between an account worker and the remote API.
//!
//! The gateway turns every remote failure into a logged, absent result so
//! the worker only ever sees `Option`, empty lists or `bool`. Nothing here
//! retries.

use crate::credentials::Account;
use async_trait::async_trait;
use klok_api::{ApiConfig, ApiError, KlokClient, PointBalance, Thread};
use tracing::{debug, error, info, warn};

/// The four remote operations an account worker needs.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Current balance, or `None` if it could not be read.
    async fn get_balance(&self) -> Option<PointBalance>;

    /// Existing threads in service order; empty on failure.
    async fn list_threads(&self) -> Vec<Thread>;

    /// Create a thread seeded with `seed_message`, or `None` on failure.
    async fn create_thread(&self, seed_message: &str) -> Option<Thread>;

    /// Post `text` to `thread_id`. Returns whether the service accepted it.
    async fn send_message(&self, thread_id: &str, text: &str) -> bool;
}

/// Outcome of a chat send after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendVerdict {
    /// The request completed normally.
    Delivered,
    /// The service dropped the stream after accepting the message.
    DeliveredAborted,
    /// Any other error.
    Failed,
}

impl SendVerdict {
    /// Whether the worker should keep the thread.
    #[must_use]
    pub fn accepted(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

/// Classify the result of a chat send.
#[must_use]
pub fn classify_send(result: &Result<(), ApiError>) -> SendVerdict {
    match result {
        Ok(()) => SendVerdict::Delivered,
        Err(e) if e.is_stream_aborted() => SendVerdict::DeliveredAborted,
        Err(_) => SendVerdict::Failed,
    }
}

/// [`Gateway`] backed by an authenticated [`KlokClient`].
pub struct KlokGateway {
    label: String,
    ai_id: Option<String>,
    client: KlokClient,
}

impl KlokGateway {
    /// Build a gateway for `account`, logging under `label`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the client cannot be constructed.
    pub fn new(label: impl Into<String>, account: &Account, config: ApiConfig) -> Result<Self, ApiError> {
        let client = KlokClient::new(config, &account.token)?;
        Ok(Self {
            label: label.into(),
            ai_id: account.ai_id.clone(),
            client,
        })
    }

    /// Label used in log lines.
    pub fn label(&self) -> &str {
        &self.label
    }
}

#[async_trait]
impl Gateway for KlokGateway {
    async fn get_balance(&self) -> Option<PointBalance> {
        match self.client.points().await {
            Ok(balance) => {
                info!(
                    account = %self.label,
                    "Points: {} | Referral: {} | Total: {}",
                    balance.points,
                    balance.referral_points,
                    balance.total_points
                );
                Some(balance)
            }
            Err(e) => {
                error!(account = %self.label, "failed to read points: {}", e.detail());
                None
            }
        }
    }

    async fn list_threads(&self) -> Vec<Thread> {
        match self.client.threads().await {
            Ok(threads) => {
                debug!(account = %self.label, count = threads.len(), "listed threads");
                threads
            }
            Err(e) => {
                error!(account = %self.label, "failed to list threads: {}", e.detail());
                Vec::new()
            }
        }
    }

    async fn create_thread(&self, seed_message: &str) -> Option<Thread> {
        match self.client.create_thread(seed_message).await {
            Ok(thread) => {
                info!(account = %self.label, thread_id = %thread.id, "created new thread");
                Some(thread)
            }
            Err(e) => {
                error!(account = %self.label, "failed to create thread: {}", e.detail());
                None
            }
        }
    }

    async fn send_message(&self, thread_id: &str, text: &str) -> bool {
        let result = self
            .client
            .send_message(thread_id, self.ai_id.as_deref(), text)
            .await;
        let verdict = classify_send(&result);
        match (verdict, &result) {
            (SendVerdict::Delivered, _) => {
                info!(account = %self.label, thread_id, "message sent");
            }
            (SendVerdict::DeliveredAborted, _) => {
                warn!(account = %self.label, thread_id, "stream aborted, message likely delivered");
            }
            (SendVerdict::Failed, Err(e)) => {
                error!(account = %self.label, thread_id, "failed to send message: {}", e.detail());
            }
            (SendVerdict::Failed, Ok(())) => {}
        }
        verdict.accepted()
    }
}
