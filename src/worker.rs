//! Per-account worker loop.
//!
//! A worker owns exactly one piece of mutable state, the id of the thread it
//! is keeping active. It bootstraps once, then ticks at a fixed interval
//! forever:
//!
//! 1. no thread: try to create one, give up on this tick if that fails
//! 2. read the balance; skip the send unless `total_points > 0`
//! 3. send a random phrase; on failure forget the thread so the next tick
//!    recreates it
//!
//! Each tick is awaited to completion before the next interval starts, so
//! ticks of one worker never overlap.

use crate::config::WorkerConfig;
use crate::gateway::Gateway;
use crate::phrases::PhraseBook;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Settings every worker is started with.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Time between ticks; the first tick runs one interval after bootstrap.
    pub interval: Duration,
    /// First message of threads the worker creates.
    pub seed_message: String,
    /// Phrases to send.
    pub phrases: PhraseBook,
}

impl WorkerSettings {
    /// Build settings from the `[worker]` config section.
    ///
    /// The section is expected to have passed [`crate::config::BotConfig::validate`],
    /// which rejects a zero interval.
    pub fn from_config(config: &WorkerConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_secs),
            seed_message: config.seed_message.clone(),
            phrases: PhraseBook::new(&config.phrases),
        }
    }
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self::from_config(&WorkerConfig::default())
    }
}

/// State carried between ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerState {
    /// Display identifier used in logs.
    pub label: String,
    /// Thread being kept active; `None` means a new one is needed.
    pub current_thread_id: Option<String>,
}

/// How bootstrap obtained (or failed to obtain) a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Reused the first thread the service listed.
    Adopted(String),
    /// No thread existed; created this one.
    Created(String),
    /// Listing was empty and creation failed.
    NoThread,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No thread and creation failed; nothing else was attempted.
    NoThread,
    /// The balance could not be read; no send.
    BalanceUnavailable,
    /// The balance was zero or negative; no send.
    NoPoints,
    /// A message was accepted.
    Sent,
    /// The send failed and the thread was dropped.
    SendFailed,
}

/// One account's bootstrap-then-tick loop.
pub struct AccountWorker<G> {
    state: WorkerState,
    gateway: G,
    settings: WorkerSettings,
}

impl<G: Gateway> AccountWorker<G> {
    /// Create a worker with no thread.
    pub fn new(label: impl Into<String>, gateway: G, settings: WorkerSettings) -> Self {
        Self {
            state: WorkerState {
                label: label.into(),
                current_thread_id: None,
            },
            gateway,
            settings,
        }
    }

    /// Current state.
    pub fn state(&self) -> &WorkerState {
        &self.state
    }

    /// Label used in logs.
    pub fn label(&self) -> &str {
        &self.state.label
    }

    /// Establish the initial thread.
    ///
    /// The balance is read for visibility only. The first listed thread is
    /// adopted as-is; a thread is created only when the list is empty.
    pub async fn bootstrap(&mut self) -> BootstrapOutcome {
        let _ = self.gateway.get_balance().await;

        let threads = self.gateway.list_threads().await;
        if let Some(first) = threads.into_iter().next() {
            info!(account = %self.state.label, thread_id = %first.id, "using existing thread");
            self.state.current_thread_id = Some(first.id.clone());
            return BootstrapOutcome::Adopted(first.id);
        }

        match self.gateway.create_thread(&self.settings.seed_message).await {
            Some(thread) => {
                self.state.current_thread_id = Some(thread.id.clone());
                BootstrapOutcome::Created(thread.id)
            }
            None => {
                warn!(account = %self.state.label, "no thread available after bootstrap");
                BootstrapOutcome::NoThread
            }
        }
    }

    /// Run one tick.
    pub async fn tick(&mut self) -> TickOutcome {
        let Some(thread_id) = self.ensure_thread().await else {
            return TickOutcome::NoThread;
        };

        let balance = self.gateway.get_balance().await;
        match balance {
            None => {
                info!(account = %self.state.label, "balance unavailable, waiting");
                return TickOutcome::BalanceUnavailable;
            }
            Some(balance) if !balance.has_points() => {
                info!(account = %self.state.label, "no points left, waiting");
                return TickOutcome::NoPoints;
            }
            Some(_) => {}
        }

        let text = self.settings.phrases.pick().to_owned();
        if self.gateway.send_message(&thread_id, &text).await {
            TickOutcome::Sent
        } else {
            self.state.current_thread_id = None;
            TickOutcome::SendFailed
        }
    }

    /// Return the current thread, creating one if there is none.
    async fn ensure_thread(&mut self) -> Option<String> {
        if let Some(id) = &self.state.current_thread_id {
            return Some(id.clone());
        }
        let thread = self.gateway.create_thread(&self.settings.seed_message).await?;
        self.state.current_thread_id = Some(thread.id.clone());
        Some(thread.id)
    }

    /// Bootstrap, then tick every interval until the task is dropped.
    pub async fn run(mut self) {
        let outcome = self.bootstrap().await;
        debug!(account = %self.state.label, ?outcome, "bootstrap finished");

        let period = self.settings.interval;
        debug_assert!(!period.is_zero(), "tick interval must be non-zero");
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let outcome = self.tick().await;
            debug!(
                account = %self.state.label,
                ?outcome,
                thread_id = self.state.current_thread_id.as_deref().unwrap_or("-"),
                "tick finished"
            );
        }
    }
}
