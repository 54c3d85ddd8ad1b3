//! klok-bot: keeps Klok chat threads active across many accounts.
//!
//! One worker runs per account. Each worker bootstraps a thread, then on a
//! fixed interval checks the account's point balance and, while points
//! remain, posts a short phrase to its thread.
//!
//! # Architecture
//!
//! - **credentials**: loads accounts from a token list or JSON file
//! - **gateway**: wraps the `klok-api` client, logging and absorbing failures
//! - **worker**: the per-account bootstrap and tick state machine
//! - **orchestrator**: starts one worker per account under a supervisor

pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod orchestrator;
pub mod phrases;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::BotConfig;
pub use credentials::{Account, CredentialFormat};
pub use error::{BotError, Result};
pub use gateway::{Gateway, KlokGateway};
pub use orchestrator::{Supervisor, WorkerEvent, start_workers};
pub use worker::{AccountWorker, TickOutcome, WorkerSettings, WorkerState};
