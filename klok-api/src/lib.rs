//! # klok-api
//!
//! Typed async client for the Klok points-accrual chat API.
//!
//! ## Design
//!
//! - One [`KlokClient`] per account; the session token and browser-like
//!   headers are installed as client defaults
//! - Four operations: read points, list threads, create thread, post chat
//! - No retries; every failure is surfaced as an [`ApiError`]
//! - [`ApiError::is_stream_aborted`] names the one transport failure callers
//!   may treat as a delivered message
//!
//! ## Security
//!
//! - Session tokens are marked sensitive and never appear in errors or logs
//! - Request bodies are not logged

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::KlokClient;
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use types::{ChatMessage, PointBalance, Thread};
