//! Authenticated client for the four remote operations.
//!
//! Each method issues exactly one request and never retries. Errors are
//! returned as [`ApiError`]; deciding what a failure means is left to the
//! caller.

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::http::build_client;
use crate::types::{
    ChatMessage, ChatRequest, CreateThreadRequest, PointBalance, Thread, ThreadList, iso_timestamp,
};
use serde::de::DeserializeOwned;

/// Client bound to one account's session token.
#[derive(Debug, Clone)]
pub struct KlokClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl KlokClient {
    /// Create a client for the account identified by `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the configuration is invalid or the
    /// token cannot be used as a header value.
    pub fn new(config: ApiConfig, token: &str) -> Result<Self> {
        config.validate()?;
        let http = build_client(&config, token)?;
        Ok(Self { http, config })
    }

    /// Settings this client was built with.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `GET /points`.
    pub async fn points(&self) -> Result<PointBalance> {
        let response = self
            .http
            .get(self.config.endpoint("/points"))
            .send()
            .await
            .map_err(|e| ApiError::transport(&e))?;
        decode_json(response).await
    }

    /// `GET /threads`, in the order the service returns them.
    pub async fn threads(&self) -> Result<Vec<Thread>> {
        let response = self
            .http
            .get(self.config.endpoint("/threads"))
            .send()
            .await
            .map_err(|e| ApiError::transport(&e))?;
        let list: ThreadList = decode_json(response).await?;
        Ok(list.data)
    }

    /// `POST /threads` with `seed_message` as the first user message.
    ///
    /// A fresh UUID v4 request id is generated for every call.
    pub async fn create_thread(&self, seed_message: &str) -> Result<Thread> {
        let body = CreateThreadRequest {
            title: &self.config.thread_title,
            messages: vec![ChatMessage::user(seed_message)],
            sources: None,
            id: uuid::Uuid::new_v4().to_string(),
            dataset_id: &self.config.dataset_id,
            created_at: iso_timestamp(),
        };

        let response = self
            .http
            .post(self.config.endpoint("/threads"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::transport(&e))?;
        decode_json(response).await
    }

    /// `POST /chat` appending `text` to `thread_id`.
    ///
    /// The response body is read to the end and discarded. A connection the
    /// service drops mid-body after a success status comes back as
    /// [`ApiError::StreamAborted`].
    pub async fn send_message(
        &self,
        thread_id: &str,
        ai_id: Option<&str>,
        text: &str,
    ) -> Result<()> {
        let body = ChatRequest {
            id: thread_id,
            ai_id,
            title: &self.config.thread_title,
            messages: vec![ChatMessage::user(text)],
            sources: Vec::new(),
            model: &self.config.model,
            created_at: iso_timestamp(),
            language: &self.config.language,
        };

        let response = self
            .http
            .post(self.config.endpoint("/chat"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::transport(&e))?;
        let response = check_status(response).await?;
        let drained = response
            .bytes()
            .await
            .map_err(|e| ApiError::stream_aborted(&e))?;
        tracing::trace!(bytes = drained.len(), "chat response drained");
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await.map_err(|e| ApiError::transport(&e))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}
