//! Wire types for the points, threads and chat endpoints.

use serde::{Deserialize, Serialize};

/// Point balance as reported by `GET /points`.
///
/// The service is authoritative; values are taken as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointBalance {
    /// Points earned directly.
    #[serde(default)]
    pub points: i64,
    /// Points earned through referrals.
    #[serde(default)]
    pub referral_points: i64,
    /// Total spendable balance.
    #[serde(default)]
    pub total_points: i64,
}

impl PointBalance {
    /// Whether the balance allows another chat message.
    #[must_use]
    pub fn has_points(&self) -> bool {
        self.total_points > 0
    }
}

/// One message in a thread or request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role (`user` or `assistant`).
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// A message authored by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_owned(),
            content: content.into(),
        }
    }
}

/// A server-side conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    /// Opaque identifier assigned by the service.
    pub id: String,
    /// Thread title.
    #[serde(default)]
    pub title: Option<String>,
    /// Message history, when the endpoint includes it.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Envelope returned by `GET /threads`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadList {
    /// Threads in service order (most recent first in practice).
    #[serde(default)]
    pub data: Vec<Thread>,
}

/// Body of `POST /threads`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateThreadRequest<'a> {
    pub title: &'a str,
    pub messages: Vec<ChatMessage>,
    /// Always serialized as `null`.
    pub sources: Option<()>,
    /// Client-generated request id (UUID v4).
    pub id: String,
    pub dataset_id: &'a str,
    /// ISO-8601 UTC timestamp.
    pub created_at: String,
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    /// Thread the message is appended to.
    pub id: &'a str,
    /// Secondary account id, only sent when the account has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_id: Option<&'a str>,
    pub title: &'a str,
    pub messages: Vec<ChatMessage>,
    /// Always serialized as `[]`.
    pub sources: Vec<String>,
    pub model: &'a str,
    /// ISO-8601 UTC timestamp.
    pub created_at: String,
    pub language: &'a str,
}

/// Current time in the `YYYY-MM-DDTHH:MM:SS.mmmZ` shape browsers produce.
#[must_use]
pub fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
