//! Remote-service client core for Minerva.
//!
//! Provides the authenticated gateway to the inference API with:
//! - Session lifecycle (login, logout, expiry) backed by a credential store
//! - Conversational turn-taking with id-chaining and an in-flight latch
//! - A reqwest gateway implementation behind the [`ApiGateway`] seam
//! - Session-guarded background polling

pub mod conversation;
pub mod http;
pub mod poll;
pub mod session;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use minerva_common::GatewayError;

pub use conversation::{
    Conversation, ConversationController, ConversationTurn, ErrorEntry, RejectReason,
    SubmitOptions, SubmitOutcome, FAILURE_PLACEHOLDER,
};
pub use http::{GatewayConfig, HttpGateway};
pub use poll::spawn_guarded_poll;
pub use session::{basic_token, Clock, SessionManager, SystemClock};

/// The remote API gateway this client depends on. Implementations perform
/// authenticated HTTP calls; everything above this seam is transport-agnostic.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Validate a transport credential against the identity endpoint.
    /// Returns `GatewayError::Unauthorized` on HTTP 401.
    async fn validate(&self, credential: &str) -> Result<ValidationInfo, GatewayError>;

    /// Submit one conversational turn for a project.
    async fn converse(
        &self,
        credential: &str,
        project: &str,
        mode: ConverseMode,
        request: &ConverseRequest,
    ) -> Result<ConverseResponse, GatewayError>;
}

/// Which conversational endpoint a controller talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConverseMode {
    /// `POST /projects/{name}/chat` — `message` in, `response` out.
    Chat,
    /// `POST /projects/{name}/question` — `question` in, `answer` out.
    Question,
}

impl ConverseMode {
    pub fn endpoint(&self) -> &'static str {
        match self {
            ConverseMode::Chat => "chat",
            ConverseMode::Question => "question",
        }
    }
}

/// Body of an identity-validation response. The server may omit the body
/// entirely; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationInfo {
    pub is_admin: Option<bool>,
}

/// One outgoing conversational turn. `id` references the previous resolved
/// turn so the server can restore context; it is omitted on the wire when
/// absent, as are all non-default parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ConverseRequest {
    pub text: String,
    pub id: Option<String>,
    /// Retrieval breadth.
    pub k: Option<u32>,
    /// Similarity threshold.
    pub score: Option<f32>,
    /// Optional system instruction override.
    pub system: Option<String>,
}

impl ConverseRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            id: None,
            k: None,
            score: None,
            system: None,
        }
    }
}

/// A resolved conversational turn as returned by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ConverseResponse {
    /// Server-assigned turn identifier, used to chain the next request.
    pub id: String,
    pub text: String,
    /// Structured extras (sources, image) the controller treats as opaque.
    pub aux: Option<serde_json::Value>,
}

#[cfg(test)]
pub(crate) mod test_support;
