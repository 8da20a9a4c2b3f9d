//! Conversational turn-taking.
//!
//! A [`Conversation`] is an append-only log of request/response turns that
//! share server-side context via id-chaining: each outgoing request carries
//! the id of the most recently *resolved* turn. The
//! [`ConversationController`] owns one conversation and enforces at most
//! one in-flight request through a single-flag latch.

mod controller;
mod guard;

pub use controller::{ConversationController, RejectReason, SubmitOptions, SubmitOutcome};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inline answer shown for a turn that failed to resolve.
pub const FAILURE_PLACEHOLDER: &str = "Error, something went wrong with my transistors.";

/// One request/response pair within a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Server-assigned identifier; empty for a turn the server has not
    /// named (the pending copy, or the first turn before resolution).
    pub id: String,
    pub request_text: String,
    /// `None` while the turn is pending.
    pub response_text: Option<String>,
    /// Structured extras (sources, image), opaque to the controller.
    pub aux: Option<serde_json::Value>,
}

impl ConversationTurn {
    /// The optimistic copy appended when a submission is accepted.
    pub fn pending(request_text: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            request_text: request_text.into(),
            response_text: None,
            aux: None,
        }
    }

    pub fn resolved(
        id: impl Into<String>,
        request_text: impl Into<String>,
        response_text: impl Into<String>,
        aux: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: id.into(),
            request_text: request_text.into(),
            response_text: Some(response_text.into()),
            aux,
        }
    }

    /// Terminal turn recorded when a submission fails.
    pub fn failed(request_text: impl Into<String>) -> Self {
        Self::resolved("", request_text, FAILURE_PLACEHOLDER, None)
    }

    pub fn is_resolved(&self) -> bool {
        self.response_text.is_some()
    }
}

/// Append-only sequence of turns; no edits, no reordering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Id of the last resolved turn, or empty if none has resolved yet.
    /// Pending turns never carry an id, so threading always follows the
    /// server-acknowledged history.
    pub fn last_resolved_id(&self) -> String {
        self.turns
            .iter()
            .rev()
            .find(|t| t.is_resolved())
            .map(|t| t.id.clone())
            .unwrap_or_default()
    }
}

/// Append-only failure record exposed for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub origin: String,
    pub error: String,
    pub at: DateTime<Utc>,
}
