//! Turn-taking state machine for a single chat/question thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};
use uuid::Uuid;

use minerva_common::{Event, EventBus};

use crate::session::SessionManager;
use crate::{ApiGateway, ConverseMode, ConverseRequest};

use super::guard::SubmitGuard;
use super::{Conversation, ConversationTurn, ErrorEntry};

/// Recognized submission parameters; unset options are omitted from the
/// request so the server applies project defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitOptions {
    /// Retrieval breadth.
    pub k: Option<u32>,
    /// Similarity threshold.
    pub score: Option<f32>,
    /// System instruction override.
    pub system: Option<String>,
}

/// Why a submission was not accepted. Rejections are no-ops: nothing is
/// appended and no network call is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyInput,
    NotAuthenticated,
    /// A request for this conversation is already in flight.
    Busy,
}

/// Outcome of a submission. Failures are terminal turns, not errors; the
/// controller never propagates gateway failures to its caller.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The turn resolved; carries the response text.
    Resolved(String),
    /// The round trip failed; a placeholder turn was appended.
    Failed,
    Rejected(RejectReason),
}

/// Owns one [`Conversation`] and its submission latch. One instance per
/// open thread; conversations are never shared between controllers.
pub struct ConversationController {
    id: Uuid,
    project: String,
    mode: ConverseMode,
    auth: Arc<SessionManager>,
    gateway: Arc<dyn ApiGateway>,
    conversation: Mutex<Conversation>,
    errors: Mutex<Vec<ErrorEntry>>,
    busy: AtomicBool,
    timeout: Duration,
    events: Option<Arc<EventBus>>,
}

impl ConversationController {
    pub fn new(
        gateway: Arc<dyn ApiGateway>,
        auth: Arc<SessionManager>,
        project: impl Into<String>,
        mode: ConverseMode,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project: project.into(),
            mode,
            auth,
            gateway,
            conversation: Mutex::new(Conversation::new()),
            errors: Mutex::new(Vec::new()),
            busy: AtomicBool::new(false),
            timeout: Duration::from_secs(120),
            events: None,
        }
    }

    /// Bound the in-flight window; elapse counts as a network failure and
    /// releases the latch.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    /// Submit one turn.
    ///
    /// Accepted submissions append a pending turn immediately, then a
    /// second, resolved (or terminal) turn once the round trip settles;
    /// the pending turn is never mutated in place. At most one request is
    /// in flight per conversation at any time.
    pub async fn submit(&self, text: &str, options: SubmitOptions) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::Rejected(RejectReason::EmptyInput);
        }
        if !self.auth.check_auth() {
            debug!(conversation = %self.id, "submit rejected: no valid session");
            return SubmitOutcome::Rejected(RejectReason::NotAuthenticated);
        }
        let Some(credential) = self.auth.credential() else {
            return SubmitOutcome::Rejected(RejectReason::NotAuthenticated);
        };

        let Some(_guard) = SubmitGuard::acquire(&self.busy) else {
            debug!(conversation = %self.id, "submit rejected: request in flight");
            return SubmitOutcome::Rejected(RejectReason::Busy);
        };

        // Thread off the last server-acknowledged turn, then append the
        // optimistic pending copy so the UI can render a spinner.
        let last_id = {
            let mut conversation = self.conversation.lock().unwrap();
            let last_id = conversation.last_resolved_id();
            conversation.push(ConversationTurn::pending(text));
            last_id
        };

        let request = ConverseRequest {
            text: text.to_string(),
            id: (!last_id.is_empty()).then_some(last_id),
            k: options.k,
            score: options.score,
            system: options.system,
        };

        debug!(
            conversation = %self.id,
            project = %self.project,
            mode = ?self.mode,
            "submitting turn"
        );

        let result = tokio::time::timeout(
            self.timeout,
            self.gateway
                .converse(&credential, &self.project, self.mode, &request),
        )
        .await;

        match result {
            Ok(Ok(response)) => {
                self.conversation.lock().unwrap().push(ConversationTurn::resolved(
                    response.id.clone(),
                    text,
                    response.text.clone(),
                    response.aux,
                ));
                debug!(conversation = %self.id, turn = %response.id, "turn resolved");
                self.publish(Event::TurnResolved { id: response.id });
                SubmitOutcome::Resolved(response.text)
            }
            Ok(Err(e)) => self.fail(text, e.to_string()),
            Err(_) => self.fail(text, "request timed out".to_string()),
        }
    }

    /// Record a failed round trip: terminal placeholder turn plus an
    /// error-log entry. The latch is released by the guard on return.
    fn fail(&self, text: &str, error: String) -> SubmitOutcome {
        warn!(conversation = %self.id, error = %error, "turn failed");

        self.conversation
            .lock()
            .unwrap()
            .push(ConversationTurn::failed(text));
        self.errors.lock().unwrap().push(ErrorEntry {
            origin: "submit".into(),
            error,
            at: chrono::Utc::now(),
        });
        self.publish(Event::TurnFailed {
            origin: "submit".into(),
        });
        SubmitOutcome::Failed
    }

    fn publish(&self, event: Event) {
        if let Some(ref events) = self.events {
            events.publish(event);
        }
    }

    /// Whether a new submission would currently be accepted.
    pub fn is_accepting(&self) -> bool {
        !self.busy.load(Ordering::Acquire)
    }

    /// Snapshot of the conversation history.
    pub fn turns(&self) -> Vec<ConversationTurn> {
        self.conversation.lock().unwrap().turns().to_vec()
    }

    /// Snapshot of the failure log.
    pub fn errors(&self) -> Vec<ErrorEntry> {
        self.errors.lock().unwrap().clone()
    }

    pub fn last_resolved_id(&self) -> String {
        self.conversation.lock().unwrap().last_resolved_id()
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn mode(&self) -> ConverseMode {
        self.mode
    }
}
