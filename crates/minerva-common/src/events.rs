use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Notifications about session and conversation state. The session manager
/// publishes here on every session write so consumers react to explicit
/// events instead of reading ambient shared state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    SessionChanged { username: String },
    SessionCleared,
    TurnResolved { id: String },
    TurnFailed { origin: String },
    Shutdown,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}
