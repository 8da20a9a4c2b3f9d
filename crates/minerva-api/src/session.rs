//! Session lifecycle: login, logout, and expiry evaluation.
//!
//! The [`SessionManager`] owns the authentication state machine
//! (`UNAUTHENTICATED -> AUTHENTICATED -> UNAUTHENTICATED`) and is the only
//! writer of the shared [`Session`] value. Writes always replace the whole
//! record and are mirrored to the credential store, so state survives
//! restarts and fails closed on any login or validation failure.

use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tracing::{debug, info, warn};

use minerva_common::{AuthError, Event, EventBus, GatewayError, Session, SESSION_TTL_SECS};
use minerva_platform::SessionStore;

use crate::ApiGateway;

/// Source of "now" in epoch seconds. Injected so expiry is deterministic
/// under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

/// Encode a username/password pair into the transport credential used by
/// the `Authorization: Basic` header.
pub fn basic_token(username: &str, password: &str) -> String {
    BASE64.encode(format!("{username}:{password}"))
}

/// Owns the authentication state machine.
pub struct SessionManager {
    gateway: Arc<dyn ApiGateway>,
    store: Box<dyn SessionStore>,
    clock: Box<dyn Clock>,
    ttl_secs: i64,
    events: Option<Arc<EventBus>>,
    session: RwLock<Option<Session>>,
}

impl SessionManager {
    /// Create a manager, restoring any persisted session from the store.
    pub fn new(gateway: Arc<dyn ApiGateway>, store: Box<dyn SessionStore>) -> Self {
        let session = match store.load() {
            Ok(session) => session,
            Err(e) => {
                warn!("failed to restore persisted session: {e}");
                None
            }
        };
        if let Some(ref s) = session {
            debug!(username = %s.username, "restored persisted session");
        }

        Self {
            gateway,
            store,
            clock: Box::new(SystemClock),
            ttl_secs: SESSION_TTL_SECS,
            events: None,
            session: RwLock::new(session),
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ttl(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    /// Authenticate against the remote identity endpoint.
    ///
    /// On success the new session replaces any existing one wholesale. On
    /// any failure the current session is cleared — the manager fails
    /// closed — and the error is returned so callers can render it.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let credential = basic_token(username, password);

        match self.gateway.validate(&credential).await {
            Ok(info) => {
                let session = Session::new(
                    username,
                    credential,
                    self.clock.now(),
                    self.ttl_secs,
                    info.is_admin.unwrap_or(false),
                );
                self.replace(session.clone());
                info!(username = %username, "login succeeded");
                Ok(session)
            }
            Err(GatewayError::Unauthorized) => {
                self.clear("login rejected");
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => {
                self.clear("login failed");
                Err(AuthError::Gateway(e))
            }
        }
    }

    /// Clear the session unconditionally. Never fails; store errors are
    /// logged and the in-memory state is cleared regardless.
    pub fn logout(&self) {
        self.clear("logout");
    }

    /// Evaluate session validity against the current time.
    ///
    /// Expiry is a side effect of this check and only of this check: an
    /// expired session is cleared here and `false` is returned. Idempotent,
    /// safe to call on every render or poll tick.
    pub fn check_auth(&self) -> bool {
        let now = self.clock.now();
        let expired = match *self.session.read().unwrap() {
            None => return false,
            Some(ref s) => s.is_expired(now),
        };

        if expired {
            self.clear("session expired");
            return false;
        }
        true
    }

    /// Read accessor for the current session. Never triggers expiry side
    /// effects; use [`check_auth`](Self::check_auth) for that.
    pub fn current_session(&self) -> Option<Session> {
        self.session.read().unwrap().clone()
    }

    /// The transport credential of the current session, if any. Callers
    /// must gate on [`check_auth`](Self::check_auth) first.
    pub fn credential(&self) -> Option<String> {
        self.session
            .read()
            .unwrap()
            .as_ref()
            .map(|s| s.credential.clone())
    }

    fn replace(&self, session: Session) {
        if let Err(e) = self.store.save(Some(&session)) {
            warn!("failed to persist session: {e}");
        }
        let username = session.username.clone();
        *self.session.write().unwrap() = Some(session);
        self.publish(Event::SessionChanged { username });
    }

    fn clear(&self, reason: &str) {
        let had_session = self.session.write().unwrap().take().is_some();
        if let Err(e) = self.store.save(None) {
            warn!("failed to clear persisted session: {e}");
        }
        if had_session {
            debug!(reason = %reason, "session cleared");
            self.publish(Event::SessionCleared);
        }
    }

    fn publish(&self, event: Event) {
        if let Some(ref events) = self.events {
            events.publish(event);
        }
    }
}
