//! Session-guarded background polling.
//!
//! Peripheral screens refresh on an interval; every tick re-checks session
//! validity first so an invalid session skips the network call entirely
//! instead of letting the transport layer discover the 401.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::session::SessionManager;

/// Spawn a periodic task that runs `tick` only while a valid session
/// exists. Runs until the returned handle is aborted. Missed ticks are
/// skipped, not bunched.
pub fn spawn_guarded_poll<F>(
    manager: Arc<SessionManager>,
    interval: Duration,
    mut tick: F,
) -> JoinHandle<()>
where
    F: FnMut() -> BoxFuture<'static, ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if !manager.check_auth() {
                debug!("no valid session, skipping poll tick");
                continue;
            }
            tick().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedClock, MockGateway};
    use crate::ValidationInfo;
    use minerva_platform::MemorySessionStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_tick(counter: Arc<AtomicUsize>) -> impl FnMut() -> BoxFuture<'static, ()> {
        move || {
            let counter = counter.clone();
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        }
    }

    #[tokio::test]
    async fn unauthenticated_ticks_are_skipped() {
        let gateway = Arc::new(MockGateway::new());
        let manager = Arc::new(
            SessionManager::new(gateway, Box::new(MemorySessionStore::new()))
                .with_clock(Box::new(FixedClock::at(0))),
        );

        let counter = Arc::new(AtomicUsize::new(0));
        let handle = spawn_guarded_poll(
            manager,
            Duration::from_millis(5),
            counting_tick(counter.clone()),
        );

        tokio::time::sleep(Duration::from_millis(40)).await;
        handle.abort();

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn authenticated_ticks_run() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_validate(Ok(ValidationInfo::default()));
        let manager = Arc::new(
            SessionManager::new(gateway, Box::new(MemorySessionStore::new()))
                .with_clock(Box::new(FixedClock::at(0))),
        );
        manager.login("alice", "secret").await.unwrap();

        let counter = Arc::new(AtomicUsize::new(0));
        let handle = spawn_guarded_poll(
            manager,
            Duration::from_millis(5),
            counting_tick(counter.clone()),
        );

        tokio::time::sleep(Duration::from_millis(40)).await;
        handle.abort();

        assert!(counter.load(Ordering::SeqCst) > 0);
    }

    #[tokio::test]
    async fn expiry_stops_the_polling() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_validate(Ok(ValidationInfo::default()));

        let clock = FixedClock::at(0);
        let manager = Arc::new(
            SessionManager::new(gateway, Box::new(MemorySessionStore::new()))
                .with_clock(Box::new(clock.clone())),
        );
        manager.login("alice", "secret").await.unwrap();

        let counter = Arc::new(AtomicUsize::new(0));
        let handle = spawn_guarded_poll(
            manager.clone(),
            Duration::from_millis(5),
            counting_tick(counter.clone()),
        );

        tokio::time::sleep(Duration::from_millis(30)).await;
        let before_expiry = counter.load(Ordering::SeqCst);
        assert!(before_expiry > 0);

        clock.set(minerva_common::SESSION_TTL_SECS);
        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.abort();

        // At most one tick can race the expiry; after that the session is
        // cleared and ticks stop
        let after = counter.load(Ordering::SeqCst);
        assert!(after <= before_expiry + 1, "ticks kept running: {after}");
        assert!(manager.current_session().is_none());
    }
}
