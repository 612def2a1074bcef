//! Poller: owns one light and drives its periodic check.
//!
//! `start_polling` spawns a background task that checks immediately and
//! then every [`POLL_INTERVAL`]. Checks of one poller never overlap: the
//! task awaits each check before the next tick, and ticks missed while a
//! slow check is in flight are skipped. A direct [`Poller::check`] waits
//! for the running check to finish, so the counter reported to the
//! observer is never handed out twice.
//!
//! Every polling cycle carries a generation number. Stopping or replacing a
//! cycle bumps the generation, so a result that belongs to a cancelled cycle
//! is dropped instead of touching the record or the display.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use trafficlight_core::{LightRecord, LightSnapshot, LightStatus, Position};

use crate::checker::{CheckOutcome, Transport};

/// Fixed period between two scheduled checks.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Receives every completed check.
///
/// `times_checked` is the counter value before this check was counted, so
/// `0` marks the first completed check of a light.
pub trait CheckObserver: Send + Sync {
    fn on_check_complete(&self, position: Position, times_checked: u64, url: &str);
}

/// State shared between a poller and its background task.
struct Shared {
    record: Mutex<LightRecord>,
    generation: AtomicU64,
    /// Held for the whole of one check, transport call included.
    check_lock: tokio::sync::Mutex<()>,
}

/// Owns a [`LightRecord`] and its recurring check.
pub struct Poller {
    shared: Arc<Shared>,
    transport: Arc<dyn Transport>,
    observer: Arc<dyn CheckObserver>,
    /// Handle of the running polling task, if any.
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Poller {
    /// Create a poller for `url` at `position`. Nothing is scheduled yet.
    pub fn new(
        url: impl Into<String>,
        position: Position,
        transport: Arc<dyn Transport>,
        observer: Arc<dyn CheckObserver>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                record: Mutex::new(LightRecord::new(url, position)),
                generation: AtomicU64::new(0),
                check_lock: tokio::sync::Mutex::new(()),
            }),
            transport,
            observer,
            task: Mutex::new(None),
        }
    }

    pub fn position(&self) -> Position {
        self.shared.record.lock().unwrap().position()
    }

    pub fn url(&self) -> String {
        self.shared.record.lock().unwrap().url().to_string()
    }

    pub fn times_checked(&self) -> u64 {
        self.shared.record.lock().unwrap().times_checked()
    }

    pub fn status(&self) -> LightStatus {
        self.shared.record.lock().unwrap().status()
    }

    pub fn snapshot(&self) -> LightSnapshot {
        self.shared.record.lock().unwrap().snapshot()
    }

    /// Whether a polling task is currently scheduled.
    pub fn is_polling(&self) -> bool {
        self.task
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Run one check against the current URL and apply its result.
    ///
    /// Waits for a check already in flight on this light before starting.
    pub async fn check(&self) {
        let generation = self.shared.generation.load(Ordering::Acquire);
        run_check(
            &self.shared,
            self.transport.as_ref(),
            self.observer.as_ref(),
            generation,
        )
        .await;
    }

    /// Check now, then every [`POLL_INTERVAL`] until stopped.
    ///
    /// Replaces any cycle already running. Must be called within a tokio
    /// runtime.
    pub fn start_polling(&self) {
        let mut task = self.task.lock().unwrap();
        if let Some(old) = task.take() {
            old.abort();
        }

        let generation = self.shared.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let shared = Arc::clone(&self.shared);
        let transport = Arc::clone(&self.transport);
        let observer = Arc::clone(&self.observer);

        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(POLL_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                // The first tick completes immediately.
                ticker.tick().await;
                run_check(&shared, transport.as_ref(), observer.as_ref(), generation).await;
            }
        }));

        debug!(position = self.position(), generation, "polling started");
    }

    /// Cancel the recurring check. Safe to call when nothing is scheduled.
    pub fn stop_polling(&self) {
        let mut task = self.task.lock().unwrap();
        if let Some(handle) = task.take() {
            self.shared.generation.fetch_add(1, Ordering::AcqRel);
            handle.abort();
            debug!(position = self.position(), "polling stopped");
        }
    }

    /// Point this light at a new URL and restart polling from scratch.
    ///
    /// The check counter is kept.
    pub fn update_url(&self, url: impl Into<String>) {
        let url = url.into();
        let position = {
            let mut record = self.shared.record.lock().unwrap();
            record.set_url(url.clone());
            // Results of the old cycle must not land on the new URL.
            self.shared.generation.fetch_add(1, Ordering::AcqRel);
            record.position()
        };
        info!(position, %url, "light url updated");

        self.stop_polling();
        self.start_polling();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(handle) = self.task.get_mut().ok().and_then(Option::take) {
            handle.abort();
        }
    }
}

async fn run_check(
    shared: &Shared,
    transport: &dyn Transport,
    observer: &dyn CheckObserver,
    generation: u64,
) {
    let _running = shared.check_lock.lock().await;
    let url = shared.record.lock().unwrap().url().to_string();
    let outcome = transport.get(&url).await;
    complete_check(shared, observer, generation, outcome);
}

/// Apply a check result: set status, notify, then count the check.
///
/// Runs without an await point so task cancellation cannot split it.
fn complete_check(
    shared: &Shared,
    observer: &dyn CheckObserver,
    generation: u64,
    outcome: CheckOutcome,
) {
    let (position, times_checked, url) = {
        let mut record = shared.record.lock().unwrap();
        if shared.generation.load(Ordering::Acquire) != generation {
            debug!(position = record.position(), "discarding result of cancelled cycle");
            return;
        }
        record.set_status(outcome.status());
        (record.position(), record.times_checked(), record.url().to_string())
    };

    debug!(position, times_checked, status = %outcome.status(), %url, "check complete");
    observer.on_check_complete(position, times_checked, &url);

    shared.record.lock().unwrap().increment_checked();
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    use tokio::sync::mpsc;
    use tokio::time::Instant;

    use crate::checker::BoxFuture;

    /// Transport with scripted per-URL outcomes and an optional delay.
    #[derive(Default)]
    pub(crate) struct FakeTransport {
        outcomes: Mutex<HashMap<String, CheckOutcome>>,
        calls: Mutex<Vec<String>>,
        delay: Option<Duration>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeTransport {
        pub(crate) fn with_delay(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::default()
            }
        }

        pub(crate) fn set_outcome(&self, url: &str, outcome: CheckOutcome) {
            self.outcomes
                .lock()
                .unwrap()
                .insert(url.to_string(), outcome);
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub(crate) fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    impl Transport for FakeTransport {
        fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, CheckOutcome> {
            Box::pin(async move {
                self.calls.lock().unwrap().push(url.to_string());
                let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.max_in_flight.fetch_max(now, Ordering::SeqCst);
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                self.outcomes
                    .lock()
                    .unwrap()
                    .get(url)
                    .copied()
                    .unwrap_or(CheckOutcome::Success)
            })
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) struct Notification {
        pub position: Position,
        pub times_checked: u64,
        pub url: String,
    }

    /// Observer that forwards every notification into a channel.
    pub(crate) struct ChannelObserver {
        tx: mpsc::UnboundedSender<Notification>,
    }

    impl ChannelObserver {
        pub(crate) fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Notification>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (Arc::new(Self { tx }), rx)
        }
    }

    impl CheckObserver for ChannelObserver {
        fn on_check_complete(&self, position: Position, times_checked: u64, url: &str) {
            let _ = self.tx.send(Notification {
                position,
                times_checked,
                url: url.to_string(),
            });
        }
    }

    fn poller_for(
        url: &str,
        transport: Arc<FakeTransport>,
    ) -> (Poller, mpsc::UnboundedReceiver<Notification>) {
        let (observer, rx) = ChannelObserver::new();
        (Poller::new(url, 0, transport, observer), rx)
    }

    #[test]
    fn new_poller_is_idle_and_unchecked() {
        let (poller, _rx) = poller_for("https://example.com", Arc::new(FakeTransport::default()));
        assert_eq!(poller.position(), 0);
        assert_eq!(poller.times_checked(), 0);
        assert_eq!(poller.status(), LightStatus::Unchecked);
        assert!(!poller.is_polling());
    }

    #[tokio::test]
    async fn check_success_notifies_before_increment() {
        let transport = Arc::new(FakeTransport::default());
        let (poller, mut rx) = poller_for("https://example.com", transport);

        poller.check().await;

        let n = rx.recv().await.unwrap();
        assert_eq!(n.times_checked, 0);
        assert_eq!(n.url, "https://example.com");
        assert_eq!(poller.times_checked(), 1);
        assert_eq!(poller.status(), LightStatus::Ok);
    }

    #[tokio::test]
    async fn check_failure_sets_error_and_still_counts() {
        let transport = Arc::new(FakeTransport::default());
        transport.set_outcome("https://down.example", CheckOutcome::Failure);
        let (poller, mut rx) = poller_for("https://down.example", transport);

        poller.check().await;
        poller.check().await;

        assert_eq!(rx.recv().await.unwrap().times_checked, 0);
        assert_eq!(rx.recv().await.unwrap().times_checked, 1);
        assert_eq!(poller.times_checked(), 2);
        assert_eq!(poller.status(), LightStatus::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_checks_run_one_at_a_time() {
        let transport = Arc::new(FakeTransport::with_delay(Duration::from_secs(1)));
        let (poller, mut rx) = poller_for("https://example.com", Arc::clone(&transport));

        tokio::join!(poller.check(), poller.check());

        assert_eq!(transport.max_in_flight(), 1);
        assert_eq!(rx.recv().await.unwrap().times_checked, 0);
        assert_eq!(rx.recv().await.unwrap().times_checked, 1);
        assert_eq!(poller.times_checked(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn polls_immediately_then_every_interval() {
        let transport = Arc::new(FakeTransport::default());
        let (poller, mut rx) = poller_for("https://example.com", transport);
        let start = Instant::now();

        poller.start_polling();
        assert!(poller.is_polling());

        let first = rx.recv().await.unwrap();
        assert_eq!(first.times_checked, 0);
        assert_eq!(start.elapsed(), Duration::ZERO);

        let second = rx.recv().await.unwrap();
        assert_eq!(second.times_checked, 1);
        assert_eq!(start.elapsed(), POLL_INTERVAL);

        let third = rx.recv().await.unwrap();
        assert_eq!(third.times_checked, 2);
        assert_eq!(start.elapsed(), POLL_INTERVAL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_does_not_stop_the_timer() {
        let transport = Arc::new(FakeTransport::default());
        transport.set_outcome("https://down.example", CheckOutcome::Failure);
        let (poller, mut rx) = poller_for("https://down.example", Arc::clone(&transport));

        poller.start_polling();
        for expected in 0..4 {
            assert_eq!(rx.recv().await.unwrap().times_checked, expected);
        }
        assert_eq!(poller.status(), LightStatus::Error);
        assert!(poller.is_polling());
        assert_eq!(transport.calls().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_polling_cancels_future_checks() {
        let transport = Arc::new(FakeTransport::default());
        let (poller, mut rx) = poller_for("https://example.com", Arc::clone(&transport));

        poller.start_polling();
        rx.recv().await.unwrap();
        poller.stop_polling();
        assert!(!poller.is_polling());

        tokio::time::sleep(POLL_INTERVAL * 3).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(transport.calls().len(), 1);
        assert_eq!(poller.times_checked(), 1);
    }

    #[test]
    fn stop_polling_is_idempotent() {
        let (poller, _rx) = poller_for("https://example.com", Arc::new(FakeTransport::default()));
        poller.stop_polling();
        poller.stop_polling();
        assert!(!poller.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn update_url_restarts_cycle_and_keeps_counter() {
        let transport = Arc::new(FakeTransport::default());
        let (poller, mut rx) = poller_for("https://example.com", Arc::clone(&transport));

        poller.start_polling();
        rx.recv().await.unwrap();
        tokio::time::sleep(Duration::from_secs(4)).await;

        let restarted = Instant::now();
        poller.update_url("https://new.example.com");

        let n = rx.recv().await.unwrap();
        assert_eq!(n.url, "https://new.example.com");
        assert_eq!(n.times_checked, 1);
        assert_eq!(restarted.elapsed(), Duration::ZERO);

        // The new cadence counts from the update, not from the first start.
        let n = rx.recv().await.unwrap();
        assert_eq!(n.times_checked, 2);
        assert_eq!(restarted.elapsed(), POLL_INTERVAL);

        assert_eq!(
            transport.calls(),
            vec![
                "https://example.com".to_string(),
                "https://new.example.com".to_string(),
                "https://new.example.com".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn update_url_discards_in_flight_result_of_old_cycle() {
        let transport = Arc::new(FakeTransport::with_delay(Duration::from_secs(3)));
        let (poller, mut rx) = poller_for("https://slow.example", Arc::clone(&transport));

        poller.start_polling();
        // Let the first request go out, then replace the URL mid-flight.
        tokio::time::sleep(Duration::from_secs(1)).await;
        poller.update_url("https://new.example.com");

        let n = rx.recv().await.unwrap();
        assert_eq!(n.url, "https://new.example.com");
        assert_eq!(n.times_checked, 0);
        assert_eq!(poller.times_checked(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_checks_never_overlap() {
        let transport = Arc::new(FakeTransport::with_delay(Duration::from_secs(25)));
        let (poller, mut rx) = poller_for("https://slow.example", Arc::clone(&transport));

        poller.start_polling();
        for _ in 0..3 {
            rx.recv().await.unwrap();
        }

        assert_eq!(transport.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(poller.times_checked(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_poller_cancels_task() {
        let transport = Arc::new(FakeTransport::default());
        let (poller, mut rx) = poller_for("https://example.com", Arc::clone(&transport));

        poller.start_polling();
        rx.recv().await.unwrap();
        drop(poller);

        tokio::time::sleep(POLL_INTERVAL * 2).await;
        assert_eq!(transport.calls().len(), 1);
    }
}
