// ── Polling reconciler ──
//
// Keeps a local snapshot of the daemon's domain list in sync by polling.
// One background task per reconciler; it never has more than one
// `list_domains()` request outstanding. Poll failures are absorbed here
// and retried after a fixed delay; subscribers only ever see good data.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vmswitch_api::DomainSummary;

use crate::api::DomainApi;
use crate::config::PollTiming;
use crate::error::CoreError;
use crate::snapshot::snapshot_changed;

/// Lower bound on the delay before the first poll.
const MIN_INITIAL_DELAY: Duration = Duration::from_millis(1);

/// An accepted domain list. Replaced wholesale, never mutated in place.
pub type Snapshot = Arc<Vec<DomainSummary>>;

// ── ReconcilerState ──────────────────────────────────────────────

/// Lifecycle of a [`PollingReconciler`], observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ReconcilerState {
    /// Constructed, not yet started.
    Idle,
    /// Timer armed, no request in flight (includes the retry wait).
    Polling,
    /// `list_domains()` in flight.
    Fetching,
    /// Terminal.
    Stopped,
}

// ── PollingReconciler ────────────────────────────────────────────

/// Periodically fetches the domain list and reports changes.
///
/// Cheaply cloneable; all clones share one poll loop. The loop holds only
/// a weak reference, so dropping every handle tears it down just like
/// [`stop()`](Self::stop).
pub struct PollingReconciler<A: DomainApi> {
    inner: Arc<ReconcilerInner<A>>,
}

struct ReconcilerInner<A> {
    api: Arc<A>,
    timing: PollTiming,
    state: watch::Sender<ReconcilerState>,
    snapshot: watch::Sender<Option<Snapshot>>,
    cancel: CancellationToken,
}

impl<A: DomainApi> Clone for PollingReconciler<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: DomainApi> PollingReconciler<A> {
    /// Create an idle reconciler. Nothing is fetched until
    /// [`start()`](Self::start).
    pub fn new(api: Arc<A>, timing: PollTiming) -> Self {
        let (state, _) = watch::channel(ReconcilerState::Idle);
        let (snapshot, _) = watch::channel(None);

        Self {
            inner: Arc::new(ReconcilerInner {
                api,
                timing,
                state,
                snapshot,
                cancel: CancellationToken::new(),
            }),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Start polling: `Idle -> Polling`.
    ///
    /// `on_change` runs on the poll task once per accepted snapshot: after
    /// the first successful poll, then after every poll whose result
    /// differs from the previous snapshot. It may call [`stop()`](Self::stop).
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<F>(&self, on_change: F) -> Result<(), CoreError>
    where
        F: FnMut(Snapshot) + Send + 'static,
    {
        let mut from = ReconcilerState::Idle;
        let started = self.inner.state.send_if_modified(|state| {
            from = *state;
            if *state == ReconcilerState::Idle {
                *state = ReconcilerState::Polling;
                true
            } else {
                false
            }
        });
        if !started {
            return Err(CoreError::InvalidTransition {
                from,
                action: "start",
            });
        }

        let timing = self.inner.timing;
        info!(
            poll_interval_ms = duration_ms(timing.poll_interval),
            retry_delay_ms = duration_ms(timing.retry_delay),
            "domain reconciler started"
        );

        tokio::spawn(poll_loop(
            Arc::downgrade(&self.inner),
            self.inner.cancel.clone(),
            timing,
            on_change,
        ));
        Ok(())
    }

    /// Stop polling: any state `-> Stopped`.
    ///
    /// Cancels the pending timer and drops any in-flight request. Once this
    /// returns, the snapshot is no longer written and `on_change` is not
    /// invoked again. Idempotent; safe to call from `on_change`.
    pub fn stop(&self) {
        let changed = self.inner.state.send_if_modified(|state| {
            if *state == ReconcilerState::Stopped {
                false
            } else {
                *state = ReconcilerState::Stopped;
                true
            }
        });
        self.inner.cancel.cancel();

        if changed {
            info!("domain reconciler stopped");
        }
    }

    // ── State observation ────────────────────────────────────────

    /// Current lifecycle state.
    pub fn current_state(&self) -> ReconcilerState {
        *self.inner.state.borrow()
    }

    /// Subscribe to lifecycle state changes.
    pub fn state(&self) -> watch::Receiver<ReconcilerState> {
        self.inner.state.subscribe()
    }

    /// The last accepted snapshot, `None` until the first successful poll.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.inner.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot replacements.
    pub fn subscribe(&self) -> watch::Receiver<Option<Snapshot>> {
        self.inner.snapshot.subscribe()
    }
}

impl<A> ReconcilerInner<A> {
    /// Move `from -> to` unless the reconciler has been stopped meanwhile.
    fn transition(&self, from: ReconcilerState, to: ReconcilerState) -> bool {
        self.state.send_if_modified(|state| {
            if *state == from {
                *state = to;
                true
            } else {
                false
            }
        })
    }

    /// Replace the snapshot if `domains` differs from it. Returns the new
    /// snapshot when it was replaced.
    fn accept(&self, domains: Vec<DomainSummary>) -> Option<Snapshot> {
        if self.cancel.is_cancelled() {
            return None;
        }

        let mut accepted = None;
        self.snapshot.send_if_modified(|current| {
            if *self.state.borrow() != ReconcilerState::Fetching {
                return false;
            }
            if !snapshot_changed(current.as_deref().map(Vec::as_slice), &domains) {
                return false;
            }
            let snapshot = Arc::new(domains);
            accepted = Some(Arc::clone(&snapshot));
            *current = Some(snapshot);
            true
        });
        accepted
    }
}

impl<A> Drop for ReconcilerInner<A> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Background poll loop ─────────────────────────────────────────

/// Main loop: wait → fetch → compare → render, with the wait measured from
/// the end of the previous fetch.
async fn poll_loop<A, F>(
    inner: Weak<ReconcilerInner<A>>,
    cancel: CancellationToken,
    timing: PollTiming,
    mut on_change: F,
) where
    A: DomainApi,
    F: FnMut(Snapshot) + Send + 'static,
{
    let mut delay = timing.initial_delay.max(MIN_INITIAL_DELAY);
    let mut failures: u32 = 0;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(delay) => {}
        }

        let api = {
            let Some(inner) = inner.upgrade() else {
                break;
            };
            if !inner.transition(ReconcilerState::Polling, ReconcilerState::Fetching) {
                break;
            }
            Arc::clone(&inner.api)
        };

        // No strong reference across the fetch, so dropping the last
        // handle still cancels it.
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = api.list_domains() => result,
        };
        drop(api);

        let Some(inner) = inner.upgrade() else {
            break;
        };

        delay = match result {
            Ok(domains) => {
                if failures > 0 {
                    info!(failures, "domain poll recovered");
                    failures = 0;
                }
                if let Some(snapshot) = inner.accept(domains) {
                    debug!(domains = snapshot.len(), "domain snapshot changed");
                    if !cancel.is_cancelled() {
                        on_change(snapshot);
                    }
                }
                timing.poll_interval
            }
            Err(e) => {
                failures = failures.saturating_add(1);
                warn!(
                    error = %e,
                    failures,
                    retry_in_ms = duration_ms(timing.retry_delay),
                    "domain poll failed"
                );
                timing.retry_delay
            }
        };

        if !inner.transition(ReconcilerState::Fetching, ReconcilerState::Polling) {
            break;
        }
    }

    debug!("domain poll loop exiting");
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
