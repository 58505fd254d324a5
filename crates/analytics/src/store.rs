//! In-memory analytics store with a synchronous observer registry.
//!
//! Every mutation appends to the history, recomputes the full snapshot and
//! queues it for delivery under the state lock. Whichever caller finds the
//! queue idle drains it after the lock is released, so subscribers see
//! snapshots in mutation order and may call back into the store.

use chrono::Utc;
use parking_lot::Mutex;
use segment_core::{CustomerAttributes, PredictionRecord, PredictionResult};
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::{Arc, Weak};
use tracing::{debug, info};

use crate::filters::PredictionFilter;
use crate::snapshot::AnalyticsSnapshot;

/// Callback invoked with every new snapshot.
pub type SnapshotCallback = Arc<dyn Fn(Arc<AnalyticsSnapshot>) + Send + Sync>;

/// A queued snapshot. `target` restricts it to one subscriber (the initial
/// delivery on subscribe).
struct Delivery {
    version: u64,
    snapshot: Arc<AnalyticsSnapshot>,
    target: Option<u64>,
}

struct StoreState {
    history: VecDeque<PredictionRecord>,
    snapshot: Arc<AnalyticsSnapshot>,
    /// Bumped on every mutation.
    version: u64,
    pending: VecDeque<Delivery>,
    dispatching: bool,
}

impl StoreState {
    /// Queue `delivery`; returns true when the caller must drain the queue.
    fn enqueue(&mut self, delivery: Delivery) -> bool {
        self.pending.push_back(delivery);
        !std::mem::replace(&mut self.dispatching, true)
    }
}

struct Subscriber {
    id: u64,
    /// Store version current at registration; older broadcasts are skipped.
    since: u64,
    callback: SnapshotCallback,
}

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    entries: Vec<Subscriber>,
}

struct StoreInner {
    state: Mutex<StoreState>,
    subscribers: Mutex<Subscribers>,
    max_history: Option<NonZeroUsize>,
}

/// Process-wide prediction history and derived analytics. Cloning yields
/// another handle to the same store.
#[derive(Clone)]
pub struct AnalyticsStore {
    inner: Arc<StoreInner>,
}

impl AnalyticsStore {
    /// Unbounded history.
    pub fn new() -> Self {
        Self::with_retention(None)
    }

    /// Keep at most `max_history` records, evicting the oldest first.
    pub fn with_retention(max_history: Option<NonZeroUsize>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(StoreState {
                    history: VecDeque::new(),
                    snapshot: Arc::new(AnalyticsSnapshot::empty(Utc::now())),
                    version: 0,
                    pending: VecDeque::new(),
                    dispatching: false,
                }),
                subscribers: Mutex::new(Subscribers::default()),
                max_history,
            }),
        }
    }

    /// Record a classified customer and broadcast the new snapshot.
    pub fn add_prediction(
        &self,
        attributes: CustomerAttributes,
        result: PredictionResult,
    ) -> PredictionRecord {
        self.record(PredictionRecord::new(attributes, result))
    }

    /// Append an already-built record (e.g. with a caller-chosen timestamp).
    pub fn record(&self, record: PredictionRecord) -> PredictionRecord {
        let (total, drain) = {
            let mut state = self.inner.state.lock();
            state.history.push_back(record.clone());
            if let Some(cap) = self.inner.max_history {
                while state.history.len() > cap.get() {
                    state.history.pop_front();
                }
            }
            let snapshot = Arc::new(AnalyticsSnapshot::compute(&state.history, Utc::now()));
            metrics::gauge!("analytics.history_size").set(state.history.len() as f64);
            (snapshot.total_predictions, Self::publish(&mut state, snapshot))
        };

        metrics::counter!("analytics.predictions_recorded").increment(1);
        debug!(
            record_id = %record.id,
            segment = %record.result.segment,
            total,
            "Prediction recorded"
        );

        if drain {
            self.dispatch();
        }
        record
    }

    /// Register a callback. It receives the current snapshot immediately and
    /// every later one until the returned handle is dropped or unsubscribed.
    ///
    /// When called from inside another callback, the initial snapshot arrives
    /// once that callback returns.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Arc<AnalyticsSnapshot>) + Send + Sync + 'static,
    {
        let (id, drain) = {
            let mut state = self.inner.state.lock();
            let id = {
                let mut subs = self.inner.subscribers.lock();
                let id = subs.next_id;
                subs.next_id += 1;
                subs.entries.push(Subscriber {
                    id,
                    since: state.version,
                    callback: Arc::new(callback),
                });
                metrics::gauge!("analytics.subscribers").set(subs.entries.len() as f64);
                id
            };
            let delivery = Delivery {
                version: state.version,
                snapshot: state.snapshot.clone(),
                target: Some(id),
            };
            (id, state.enqueue(delivery))
        };

        if drain {
            self.dispatch();
        }

        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    /// Current aggregate state. No side effects.
    pub fn snapshot(&self) -> Arc<AnalyticsSnapshot> {
        self.inner.state.lock().snapshot.clone()
    }

    /// Aggregate over the records matching `filter`.
    pub fn filtered_snapshot(&self, filter: &PredictionFilter) -> AnalyticsSnapshot {
        let state = self.inner.state.lock();
        AnalyticsSnapshot::compute(state.history.iter().filter(|r| filter.matches(r)), Utc::now())
    }

    /// Copy of the history in insertion order.
    pub fn history(&self) -> Vec<PredictionRecord> {
        self.inner.state.lock().history.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().entries.len()
    }

    /// Drop all history and broadcast the empty snapshot.
    pub fn reset(&self) {
        let drain = {
            let mut state = self.inner.state.lock();
            state.history.clear();
            metrics::gauge!("analytics.history_size").set(0.0);
            let snapshot = Arc::new(AnalyticsSnapshot::empty(Utc::now()));
            Self::publish(&mut state, snapshot)
        };
        info!("Analytics store reset");
        if drain {
            self.dispatch();
        }
    }

    /// Install `snapshot` as the current state and queue it for every
    /// subscriber.
    fn publish(state: &mut StoreState, snapshot: Arc<AnalyticsSnapshot>) -> bool {
        state.version += 1;
        state.snapshot = snapshot.clone();
        let delivery = Delivery {
            version: state.version,
            snapshot,
            target: None,
        };
        state.enqueue(delivery)
    }

    /// Deliver queued snapshots until the queue is empty. Only one caller
    /// drains at a time; callbacks run without any store lock held.
    fn dispatch(&self) {
        let _unwind = DispatchGuard(&self.inner);
        loop {
            let delivery = {
                let mut state = self.inner.state.lock();
                match state.pending.pop_front() {
                    Some(delivery) => delivery,
                    None => {
                        state.dispatching = false;
                        return;
                    }
                }
            };

            let callbacks: Vec<SnapshotCallback> = self
                .inner
                .subscribers
                .lock()
                .entries
                .iter()
                .filter(|s| match delivery.target {
                    Some(id) => s.id == id,
                    None => s.since < delivery.version,
                })
                .map(|s| s.callback.clone())
                .collect();

            for callback in callbacks {
                callback(delivery.snapshot.clone());
            }
        }
    }
}

/// Releases the dispatcher role if a callback panics, so the next mutation
/// drains whatever is still queued.
struct DispatchGuard<'a>(&'a StoreInner);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.state.lock().dispatching = false;
        }
    }
}

impl Default for AnalyticsStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration handle returned by [`AnalyticsStore::subscribe`]. Dropping it
/// removes the callback.
pub struct Subscription {
    id: u64,
    store: Weak<StoreInner>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Removal happens in Drop.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            let mut subs = inner.subscribers.lock();
            subs.entries.retain(|s| s.id != self.id);
            metrics::gauge!("analytics.subscribers").set(subs.entries.len() as f64);
        }
    }
}
