//! Debounce primitive
//!
//! A single-slot timer: every observed value replaces the pending one and
//! restarts the quiet interval. The debounced value is published on a
//! `watch` channel so owners can react to each change.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Coalesces a rapidly changing value.
///
/// `observe` must be called from within a Tokio runtime. Dropping the
/// debouncer (or calling [`Debouncer::shutdown`]) cancels the pending
/// emission.
pub struct Debouncer<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    delay: Duration,
    tx: watch::Sender<T>,
    slot: Mutex<Slot>,
    cancel: CancellationToken,
}

#[derive(Default)]
struct Slot {
    /// Bumped on every observe; a timer only emits if it still holds the latest
    seq: u64,
    pending: Option<JoinHandle<()>>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner {
                delay,
                tx,
                slot: Mutex::new(Slot::default()),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Feed a new input value, restarting the quiet interval
    pub fn observe(&self, value: T) {
        if self.inner.cancel.is_cancelled() {
            return;
        }

        let mut slot = self.inner.slot.lock();
        slot.seq += 1;
        let seq = slot.seq;
        if let Some(handle) = slot.pending.take() {
            handle.abort();
        }

        let inner = Arc::clone(&self.inner);
        slot.pending = Some(tokio::spawn(async move {
            tokio::select! {
                _ = inner.cancel.cancelled() => {}
                _ = tokio::time::sleep(inner.delay) => inner.emit(seq, value),
            }
        }));
    }

    /// The last emitted value
    pub fn current(&self) -> T {
        self.inner.tx.borrow().clone()
    }

    /// Receiver notified whenever the debounced value changes
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.inner.tx.subscribe()
    }

    /// True while an emission is scheduled
    pub fn is_pending(&self) -> bool {
        self.inner.slot.lock().pending.is_some()
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    /// Cancel the pending emission and ignore all later input
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        if let Some(handle) = self.inner.slot.lock().pending.take() {
            handle.abort();
        }
    }
}

impl<T: PartialEq> Inner<T> {
    fn emit(&self, seq: u64, value: T) {
        let mut slot = self.slot.lock();
        if slot.seq != seq || self.cancel.is_cancelled() {
            return;
        }
        slot.pending = None;
        // Emit while holding the slot so a newer observe cannot interleave
        let changed = self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
        trace!(seq, changed, "debounce interval elapsed");
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.inner.cancel.cancel();
        if let Some(handle) = self.inner.slot.lock().pending.take() {
            handle.abort();
        }
    }
}
