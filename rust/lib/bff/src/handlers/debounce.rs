//! Single-slot debounce timer.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Runs at most one delayed task. Scheduling again cancels the previous one.
pub struct Debouncer {
    slot: Arc<Mutex<Option<Pending>>>,
    next_id: AtomicU64,
}

struct Pending {
    id: u64,
    token: CancellationToken,
}

impl Debouncer {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Run `task` after `delay` unless cancelled or replaced first.
    ///
    /// Must be called inside a tokio runtime.
    pub fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        let previous = self
            .slot
            .lock()
            .unwrap()
            .replace(Pending { id, token: token.clone() });
        if let Some(previous) = previous {
            previous.token.cancel();
        }

        let slot = Arc::clone(&self.slot);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    trace!(id, "debounce cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    {
                        let mut slot = slot.lock().unwrap();
                        if slot.as_ref().is_some_and(|p| p.id == id) {
                            slot.take();
                        }
                    }
                    trace!(id, "debounce fired");
                    task.await;
                }
            }
        });
    }

    /// Drop the pending task, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        match self.slot.lock().unwrap().take() {
            Some(pending) => {
                pending.token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot.lock().unwrap().is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn counter_task(counter: &Arc<AtomicUsize>, value: usize) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.store(value, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let d = Debouncer::new();
        let hit = Arc::new(AtomicUsize::new(0));
        d.schedule(Duration::from_millis(800), counter_task(&hit, 1));
        assert!(d.is_pending());

        tokio::time::sleep(Duration::from_millis(799)).await;
        assert_eq!(hit.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(hit.load(Ordering::SeqCst), 1);
        assert!(!d.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn reschedule_replaces_pending_task() {
        let d = Debouncer::new();
        let hit = Arc::new(AtomicUsize::new(0));
        for value in 1..=5 {
            d.schedule(Duration::from_millis(500), counter_task(&hit, value));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hit.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let d = Debouncer::new();
        let hit = Arc::new(AtomicUsize::new(0));
        d.schedule(Duration::from_millis(100), counter_task(&hit, 1));
        assert!(d.cancel());
        assert!(!d.cancel());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(hit.load(Ordering::SeqCst), 0);
    }
}
