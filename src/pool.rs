//! Bounded fan-out shared by title resolution and batch downloads.
//!
//! Each item runs in its own Tokio task after acquiring a semaphore permit,
//! so at most `concurrency` items are in flight. Results land in one slot per
//! input item, in input order, regardless of completion order.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Cooperative cancellation signal.
///
/// Cloning shares the same flag. The pool checks it before starting each
/// item; work already in flight is never interrupted.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    /// Creates a cleared flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks running batches to stop starting new items.
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once a stop was requested.
    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clears the flag so the next batch starts normally.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// What happened to one input item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotResult<R> {
    /// The work ran to completion.
    Done(R),
    /// A stop was requested before the item started.
    NotStarted,
    /// The task panicked; the payload message is kept when it was a string.
    Panicked(String),
}

impl<R> SlotResult<R> {
    /// Returns the completed value, if any.
    #[must_use]
    pub fn done(self) -> Option<R> {
        match self {
            Self::Done(value) => Some(value),
            Self::NotStarted | Self::Panicked(_) => None,
        }
    }
}

/// Semaphore-bounded worker pool.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    concurrency: usize,
}

impl WorkerPool {
    /// Creates a pool running at most `concurrency` items at once (minimum 1).
    #[must_use]
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// Returns the in-flight limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs `work` over every item and returns one slot per item.
    ///
    /// `work` receives the item's position and the item itself. When `stop`
    /// is set before an item acquires its turn, that item and every later one
    /// are reported as [`SlotResult::NotStarted`].
    pub async fn run<T, R, F, Fut>(
        &self,
        items: Vec<T>,
        stop: Option<&StopFlag>,
        work: F,
    ) -> Vec<SlotResult<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(usize, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let total = items.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let work = Arc::new(work);
        let mut slots: Vec<SlotResult<R>> = (0..total).map(|_| SlotResult::NotStarted).collect();
        let mut handles = Vec::with_capacity(total);

        for (index, item) in items.into_iter().enumerate() {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                warn!("worker semaphore closed unexpectedly");
                break;
            };

            if stop.is_some_and(StopFlag::is_stop_requested) {
                debug!(
                    started = index,
                    remaining = total - index,
                    "stop requested; not starting remaining items"
                );
                break;
            }

            let work = Arc::clone(&work);
            handles.push((
                index,
                tokio::spawn(async move {
                    // Permit is released when the task ends.
                    let _permit = permit;
                    work(index, item).await
                }),
            ));
        }

        for (index, handle) in handles {
            slots[index] = match handle.await {
                Ok(value) => SlotResult::Done(value),
                Err(error) => {
                    let message = if error.is_panic() {
                        panic_message(error.into_panic())
                    } else {
                        "task cancelled".to_string()
                    };
                    warn!(index, %message, "worker task failed");
                    SlotResult::Panicked(message)
                }
            };
        }

        slots
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_results_in_input_order() {
        let pool = WorkerPool::new(3);
        let items: Vec<u64> = vec![30, 10, 20, 0];
        let slots = pool
            .run(items, None, |index, delay| async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                index * 10
            })
            .await;
        let values: Vec<usize> = slots.into_iter().map(|s| s.done().unwrap()).collect();
        assert_eq!(values, vec![0, 10, 20, 30]);
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_limit() {
        for limit in 1..=8 {
            let pool = WorkerPool::new(limit);
            let active = Arc::new(AtomicUsize::new(0));
            let peak = Arc::new(AtomicUsize::new(0));
            let (active_c, peak_c) = (Arc::clone(&active), Arc::clone(&peak));

            let slots = pool
                .run((0..20).collect::<Vec<_>>(), None, move |_, _item: i32| {
                    let active = Arc::clone(&active_c);
                    let peak = Arc::clone(&peak_c);
                    async move {
                        let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        active.fetch_sub(1, Ordering::SeqCst);
                    }
                })
                .await;

            assert_eq!(slots.len(), 20);
            assert!(peak.load(Ordering::SeqCst) <= limit, "limit {limit} exceeded");
        }
    }

    #[tokio::test]
    async fn test_stop_leaves_remaining_items_not_started() {
        let pool = WorkerPool::new(1);
        let stop = StopFlag::new();
        let stop_in_work = stop.clone();

        let slots = pool
            .run(vec![0, 1, 2, 3], Some(&stop), move |index, _item: i32| {
                let stop = stop_in_work.clone();
                async move {
                    if index == 1 {
                        stop.request_stop();
                    }
                    index
                }
            })
            .await;

        assert_eq!(slots[0], SlotResult::Done(0));
        assert_eq!(slots[1], SlotResult::Done(1));
        assert_eq!(slots[2], SlotResult::NotStarted);
        assert_eq!(slots[3], SlotResult::NotStarted);
    }

    #[tokio::test]
    async fn test_stop_before_start_skips_everything() {
        let pool = WorkerPool::new(4);
        let stop = StopFlag::new();
        stop.request_stop();
        let slots = pool
            .run(vec!["a", "b"], Some(&stop), |_, item| async move { item })
            .await;
        assert!(slots.iter().all(|s| *s == SlotResult::NotStarted));
    }

    #[tokio::test]
    async fn test_panic_is_contained_to_its_slot() {
        let pool = WorkerPool::new(2);
        let slots = pool
            .run(vec![1, 2, 3], None, |_, item: i32| async move {
                assert!(item != 2, "boom on two");
                item
            })
            .await;
        assert_eq!(slots[0], SlotResult::Done(1));
        assert!(matches!(&slots[1], SlotResult::Panicked(msg) if msg.contains("boom on two")));
        assert_eq!(slots[2], SlotResult::Done(3));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let pool = WorkerPool::new(0);
        assert_eq!(pool.concurrency(), 1);
        let slots: Vec<SlotResult<()>> = pool.run(Vec::<()>::new(), None, |_, ()| async {}).await;
        assert!(slots.is_empty());
    }

    #[test]
    fn test_stop_flag_shared_and_resettable() {
        let flag = StopFlag::new();
        let clone = flag.clone();
        assert!(!flag.is_stop_requested());
        clone.request_stop();
        assert!(flag.is_stop_requested());
        flag.reset();
        assert!(!clone.is_stop_requested());
    }
}
