//! Bounded concurrency for upstream requests
//!
//! The ConcurrencyLimiter caps how many tasks run at once against a single upstream API,
//! no matter how many are queued behind it.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Caps the number of in-flight async tasks
///
/// Backed by a tokio [`Semaphore`], whose waiters are served first-in first-out, so
/// tasks are admitted in the order they start waiting. No delay is added between tasks;
/// the only constraint is the capacity.
///
/// # Examples
///
/// ```
/// use quran_etl::limiter::ConcurrencyLimiter;
///
/// # #[tokio::main]
/// # async fn main() {
/// let limiter = ConcurrencyLimiter::new(5);
/// let tasks = (1..=20).map(|n| limiter.run(async move { n * 2 }));
/// let results = futures::future::join_all(tasks).await;
/// assert_eq!(results[19], 40);
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyLimiter {
    /// Create a limiter admitting at most `capacity` tasks at once (minimum 1)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Maximum number of tasks running at once
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tasks currently holding a slot
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.capacity - self.semaphore.available_permits()
    }

    /// Run `task` once a slot is free and return its output
    ///
    /// The task is not polled until the slot is acquired, and the slot is released when
    /// the task finishes (or is dropped).
    pub async fn run<F>(&self, task: F) -> F::Output
    where
        F: Future,
    {
        // The semaphore is never closed, so acquire only fails if that invariant breaks;
        // in that case the task still runs rather than being lost.
        let _permit = self.semaphore.acquire().await.ok();
        task.await
    }
}
