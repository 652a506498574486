//! At most one in-flight resolution per key

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::task::JoinError;
use tracing::debug;

type SharedOutcome<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;
type PendingMap<T, E> = Arc<Mutex<HashMap<String, SharedOutcome<T, E>>>>;

/// Merges concurrent identical requests into one factory invocation.
///
/// The factory runs on its own task, so it settles even if the caller that
/// started it goes away. Its pending entry is removed by a guard the task
/// owns, whatever way the task ends.
pub struct RequestCoalescer<T, E> {
    pending: PendingMap<T, E>,
}

impl<T, E> Default for RequestCoalescer<T, E> {
    fn default() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<T, E> RequestCoalescer<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + From<JoinError> + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `factory` for `key`, or join the run already in flight
    pub async fn run_exclusive<F, Fut>(&self, key: &str, factory: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let outcome = {
            let mut pending = lock(&self.pending);
            match pending.get(key) {
                Some(existing) => {
                    debug!(key = %key, "Joining in-flight resolution");
                    existing.clone()
                }
                None => {
                    // Registered before the lock is released, so the task's
                    // guard cannot run ahead of the insert.
                    let guard = PendingGuard {
                        key: key.to_string(),
                        pending: Arc::clone(&self.pending),
                    };
                    let work = factory();
                    let handle = tokio::spawn(async move {
                        let _guard = guard;
                        work.await
                    });
                    let outcome = async move { handle.await.unwrap_or_else(|e| Err(E::from(e))) }
                        .boxed()
                        .shared();
                    pending.insert(key.to_string(), outcome.clone());
                    outcome
                }
            }
        };

        outcome.await
    }

    /// Number of keys currently being resolved
    pub fn in_flight(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn is_pending(&self, key: &str) -> bool {
        lock(&self.pending).contains_key(key)
    }
}

fn lock<T, E>(pending: &PendingMap<T, E>) -> MutexGuard<'_, HashMap<String, SharedOutcome<T, E>>> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct PendingGuard<T, E> {
    key: String,
    pending: PendingMap<T, E>,
}

impl<T, E> Drop for PendingGuard<T, E> {
    fn drop(&mut self) {
        lock(&self.pending).remove(&self.key);
    }
}
