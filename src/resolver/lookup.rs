//! Rate-limited, time-bounded access to the lookup client

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::timeout;
use tracing::warn;

use super::rate_limiter::RateLimiter;
use crate::client::LookupClient;
use crate::error::LookupError;
use crate::exercises::{Candidate, ExerciseRecord, ExternalId};

/// Every outbound call goes through here: limiter permit first, then the
/// call under a deadline. A hung call can only cost its own deadline.
pub struct GatedLookup {
    client: Arc<dyn LookupClient>,
    limiter: RateLimiter,
    call_timeout: Duration,
    calls: AtomicU64,
    failures: AtomicU64,
}

impl GatedLookup {
    pub fn new(client: Arc<dyn LookupClient>, limiter: RateLimiter, call_timeout: Duration) -> Self {
        Self {
            client,
            limiter,
            call_timeout,
            calls: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// External calls made so far
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// External calls that ended in a transport error
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::SeqCst)
    }

    async fn gated<T, Fut>(&self, op: &str, call: Fut) -> Result<T, LookupError>
    where
        Fut: Future<Output = Result<T, LookupError>>,
    {
        self.limiter.acquire().await;
        self.calls.fetch_add(1, Ordering::SeqCst);

        let result = match timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout(self.call_timeout)),
        };

        if let Err(e) = &result {
            self.failures.fetch_add(1, Ordering::SeqCst);
            warn!(op = %op, error = %e, "Lookup call failed");
        }
        result
    }

    pub async fn search_by_text(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, LookupError> {
        self.gated("search_by_text", self.client.search_by_text(query, limit)).await
    }

    pub async fn search_by_muscle(&self, muscle: &str, limit: usize) -> Result<Vec<Candidate>, LookupError> {
        self.gated("search_by_muscle", self.client.search_by_muscle(muscle, limit)).await
    }

    pub async fn fetch_by_id(&self, id: &ExternalId) -> Result<ExerciseRecord, LookupError> {
        self.gated("fetch_by_id", self.client.fetch_by_id(id)).await
    }

    pub async fn list_muscle_names(&self) -> Result<Vec<String>, LookupError> {
        self.gated("list_muscle_names", self.client.list_muscle_names()).await
    }

    pub async fn list_category_names(&self) -> Result<Vec<String>, LookupError> {
        self.gated("list_category_names", self.client.list_category_names()).await
    }
}
