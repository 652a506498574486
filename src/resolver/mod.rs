//! Resolver module - name to canonical exercise record
//!
//! Features:
//! - Two cache tiers (process memory, then SQLite)
//! - One in-flight resolution per normalized name
//! - Alias, parenthetical and hyphen variants tried before a muscle-filtered fallback
//! - Every outbound call spaced by a shared rate limiter

pub mod aliases;
pub mod coalescer;
pub mod lookup;
pub mod matcher;
pub mod memory_cache;
pub mod muscles;
pub mod normalize;
pub mod rate_limiter;
pub mod strategy;

pub use aliases::AliasTable;
pub use coalescer::RequestCoalescer;
pub use memory_cache::MemoryCache;
pub use muscles::MuscleGroupMapper;
pub use normalize::normalize;
pub use rate_limiter::RateLimiter;
pub use strategy::{Attempt, SearchLimits, Strategy};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::client::LookupClient;
use crate::db::PersistentCache;
use crate::error::{LookupError, ResolveError};
use crate::exercises::{Candidate, ExerciseRecord};
use lookup::GatedLookup;

/// Resolver tunables
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Minimum spacing between outbound calls
    pub min_interval: Duration,
    /// Deadline for each outbound call
    pub call_timeout: Duration,
    /// Uncached names resolved concurrently by `resolve_many`
    pub batch_size: usize,
    pub search_limit: usize,
    pub muscle_search_limit: usize,
    pub aliases: AliasTable,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(250),
            call_timeout: Duration::from_secs(10),
            batch_size: 5,
            search_limit: 10,
            muscle_search_limit: 50,
            aliases: AliasTable::builtin(),
        }
    }
}

/// Diagnostic counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Records held in the memory cache
    pub count: usize,
    /// Resolutions currently in flight
    pub pending: usize,
    /// Outbound calls made since construction
    pub external_calls: u64,
    /// Outbound calls that ended in a transport error or timeout
    pub failed_calls: u64,
}

/// Resolution facade. Cheap to clone; clones share caches, limiter and
/// in-flight state, so build one per process and hand out clones.
///
/// Persistent writes run in the background. Dropping the last clone
/// detaches any still pending, so they finish while the runtime lives;
/// call [`MediaResolver::flush_writes`] before shutting the runtime down.
#[derive(Clone)]
pub struct MediaResolver {
    inner: Arc<Inner>,
}

struct Inner {
    memory: MemoryCache,
    persistent: Arc<dyn PersistentCache>,
    coalescer: RequestCoalescer<Option<ExerciseRecord>, ResolveError>,
    lookup: GatedLookup,
    mapper: MuscleGroupMapper,
    config: ResolverConfig,
    /// Background persistent writes
    writes: Mutex<JoinSet<()>>,
}

impl MediaResolver {
    pub fn new(
        client: Arc<dyn LookupClient>,
        persistent: Arc<dyn PersistentCache>,
        config: ResolverConfig,
    ) -> Self {
        let limiter = RateLimiter::new(config.min_interval);
        Self {
            inner: Arc::new(Inner {
                memory: MemoryCache::new(),
                persistent,
                coalescer: RequestCoalescer::new(),
                lookup: GatedLookup::new(client, limiter, config.call_timeout),
                mapper: MuscleGroupMapper::new(),
                config,
                writes: Mutex::new(JoinSet::new()),
            }),
        }
    }

    /// Best record for `raw_name`, `Ok(None)` when nothing matches.
    ///
    /// Errors only when every attempt failed in transport, so callers can
    /// tell "try again" apart from "no media".
    pub async fn resolve(&self, raw_name: &str) -> Result<Option<ExerciseRecord>, ResolveError> {
        let key = normalize(raw_name);
        if key.is_empty() {
            return Ok(None);
        }

        if let Some(record) = self.inner.memory.get(&key) {
            debug!(key = %key, "Memory cache hit");
            return Ok(Some(record));
        }

        if let Some(record) = self.inner.read_persistent(&key).await {
            debug!(key = %key, "Persistent cache hit");
            self.inner.memory.insert(key, record.clone());
            return Ok(Some(record));
        }

        self.resolve_missing(key, raw_name.trim().to_string()).await
    }

    /// Lookup for a key both cache tiers have already missed
    async fn resolve_missing(&self, key: String, raw: String) -> Result<Option<ExerciseRecord>, ResolveError> {
        let inner = Arc::clone(&self.inner);
        let task_key = key.clone();
        self.inner
            .coalescer
            .run_exclusive(&key, move || async move { inner.resolve_uncached(&raw, &task_key).await })
            .await
    }

    /// Resolve many names; misses and failures are left out of the map.
    ///
    /// Cached names are answered first. The rest go out in batches of
    /// `batch_size`, concurrent within a batch and sequential across batches.
    pub async fn resolve_many<S: AsRef<str>>(&self, names: &[S]) -> HashMap<String, ExerciseRecord> {
        let mut resolved = HashMap::new();
        let mut uncached: Vec<(String, String)> = Vec::new();

        for name in names {
            let raw = name.as_ref();
            let key = normalize(raw);
            if key.is_empty() || resolved.contains_key(&key) || uncached.iter().any(|(k, _)| *k == key) {
                continue;
            }

            if let Some(record) = self.inner.memory.get(&key) {
                resolved.insert(key, record);
            } else if let Some(record) = self.inner.read_persistent(&key).await {
                self.inner.memory.insert(key.clone(), record.clone());
                resolved.insert(key, record);
            } else {
                uncached.push((key, raw.trim().to_string()));
            }
        }

        debug!(
            cached = resolved.len(),
            uncached = uncached.len(),
            "Batch resolution partitioned"
        );

        for batch in uncached.chunks(self.inner.config.batch_size.max(1)) {
            let results = join_all(
                batch
                    .iter()
                    .map(|(key, raw)| self.resolve_missing(key.clone(), raw.clone())),
            )
            .await;
            for ((key, raw), result) in batch.iter().zip(results) {
                match result {
                    Ok(Some(record)) => {
                        resolved.insert(key.clone(), record);
                    }
                    Ok(None) => debug!(name = %raw, "No media in batch"),
                    Err(e) => warn!(name = %raw, error = %e, "Batch resolution failed"),
                }
            }
        }

        resolved
    }

    /// Whether `raw_name` is already in the memory cache
    pub fn is_cached(&self, raw_name: &str) -> bool {
        self.inner.memory.contains(&normalize(raw_name))
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            count: self.inner.memory.len(),
            pending: self.inner.coalescer.in_flight(),
            external_calls: self.inner.lookup.calls(),
            failed_calls: self.inner.lookup.failures(),
        }
    }

    /// Drop every memory entry. Persistent entries stay.
    pub fn clear_memory_cache(&self) {
        self.inner.memory.clear();
    }

    /// Wait for background persistent writes started so far
    pub async fn flush_writes(&self) {
        let mut writes = std::mem::take(&mut *self.inner.writes());
        while let Some(result) = writes.join_next().await {
            if let Err(e) = result {
                warn!(error = %e, "Persistent cache write task failed");
            }
        }
    }

    /// Muscle names known to the lookup service, for filter menus
    pub async fn muscle_names(&self) -> Result<Vec<String>, LookupError> {
        self.inner.lookup.list_muscle_names().await
    }

    /// Category names known to the lookup service, for filter menus
    pub async fn category_names(&self) -> Result<Vec<String>, LookupError> {
        self.inner.lookup.list_category_names().await
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let writes = self.writes.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !writes.is_empty() {
            debug!(pending = writes.len(), "Detaching persistent cache writes");
            writes.detach_all();
        }
    }
}

impl Inner {
    fn writes(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.writes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn limits(&self) -> SearchLimits {
        SearchLimits {
            text: self.config.search_limit,
            muscle: self.config.muscle_search_limit,
        }
    }

    async fn read_persistent(&self, key: &str) -> Option<ExerciseRecord> {
        match self.persistent.get(key).await {
            Ok(found) => found,
            Err(e) => {
                warn!(key = %key, error = %e, "Persistent cache read failed");
                None
            }
        }
    }

    /// Runs once per key at a time, under the coalescer
    async fn resolve_uncached(&self, raw: &str, key: &str) -> Result<Option<ExerciseRecord>, ResolveError> {
        // another run may have finished between the caller's cache check and now
        if let Some(record) = self.memory.get(key) {
            return Ok(Some(record));
        }

        let chain = strategy::plan(raw, &self.config.aliases, &self.mapper);
        let mut attempts = 0;
        let mut failures = 0;
        let mut last_error = None;

        for step in &chain {
            debug!(name = %raw, strategy = %step, "Trying strategy");
            let attempt = match step.run(&self.lookup, self.limits()).await {
                Attempt::Hit(candidate) => match self.enrich(candidate).await {
                    Ok(record) => {
                        info!(name = %raw, found = %record.name, strategy = %step, "Resolved exercise media");
                        self.store(key, &record);
                        return Ok(Some(record));
                    }
                    Err(e) => Attempt::Failed(e),
                },
                other => other,
            };

            attempts += 1;
            if let Attempt::Failed(e) = attempt {
                failures += 1;
                last_error = Some(e);
            }
        }

        match last_error {
            Some(last_error) if failures == attempts => {
                warn!(name = %raw, attempts, "Every lookup attempt failed");
                Err(ResolveError::Unavailable { attempts, last_error })
            }
            _ => {
                info!(name = %raw, attempts, "No media found");
                Ok(None)
            }
        }
    }

    /// The only place a partial search hit becomes a full record
    async fn enrich(&self, candidate: Candidate) -> Result<ExerciseRecord, LookupError> {
        match candidate {
            Candidate::Full(record) => Ok(record),
            Candidate::Partial(partial) => {
                debug!(id = %partial.id, name = %partial.name, "Fetching full record");
                let mut record = self.lookup.fetch_by_id(&partial.id).await?;
                if record.id.is_none() {
                    record.id = Some(partial.id);
                }
                if record.category.is_none() {
                    record.category = partial.category;
                }
                if record.primary_muscles.is_empty() {
                    record.primary_muscles = partial.primary_muscles;
                }
                Ok(record)
            }
        }
    }

    /// Memory write now, persistent write in the background
    fn store(&self, key: &str, record: &ExerciseRecord) {
        self.memory.insert(key.to_string(), record.clone());

        let persistent = Arc::clone(&self.persistent);
        let key = key.to_string();
        let record = record.clone();
        let mut writes = self.writes();
        while writes.try_join_next().is_some() {}
        writes.spawn(async move {
            if let Err(e) = persistent.put(&key, &record).await {
                warn!(key = %key, error = %e, "Persistent cache write failed");
            }
        });
    }
}
