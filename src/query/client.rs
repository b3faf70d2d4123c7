//! Shared query cache

use crate::error::{AdminError, AdminResult};
use crate::query::QueryKey;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

type CachedValue = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, AdminResult<CachedValue>>>;

const EVENT_CAPACITY: usize = 64;

/// Cache notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEvent {
    /// Fresh data was stored under the key
    Fetched(QueryKey),
    /// Every entry under the prefix was marked stale
    Invalidated(QueryKey),
}

struct CacheEntry {
    value: CachedValue,
    fetched_at: Instant,
    stale: bool,
}

struct InFlight {
    id: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<QueryKey, CacheEntry>,
    in_flight: HashMap<QueryKey, InFlight>,
    next_fetch_id: u64,
}

/// Cloning shares the same cache.
#[derive(Clone)]
pub struct QueryClient {
    state: Arc<RwLock<CacheState>>,
    stale_time: Duration,
    events: broadcast::Sender<QueryEvent>,
}

impl QueryClient {
    pub fn new(stale_time: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(CacheState::default())),
            stale_time,
            events,
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueryEvent> {
        self.events.subscribe()
    }

    /// Cached value for a key, fresh or not.
    pub async fn get_query_data<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let state = self.state.read().await;
        state
            .entries
            .get(key)
            .and_then(|entry| entry.value.downcast_ref::<T>())
            .cloned()
    }

    pub async fn set_query_data<T>(&self, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        let mut state = self.state.write().await;
        state.entries.insert(
            key.clone(),
            CacheEntry {
                value: Arc::new(value),
                fetched_at: Instant::now(),
                stale: false,
            },
        );
        drop(state);
        let _ = self.events.send(QueryEvent::Fetched(key));
    }

    /// True when the key has no entry, was invalidated, or outlived the stale time.
    pub async fn is_stale(&self, key: &QueryKey) -> bool {
        let state = self.state.read().await;
        match state.entries.get(key) {
            Some(entry) => self.entry_is_stale(entry),
            None => true,
        }
    }

    fn entry_is_stale(&self, entry: &CacheEntry) -> bool {
        entry.stale || entry.fetched_at.elapsed() >= self.stale_time
    }

    /// Serve a fresh cached value, or run `fetcher`.
    ///
    /// Concurrent calls for the same key share one in-flight request; only the
    /// first caller's `fetcher` runs.
    pub async fn fetch_query<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> AdminResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AdminResult<T>> + Send + 'static,
    {
        {
            let state = self.state.read().await;
            if let Some(entry) = state.entries.get(&key) {
                if !self.entry_is_stale(entry) {
                    if let Some(value) = entry.value.downcast_ref::<T>() {
                        debug!(%key, "Query cache hit");
                        return Ok(value.clone());
                    }
                }
            }
        }

        let (id, shared) = {
            let mut state = self.state.write().await;
            match state.in_flight.get(&key) {
                Some(running) => {
                    debug!(%key, "Joining in-flight query");
                    (running.id, running.future.clone())
                }
                None => {
                    state.next_fetch_id += 1;
                    let id = state.next_fetch_id;
                    let fut = fetcher();
                    let shared = async move { fut.await.map(|v| Arc::new(v) as CachedValue) }
                        .boxed()
                        .shared();
                    state.in_flight.insert(
                        key.clone(),
                        InFlight {
                            id,
                            future: shared.clone(),
                        },
                    );
                    (id, shared)
                }
            }
        };

        let result = shared.await;
        self.complete(&key, id, &result).await;

        let value = result?;
        value.downcast_ref::<T>().cloned().ok_or_else(|| {
            AdminError::Decode(format!("Cached value for {} has an unexpected type", key))
        })
    }

    /// Store the outcome of fetch `id` unless it was superseded or invalidated.
    async fn complete(&self, key: &QueryKey, id: u64, result: &AdminResult<CachedValue>) {
        let mut state = self.state.write().await;
        let current = state.in_flight.get(key).map(|f| f.id) == Some(id);
        if !current {
            return;
        }
        state.in_flight.remove(key);

        match result {
            Ok(value) => {
                state.entries.insert(
                    key.clone(),
                    CacheEntry {
                        value: Arc::clone(value),
                        fetched_at: Instant::now(),
                        stale: false,
                    },
                );
                drop(state);
                let _ = self.events.send(QueryEvent::Fetched(key.clone()));
            }
            Err(err) if err.is_cancelled() => {}
            Err(err) => warn!(%key, error = %err, "Query failed"),
        }
    }

    /// Mark every entry under `prefix` stale and forget in-flight fetches
    /// started before the invalidation. Returns the number of entries touched.
    pub async fn invalidate_queries(&self, prefix: &QueryKey) -> usize {
        let mut state = self.state.write().await;
        let mut touched = 0;
        for (key, entry) in state.entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.stale = true;
                touched += 1;
            }
        }
        state.in_flight.retain(|key, _| !key.starts_with(prefix));
        drop(state);

        debug!(%prefix, touched, "Invalidated queries");
        let _ = self.events.send(QueryEvent::Invalidated(prefix.clone()));
        touched
    }

    /// Drop entries under `prefix` entirely.
    pub async fn remove_queries(&self, prefix: &QueryKey) {
        let mut state = self.state.write().await;
        state.entries.retain(|key, _| !key.starts_with(prefix));
        state.in_flight.retain(|key, _| !key.starts_with(prefix));
    }

    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.entries.clear();
        state.in_flight.clear();
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}
