//! Per-view query observer

use crate::error::{AdminError, AdminResult};
use crate::notify::Notifier;
use crate::query::{QueryClient, QueryKey};
use futures::future::{AbortHandle, Abortable};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

struct ObserverState<T> {
    status: QueryStatus,
    data: Option<T>,
    error: Option<AdminError>,
    key: Option<QueryKey>,
    abort: Option<AbortHandle>,
    generation: u64,
}

/// Rolls the observer back when a fetch future is dropped before finishing.
struct FetchGuard<'a, T> {
    state: &'a Mutex<ObserverState<T>>,
    generation: u64,
    finished: bool,
}

impl<T> Drop for FetchGuard<'_, T> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.generation != self.generation {
            return;
        }
        if let Some(handle) = state.abort.take() {
            debug!(key = ?state.key, "Fetch dropped before completion");
            handle.abort();
        }
        state.status = if state.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Idle
        };
    }
}

/// Tracks the latest fetch issued by one view.
///
/// Starting a fetch aborts the previous one still in flight. Dropping the
/// observer, or the fetch future itself, aborts whatever is running. Aborted fetches resolve to
/// [`AdminError::Cancelled`] without notifying the user.
pub struct Query<T> {
    client: QueryClient,
    notifier: Arc<dyn Notifier>,
    state: Mutex<ObserverState<T>>,
}

impl<T> Query<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(client: QueryClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            state: Mutex::new(ObserverState {
                status: QueryStatus::Idle,
                data: None,
                error: None,
                key: None,
                abort: None,
                generation: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ObserverState<T>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub async fn fetch<F, Fut>(&self, key: QueryKey, fetcher: F) -> AdminResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AdminResult<T>> + Send + 'static,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let generation = {
            let mut state = self.lock();
            if let Some(previous) = state.abort.replace(handle) {
                debug!(key = ?state.key, "Aborting superseded fetch");
                previous.abort();
            }
            state.generation += 1;
            state.status = QueryStatus::Loading;
            state.key = Some(key.clone());
            state.generation
        };
        let mut guard = FetchGuard {
            state: &self.state,
            generation,
            finished: false,
        };

        let fetch = self.client.fetch_query(key.clone(), fetcher);
        let result = match Abortable::new(fetch, registration).await {
            Ok(result) => result,
            Err(_aborted) => Err(AdminError::Cancelled),
        };

        if let Err(err) = &result {
            if err.is_cancelled() {
                debug!(%key, "Fetch cancelled");
                return result;
            }
            warn!(%key, error = %err, "Query failed");
            self.notifier.error(&err.user_message());
        }

        guard.finished = true;
        let mut state = self.lock();
        if state.generation == generation {
            state.abort = None;
            match &result {
                Ok(value) => {
                    state.status = QueryStatus::Success;
                    state.data = Some(value.clone());
                    state.error = None;
                }
                Err(err) => {
                    state.status = QueryStatus::Error;
                    state.error = Some(err.clone());
                }
            }
        }
        result
    }

    /// Abort the in-flight fetch, if any.
    pub fn cancel(&self) {
        let mut state = self.lock();
        if let Some(handle) = state.abort.take() {
            handle.abort();
            state.generation += 1;
            state.status = if state.data.is_some() {
                QueryStatus::Success
            } else {
                QueryStatus::Idle
            };
        }
    }

    pub fn status(&self) -> QueryStatus {
        self.lock().status
    }

    pub fn is_loading(&self) -> bool {
        self.status() == QueryStatus::Loading
    }

    pub fn data(&self) -> Option<T> {
        self.lock().data.clone()
    }

    pub fn error(&self) -> Option<AdminError> {
        self.lock().error.clone()
    }

    pub fn key(&self) -> Option<QueryKey> {
        self.lock().key.clone()
    }

    /// True when the last fetched key has been invalidated or aged out.
    pub async fn is_stale(&self) -> bool {
        match self.key() {
            Some(key) => self.client.is_stale(&key).await,
            None => true,
        }
    }
}

impl<T> Drop for Query<T> {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = state.abort.take() {
            handle.abort();
        }
    }
}
