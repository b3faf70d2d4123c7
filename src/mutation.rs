//! Mutations
//!
//! A mutation wraps one write operation: it refuses to start while a previous
//! run is pending, invalidates its query keys on success, and reports the
//! outcome through the notifier.

use crate::error::{AdminError, AdminResult};
use crate::notify::Notifier;
use crate::query::{QueryClient, QueryKey};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct Mutation {
    name: String,
    queries: QueryClient,
    notifier: Arc<dyn Notifier>,
    invalidates: Vec<QueryKey>,
    success_message: String,
    pending: Arc<AtomicBool>,
}

/// Clears the pending flag however the run ends.
struct PendingGuard<'a>(&'a AtomicBool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Mutation {
    pub fn new(
        name: impl Into<String>,
        queries: QueryClient,
        notifier: Arc<dyn Notifier>,
        success_message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            queries,
            notifier,
            invalidates: Vec::new(),
            success_message: success_message.into(),
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Invalidate `key` (and everything under it) after each success.
    pub fn invalidates(mut self, key: QueryKey) -> Self {
        self.invalidates.push(key);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    pub async fn run<T, Fut>(&self, operation: Fut) -> AdminResult<T>
    where
        Fut: Future<Output = AdminResult<T>>,
    {
        if self
            .pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AdminError::Busy);
        }
        let _guard = PendingGuard(&self.pending);

        match operation.await {
            Ok(value) => {
                for key in &self.invalidates {
                    self.queries.invalidate_queries(key).await;
                }
                info!(mutation = %self.name, "Mutation succeeded");
                self.notifier.success(&self.success_message);
                Ok(value)
            }
            Err(err) => {
                error!(mutation = %self.name, error = %err, "Mutation failed");
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastQueue;
    use std::time::Duration;

    fn mutation(toasts: &ToastQueue, queries: &QueryClient) -> Mutation {
        Mutation::new(
            "faqs.create",
            queries.clone(),
            Arc::new(toasts.clone()),
            "FAQ created successfully",
        )
        .invalidates(QueryKey::new("faqs"))
    }

    #[tokio::test]
    async fn test_success_invalidates_and_notifies() {
        let toasts = ToastQueue::new();
        let queries = QueryClient::default();
        let list = QueryKey::new("faqs").with("list");
        queries.set_query_data(list.clone(), 1u32).await;

        let value = mutation(&toasts, &queries).run(async { Ok(42) }).await.unwrap();

        assert_eq!(value, 42);
        assert!(queries.is_stale(&list).await);
        assert_eq!(toasts.successes()[0].message, "FAQ created successfully");
    }

    #[tokio::test]
    async fn test_failure_notifies_with_readable_message() {
        let toasts = ToastQueue::new();
        let queries = QueryClient::default();
        let list = QueryKey::new("faqs").with("list");
        queries.set_query_data(list.clone(), 1u32).await;

        let result: AdminResult<()> = mutation(&toasts, &queries)
            .run(async { Err(AdminError::Network("connection refused".into())) })
            .await;

        assert!(result.is_err());
        assert!(!queries.is_stale(&list).await);
        assert_eq!(
            toasts.errors()[0].message,
            "Unable to reach the server. Check your connection and try again."
        );
    }

    #[tokio::test]
    async fn test_second_run_while_pending_is_busy() {
        let toasts = ToastQueue::new();
        let queries = QueryClient::default();
        let m = mutation(&toasts, &queries);

        let slow = m.run(async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(1)
        });
        let fast = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            assert!(m.is_pending());
            m.run(async { Ok(2) }).await
        };
        let (first, second) = tokio::join!(slow, fast);

        assert_eq!(first, Ok(1));
        assert_eq!(second, Err(AdminError::Busy));
        assert!(!m.is_pending());
        assert_eq!(toasts.successes().len(), 1);
    }
}
