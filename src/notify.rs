//! Toast notifications

use std::sync::{Arc, Mutex};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Sink for user-facing notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);

    fn success(&self, message: &str) {
        self.notify(Toast {
            level: ToastLevel::Success,
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.notify(Toast {
            level: ToastLevel::Error,
            message: message.to_string(),
        });
    }

    fn info(&self, message: &str) {
        self.notify(Toast {
            level: ToastLevel::Info,
            message: message.to_string(),
        });
    }
}

/// Collects toasts in memory; clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> Vec<Toast> {
        self.lock().clone()
    }

    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn errors(&self) -> Vec<Toast> {
        self.with_level(ToastLevel::Error)
    }

    pub fn successes(&self) -> Vec<Toast> {
        self.with_level(ToastLevel::Success)
    }

    fn with_level(&self, level: ToastLevel) -> Vec<Toast> {
        self.lock()
            .iter()
            .filter(|t| t.level == level)
            .cloned()
            .collect()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, toast: Toast) {
        self.lock().push(toast);
    }
}

/// Writes toasts to the log; used by the command-line front end.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        match toast.level {
            ToastLevel::Error => error!(target: "cms_admin::toast", "{}", toast.message),
            _ => info!(target: "cms_admin::toast", "{}", toast.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_shared_between_clones() {
        let queue = ToastQueue::new();
        let sink: Arc<dyn Notifier> = Arc::new(queue.clone());

        sink.success("Banner created successfully");
        sink.error("The server encountered an error.");

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.errors().len(), 1);
        assert_eq!(queue.successes()[0].message, "Banner created successfully");

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert!(queue.is_empty());
    }
}
