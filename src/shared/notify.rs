use std::sync::{Arc, Mutex};

use super::types::{Notification, NotificationKind};

/// Fire-and-forget sink for user-facing messages (toasts in the web shell).
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);
}

/// Routes notifications into the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Info => tracing::info!(target: "notify", "{}", message),
            NotificationKind::Error => tracing::error!(target: "notify", "{}", message),
        }
    }
}

/// Keeps every notification in memory so a host can drain them into its UI.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    items: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, oldest first
    pub fn notifications(&self) -> Vec<Notification> {
        match self.items.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Remove and return everything recorded so far
    pub fn drain(&self) -> Vec<Notification> {
        let mut guard = match self.items.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("[RecordingNotifier] Mutex poisoned, recovering...");
                poisoned.into_inner()
            }
        };
        std::mem::take(&mut *guard)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        let mut guard = match self.items.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(Notification {
            kind,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(NotificationKind::Info, "first");
        notifier.notify(NotificationKind::Error, "second");

        let items = notifier.notifications();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].message, "first");
        assert_eq!(items[1].kind, NotificationKind::Error);
    }

    #[test]
    fn test_drain_empties() {
        let notifier = RecordingNotifier::new();
        notifier.notify(NotificationKind::Info, "hello");

        assert_eq!(notifier.drain().len(), 1);
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_clones_share_storage() {
        let notifier = RecordingNotifier::new();
        let handle = notifier.clone();
        handle.notify(NotificationKind::Info, "shared");
        assert_eq!(notifier.notifications().len(), 1);
    }
}
