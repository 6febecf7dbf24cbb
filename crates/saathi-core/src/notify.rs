//! Single-slot notification channel with timed auto-dismiss.
//!
//! At most one notification is live. A new `notify()` overwrites the slot and
//! restarts the dismiss timer; there is no queue. Every write bumps a
//! generation counter so a timer armed for an older notification can never
//! clear a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Default auto-dismiss delay.
pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_secs(3);

/// A transient user-visible message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: Option<String>,
    pub message: String,
}

struct Inner {
    slot: watch::Sender<Option<Notification>>,
    generation: AtomicU64,
    dismiss_after: Duration,
}

/// Handle to the notification slot. Cloning shares the same slot.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<Inner>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_AFTER)
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("current", &self.current())
            .field("dismiss_after", &self.inner.dismiss_after)
            .finish()
    }
}

impl Notifier {
    pub fn new(dismiss_after: Duration) -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                slot,
                generation: AtomicU64::new(0),
                dismiss_after,
            }),
        }
    }

    /// Show `message`, replacing whatever is showing, and (re)start the
    /// dismiss timer.
    ///
    /// The timer runs on the ambient tokio runtime. Outside a runtime the
    /// notification stays until `dismiss()` or the next `notify()`.
    pub fn notify(&self, message: impl Into<String>, title: Option<&str>) {
        let notification = Notification {
            title: title.map(str::to_string),
            message: message.into(),
        };
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(
            generation,
            message = %notification.message,
            "Notification shown"
        );
        self.inner.slot.send_replace(Some(notification));

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let inner = Arc::clone(&self.inner);
                handle.spawn(async move {
                    tokio::time::sleep(inner.dismiss_after).await;
                    if inner.generation.load(Ordering::SeqCst) == generation {
                        inner.slot.send_replace(None);
                        tracing::debug!(generation, "Notification expired");
                    }
                });
            }
            Err(_) => {
                tracing::warn!("No async runtime; notification will not auto-dismiss");
            }
        }
    }

    /// Clear the slot immediately.
    pub fn dismiss(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.slot.send_replace(None);
    }

    /// The notification currently showing, if any.
    pub fn current(&self) -> Option<Notification> {
        self.inner.slot.borrow().clone()
    }

    /// Watch slot changes (show, replace, dismiss, expire).
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.inner.slot.subscribe()
    }

    pub fn dismiss_after(&self) -> Duration {
        self.inner.dismiss_after
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: Duration = Duration::from_millis(150);

    #[test]
    fn test_default_dismiss_is_three_seconds() {
        assert_eq!(Notifier::default().dismiss_after(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_notify_sets_slot() {
        let notifier = Notifier::new(SHORT);
        assert!(notifier.current().is_none());

        notifier.notify("Server unreachable", Some("Info"));
        let current = notifier.current().unwrap();
        assert_eq!(current.message, "Server unreachable");
        assert_eq!(current.title.as_deref(), Some("Info"));
    }

    #[tokio::test]
    async fn test_auto_dismiss_after_delay() {
        let notifier = Notifier::new(SHORT);
        notifier.notify("hello", None);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(notifier.current().is_some());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(notifier.current().is_none());
    }

    #[tokio::test]
    async fn test_second_notify_overwrites_and_resets_timer() {
        let notifier = Notifier::new(Duration::from_millis(300));
        notifier.notify("first", None);

        tokio::time::sleep(Duration::from_millis(200)).await;
        notifier.notify("second", None);
        assert_eq!(notifier.current().unwrap().message, "second");

        // The first timer fires here but must not clear the second message.
        tokio::time::sleep(Duration::from_millis(170)).await;
        assert_eq!(notifier.current().unwrap().message, "second");

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(notifier.current().is_none());
    }

    #[tokio::test]
    async fn test_dismiss_clears_immediately() {
        let notifier = Notifier::new(Duration::from_secs(10));
        notifier.notify("x", None);
        notifier.dismiss();
        assert!(notifier.current().is_none());
    }

    #[tokio::test]
    async fn test_dismiss_then_notify_keeps_new_message() {
        let notifier = Notifier::new(SHORT);
        notifier.notify("old", None);
        notifier.dismiss();
        notifier.notify("new", None);
        assert_eq!(notifier.current().unwrap().message, "new");
    }

    #[tokio::test]
    async fn test_clones_share_slot() {
        let a = Notifier::new(SHORT);
        let b = a.clone();
        a.notify("shared", None);
        assert_eq!(b.current().unwrap().message, "shared");
    }

    #[tokio::test]
    async fn test_subscribe_sees_changes() {
        let notifier = Notifier::new(SHORT);
        let mut rx = notifier.subscribe();

        notifier.notify("watch me", None);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().message, "watch me");

        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[test]
    fn test_notify_without_runtime_does_not_panic() {
        let notifier = Notifier::new(SHORT);
        notifier.notify("sync context", None);
        assert_eq!(notifier.current().unwrap().message, "sync context");
    }
}
