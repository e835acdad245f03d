//! User-facing notifications.
//!
//! The cart store reports failed operations through a [`Notifier`]. Sending is
//! fire-and-forget: a notifier never fails and returns nothing the store acts on.

use std::sync::Mutex;

/// How a notification should be presented.
///
/// Every cart notification reports a failed operation, so errors are the only
/// level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

/// Sink for user-facing messages.
pub trait Notifier: Send + Sync {
    fn send(&self, message: &str, severity: Severity);
}

/// Notifier that writes every message to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn send(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => tracing::error!(notification = message, "User notification"),
        }
    }
}

/// Notifier that keeps every message for later display or inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Remove and return all messages sent so far.
    pub fn take(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .map(|mut sent| std::mem::take(&mut *sent))
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, message: &str, severity: Severity) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(Notification {
                message: message.to_string(),
                severity,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.send("first", Severity::Error);
        notifier.send("second", Severity::Error);

        let sent = notifier.notifications();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent.first().map(|n| n.message.as_str()), Some("first"));
        assert_eq!(sent.last().map(|n| n.message.as_str()), Some("second"));
    }

    #[test]
    fn test_take_drains() {
        let notifier = RecordingNotifier::new();
        notifier.send("oops", Severity::Error);
        assert_eq!(notifier.take().len(), 1);
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_tracing_notifier_never_panics() {
        TracingNotifier.send("Failed to add product", Severity::Error);
    }
}
