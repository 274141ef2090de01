use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

/// A single user-visible line with the time it was emitted.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

/// Handle for emitting notices
///
/// This is cheaply cloneable and can be shared across tasks.
#[derive(Clone)]
pub struct NotifyHandle {
    tx: mpsc::Sender<Notice>,
}

impl NotifyHandle {
    /// Create a new notify handle from a channel sender
    pub fn new(tx: mpsc::Sender<Notice>) -> Self {
        Self { tx }
    }

    /// Emit a notice without blocking.
    ///
    /// Returns false if the notice was dropped because the channel is full or closed.
    pub fn notify(&self, text: impl Into<String>) -> bool {
        let notice = Notice {
            timestamp: Utc::now(),
            text: text.into(),
        };
        match self.tx.try_send(notice) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Dropped notice: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_delivers_text() {
        let (tx, mut rx) = mpsc::channel(4);
        let handle = NotifyHandle::new(tx);

        assert!(handle.notify("Processing order_20240101110000.pdf"));

        let notice = rx.try_recv().expect("Should receive notice");
        assert_eq!(notice.text, "Processing order_20240101110000.pdf");
    }

    #[test]
    fn test_notify_full_channel_drops() {
        let (tx, _rx) = mpsc::channel(1);
        let handle = NotifyHandle::new(tx);

        assert!(handle.notify("first"));
        assert!(!handle.notify("second"));
    }

    #[test]
    fn test_notify_closed_channel_does_not_panic() {
        let (tx, rx) = mpsc::channel(1);
        let handle = NotifyHandle::new(tx);
        drop(rx);

        assert!(!handle.notify("nobody listening"));
    }

    #[test]
    fn test_notice_has_timestamp() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = NotifyHandle::new(tx);

        let before = Utc::now();
        handle.notify("tick");
        let after = Utc::now();

        let notice = rx.try_recv().unwrap();
        assert!(notice.timestamp >= before);
        assert!(notice.timestamp <= after);
    }
}
