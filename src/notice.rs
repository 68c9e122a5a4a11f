//! Transient user-facing notices
//!
//! Controllers never return errors to the UI. Failures (and a few
//! confirmations) are published here and rendered as toasts.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One transient message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Receiver for notices
pub type NoticeReceiver = broadcast::Receiver<Notice>;

/// Fan-out of notices to any number of subscribers
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notice>,
}

impl Notifier {
    /// Create a notifier buffering at most `capacity` undelivered notices
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to notices published from now on
    pub fn subscribe(&self) -> NoticeReceiver {
        self.sender.subscribe()
    }

    /// Publish a notice
    pub fn send(&self, notice: Notice) {
        // Nobody listening is fine
        let _ = self.sender.send(notice);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(Notice::error(message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.send(Notice::info(message));
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_notices() {
        let notifier = Notifier::default();
        let mut rx = notifier.subscribe();

        notifier.error("네트워크 오류");
        notifier.info("done");

        assert_eq!(rx.recv().await.unwrap(), Notice::error("네트워크 오류"));
        assert_eq!(rx.recv().await.unwrap().level, NoticeLevel::Info);
    }

    #[test]
    fn test_send_without_subscribers() {
        let notifier = Notifier::new(4);
        notifier.error("ignored");
    }
}
