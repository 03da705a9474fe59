//! # Notifications
//!
//! The sink dashboards read toasts from.
//!
//! ```text
//! command ──► Notifier::notify ──► unbounded mpsc ──► NotificationFeed ──► UI
//!                    ▲
//!     DeferredNotifications::schedule (sleep, then notify)
//! ```
//!
//! Sending is fire-and-forget: if nobody is listening the notification is
//! dropped and logged at debug level.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::debug;

/// How a notification should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Destructive,
}

/// A user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Notification {
            title: title.into(),
            message: message.into(),
            severity,
            created_at: Utc::now(),
        }
    }
}

/// Creates a connected notifier / feed pair.
pub fn channel() -> (Notifier, NotificationFeed) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Notifier { tx }, NotificationFeed { rx })
}

/// Sending half, cheap to clone into every session.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn notify(&self, notification: Notification) {
        if let Err(e) = self.tx.send(notification) {
            debug!(title = %e.0.title, "Notification dropped, no listener");
        }
    }

    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(Notification::new(title, message, Severity::Info));
    }

    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(Notification::new(title, message, Severity::Success));
    }

    pub fn destructive(&self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(Notification::new(title, message, Severity::Destructive));
    }
}

/// Receiving half.
#[derive(Debug)]
pub struct NotificationFeed {
    rx: mpsc::UnboundedReceiver<Notification>,
}

impl NotificationFeed {
    /// Waits for the next notification. `None` once every notifier is gone.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.rx.recv().await
    }

    /// Takes everything already queued without waiting.
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = self.rx.try_recv() {
            out.push(n);
        }
        out
    }
}

/// Notifications that fire after a delay.
///
/// Owned by a session; dropping it (logout) aborts whatever has not fired.
#[derive(Debug)]
pub struct DeferredNotifications {
    notifier: Notifier,
    tasks: JoinSet<()>,
}

impl DeferredNotifications {
    pub fn new(notifier: Notifier) -> Self {
        DeferredNotifications {
            notifier,
            tasks: JoinSet::new(),
        }
    }

    /// Sends `notification` after `delay`.
    pub fn schedule(&mut self, delay: Duration, notification: Notification) {
        self.reap();
        let notifier = self.notifier.clone();
        self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            notifier.notify(notification);
        });
    }

    /// Number of scheduled notifications not yet sent.
    pub fn pending(&mut self) -> usize {
        self.reap();
        self.tasks.len()
    }

    /// Drops finished tasks from the set.
    fn reap(&mut self) {
        while self.tasks.try_join_next().is_some() {}
    }

    /// Aborts everything not yet sent.
    pub fn cancel_all(&mut self) {
        self.tasks.abort_all();
    }
}
