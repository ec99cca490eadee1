//! NotificationService: ephemeral status messages.
//!
//! Nothing is retained between calls. A front end shows the latest notification in
//! place of any previous one and hides it after [`Notification::display_for`].

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::contract::Notifier;
use crate::escape::escape_html;

pub const DISPLAY_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub display_for: Duration,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            display_for: DISPLAY_DURATION,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }

    /// Markup for the toast; the message is escaped.
    pub fn render(&self) -> String {
        format!(
            r#"<div class="notification {kind}"><div class="flex items-center gap-3"><span class="icon icon-{kind}"></span><span>{message}</span></div></div>"#,
            kind = self.kind.as_str(),
            message = escape_html(&self.message),
        )
    }
}

/// Writes notifications to the log. Used by the CLI.
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => {
                error!(message = %notification.message, "notification")
            }
            kind => info!(kind = kind.as_str(), message = %notification.message, "notification"),
        }
    }
}

/// Forwards notifications to whoever renders them.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        // Nobody listening is fine; the message is simply not shown.
        let _ = self.tx.send(notification);
    }
}
