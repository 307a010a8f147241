//! Notification collaborator
//!
//! The modal host reports failed confirm actions through a [`Notifier`].
//! How a notification is shown (footer toast, desktop popup) is up to the
//! application.

use notify_rust::Notification as DesktopNotification;

/// How a notification should be styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

/// A user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }
}

/// Anything that can surface a notification to the user
pub trait Notifier: Send {
    fn notify(&self, notification: Notification);
}

/// Deliver to both notifiers
impl<A: Notifier, B: Notifier> Notifier for (A, B) {
    fn notify(&self, notification: Notification) {
        self.0.notify(notification.clone());
        self.1.notify(notification);
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Cross-platform native desktop notifications
///
/// Uses notify-rust: NSUserNotification on macOS, libnotify on Linux.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, notification: Notification) {
        // Showing can block on the session bus - keep it off the UI loop
        let summary = format!("{} {}", self.app_name, notification.severity.label());

        std::thread::spawn(move || {
            if let Err(e) = DesktopNotification::new()
                .summary(&summary)
                .body(&notification.message)
                .timeout(5000)
                .show()
            {
                tracing::debug!(error = %e, "Desktop notification failed");
            }
        });
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Notification, Notifier};
    use std::sync::{Arc, Mutex};

    /// Notifier that remembers everything it was given
    #[derive(Clone, Default)]
    pub struct RecordingNotifier {
        seen: Arc<Mutex<Vec<Notification>>>,
    }

    impl RecordingNotifier {
        pub fn seen(&self) -> Vec<Notification> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.seen.lock().unwrap().push(notification);
        }
    }
}
