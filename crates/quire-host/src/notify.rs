//! User-facing notifications.

use std::time::Duration;

/// Where a window shows script output.
pub trait Notifier {
    /// Show transient text in the status bar.
    fn show_status(&mut self, message: &str, timeout: Duration);

    /// Show a modal message.
    fn show_message(&mut self, title: &str, body: &str);
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Status { message: String, timeout: Duration },
    Message { title: String, body: String },
}

/// Notifier that keeps every notification, for headless hosts.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notices: Vec<Notice>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl Notifier for RecordingNotifier {
    fn show_status(&mut self, message: &str, timeout: Duration) {
        self.notices.push(Notice::Status {
            message: message.to_string(),
            timeout,
        });
    }

    fn show_message(&mut self, title: &str, body: &str) {
        self.notices.push(Notice::Message {
            title: title.to_string(),
            body: body.to_string(),
        });
    }
}
