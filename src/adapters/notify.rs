use crate::domain::model::Notification;
use crate::domain::ports::NotificationSink;
use std::sync::Mutex;

/// Sends notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn info(&self, message: &str) {
        tracing::info!("📣 {}", message);
    }

    fn success(&self, message: &str) {
        tracing::info!("🎉 {}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("❌ {}", message);
    }
}

/// Prints notifications for a terminal user.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotificationSink;

impl NotificationSink for ConsoleNotificationSink {
    fn info(&self, message: &str) {
        println!("ℹ️  {}", message);
    }

    fn success(&self, message: &str) {
        println!("✅ {}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("❌ {}", message);
    }
}

/// Keeps every notification in order; useful for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryNotificationSink {
    notifications: Mutex<Vec<Notification>>,
}

impl MemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    fn push(&self, notification: Notification) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}

impl NotificationSink for MemoryNotificationSink {
    fn info(&self, message: &str) {
        self.push(Notification::Info(message.to_string()));
    }

    fn success(&self, message: &str) {
        self.push(Notification::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Notification::Error(message.to_string()));
    }
}
