use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of notifications kept before the oldest are dropped.
const DEFAULT_MAX_NOTIFICATIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationType {
    Success,
    Warning,
    Error,
}

impl NotificationType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "ok",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A user-facing message raised by the session (e.g. a rejected import).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppNotification {
    pub id: String,
    pub notification_type: NotificationType,
    pub title: Option<String>,
    pub message: String,
    pub read: bool,
    pub timestamp: DateTime<Utc>,
}

impl AppNotification {
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            notification_type,
            title: None,
            message: message.into(),
            read: false,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationType::Error, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationType::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationType::Warning, message)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// In-memory notification store, newest first.
pub struct NotificationStore {
    notifications: Vec<AppNotification>,
    max_notifications: usize,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_NOTIFICATIONS)
    }

    pub fn with_capacity(max_notifications: usize) -> Self {
        Self {
            notifications: Vec::new(),
            max_notifications: max_notifications.max(1),
        }
    }

    pub fn push(&mut self, notification: AppNotification) {
        self.notifications.insert(0, notification);
        self.notifications.truncate(self.max_notifications);
    }

    /// Mark every unread notification as read and return them, oldest first.
    pub fn drain_unread(&mut self) -> Vec<AppNotification> {
        let mut unread: Vec<AppNotification> = self
            .notifications
            .iter_mut()
            .filter(|n| !n.read)
            .map(|n| {
                n.read = true;
                n.clone()
            })
            .collect();
        unread.reverse();
        unread
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn latest(&self) -> Option<&AppNotification> {
        self.notifications.first()
    }

    pub fn all(&self) -> &[AppNotification] {
        &self.notifications
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_constructor_sets_type() {
        let n = AppNotification::error("bad file").with_title("Import");
        assert_eq!(n.notification_type, NotificationType::Error);
        assert_eq!(n.title.as_deref(), Some("Import"));
        assert!(!n.read);
    }

    #[test]
    fn store_newest_first() {
        let mut store = NotificationStore::new();
        store.push(AppNotification::success("first"));
        store.push(AppNotification::error("second"));
        assert_eq!(store.all()[0].message, "second");
        assert_eq!(store.latest().unwrap().message, "second");
        assert_eq!(store.unread_count(), 2);
    }

    #[test]
    fn store_truncates_at_capacity() {
        let mut store = NotificationStore::with_capacity(3);
        for i in 0..5 {
            store.push(AppNotification::warning(format!("msg{i}")));
        }
        assert_eq!(store.all().len(), 3);
        assert_eq!(store.all()[0].message, "msg4");
        assert_eq!(store.all()[2].message, "msg2");
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let mut store = NotificationStore::with_capacity(0);
        store.push(AppNotification::error("only"));
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn drain_unread_returns_oldest_first_and_marks_read() {
        let mut store = NotificationStore::new();
        store.push(AppNotification::error("a"));
        store.push(AppNotification::success("b"));

        let drained = store.drain_unread();
        let messages: Vec<_> = drained.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "b"]);
        assert_eq!(store.unread_count(), 0);
        assert!(store.drain_unread().is_empty());
        assert_eq!(store.all().len(), 2);
    }

    #[test]
    fn clear_empties_store() {
        let mut store = NotificationStore::new();
        store.push(AppNotification::error("err"));
        store.clear();
        assert!(store.all().is_empty());
        assert!(store.latest().is_none());
    }

    #[test]
    fn labels() {
        assert_eq!(NotificationType::Error.label(), "error");
        assert_eq!(NotificationType::Success.label(), "ok");
        assert_eq!(NotificationType::Warning.label(), "warning");
    }

    #[test]
    fn warning_constructor_sets_type() {
        let n = AppNotification::warning("unknown model");
        assert_eq!(n.notification_type, NotificationType::Warning);
        assert!(n.title.is_none());
    }
}
