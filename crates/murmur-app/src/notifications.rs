//! Notification queue.
//!
//! Ids are creation times in unix millis, bumped past the previous id when
//! two notifications land in the same millisecond, so they stay unique and
//! strictly increasing.

use crate::state::{Notification, NotificationKind, display_timestamp};

/// Ordered queue of visible notifications.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    items: Vec<Notification>,
    last_id: u64,
}

impl NotificationQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification created at `now_millis`. Returns its id.
    pub fn push(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        now_millis: u64,
    ) -> u64 {
        let id = now_millis.max(self.last_id.saturating_add(1));
        self.last_id = id;
        self.items.push(Notification {
            id,
            kind,
            title: title.into(),
            message: message.into(),
            timestamp: display_timestamp(now_millis),
        });
        id
    }

    /// Remove notification `id`. `None` if it is not queued.
    pub fn remove(&mut self, id: u64) -> Option<Notification> {
        let index = self.items.iter().position(|n| n.id == id)?;
        Some(self.items.remove(index))
    }

    /// Remove everything, returning the removed ids.
    pub fn clear(&mut self) -> Vec<u64> {
        self.items.drain(..).map(|n| n.id).collect()
    }

    /// Notifications, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    /// Most recent notification.
    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    /// Number of queued notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_millisecond_ids_stay_unique() {
        let mut queue = NotificationQueue::new();

        let a = queue.push(NotificationKind::Info, "a", "", 1_000);
        let b = queue.push(NotificationKind::Info, "b", "", 1_000);
        let c = queue.push(NotificationKind::Info, "c", "", 999);

        assert_eq!((a, b, c), (1_000, 1_001, 1_002));
    }

    #[test]
    fn remove_and_clear() {
        let mut queue = NotificationQueue::new();
        let first = queue.push(NotificationKind::Warning, "Offline", "", 10);
        let second = queue.push(NotificationKind::Success, "Back online", "", 20);

        assert_eq!(queue.remove(first).map(|n| n.title), Some("Offline".to_string()));
        assert!(queue.remove(first).is_none());
        assert_eq!(queue.latest().map(|n| n.id), Some(second));

        assert_eq!(queue.clear(), vec![second]);
        assert!(queue.is_empty());
    }
}
