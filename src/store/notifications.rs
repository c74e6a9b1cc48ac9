//! Capped per-user notification store.
//!
//! Replaces ad-hoc client-side notification arrays with an explicit
//! read/append/mark-read interface. Each user's list is bounded by the
//! configured cap; appending past it evicts the oldest entries first. The
//! cap and the eviction order are part of the contract, not an accident of
//! the container.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ComplaintUpdate,
    AssociationApproval,
    System,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct NotificationStore {
    cap: usize,
    by_user: Arc<RwLock<HashMap<Uuid, VecDeque<Notification>>>>,
}

impl NotificationStore {
    pub fn new(cap: usize) -> Self {
        Self { cap: cap.max(1), by_user: Arc::new(RwLock::new(HashMap::new())) }
    }

    pub async fn append(
        &self,
        user_id: Uuid,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Notification {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            read: false,
            created_at: Utc::now(),
        };

        let mut by_user = self.by_user.write().await;
        let list = by_user.entry(user_id).or_default();
        list.push_back(notification.clone());
        while list.len() > self.cap {
            list.pop_front();
        }

        notification
    }

    /// Newest first.
    pub async fn list(&self, user_id: Uuid, unread_only: bool) -> Vec<Notification> {
        let by_user = self.by_user.read().await;
        match by_user.get(&user_id) {
            Some(list) => list
                .iter()
                .rev()
                .filter(|n| !unread_only || !n.read)
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Returns false when the notification does not exist for this user.
    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> bool {
        let mut by_user = self.by_user.write().await;
        let Some(list) = by_user.get_mut(&user_id) else {
            return false;
        };
        match list.iter_mut().find(|n| n.id == notification_id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> usize {
        let mut by_user = self.by_user.write().await;
        let Some(list) = by_user.get_mut(&user_id) else {
            return 0;
        };
        let mut marked = 0;
        for notification in list.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            marked += 1;
        }
        marked
    }
}
