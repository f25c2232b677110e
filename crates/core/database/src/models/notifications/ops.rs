use civica_result::Result;

use crate::Notification;

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractNotifications: Sync + Send {
    /// Insert a new notification into the database
    async fn insert_notification(&self, notification: &Notification) -> Result<()>;

    /// Fetch a user's notification by its id
    async fn fetch_notification(&self, id: &str, user_id: &str) -> Result<Notification>;

    /// Fetch a page of a user's notifications, newest first
    async fn fetch_notifications(
        &self,
        user_id: &str,
        unread_only: bool,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Notification>>;

    /// Count a user's notifications
    async fn count_notifications(&self, user_id: &str, unread_only: bool) -> Result<u64>;

    /// Count a user's unread notifications
    async fn count_unread_notifications(&self, user_id: &str) -> Result<u64>;

    /// Mark one of a user's notifications as read
    async fn mark_notification_read(&self, id: &str, user_id: &str) -> Result<()>;

    /// Mark all of a user's notifications as read
    async fn mark_all_notifications_read(&self, user_id: &str) -> Result<()>;

    /// Delete one of a user's notifications
    async fn delete_notification(&self, id: &str, user_id: &str) -> Result<()>;

    /// Delete all of a user's notifications
    async fn delete_notifications_by_user(&self, user_id: &str) -> Result<()>;
}
