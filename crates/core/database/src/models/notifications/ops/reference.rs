use civica_result::Result;

use crate::Notification;
use crate::ReferenceDb;

use super::AbstractNotifications;

#[async_trait]
impl AbstractNotifications for ReferenceDb {
    /// Insert a new notification into the database
    async fn insert_notification(&self, notification: &Notification) -> Result<()> {
        let mut notifications = self.notifications.lock().await;
        if notifications.contains_key(&notification.id) {
            Err(create_database_error!("insert_one", "notifications"))
        } else {
            notifications.insert(notification.id.to_string(), notification.clone());
            Ok(())
        }
    }

    /// Fetch a user's notification by its id
    async fn fetch_notification(&self, id: &str, user_id: &str) -> Result<Notification> {
        let notifications = self.notifications.lock().await;
        notifications
            .get(id)
            .filter(|notification| notification.user_id == user_id)
            .cloned()
            .ok_or_else(|| create_error!(UnknownNotification))
    }

    /// Fetch a page of a user's notifications, newest first
    async fn fetch_notifications(
        &self,
        user_id: &str,
        unread_only: bool,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Notification>> {
        let notifications = self.notifications.lock().await;
        let mut entries: Vec<Notification> = notifications
            .values()
            .filter(|notification| {
                notification.user_id == user_id && (!unread_only || !notification.read)
            })
            .cloned()
            .collect();

        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(entries
            .into_iter()
            .skip(skip as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    /// Count a user's notifications
    async fn count_notifications(&self, user_id: &str, unread_only: bool) -> Result<u64> {
        let notifications = self.notifications.lock().await;
        Ok(notifications
            .values()
            .filter(|notification| {
                notification.user_id == user_id && (!unread_only || !notification.read)
            })
            .count() as u64)
    }

    /// Count a user's unread notifications
    async fn count_unread_notifications(&self, user_id: &str) -> Result<u64> {
        self.count_notifications(user_id, true).await
    }

    /// Mark one of a user's notifications as read
    async fn mark_notification_read(&self, id: &str, user_id: &str) -> Result<()> {
        let mut notifications = self.notifications.lock().await;
        match notifications
            .get_mut(id)
            .filter(|notification| notification.user_id == user_id)
        {
            Some(notification) => {
                notification.read = true;
                Ok(())
            }
            None => Err(create_error!(UnknownNotification)),
        }
    }

    /// Mark all of a user's notifications as read
    async fn mark_all_notifications_read(&self, user_id: &str) -> Result<()> {
        let mut notifications = self.notifications.lock().await;
        for notification in notifications
            .values_mut()
            .filter(|notification| notification.user_id == user_id)
        {
            notification.read = true;
        }

        Ok(())
    }

    /// Delete one of a user's notifications
    async fn delete_notification(&self, id: &str, user_id: &str) -> Result<()> {
        let mut notifications = self.notifications.lock().await;
        if notifications
            .get(id)
            .filter(|notification| notification.user_id == user_id)
            .is_some()
        {
            notifications.remove(id);
            Ok(())
        } else {
            Err(create_error!(UnknownNotification))
        }
    }

    /// Delete all of a user's notifications
    async fn delete_notifications_by_user(&self, user_id: &str) -> Result<()> {
        let mut notifications = self.notifications.lock().await;
        notifications.retain(|_, notification| notification.user_id != user_id);
        Ok(())
    }
}
