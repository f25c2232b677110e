use mongodb::options::FindOptions;

use civica_result::Result;

use crate::MongoDb;
use crate::Notification;

use super::AbstractNotifications;

static COL: &str = "notifications";

fn filter(user_id: &str, unread_only: bool) -> bson::Document {
    if unread_only {
        doc! {
            "user_id": user_id,
            "read": false
        }
    } else {
        doc! {
            "user_id": user_id
        }
    }
}

#[async_trait]
impl AbstractNotifications for MongoDb {
    /// Insert a new notification into the database
    async fn insert_notification(&self, notification: &Notification) -> Result<()> {
        query!(self, insert_one, COL, &notification).map(|_| ())
    }

    /// Fetch a user's notification by its id
    async fn fetch_notification(&self, id: &str, user_id: &str) -> Result<Notification> {
        query!(
            self,
            find_one,
            COL,
            doc! {
                "_id": id,
                "user_id": user_id
            }
        )?
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
        query!(
            self,
            find_with_options,
            COL,
            filter(user_id, unread_only),
            FindOptions::builder()
                .sort(doc! {
                    "created_at": -1_i32
                })
                .skip(skip)
                .limit(limit)
                .build()
        )
    }

    /// Count a user's notifications
    async fn count_notifications(&self, user_id: &str, unread_only: bool) -> Result<u64> {
        query!(self, count_documents, COL, filter(user_id, unread_only))
    }

    /// Count a user's unread notifications
    async fn count_unread_notifications(&self, user_id: &str) -> Result<u64> {
        self.count_notifications(user_id, true).await
    }

    /// Mark one of a user's notifications as read
    async fn mark_notification_read(&self, id: &str, user_id: &str) -> Result<()> {
        self.col::<Notification>(COL)
            .update_one(
                doc! {
                    "_id": id,
                    "user_id": user_id
                },
                doc! {
                    "$set": {
                        "read": true
                    }
                },
            )
            .await
            .map_err(|_| create_database_error!("update_one", COL))
            .and_then(|result| {
                if result.matched_count == 0 {
                    Err(create_error!(UnknownNotification))
                } else {
                    Ok(())
                }
            })
    }

    /// Mark all of a user's notifications as read
    async fn mark_all_notifications_read(&self, user_id: &str) -> Result<()> {
        self.col::<Notification>(COL)
            .update_many(
                doc! {
                    "user_id": user_id,
                    "read": false
                },
                doc! {
                    "$set": {
                        "read": true
                    }
                },
            )
            .await
            .map(|_| ())
            .map_err(|_| create_database_error!("update_many", COL))
    }

    /// Delete one of a user's notifications
    async fn delete_notification(&self, id: &str, user_id: &str) -> Result<()> {
        query!(
            self,
            delete_one,
            COL,
            doc! {
                "_id": id,
                "user_id": user_id
            }
        )
        .and_then(|result| {
            if result.deleted_count == 0 {
                Err(create_error!(UnknownNotification))
            } else {
                Ok(())
            }
        })
    }

    /// Delete all of a user's notifications
    async fn delete_notifications_by_user(&self, user_id: &str) -> Result<()> {
        query!(
            self,
            delete_many,
            COL,
            doc! {
                "user_id": user_id
            }
        )
        .map(|_| ())
    }
}
