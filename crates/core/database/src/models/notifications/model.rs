use iso8601_timestamp::Timestamp;

use crate::Database;

auto_derived!(
    /// What a notification is about
    #[derive(Copy, Eq, Hash)]
    #[serde(rename_all = "snake_case")]
    pub enum NotificationKind {
        /// Reporter's report was reviewed
        ReportReviewed,
        /// Reporter's report was dismissed
        ReportDismissed,
        /// Issue owner's issue received reports
        IssueWarning,
        /// Issue owner's issue was deleted
        IssueDeleted,
        /// Issue owner's issue was resolved
        IssueResolved,
        /// Issue status changed
        IssueStatusUpdate,
    }

    /// Structured references for client-side navigation
    #[derive(Default)]
    pub struct NotificationData {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub issue_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub report_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub action: Option<String>,
    }

    /// In-app message created as a side effect of moderation events
    pub struct Notification {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Id of the recipient
        pub user_id: String,
        /// What this notification is about
        pub kind: NotificationKind,
        /// Short heading
        pub title: String,
        /// Full message
        pub message: String,
        /// Structured references for navigation
        #[serde(default)]
        pub data: NotificationData,
        /// Whether the recipient has seen this notification
        #[serde(skip_serializing_if = "crate::if_false", default)]
        pub read: bool,
        /// When this notification was created
        pub created_at: Timestamp,
    }
);

impl Notification {
    /// Create and persist a notification
    ///
    /// Failures are logged and swallowed; fan-out must never fail the
    /// moderation operation that triggered it.
    pub async fn dispatch(
        db: &Database,
        user_id: String,
        kind: NotificationKind,
        title: String,
        message: String,
        data: NotificationData,
    ) -> Option<Notification> {
        let notification = Notification {
            id: ulid::Ulid::new().to_string(),
            user_id,
            kind,
            title,
            message,
            data,
            read: false,
            created_at: Timestamp::now_utc(),
        };

        match db.insert_notification(&notification).await {
            Ok(()) => Some(notification),
            Err(err) => {
                error!("Failed to create notification: {err:?}");
                None
            }
        }
    }
}
