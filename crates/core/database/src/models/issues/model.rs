use std::str::FromStr;

use iso8601_timestamp::Timestamp;

use civica_result::{Error, Result};

use crate::{Database, Notification, NotificationData, NotificationKind};

auto_derived!(
    /// Kind of civic problem an issue describes
    #[derive(Copy, Eq, Hash)]
    #[serde(rename_all = "snake_case")]
    pub enum IssueCategory {
        Pothole,
        Garbage,
        WaterLeak,
        Streetlight,
        Drainage,
        RoadDamage,
        Other,
    }

    /// Lifecycle state of an issue
    #[derive(Copy, Default, Eq, Hash)]
    #[serde(rename_all = "snake_case")]
    pub enum IssueStatus {
        #[default]
        Reported,
        InProgress,
        Resolved,
    }

    /// Geographic point an issue was filed against
    pub struct Location {
        /// Longitude and latitude
        #[serde(default)]
        pub coordinates: [f64; 2],
        /// Human-readable address
        pub address: String,
    }

    /// Civic problem filed by a citizen
    ///
    /// Owned by the issue subsystem; this core reads it for moderation
    /// context and removes it wholesale when moderation dictates.
    pub struct Issue {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Short summary
        pub title: String,
        /// Full description
        pub description: String,
        /// Problem category
        pub category: IssueCategory,
        /// Image URLs held by the media service
        #[serde(default)]
        pub images: Vec<String>,
        /// Where the problem is
        pub location: Location,
        /// Lifecycle state
        #[serde(default)]
        pub status: IssueStatus,
        /// Id of the citizen who filed this issue
        pub created_by: String,
        /// When this issue was filed
        pub created_at: Timestamp,
    }

    /// Projection of an issue embedded into report views
    pub struct IssueSnapshot {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Short summary
        pub title: String,
        /// Problem category
        pub category: IssueCategory,
        /// Lifecycle state
        pub status: IssueStatus,
        /// Image URLs
        #[serde(default)]
        pub images: Vec<String>,
        /// Where the problem is
        pub location: Location,
        /// When this issue was filed
        pub created_at: Timestamp,
    }

    /// Who removed an issue
    #[derive(Copy, Eq)]
    #[serde(rename_all = "snake_case")]
    pub enum RemovedBy {
        Owner,
        Moderator,
    }
);

impl IssueCategory {
    /// Stable key used in filters and documents
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Pothole => "pothole",
            IssueCategory::Garbage => "garbage",
            IssueCategory::WaterLeak => "water_leak",
            IssueCategory::Streetlight => "streetlight",
            IssueCategory::Drainage => "drainage",
            IssueCategory::RoadDamage => "road_damage",
            IssueCategory::Other => "other",
        }
    }
}

impl FromStr for IssueCategory {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "pothole" => Ok(IssueCategory::Pothole),
            "garbage" => Ok(IssueCategory::Garbage),
            "water_leak" => Ok(IssueCategory::WaterLeak),
            "streetlight" => Ok(IssueCategory::Streetlight),
            "drainage" => Ok(IssueCategory::Drainage),
            "road_damage" => Ok(IssueCategory::RoadDamage),
            "other" => Ok(IssueCategory::Other),
            _ => Err(create_error!(InvalidProperty)),
        }
    }
}

impl IssueStatus {
    /// Stable key used in filters and documents
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Reported => "reported",
            IssueStatus::InProgress => "in_progress",
            IssueStatus::Resolved => "resolved",
        }
    }
}

impl FromStr for IssueStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "reported" => Ok(IssueStatus::Reported),
            "in_progress" => Ok(IssueStatus::InProgress),
            "resolved" => Ok(IssueStatus::Resolved),
            _ => Err(create_error!(InvalidProperty)),
        }
    }
}

impl From<&Issue> for IssueSnapshot {
    fn from(issue: &Issue) -> Self {
        IssueSnapshot {
            id: issue.id.clone(),
            title: issue.title.clone(),
            category: issue.category,
            status: issue.status,
            images: issue.images.clone(),
            location: issue.location.clone(),
            created_at: issue.created_at,
        }
    }
}

impl Issue {
    pub fn new(
        title: String,
        description: String,
        category: IssueCategory,
        address: String,
        created_by: String,
    ) -> Issue {
        Issue {
            id: ulid::Ulid::new().to_string(),
            title,
            description,
            category,
            images: vec![],
            location: Location {
                coordinates: [0.0, 0.0],
                address,
            },
            status: IssueStatus::Reported,
            created_by,
            created_at: Timestamp::now_utc(),
        }
    }

    /// Remove this issue after telling everyone who reported it
    ///
    /// Reporters are notified first; dispatch failures never block the
    /// deletion itself.
    pub async fn delete(&self, db: &Database, removed_by: RemovedBy) -> Result<()> {
        let reports = db.fetch_reports_by_issue(&self.id).await?;

        for report in reports {
            Notification::dispatch(
                db,
                report.reporter_id.clone(),
                NotificationKind::IssueDeleted,
                "Reported Issue Removed".to_string(),
                format!(
                    "The issue \"{}\" that you reported has been removed by {}.",
                    self.title,
                    match removed_by {
                        RemovedBy::Owner => "its owner",
                        RemovedBy::Moderator => "an administrator",
                    }
                ),
                NotificationData {
                    issue_id: Some(self.id.clone()),
                    report_id: Some(report.id.clone()),
                    action: Some("deleted".to_string()),
                },
            )
            .await;
        }

        self.delete_with_dependents(db).await
    }

    /// Remove every record hanging off this issue, then the issue itself
    ///
    /// Deletes are sequential and best-effort; an error part-way leaves the
    /// earlier deletes in place.
    pub async fn delete_with_dependents(&self, db: &Database) -> Result<()> {
        db.delete_comments_by_issue(&self.id).await?;
        db.delete_upvotes_by_issue(&self.id).await?;
        db.delete_reports_by_issue(&self.id).await?;
        db.delete_issue(&self.id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Comment, Issue, IssueCategory, NotificationKind, RemovedBy, Report, ReportReason, Upvote,
        User, UserRole,
    };
    use iso8601_timestamp::Timestamp;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            name: id.to_string(),
            email: format!("{id}@example.com"),
            avatar: String::new(),
            role: UserRole::User,
            created_at: Timestamp::now_utc(),
        }
    }

    #[async_std::test]
    async fn cascade_removes_dependents_and_notifies_reporters() {
        database_test!(|db| async move {
            for id in ["owner", "alice", "bob"] {
                db.insert_user(&user(id)).await.unwrap();
            }

            let issue = Issue::new(
                "Leaking hydrant".to_string(),
                "Water everywhere".to_string(),
                IssueCategory::WaterLeak,
                "12 Main St".to_string(),
                "owner".to_string(),
            );
            db.insert_issue(&issue).await.unwrap();

            let fetched = db.fetch_issue(&issue.id).await.unwrap();

            Report::create(
                &db,
                &fetched,
                "alice".to_string(),
                ReportReason::Spam,
                String::new(),
            )
            .await
            .unwrap();
            Report::create(
                &db,
                &fetched,
                "bob".to_string(),
                ReportReason::Duplicate,
                String::new(),
            )
            .await
            .unwrap();

            db.insert_comment(&Comment::new(
                issue.id.clone(),
                "bob".to_string(),
                "Seen it too".to_string(),
            ))
            .await
            .unwrap();
            db.insert_upvote(&Upvote::new(issue.id.clone(), "alice".to_string()))
                .await
                .unwrap();

            fetched.delete(&db, RemovedBy::Owner).await.unwrap();

            assert!(db.fetch_issue(&issue.id).await.is_err());
            assert!(db.fetch_reports_by_issue(&issue.id).await.unwrap().is_empty());
            assert_eq!(db.count_reports_by_issue(&issue.id).await.unwrap(), 0);

            for reporter in ["alice", "bob"] {
                let notifications = db
                    .fetch_notifications(reporter, false, 0, 10)
                    .await
                    .unwrap();
                assert_eq!(notifications.len(), 1);
                assert_eq!(notifications[0].kind, NotificationKind::IssueDeleted);
            }
        });
    }
}
