use std::collections::HashMap;
use std::str::FromStr;

use iso8601_timestamp::Timestamp;

use civica_result::{Error, Result};

use crate::{
    Database, Issue, IssueCategory, IssueSnapshot, IssueStatus, Notification, NotificationData,
    NotificationKind, User, UserSnapshot,
};

/// Reports on one issue before its owner is warned about them
pub static OWNER_WARNING_THRESHOLD: u64 = 2;

auto_derived!(
    /// Why a citizen flagged an issue
    #[derive(Copy, Eq, Hash)]
    #[serde(rename_all = "snake_case")]
    pub enum ReportReason {
        Spam,
        Inaccurate,
        AlreadyResolved,
        Duplicate,
        Inappropriate,
        Other,
    }

    /// Moderation state of a report
    #[derive(Copy, Default, Eq, Hash)]
    #[serde(rename_all = "snake_case")]
    pub enum ReportStatus {
        #[default]
        Pending,
        Reviewed,
        Dismissed,
        ActionTaken,
    }

    /// Terminal decision an administrator applies to a pending report
    #[derive(Copy, Eq)]
    #[serde(rename_all = "snake_case")]
    pub enum ReviewDecision {
        Reviewed,
        Dismissed,
        ActionTaken,
    }
);

auto_derived_partial!(
    /// One citizen's flag on one issue
    ///
    /// Reports are moderation tickets, not audit records; resolving one
    /// deletes it and folds the outcome into [`crate::ReportStats`].
    pub struct Report {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Issue being flagged
        pub issue_id: String,
        /// Id of the citizen who raised the flag
        pub reporter_id: String,
        /// Why the issue was flagged
        pub reason: ReportReason,
        /// Free-text context from the reporter
        #[serde(default)]
        pub details: String,
        /// Moderation state
        #[serde(default)]
        pub status: ReportStatus,
        /// Id of the administrator who reviewed this report
        #[serde(skip_serializing_if = "Option::is_none")]
        pub reviewed_by: Option<String>,
        /// Note left by the reviewing administrator
        #[serde(skip_serializing_if = "Option::is_none")]
        pub review_note: Option<String>,
        /// When this report was reviewed
        #[serde(skip_serializing_if = "Option::is_none")]
        pub reviewed_at: Option<Timestamp>,
        /// When this report was submitted
        pub created_at: Timestamp,
    },
    "PartialReport"
);

auto_derived!(
    /// Report joined with its issue and user snapshots
    pub struct ReportView {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Why the issue was flagged
        pub reason: ReportReason,
        /// Free-text context from the reporter
        #[serde(default)]
        pub details: String,
        /// Moderation state
        pub status: ReportStatus,
        /// Note left by the reviewing administrator
        #[serde(skip_serializing_if = "Option::is_none")]
        pub review_note: Option<String>,
        /// When this report was reviewed
        #[serde(skip_serializing_if = "Option::is_none")]
        pub reviewed_at: Option<Timestamp>,
        /// When this report was submitted
        pub created_at: Timestamp,
        /// The reported issue; absent if it has since been deleted
        #[serde(skip_serializing_if = "Option::is_none")]
        pub issue: Option<IssueSnapshot>,
        /// Who raised the flag
        #[serde(skip_serializing_if = "Option::is_none")]
        pub reporter: Option<UserSnapshot>,
        /// Who reviewed the report
        #[serde(skip_serializing_if = "Option::is_none")]
        pub reviewed_by: Option<UserSnapshot>,
    }

    /// Reports on a single issue, the primary admin-facing shape
    pub struct GroupedReports {
        /// The reported issue
        pub issue: IssueSnapshot,
        /// Number of reports on the issue
        pub report_count: u64,
        /// Number of still-pending reports on the issue
        pub pending_count: u64,
        /// When the issue was most recently reported
        pub latest_report_date: Timestamp,
        /// Distinct reasons across the group
        pub reasons: Vec<ReportReason>,
        /// Member reports, newest first
        pub reports: Vec<ReportView>,
    }

    /// Aggregate figures over all reports whose issue still exists
    #[derive(Default)]
    pub struct GroupedReportsStats {
        /// Issues with at least one active report
        #[serde(default)]
        pub total_issues_reported: u64,
        /// Active reports across all issues
        #[serde(default)]
        pub total_reports: u64,
        /// Issues with more than one active report
        #[serde(default)]
        pub multiple_reports: u64,
    }

    /// Page of grouped reports
    pub struct GroupedReportsPage {
        /// Groups on this page
        pub groups: Vec<GroupedReports>,
        /// Total number of groups matching the query
        pub total: u64,
        /// Aggregate figures over all active reports
        pub stats: GroupedReportsStats,
    }

    /// Group ordering for grouped report views
    #[derive(Copy, Default, Eq)]
    #[serde(rename_all = "snake_case")]
    pub enum GroupSort {
        /// Most-reported first, most recent first within ties
        #[default]
        ReportCount,
        /// Most recently reported first
        Newest,
        /// Least recently reported first
        Oldest,
        /// Most pending reports first, most-reported within ties
        PendingFirst,
    }

    /// What a moderation decision did
    pub struct ReviewOutcome {
        /// Terminal status that was applied
        pub status: ReportStatus,
        /// Whether the issue was deleted as part of the resolution
        pub issue_deleted: bool,
    }

    /// Headline counters for the moderation dashboard
    pub struct ReportAnalyticsOverview {
        /// Distinct issues with at least one active report
        pub active_cases: u64,
        /// Distinct issues with at least one pending active report
        pub pending_cases: u64,
        /// Every report on record, orphaned ones included
        pub total_reports: u64,
        /// Reports whose issue still exists
        pub active_reports: u64,
        /// Reports whose issue has been deleted
        pub orphaned_reports: u64,
        /// Pending reports whose issue still exists
        pub pending_reports: u64,
        /// Active reports reviewed since the start of today
        pub reviewed_today: u64,
    }

    /// Count of active reports per reason
    pub struct ReasonCount {
        #[serde(rename = "_id")]
        pub reason: ReportReason,
        pub count: u64,
    }

    /// Active reports submitted on one day
    pub struct DailyCount {
        /// Day in `YYYY-MM-DD` form
        #[serde(rename = "_id")]
        pub day: String,
        pub count: u64,
    }

    /// Issue projection for the most-reported ranking
    pub struct IssueDigest {
        #[serde(rename = "_id")]
        pub id: String,
        pub title: String,
        pub category: IssueCategory,
        pub status: IssueStatus,
    }

    /// Most-reported ranking entry
    pub struct MostReportedIssue {
        pub issue: IssueDigest,
        pub report_count: u64,
    }

    /// Read-only snapshot of report activity over a time window
    pub struct ReportAnalytics {
        pub overview: ReportAnalyticsOverview,
        pub reason_breakdown: Vec<ReasonCount>,
        pub status_breakdown: HashMap<ReportStatus, u64>,
        pub reports_over_time: Vec<DailyCount>,
        pub most_reported_issues: Vec<MostReportedIssue>,
    }
);

/// Filters and paging for the flat admin report listing
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub status: Option<ReportStatus>,
    pub reason: Option<ReportReason>,
    pub category: Option<IssueCategory>,
    pub issue_status: Option<IssueStatus>,
    pub search: Option<String>,
    pub skip: u64,
    pub limit: i64,
}

impl Default for ReportQuery {
    fn default() -> Self {
        ReportQuery {
            status: None,
            reason: None,
            category: None,
            issue_status: None,
            search: None,
            skip: 0,
            limit: 20,
        }
    }
}

/// Filters, ordering and paging for the grouped admin report listing
#[derive(Debug, Clone)]
pub struct GroupedReportQuery {
    pub status: Option<ReportStatus>,
    pub category: Option<IssueCategory>,
    pub issue_status: Option<IssueStatus>,
    pub search: Option<String>,
    pub min_reports: u64,
    pub sort_by: GroupSort,
    pub skip: u64,
    pub limit: i64,
}

impl Default for GroupedReportQuery {
    fn default() -> Self {
        GroupedReportQuery {
            status: None,
            category: None,
            issue_status: None,
            search: None,
            min_reports: 1,
            sort_by: GroupSort::ReportCount,
            skip: 0,
            limit: 20,
        }
    }
}

impl ReportReason {
    /// Stable key used in counters and documents
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportReason::Spam => "spam",
            ReportReason::Inaccurate => "inaccurate",
            ReportReason::AlreadyResolved => "already_resolved",
            ReportReason::Duplicate => "duplicate",
            ReportReason::Inappropriate => "inappropriate",
            ReportReason::Other => "other",
        }
    }
}

impl FromStr for ReportReason {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "spam" => Ok(ReportReason::Spam),
            "inaccurate" => Ok(ReportReason::Inaccurate),
            "already_resolved" => Ok(ReportReason::AlreadyResolved),
            "duplicate" => Ok(ReportReason::Duplicate),
            "inappropriate" => Ok(ReportReason::Inappropriate),
            "other" => Ok(ReportReason::Other),
            _ => Err(create_error!(InvalidProperty)),
        }
    }
}

impl ReportStatus {
    /// Stable key used in filters and documents
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewed => "reviewed",
            ReportStatus::Dismissed => "dismissed",
            ReportStatus::ActionTaken => "action_taken",
        }
    }
}

impl FromStr for ReportStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "pending" => Ok(ReportStatus::Pending),
            "reviewed" => Ok(ReportStatus::Reviewed),
            "dismissed" => Ok(ReportStatus::Dismissed),
            "action_taken" => Ok(ReportStatus::ActionTaken),
            _ => Err(create_error!(InvalidProperty)),
        }
    }
}

impl ReviewDecision {
    /// Stable key used in counters and notification payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewDecision::Reviewed => "reviewed",
            ReviewDecision::Dismissed => "dismissed",
            ReviewDecision::ActionTaken => "action_taken",
        }
    }

    /// Past-tense label embedded into notification copy
    fn label(&self) -> &'static str {
        match self {
            ReviewDecision::Reviewed => "Reviewed",
            ReviewDecision::Dismissed => "Dismissed",
            ReviewDecision::ActionTaken => "Action was taken",
        }
    }
}

impl FromStr for ReviewDecision {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "reviewed" => Ok(ReviewDecision::Reviewed),
            "dismissed" => Ok(ReviewDecision::Dismissed),
            "action_taken" => Ok(ReviewDecision::ActionTaken),
            _ => Err(create_error!(InvalidProperty)),
        }
    }
}

impl From<ReviewDecision> for ReportStatus {
    fn from(decision: ReviewDecision) -> ReportStatus {
        match decision {
            ReviewDecision::Reviewed => ReportStatus::Reviewed,
            ReviewDecision::Dismissed => ReportStatus::Dismissed,
            ReviewDecision::ActionTaken => ReportStatus::ActionTaken,
        }
    }
}

impl FromStr for GroupSort {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "report_count" => Ok(GroupSort::ReportCount),
            "newest" => Ok(GroupSort::Newest),
            "oldest" => Ok(GroupSort::Oldest),
            "pending_first" => Ok(GroupSort::PendingFirst),
            _ => Err(create_error!(InvalidProperty)),
        }
    }
}

impl ReportView {
    /// Join a report with the records it references
    pub fn from_report(
        report: Report,
        issue: Option<&Issue>,
        reporter: Option<&User>,
        reviewer: Option<&User>,
    ) -> ReportView {
        ReportView {
            id: report.id,
            reason: report.reason,
            details: report.details,
            status: report.status,
            review_note: report.review_note,
            reviewed_at: report.reviewed_at,
            created_at: report.created_at,
            issue: issue.map(IssueSnapshot::from),
            reporter: reporter.map(User::snapshot),
            reviewed_by: reviewer.map(User::reviewer_snapshot),
        }
    }
}

impl Report {
    /// Submit a new report against an issue
    ///
    /// A user may report a given issue at most once and never their own;
    /// the store's unique index backstops the duplicate check under
    /// concurrent submissions.
    pub async fn create(
        db: &Database,
        issue: &Issue,
        reporter_id: String,
        reason: ReportReason,
        details: String,
    ) -> Result<Report> {
        if db
            .fetch_report_by_issue_reporter(&issue.id, &reporter_id)
            .await?
            .is_some()
        {
            return Err(create_error!(AlreadyReported));
        }

        if issue.created_by == reporter_id {
            return Err(create_error!(CannotReportOwnIssue));
        }

        let report = Report {
            id: ulid::Ulid::new().to_string(),
            issue_id: issue.id.clone(),
            reporter_id,
            reason,
            details,
            status: ReportStatus::Pending,
            reviewed_by: None,
            review_note: None,
            reviewed_at: None,
            created_at: Timestamp::now_utc(),
        };

        db.insert_report(&report).await?;
        Ok(report)
    }

    /// Apply a moderation decision to this report
    ///
    /// Stamps the review, notifies the reporter, optionally deletes the
    /// issue with everything hanging off it, folds the outcome into the
    /// lifetime counters and finally deletes the resolved ticket.
    pub async fn resolve(
        mut self,
        db: &Database,
        moderator: &User,
        decision: ReviewDecision,
        review_note: Option<String>,
        delete_issue: bool,
    ) -> Result<ReviewOutcome> {
        let issue = db.fetch_issue(&self.issue_id).await.ok();
        let issue_title = issue
            .as_ref()
            .map(|issue| issue.title.clone())
            .unwrap_or_else(|| "an issue".to_string());

        let note = review_note.unwrap_or_default();
        let partial = PartialReport {
            status: Some(decision.into()),
            reviewed_by: Some(moderator.id.clone()),
            review_note: Some(note.clone()),
            reviewed_at: Some(Timestamp::now_utc()),
            ..Default::default()
        };
        db.update_report(&self.id, &partial).await?;
        self.apply_options(partial);

        let kind = match decision {
            ReviewDecision::Dismissed => NotificationKind::ReportDismissed,
            _ => NotificationKind::ReportReviewed,
        };

        let label = decision.label();
        let note_suffix = if note.is_empty() {
            String::new()
        } else {
            format!(" Admin note: {note}")
        };

        Notification::dispatch(
            db,
            self.reporter_id.clone(),
            kind,
            format!("Report {label}"),
            format!(
                "Your report on \"{issue_title}\" has been {}.{note_suffix}",
                label.to_lowercase()
            ),
            NotificationData {
                issue_id: Some(self.issue_id.clone()),
                report_id: Some(self.id.clone()),
                action: Some(decision.as_str().to_string()),
            },
        )
        .await;

        if delete_issue && matches!(decision, ReviewDecision::ActionTaken) {
            if let Some(issue) = issue {
                if issue.created_by != self.reporter_id {
                    Notification::dispatch(
                        db,
                        issue.created_by.clone(),
                        NotificationKind::IssueDeleted,
                        "Issue Removed".to_string(),
                        format!(
                            "Your issue \"{issue_title}\" was removed due to community reports.{}",
                            if note.is_empty() {
                                String::new()
                            } else {
                                format!(" Note: {note}")
                            }
                        ),
                        NotificationData {
                            issue_id: Some(issue.id.clone()),
                            report_id: None,
                            action: Some("deleted".to_string()),
                        },
                    )
                    .await;
                }

                // Takes this report with it; the whole group is superseded
                issue.delete_with_dependents(db).await?;
            }

            db.increment_report_stats(decision, self.reason, true)
                .await?;

            return Ok(ReviewOutcome {
                status: self.status,
                issue_deleted: true,
            });
        }

        if matches!(decision, ReviewDecision::Reviewed) {
            if let Some(issue) = &issue {
                // Re-queried after the save above; counts reports submitted
                // up to this instant
                let count = db.count_reports_by_issue(&issue.id).await?;
                if count >= OWNER_WARNING_THRESHOLD {
                    Notification::dispatch(
                        db,
                        issue.created_by.clone(),
                        NotificationKind::IssueWarning,
                        "Issue Received Reports".to_string(),
                        format!(
                            "Your issue \"{issue_title}\" has received {count} community reports. Please review our guidelines."
                        ),
                        NotificationData {
                            issue_id: Some(issue.id.clone()),
                            report_id: None,
                            action: Some("warning".to_string()),
                        },
                    )
                    .await;
                }
            }
        }

        db.increment_report_stats(decision, self.reason, false)
            .await?;

        // Ticket resolved; only the counters remember it
        db.delete_report(&self.id).await?;

        Ok(ReviewOutcome {
            status: self.status,
            issue_deleted: false,
        })
    }

    /// Quick-dismiss this report, keeping the record
    ///
    /// Unlike [`Report::resolve`] with a dismissed decision, nobody is
    /// notified and the lifetime counters are untouched.
    pub async fn dismiss(
        &mut self,
        db: &Database,
        moderator: &User,
        note: Option<String>,
    ) -> Result<()> {
        let partial = PartialReport {
            status: Some(ReportStatus::Dismissed),
            reviewed_by: Some(moderator.id.clone()),
            review_note: Some(note.unwrap_or_else(|| "Dismissed by moderator".to_string())),
            reviewed_at: Some(Timestamp::now_utc()),
            ..Default::default()
        };
        db.update_report(&self.id, &partial).await?;
        self.apply_options(partial);

        Ok(())
    }
}

/// Collapse joined report rows into per-issue groups
///
/// Rows without an issue snapshot are orphaned and never surface in
/// grouped views. Member reports end up newest first.
pub fn group_report_rows(mut rows: Vec<ReportView>) -> Vec<GroupedReports> {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut groups: Vec<GroupedReports> = Vec::new();
    let mut by_issue: HashMap<String, usize> = HashMap::new();

    for mut row in rows {
        let issue = match row.issue.take() {
            Some(issue) => issue,
            None => continue,
        };

        match by_issue.get(&issue.id) {
            Some(&at) => {
                let group = &mut groups[at];
                group.report_count += 1;
                if row.status == ReportStatus::Pending {
                    group.pending_count += 1;
                }
                if row.created_at > group.latest_report_date {
                    group.latest_report_date = row.created_at;
                }
                if !group.reasons.contains(&row.reason) {
                    group.reasons.push(row.reason);
                }
                group.reports.push(row);
            }
            None => {
                by_issue.insert(issue.id.clone(), groups.len());
                groups.push(GroupedReports {
                    issue,
                    report_count: 1,
                    pending_count: u64::from(row.status == ReportStatus::Pending),
                    latest_report_date: row.created_at,
                    reasons: vec![row.reason],
                    reports: vec![row],
                });
            }
        }
    }

    groups
}

/// Drop groups with fewer reports than requested
pub fn apply_min_reports(groups: &mut Vec<GroupedReports>, min_reports: u64) {
    if min_reports > 1 {
        groups.retain(|group| group.report_count >= min_reports);
    }
}

/// Order groups for display
pub fn sort_groups(groups: &mut [GroupedReports], sort_by: GroupSort) {
    match sort_by {
        GroupSort::ReportCount => groups.sort_by(|a, b| {
            b.report_count
                .cmp(&a.report_count)
                .then(b.latest_report_date.cmp(&a.latest_report_date))
        }),
        GroupSort::Newest => {
            groups.sort_by(|a, b| b.latest_report_date.cmp(&a.latest_report_date))
        }
        GroupSort::Oldest => {
            groups.sort_by(|a, b| a.latest_report_date.cmp(&b.latest_report_date))
        }
        GroupSort::PendingFirst => groups.sort_by(|a, b| {
            b.pending_count
                .cmp(&a.pending_count)
                .then(b.report_count.cmp(&a.report_count))
        }),
    }
}

/// Page size bounds the number of groups, not flat reports
pub fn paginate_groups(
    groups: Vec<GroupedReports>,
    skip: u64,
    limit: i64,
) -> Vec<GroupedReports> {
    groups
        .into_iter()
        .skip(skip as usize)
        .take(limit.max(0) as usize)
        .collect()
}

/// Summarize per-issue report counts over all active reports
pub fn summarize_report_counts(counts_per_issue: impl Iterator<Item = u64>) -> GroupedReportsStats {
    let mut stats = GroupedReportsStats::default();

    for count in counts_per_issue {
        stats.total_issues_reported += 1;
        stats.total_reports += count;
        if count > 1 {
            stats.multiple_reports += 1;
        }
    }

    stats
}
