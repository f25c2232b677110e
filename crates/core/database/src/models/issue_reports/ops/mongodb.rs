use std::collections::HashMap;

use bson::{from_document, Bson, Document};
use iso8601_timestamp::{Duration, Timestamp};
use mongodb::options::FindOptions;

use civica_result::Result;

use crate::MongoDb;
use crate::{
    DailyCount, GroupSort, GroupedReportQuery, GroupedReportsPage, MostReportedIssue,
    PartialReport, ReasonCount, Report, ReportAnalytics, ReportAnalyticsOverview, ReportQuery,
    ReportStatus, ReportView,
};

use super::AbstractReports;

static COL: &str = "issue_reports";

/// Whether an insert failed on the (issue, reporter) unique index
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(
            write_error
        )) if write_error.code == 11000
    )
}

fn stage_lookup_issue() -> Document {
    doc! {
        "$lookup": {
            "from": "issues",
            "localField": "issue_id",
            "foreignField": "_id",
            "as": "issueData"
        }
    }
}

/// Flatten the issue lookup; orphaned reports survive only if asked to
fn stage_unwind_issue(keep_orphans: bool) -> Document {
    doc! {
        "$unwind": {
            "path": "$issueData",
            "preserveNullAndEmptyArrays": keep_orphans
        }
    }
}

/// Keep reports whose issue still exists, without flattening the lookup
fn stage_match_active() -> Document {
    doc! {
        "$match": {
            "issueData": {
                "$ne": []
            }
        }
    }
}

fn stage_match_reports(
    status: Option<ReportStatus>,
    reason: Option<crate::ReportReason>,
) -> Option<Document> {
    let mut filter = doc! {};
    if let Some(status) = status {
        filter.insert("status", status.as_str());
    }
    if let Some(reason) = reason {
        filter.insert("reason", reason.as_str());
    }

    if filter.is_empty() {
        None
    } else {
        Some(doc! { "$match": filter })
    }
}

fn stages_match_issue(
    category: Option<crate::IssueCategory>,
    issue_status: Option<crate::IssueStatus>,
    search: Option<&str>,
) -> Vec<Document> {
    let mut stages = vec![];

    if let Some(category) = category {
        stages.push(doc! {
            "$match": {
                "issueData.category": category.as_str()
            }
        });
    }

    if let Some(issue_status) = issue_status {
        stages.push(doc! {
            "$match": {
                "issueData.status": issue_status.as_str()
            }
        });
    }

    if let Some(search) = search {
        stages.push(doc! {
            "$match": {
                "$or": [
                    { "issueData.title": { "$regex": search, "$options": "i" } },
                    { "issueData.description": { "$regex": search, "$options": "i" } },
                    { "details": { "$regex": search, "$options": "i" } }
                ]
            }
        });
    }

    stages
}

fn stages_lookup_users() -> Vec<Document> {
    vec![
        doc! {
            "$lookup": {
                "from": "users",
                "localField": "reporter_id",
                "foreignField": "_id",
                "as": "reporterData"
            }
        },
        doc! {
            "$unwind": {
                "path": "$reporterData",
                "preserveNullAndEmptyArrays": true
            }
        },
        doc! {
            "$lookup": {
                "from": "users",
                "localField": "reviewed_by",
                "foreignField": "_id",
                "as": "reviewerData"
            }
        },
        doc! {
            "$unwind": {
                "path": "$reviewerData",
                "preserveNullAndEmptyArrays": true
            }
        },
    ]
}

/// Project `then` when the looked-up document exists, null otherwise
fn if_present(value: &str, then: Document) -> Document {
    doc! {
        "$cond": [
            { "$gt": [value, Bson::Null] },
            then,
            Bson::Null
        ]
    }
}

fn issue_snapshot() -> Document {
    if_present(
        "$issueData",
        doc! {
            "_id": "$issueData._id",
            "title": "$issueData.title",
            "category": "$issueData.category",
            "status": "$issueData.status",
            "images": "$issueData.images",
            "location": "$issueData.location",
            "created_at": "$issueData.created_at"
        },
    )
}

fn reporter_snapshot() -> Document {
    if_present(
        "$reporterData",
        doc! {
            "_id": "$reporterData._id",
            "name": "$reporterData.name",
            "email": "$reporterData.email",
            "avatar": "$reporterData.avatar"
        },
    )
}

fn reviewer_snapshot() -> Document {
    if_present(
        "$reviewerData",
        doc! {
            "_id": "$reviewerData._id",
            "name": "$reviewerData.name"
        },
    )
}

fn stage_project_view() -> Document {
    doc! {
        "$project": {
            "_id": 1,
            "reason": 1,
            "details": 1,
            "status": 1,
            "review_note": 1,
            "reviewed_at": 1,
            "created_at": 1,
            "issue": issue_snapshot(),
            "reporter": reporter_snapshot(),
            "reviewed_by": reviewer_snapshot()
        }
    }
}

fn stage_sort_rows_newest() -> Document {
    doc! {
        "$sort": {
            "created_at": -1
        }
    }
}

fn stage_group_by_issue() -> Document {
    doc! {
        "$group": {
            "_id": "$issue_id",
            "issue": { "$first": "$issueData" },
            "report_count": { "$sum": 1 },
            "pending_count": {
                "$sum": { "$cond": [{ "$eq": ["$status", "pending"] }, 1, 0] }
            },
            "latest_report_date": { "$max": "$created_at" },
            "reasons": { "$addToSet": "$reason" },
            "reports": {
                "$push": {
                    "_id": "$_id",
                    "reason": "$reason",
                    "details": "$details",
                    "status": "$status",
                    "review_note": "$review_note",
                    "reviewed_at": "$reviewed_at",
                    "created_at": "$created_at",
                    "reporter": reporter_snapshot(),
                    "reviewed_by": reviewer_snapshot()
                }
            }
        }
    }
}

fn stage_sort_groups(sort_by: GroupSort) -> Document {
    doc! {
        "$sort": match sort_by {
            GroupSort::ReportCount => doc! { "report_count": -1, "latest_report_date": -1 },
            GroupSort::Newest => doc! { "latest_report_date": -1 },
            GroupSort::Oldest => doc! { "latest_report_date": 1 },
            GroupSort::PendingFirst => doc! { "pending_count": -1, "report_count": -1 },
        }
    }
}

fn stage_project_group() -> Document {
    doc! {
        "$project": {
            "issue": {
                "_id": "$issue._id",
                "title": "$issue.title",
                "category": "$issue.category",
                "status": "$issue.status",
                "images": "$issue.images",
                "location": "$issue.location",
                "created_at": "$issue.created_at"
            },
            "report_count": 1,
            "pending_count": 1,
            "latest_report_date": 1,
            "reasons": 1,
            "reports": 1
        }
    }
}

/// Per-issue counts over all active reports, collapsed into one document
fn stages_group_summary() -> Vec<Document> {
    vec![
        stage_lookup_issue(),
        stage_match_active(),
        doc! {
            "$group": {
                "_id": "$issue_id",
                "count": { "$sum": 1 }
            }
        },
        doc! {
            "$group": {
                "_id": Bson::Null,
                "total_issues_reported": { "$sum": 1 },
                "total_reports": { "$sum": "$count" },
                "multiple_reports": {
                    "$sum": { "$cond": [{ "$gt": ["$count", 1] }, 1, 0] }
                }
            }
        },
    ]
}

#[derive(Deserialize)]
struct TotalCount {
    #[serde(default)]
    total: u64,
}

#[derive(Deserialize)]
struct StatusCount {
    #[serde(rename = "_id")]
    status: ReportStatus,
    count: u64,
}

impl MongoDb {
    /// Terminate a pipeline with `$count` and read the single result back
    async fn count_pipeline(&self, mut pipeline: Vec<Document>) -> Result<u64> {
        pipeline.push(doc! { "$count": "total" });

        Ok(query!(self, aggregate, COL, pipeline)?
            .into_iter()
            .next()
            .and_then(|document| from_document::<TotalCount>(document).ok())
            .map(|count| count.total)
            .unwrap_or_default())
    }
}

#[async_trait]
impl AbstractReports for MongoDb {
    /// Insert a new report into the database
    async fn insert_report(&self, report: &Report) -> Result<()> {
        self.col::<Report>(COL)
            .insert_one(report)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_duplicate_key(&err) {
                    create_error!(AlreadyReported)
                } else {
                    create_database_error!("insert_one", COL)
                }
            })
    }

    /// Fetch a report from the database
    async fn fetch_report(&self, id: &str) -> Result<Report> {
        query!(self, find_one_by_id, COL, id)?.ok_or_else(|| create_error!(UnknownReport))
    }

    /// Fetch a reporter's report on an issue, if any
    async fn fetch_report_by_issue_reporter(
        &self,
        issue_id: &str,
        reporter_id: &str,
    ) -> Result<Option<Report>> {
        query!(
            self,
            find_one,
            COL,
            doc! {
                "issue_id": issue_id,
                "reporter_id": reporter_id
            }
        )
    }

    /// Fetch all reports on an issue
    async fn fetch_reports_by_issue(&self, issue_id: &str) -> Result<Vec<Report>> {
        query!(
            self,
            find,
            COL,
            doc! {
                "issue_id": issue_id
            }
        )
    }

    /// Fetch a page of a reporter's reports, newest first
    async fn fetch_reports_by_reporter(
        &self,
        reporter_id: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Report>> {
        query!(
            self,
            find_with_options,
            COL,
            doc! {
                "reporter_id": reporter_id
            },
            FindOptions::builder()
                .sort(doc! {
                    "created_at": -1_i32
                })
                .skip(skip)
                .limit(limit)
                .build()
        )
    }

    /// Count a reporter's reports
    async fn count_reports_by_reporter(&self, reporter_id: &str) -> Result<u64> {
        query!(
            self,
            count_documents,
            COL,
            doc! {
                "reporter_id": reporter_id
            }
        )
    }

    /// Count all reports on an issue, regardless of status
    async fn count_reports_by_issue(&self, issue_id: &str) -> Result<u64> {
        query!(
            self,
            count_documents,
            COL,
            doc! {
                "issue_id": issue_id
            }
        )
    }

    /// Update a report with the given partial
    async fn update_report(&self, id: &str, partial: &PartialReport) -> Result<()> {
        query!(self, update_one_by_id, COL, id, partial).map(|_| ())
    }

    /// Delete a report from the database
    async fn delete_report(&self, id: &str) -> Result<()> {
        query!(self, delete_one_by_id, COL, id).map(|_| ())
    }

    /// Delete all reports on an issue
    async fn delete_reports_by_issue(&self, issue_id: &str) -> Result<()> {
        query!(
            self,
            delete_many,
            COL,
            doc! {
                "issue_id": issue_id
            }
        )
        .map(|_| ())
    }

    /// Fetch a filtered page of reports joined with their snapshots
    async fn fetch_report_views(&self, query: &ReportQuery) -> Result<(Vec<ReportView>, u64)> {
        let mut pipeline = vec![];

        if let Some(stage) = stage_match_reports(query.status, query.reason) {
            pipeline.push(stage);
        }

        pipeline.push(stage_lookup_issue());
        pipeline.push(stage_unwind_issue(true));
        pipeline.extend(stages_match_issue(
            query.category,
            query.issue_status,
            query.search.as_deref(),
        ));

        let total = self.count_pipeline(pipeline.clone()).await?;

        pipeline.push(stage_sort_rows_newest());
        pipeline.push(doc! { "$skip": query.skip as i64 });
        pipeline.push(doc! { "$limit": query.limit });
        pipeline.extend(stages_lookup_users());
        pipeline.push(stage_project_view());

        let views = query!(self, aggregate, COL, pipeline)?
            .into_iter()
            .filter_map(|document| from_document(document).ok())
            .collect();

        Ok((views, total))
    }

    /// Count all reports by their moderation state
    async fn count_reports_by_status(&self) -> Result<HashMap<ReportStatus, u64>> {
        Ok(query!(
            self,
            aggregate,
            COL,
            vec![doc! {
                "$group": {
                    "_id": "$status",
                    "count": { "$sum": 1 }
                }
            }]
        )?
        .into_iter()
        .filter_map(|document| from_document::<StatusCount>(document).ok())
        .map(|entry| (entry.status, entry.count))
        .collect())
    }

    /// Fetch a page of reports grouped per issue
    async fn fetch_grouped_reports(
        &self,
        query: &GroupedReportQuery,
    ) -> Result<GroupedReportsPage> {
        let mut pipeline = vec![];

        if let Some(stage) = stage_match_reports(query.status, None) {
            pipeline.push(stage);
        }

        pipeline.push(stage_lookup_issue());
        pipeline.push(stage_unwind_issue(false));
        pipeline.extend(stages_match_issue(
            query.category,
            query.issue_status,
            query.search.as_deref(),
        ));
        pipeline.extend(stages_lookup_users());
        pipeline.push(stage_sort_rows_newest());
        pipeline.push(stage_group_by_issue());

        if query.min_reports > 1 {
            pipeline.push(doc! {
                "$match": {
                    "report_count": { "$gte": query.min_reports as i64 }
                }
            });
        }

        let total = self.count_pipeline(pipeline.clone()).await?;

        pipeline.push(stage_sort_groups(query.sort_by));
        pipeline.push(doc! { "$skip": query.skip as i64 });
        pipeline.push(doc! { "$limit": query.limit });
        pipeline.push(stage_project_group());

        let groups = query!(self, aggregate, COL, pipeline)?
            .into_iter()
            .filter_map(|document| from_document(document).ok())
            .collect();

        let stats = query!(self, aggregate, COL, stages_group_summary())?
            .into_iter()
            .next()
            .and_then(|document| from_document(document).ok())
            .unwrap_or_default();

        Ok(GroupedReportsPage {
            groups,
            total,
            stats,
        })
    }

    /// Compute the moderation analytics snapshot over a trailing window
    async fn report_analytics(&self, window_days: i64) -> Result<ReportAnalytics> {
        let total_reports = query!(self, count_documents, COL, doc! {})?;

        let orphaned_reports = self
            .count_pipeline(vec![
                stage_lookup_issue(),
                doc! {
                    "$match": {
                        "issueData": { "$size": 0 }
                    }
                },
            ])
            .await?;

        let active_cases = self
            .count_pipeline(vec![
                stage_lookup_issue(),
                stage_match_active(),
                doc! { "$group": { "_id": "$issue_id" } },
            ])
            .await?;

        let pending_reports = self
            .count_pipeline(vec![
                doc! { "$match": { "status": "pending" } },
                stage_lookup_issue(),
                stage_match_active(),
            ])
            .await?;

        let pending_cases = self
            .count_pipeline(vec![
                doc! { "$match": { "status": "pending" } },
                stage_lookup_issue(),
                stage_match_active(),
                doc! { "$group": { "_id": "$issue_id" } },
            ])
            .await?;

        let reason_breakdown: Vec<ReasonCount> = query!(
            self,
            aggregate,
            COL,
            vec![
                stage_lookup_issue(),
                stage_match_active(),
                doc! {
                    "$group": {
                        "_id": "$reason",
                        "count": { "$sum": 1 }
                    }
                },
                doc! { "$sort": { "count": -1 } },
            ]
        )?
        .into_iter()
        .filter_map(|document| from_document(document).ok())
        .collect();

        let status_breakdown: HashMap<ReportStatus, u64> = query!(
            self,
            aggregate,
            COL,
            vec![
                stage_lookup_issue(),
                stage_match_active(),
                doc! {
                    "$group": {
                        "_id": "$status",
                        "count": { "$sum": 1 }
                    }
                },
            ]
        )?
        .into_iter()
        .filter_map(|document| from_document::<StatusCount>(document).ok())
        .map(|entry| (entry.status, entry.count))
        .collect();

        let window_start = Timestamp::now_utc() - Duration::days(window_days);
        let reports_over_time: Vec<DailyCount> = query!(
            self,
            aggregate,
            COL,
            vec![
                stage_lookup_issue(),
                doc! {
                    "$match": {
                        "issueData": { "$ne": [] },
                        "created_at": { "$gte": window_start.to_string() }
                    }
                },
                doc! {
                    "$group": {
                        // Timestamps are ISO-8601 strings; the first ten
                        // bytes are the day
                        "_id": { "$substrBytes": ["$created_at", 0, 10] },
                        "count": { "$sum": 1 }
                    }
                },
                doc! { "$sort": { "_id": 1 } },
            ]
        )?
        .into_iter()
        .filter_map(|document| from_document(document).ok())
        .collect();

        let most_reported_issues: Vec<MostReportedIssue> = query!(
            self,
            aggregate,
            COL,
            vec![
                stage_lookup_issue(),
                stage_match_active(),
                doc! {
                    "$group": {
                        "_id": "$issue_id",
                        "report_count": { "$sum": 1 }
                    }
                },
                doc! { "$sort": { "report_count": -1 } },
                doc! { "$limit": 10 },
                doc! {
                    "$lookup": {
                        "from": "issues",
                        "localField": "_id",
                        "foreignField": "_id",
                        "as": "issue"
                    }
                },
                doc! { "$unwind": "$issue" },
                doc! {
                    "$project": {
                        "report_count": 1,
                        "issue": {
                            "_id": "$issue._id",
                            "title": "$issue.title",
                            "category": "$issue.category",
                            "status": "$issue.status"
                        }
                    }
                },
            ]
        )?
        .into_iter()
        .filter_map(|document| from_document(document).ok())
        .collect();

        let today_start = format!(
            "{}T00:00:00.000Z",
            &Timestamp::now_utc().to_string()[..10]
        );
        let reviewed_today = self
            .count_pipeline(vec![
                stage_lookup_issue(),
                stage_match_active(),
                doc! {
                    "$match": {
                        "reviewed_at": { "$gte": today_start }
                    }
                },
            ])
            .await?;

        Ok(ReportAnalytics {
            overview: ReportAnalyticsOverview {
                active_cases,
                pending_cases,
                total_reports,
                active_reports: total_reports - orphaned_reports,
                orphaned_reports,
                pending_reports,
                reviewed_today,
            },
            reason_breakdown,
            status_breakdown,
            reports_over_time,
            most_reported_issues,
        })
    }
}
