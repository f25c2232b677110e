use rocket::serde::json::Json;
use rocket::State;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use civica_database::{Admin, Database, ReportView, UserSnapshot};
use civica_result::Result;

/// # Report Details
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct FetchReportResponse {
    /// The report with its snapshots
    pub report: ReportView,
    /// Owner of the reported issue, if both still exist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_owner: Option<UserSnapshot>,
    /// All reports on the same issue, this one included
    pub total_reports_for_issue: u64,
}

/// # Fetch Report
///
/// Fetch a single report with its issue, reporter and reviewer snapshots
/// and how many reports the issue has accumulated in total.
#[openapi(tag = "Moderation")]
#[get("/reports/<report_id>")]
pub async fn fetch_report(
    db: &State<Database>,
    _admin: Admin,
    report_id: String,
) -> Result<Json<FetchReportResponse>> {
    let report = db.fetch_report(&report_id).await?;

    let issue = db.fetch_issue(&report.issue_id).await.ok();
    let issue_owner = match &issue {
        Some(issue) => db
            .fetch_user(&issue.created_by)
            .await
            .ok()
            .map(|owner| owner.snapshot()),
        None => None,
    };

    let reporter = db.fetch_user(&report.reporter_id).await.ok();
    let reviewer = match &report.reviewed_by {
        Some(id) => db.fetch_user(id).await.ok(),
        None => None,
    };

    let total_reports_for_issue = db.count_reports_by_issue(&report.issue_id).await?;

    Ok(Json(FetchReportResponse {
        report: ReportView::from_report(
            report,
            issue.as_ref(),
            reporter.as_ref(),
            reviewer.as_ref(),
        ),
        issue_owner,
        total_reports_for_issue,
    }))
}
