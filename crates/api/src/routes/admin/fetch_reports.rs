use std::collections::HashMap;
use std::str::FromStr;

use rocket::serde::json::Json;
use rocket::State;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use civica_database::{
    Admin, Database, IssueCategory, IssueStatus, ReportQuery, ReportReason, ReportStatus,
    ReportView,
};
use civica_result::Result;

/// # Query Parameters
#[derive(Deserialize, JsonSchema, FromForm)]
pub struct OptionsFetchReports {
    /// Page to fetch, starting at 1
    page: Option<u64>,
    /// Items per page
    limit: Option<i64>,
    /// Report status to include
    status: Option<String>,
    /// Report reason to include
    reason: Option<String>,
    /// Issue category to include
    category: Option<String>,
    /// Issue status to include
    issue_status: Option<String>,
    /// Case-insensitive search across issue title, issue description and
    /// report details
    search: Option<String>,
}

/// # Report Listing
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct FetchReportsResponse {
    /// Report views on this page
    pub data: Vec<ReportView>,
    /// Number of items on this page
    pub count: usize,
    /// Items across all pages
    pub total: u64,
    /// Current page
    pub page: u64,
    /// Total number of pages
    pub pages: u64,
    /// All reports on record broken down by status
    pub status_counts: HashMap<ReportStatus, u64>,
}

/// # Fetch Reports
///
/// Fetch a filtered, paginated flat list of reports with their issue and
/// user snapshots. Reports whose issue was deleted surface without one.
#[openapi(tag = "Moderation")]
#[get("/reports?<options..>")]
pub async fn fetch_reports(
    db: &State<Database>,
    _admin: Admin,
    options: OptionsFetchReports,
) -> Result<Json<FetchReportsResponse>> {
    let page = options.page.unwrap_or(1).max(1);
    let limit = options.limit.unwrap_or(20).max(1);

    let query = ReportQuery {
        status: options
            .status
            .as_deref()
            .map(ReportStatus::from_str)
            .transpose()?,
        reason: options
            .reason
            .as_deref()
            .map(ReportReason::from_str)
            .transpose()?,
        category: options
            .category
            .as_deref()
            .map(IssueCategory::from_str)
            .transpose()?,
        issue_status: options
            .issue_status
            .as_deref()
            .map(IssueStatus::from_str)
            .transpose()?,
        search: options.search.clone(),
        skip: (page - 1) * limit as u64,
        limit,
    };

    let (data, total) = db.fetch_report_views(&query).await?;
    let status_counts = db.count_reports_by_status().await?;

    Ok(Json(FetchReportsResponse {
        count: data.len(),
        data,
        total,
        page,
        pages: total.div_ceil(limit as u64),
        status_counts,
    }))
}
