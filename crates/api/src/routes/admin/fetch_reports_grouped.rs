use std::str::FromStr;

use rocket::serde::json::Json;
use rocket::State;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use civica_database::{
    Admin, Database, GroupSort, GroupedReportQuery, GroupedReports, GroupedReportsStats,
    IssueCategory, IssueStatus, ReportStatus,
};
use civica_result::Result;

/// # Query Parameters
#[derive(Deserialize, JsonSchema, FromForm)]
pub struct OptionsFetchGrouped {
    /// Page to fetch, starting at 1
    page: Option<u64>,
    /// Groups per page
    limit: Option<i64>,
    /// Report status to include; `all` disables the filter
    status: Option<String>,
    /// Issue category to include
    category: Option<String>,
    /// Issue status to include
    issue_status: Option<String>,
    /// Case-insensitive search across issue title, issue description and
    /// report details
    search: Option<String>,
    /// Drop groups with fewer reports than this
    min_reports: Option<u64>,
    /// Group ordering: `report_count`, `newest`, `oldest` or
    /// `pending_first`
    sort_by: Option<String>,
}

/// # Grouped Report Listing
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct FetchGroupedResponse {
    /// Groups on this page
    pub data: Vec<GroupedReports>,
    /// Number of groups on this page
    pub count: usize,
    /// Groups across all pages
    pub total: u64,
    /// Current page
    pub page: u64,
    /// Total number of pages
    pub pages: u64,
    /// Aggregate figures over all active reports
    pub stats: GroupedReportsStats,
}

/// # Fetch Grouped Reports
///
/// Fetch reports grouped per issue. Issues that no longer exist never
/// surface here; pagination bounds the number of groups.
#[openapi(tag = "Moderation")]
#[get("/reports/grouped?<options..>")]
pub async fn fetch_reports_grouped(
    db: &State<Database>,
    _admin: Admin,
    options: OptionsFetchGrouped,
) -> Result<Json<FetchGroupedResponse>> {
    let page = options.page.unwrap_or(1).max(1);
    let limit = options.limit.unwrap_or(20).max(1);

    let query = GroupedReportQuery {
        status: options
            .status
            .as_deref()
            .filter(|status| *status != "all")
            .map(ReportStatus::from_str)
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
        min_reports: options.min_reports.unwrap_or(1),
        sort_by: options
            .sort_by
            .as_deref()
            .map(GroupSort::from_str)
            .transpose()?
            .unwrap_or_default(),
        skip: (page - 1) * limit as u64,
        limit,
    };

    let result = db.fetch_grouped_reports(&query).await?;

    Ok(Json(FetchGroupedResponse {
        count: result.groups.len(),
        data: result.groups,
        total: result.total,
        page,
        pages: result.total.div_ceil(limit as u64),
        stats: result.stats,
    }))
}

#[cfg(test)]
mod test {
    use super::FetchGroupedResponse;
    use crate::util::test::TestHarness;
    use civica_database::{Issue, IssueCategory, Report, ReportReason, UserRole};
    use rocket::http::{Header, Status};

    #[rocket::async_test]
    async fn groups_per_issue_and_paginates_groups() {
        let harness = TestHarness::new().await;
        let (_, admin_token) = harness.new_user(UserRole::Admin).await;

        for n in 0..3 {
            let (owner, _) = harness.new_user(UserRole::User).await;
            let issue = Issue::new(
                format!("Issue {n}"),
                "Description".to_string(),
                IssueCategory::Pothole,
                "High St".to_string(),
                owner.id.clone(),
            );
            harness.db().insert_issue(&issue).await.unwrap();

            for _ in 0..2 {
                let (reporter, _) = harness.new_user(UserRole::User).await;
                Report::create(
                    harness.db(),
                    &issue,
                    reporter.id,
                    ReportReason::Spam,
                    String::new(),
                )
                .await
                .unwrap();
            }
        }

        let response = harness
            .client
            .get("/admin/reports/grouped?limit=2&sort_by=newest")
            .header(Header::new("x-session-token", admin_token.clone()))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body: FetchGroupedResponse = response.into_json().await.expect("groups");
        // Two groups per page, six reports in total
        assert_eq!(body.total, 3);
        assert_eq!(body.count, 2);
        assert_eq!(body.pages, 2);
        assert!(body.data.iter().all(|group| group.report_count == 2));
        assert_eq!(body.stats.total_reports, 6);
        assert_eq!(body.stats.total_issues_reported, 3);
        assert_eq!(body.stats.multiple_reports, 3);

        // Raising the floor above every group empties the listing
        let response = harness
            .client
            .get("/admin/reports/grouped?min_reports=3")
            .header(Header::new("x-session-token", admin_token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body: FetchGroupedResponse = response.into_json().await.expect("groups");
        assert_eq!(body.total, 0);
        assert!(body.data.is_empty());
        // The aggregate figures ignore the filters
        assert_eq!(body.stats.total_reports, 6);
    }
}
