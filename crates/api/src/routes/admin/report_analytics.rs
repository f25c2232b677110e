use std::collections::HashMap;

use rocket::serde::json::Json;
use rocket::State;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use civica_database::{
    Admin, DailyCount, Database, MostReportedIssue, ReasonCount, ReasonStats,
    ReportAnalyticsOverview, ReportStatus,
};
use civica_result::Result;

/// # Query Parameters
#[derive(Deserialize, JsonSchema, FromForm)]
pub struct OptionsReportAnalytics {
    /// Trailing window for the time series, in days
    days: Option<i64>,
}

/// # Lifetime Resolution Counters
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct ResolvedCounters {
    /// Reports ever resolved
    pub total: u64,
    /// Resolutions that dismissed the report
    pub dismissed: u64,
    /// Resolutions that reviewed the report
    pub reviewed: u64,
    /// Resolutions where action was taken
    pub action_taken: u64,
    /// Issues deleted as a moderation outcome
    pub issues_deleted: u64,
}

/// # Report Analytics
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct ReportAnalyticsResponse {
    /// Headline counters
    pub overview: ReportAnalyticsOverview,
    /// Lifetime resolution counters
    pub resolved: ResolvedCounters,
    /// Lifetime resolutions broken down by reason
    pub resolved_by_reason: ReasonStats,
    /// Active reports broken down by reason
    pub reason_breakdown: Vec<ReasonCount>,
    /// Active reports broken down by status
    pub status_breakdown: HashMap<ReportStatus, u64>,
    /// Active reports per day over the window
    pub reports_over_time: Vec<DailyCount>,
    /// Ten most-reported issues
    pub most_reported_issues: Vec<MostReportedIssue>,
}

/// # Fetch Report Analytics
///
/// Read-only analytics snapshot of report activity plus the cumulative
/// resolution counters.
#[openapi(tag = "Moderation")]
#[get("/reports/analytics?<options..>")]
pub async fn report_analytics(
    db: &State<Database>,
    _admin: Admin,
    options: OptionsReportAnalytics,
) -> Result<Json<ReportAnalyticsResponse>> {
    let days = options.days.unwrap_or(30).max(1);

    let analytics = db.report_analytics(days).await?;
    let resolved = db.fetch_report_stats().await?;

    Ok(Json(ReportAnalyticsResponse {
        overview: analytics.overview,
        resolved: ResolvedCounters {
            total: resolved.total_resolved,
            dismissed: resolved.dismissed,
            reviewed: resolved.reviewed,
            action_taken: resolved.action_taken,
            issues_deleted: resolved.issues_deleted,
        },
        resolved_by_reason: resolved.reason_stats,
        reason_breakdown: analytics.reason_breakdown,
        status_breakdown: analytics.status_breakdown,
        reports_over_time: analytics.reports_over_time,
        most_reported_issues: analytics.most_reported_issues,
    }))
}

#[cfg(test)]
mod test {
    use super::ReportAnalyticsResponse;
    use crate::util::test::TestHarness;
    use civica_database::{
        Issue, IssueCategory, Report, ReportReason, ReviewDecision, UserRole,
    };
    use rocket::http::{Header, Status};

    #[rocket::async_test]
    async fn snapshot_tracks_activity_and_lifetime_counters() {
        let harness = TestHarness::new().await;
        let (_, admin_token) = harness.new_user(UserRole::Admin).await;
        let (owner, _) = harness.new_user(UserRole::User).await;
        let (r1, _) = harness.new_user(UserRole::User).await;
        let (r2, _) = harness.new_user(UserRole::User).await;

        let issue = Issue::new(
            "Cracked pavement".to_string(),
            "Trip hazard outside the school".to_string(),
            IssueCategory::RoadDamage,
            "School Lane".to_string(),
            owner.id.clone(),
        );
        harness.db().insert_issue(&issue).await.unwrap();

        let resolved = Report::create(
            harness.db(),
            &issue,
            r1.id.clone(),
            ReportReason::Spam,
            String::new(),
        )
        .await
        .unwrap();
        Report::create(
            harness.db(),
            &issue,
            r2.id.clone(),
            ReportReason::Duplicate,
            String::new(),
        )
        .await
        .unwrap();

        let (moderator, _) = harness.new_user(UserRole::Admin).await;
        resolved
            .resolve(
                harness.db(),
                &moderator,
                ReviewDecision::Reviewed,
                None,
                false,
            )
            .await
            .unwrap();

        let response = harness
            .client
            .get("/admin/reports/analytics?days=7")
            .header(Header::new("x-session-token", admin_token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body: ReportAnalyticsResponse = response.into_json().await.expect("analytics");
        // One report left active after the resolution deleted its ticket
        assert_eq!(body.overview.total_reports, 1);
        assert_eq!(body.overview.active_reports, 1);
        assert_eq!(body.overview.pending_reports, 1);
        assert_eq!(body.overview.active_cases, 1);
        assert_eq!(body.overview.reviewed_today, 0);
        assert_eq!(body.resolved.total, 1);
        assert_eq!(body.resolved.reviewed, 1);
        assert_eq!(body.resolved_by_reason.spam, 1);
        assert_eq!(body.reports_over_time.len(), 1);
        assert_eq!(body.most_reported_issues.len(), 1);
        assert_eq!(body.most_reported_issues[0].report_count, 1);
    }
}
