use rocket::serde::json::Json;
use rocket::State;

use civica_database::{Database, ReportView, User};
use civica_result::Result;

use crate::util::pagination::{OptionsPage, Page};

/// # Fetch Own Reports
///
/// Fetch the caller's submitted reports with issue and reviewer snapshots,
/// newest first.
#[openapi(tag = "Reports")]
#[get("/my-reports?<options..>")]
pub async fn my_reports(
    db: &State<Database>,
    user: User,
    options: OptionsPage,
) -> Result<Json<Page<ReportView>>> {
    let (page, limit, skip) = options.resolve(10);

    let reports = db.fetch_reports_by_reporter(&user.id, skip, limit).await?;
    let total = db.count_reports_by_reporter(&user.id).await?;

    // Join issue and reviewer snapshots for display
    let issue_ids: Vec<String> = reports.iter().map(|report| report.issue_id.clone()).collect();
    let issues = db.fetch_issues(&issue_ids).await?;

    let reviewer_ids: Vec<String> = reports
        .iter()
        .filter_map(|report| report.reviewed_by.clone())
        .collect();
    let reviewers = db.fetch_users(&reviewer_ids).await?;

    let views = reports
        .into_iter()
        .map(|report| {
            let issue = issues.iter().find(|issue| issue.id == report.issue_id);
            let reviewer = report
                .reviewed_by
                .as_ref()
                .and_then(|id| reviewers.iter().find(|user| &user.id == id));
            ReportView::from_report(report, issue, None, reviewer)
        })
        .collect();

    Ok(Json(Page::new(views, total, page, limit)))
}

#[cfg(test)]
mod test {
    use crate::util::pagination::Page;
    use crate::util::test::TestHarness;
    use civica_database::{Issue, IssueCategory, Report, ReportReason, ReportView, UserRole};
    use rocket::http::{Header, Status};

    #[rocket::async_test]
    async fn lists_own_reports_with_issue_snapshots() {
        let harness = TestHarness::new().await;
        let (owner, _) = harness.new_user(UserRole::User).await;
        let (reporter, token) = harness.new_user(UserRole::User).await;

        let issue = Issue::new(
            "Street light out".to_string(),
            "Dark corner at night".to_string(),
            IssueCategory::Streetlight,
            "7 Mill Rd".to_string(),
            owner.id.clone(),
        );
        harness.db().insert_issue(&issue).await.unwrap();

        Report::create(
            harness.db(),
            &issue,
            reporter.id.clone(),
            ReportReason::Inaccurate,
            String::new(),
        )
        .await
        .unwrap();

        let response = harness
            .client
            .get("/reports/my-reports")
            .header(Header::new("x-session-token", token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body: Page<ReportView> = response.into_json().await.expect("`Page`");
        assert_eq!(body.total, 1);
        assert_eq!(body.data.len(), 1);
        assert_eq!(
            body.data[0].issue.as_ref().map(|issue| issue.id.as_str()),
            Some(issue.id.as_str())
        );
    }
}
