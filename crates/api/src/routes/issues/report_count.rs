use rocket::serde::json::Json;
use rocket::State;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use civica_database::Database;
use civica_result::Result;

/// # Report Count
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct ReportCountResponse {
    /// Reports submitted against this issue, any status
    pub count: u64,
}

/// # Fetch Report Count
///
/// Public count of reports against an issue.
#[openapi(tag = "Reports")]
#[get("/<issue_id>/report/count")]
pub async fn report_count(
    db: &State<Database>,
    issue_id: String,
) -> Result<Json<ReportCountResponse>> {
    let count = db.count_reports_by_issue(&issue_id).await?;

    Ok(Json(ReportCountResponse { count }))
}

#[cfg(test)]
mod test {
    use super::ReportCountResponse;
    use crate::util::test::TestHarness;
    use civica_database::{Issue, IssueCategory, Report, ReportReason, UserRole};
    use rocket::http::Status;

    #[rocket::async_test]
    async fn count_is_public() {
        let harness = TestHarness::new().await;
        let (owner, _) = harness.new_user(UserRole::User).await;
        let (reporter, _) = harness.new_user(UserRole::User).await;

        let issue = Issue::new(
            "Collapsed drain".to_string(),
            "Smells terrible".to_string(),
            IssueCategory::Drainage,
            "3 River Walk".to_string(),
            owner.id.clone(),
        );
        harness.db().insert_issue(&issue).await.unwrap();
        Report::create(
            harness.db(),
            &issue,
            reporter.id,
            ReportReason::Other,
            String::new(),
        )
        .await
        .unwrap();

        // No session header required
        let response = harness
            .client
            .get(format!("/issues/{}/report/count", issue.id))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body: ReportCountResponse = response.into_json().await.expect("count");
        assert_eq!(body.count, 1);
    }
}
