use std::str::FromStr;

use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;
use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

use civica_database::{Database, Report, ReportReason, User};
use civica_result::{create_error, Result};

/// # Report Data
#[derive(Validate, Deserialize, JsonSchema)]
pub struct DataReportIssue {
    /// Why the issue is being flagged
    reason: String,
    /// Additional context for moderators
    #[validate(length(max = 500))]
    details: Option<String>,
}

/// # Report Issue
///
/// Flag an issue for the moderation team. A signed-in user may report a
/// given issue at most once, and never their own.
#[openapi(tag = "Reports")]
#[post("/<issue_id>/report", data = "<data>")]
pub async fn report_issue(
    db: &State<Database>,
    user: User,
    issue_id: String,
    data: Json<DataReportIssue>,
) -> Result<status::Created<Json<Report>>> {
    let data = data.into_inner();
    data.validate()
        .map_err(|error| create_error!(FailedValidation { error: error.to_string() }))?;

    let reason = ReportReason::from_str(&data.reason)?;

    let issue = db.fetch_issue(&issue_id).await?;

    let report = Report::create(
        db,
        &issue,
        user.id,
        reason,
        data.details.unwrap_or_default(),
    )
    .await?;

    Ok(status::Created::new(format!("/admin/reports/{}", report.id)).body(Json(report)))
}

#[cfg(test)]
mod test {
    use crate::util::test::TestHarness;
    use civica_database::{Issue, IssueCategory, Report, ReportStatus, UserRole};
    use rocket::http::{ContentType, Header, Status};

    #[rocket::async_test]
    async fn report_issue_flow() {
        let harness = TestHarness::new().await;
        let (owner, owner_token) = harness.new_user(UserRole::User).await;
        let (_, reporter_token) = harness.new_user(UserRole::User).await;

        let issue = Issue::new(
            "Burst water main".to_string(),
            "Flooding the junction".to_string(),
            IssueCategory::WaterLeak,
            "5 Canal St".to_string(),
            owner.id.clone(),
        );
        harness.db().insert_issue(&issue).await.unwrap();

        // No session, no report
        let response = harness
            .client
            .post(format!("/issues/{}/report", issue.id))
            .header(ContentType::JSON)
            .body(json!({ "reason": "spam" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);

        // Unknown issue
        let response = harness
            .client
            .post("/issues/does-not-exist/report")
            .header(ContentType::JSON)
            .header(Header::new("x-session-token", reporter_token.clone()))
            .body(json!({ "reason": "spam" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);

        // First report goes through
        let response = harness
            .client
            .post(format!("/issues/{}/report", issue.id))
            .header(ContentType::JSON)
            .header(Header::new("x-session-token", reporter_token.clone()))
            .body(json!({ "reason": "spam", "details": "bot spam" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);

        let report: Report = response.into_json().await.expect("`Report`");
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.details, "bot spam");

        // Second report by the same user conflicts
        let response = harness
            .client
            .post(format!("/issues/{}/report", issue.id))
            .header(ContentType::JSON)
            .header(Header::new("x-session-token", reporter_token.clone()))
            .body(json!({ "reason": "duplicate" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Conflict);

        // Owners cannot report their own issue
        let response = harness
            .client
            .post(format!("/issues/{}/report", issue.id))
            .header(ContentType::JSON)
            .header(Header::new("x-session-token", owner_token))
            .body(json!({ "reason": "spam" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        // Unknown reasons are rejected
        let response = harness
            .client
            .post(format!("/issues/{}/report", issue.id))
            .header(ContentType::JSON)
            .header(Header::new("x-session-token", reporter_token))
            .body(json!({ "reason": "dislike" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
    }
}
