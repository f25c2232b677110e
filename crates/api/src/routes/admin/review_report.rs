use std::str::FromStr;

use rocket::serde::json::Json;
use rocket::State;
use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

use civica_database::{Admin, Database, ReviewDecision, ReviewOutcome};
use civica_result::{create_error, Result};

/// # Review Data
#[derive(Validate, Deserialize, JsonSchema)]
pub struct DataReviewReport {
    /// Decision to apply: `reviewed`, `dismissed` or `action_taken`
    status: String,
    /// Note shared with the reporter and, on deletion, the issue owner
    #[validate(length(max = 500))]
    review_note: Option<String>,
    /// With `action_taken`, also delete the reported issue and everything
    /// hanging off it
    delete_issue: Option<bool>,
}

/// # Review Report
///
/// Apply a moderation decision to a report. The reporter is notified, the
/// lifetime counters are updated and the resolved ticket is removed;
/// `action_taken` with `delete_issue` supersedes every report on the
/// issue and deletes the issue itself.
#[openapi(tag = "Moderation")]
#[put("/reports/<report_id>/review", data = "<data>")]
pub async fn review_report(
    db: &State<Database>,
    admin: Admin,
    report_id: String,
    data: Json<DataReviewReport>,
) -> Result<Json<ReviewOutcome>> {
    let data = data.into_inner();
    data.validate()
        .map_err(|error| create_error!(FailedValidation { error: error.to_string() }))?;

    let decision = ReviewDecision::from_str(&data.status)?;

    let report = db.fetch_report(&report_id).await?;
    let outcome = report
        .resolve(
            db,
            &admin.0,
            decision,
            data.review_note,
            data.delete_issue.unwrap_or(false),
        )
        .await?;

    Ok(Json(outcome))
}

#[cfg(test)]
mod test {
    use crate::util::test::TestHarness;
    use civica_database::{
        Issue, IssueCategory, NotificationKind, Report, ReportReason, ReviewOutcome, UserRole,
    };
    use rocket::http::{ContentType, Header, Status};

    #[rocket::async_test]
    async fn review_resolves_and_notifies() {
        let harness = TestHarness::new().await;
        let (owner, _) = harness.new_user(UserRole::User).await;
        let (reporter, _) = harness.new_user(UserRole::User).await;
        let (other, _) = harness.new_user(UserRole::User).await;
        let (_, admin_token) = harness.new_user(UserRole::Admin).await;

        let issue = Issue::new(
            "Dumped furniture".to_string(),
            "Sofa on the sidewalk".to_string(),
            IssueCategory::Garbage,
            "9 Oak Ave".to_string(),
            owner.id.clone(),
        );
        harness.db().insert_issue(&issue).await.unwrap();

        let report = Report::create(
            harness.db(),
            &issue,
            reporter.id.clone(),
            ReportReason::Spam,
            String::new(),
        )
        .await
        .unwrap();
        Report::create(
            harness.db(),
            &issue,
            other.id.clone(),
            ReportReason::Duplicate,
            String::new(),
        )
        .await
        .unwrap();

        let response = harness
            .client
            .put(format!("/admin/reports/{}/review", report.id))
            .header(ContentType::JSON)
            .header(Header::new("x-session-token", admin_token.clone()))
            .body(json!({ "status": "reviewed", "review_note": "checked" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let outcome: ReviewOutcome = response.into_json().await.expect("`ReviewOutcome`");
        assert!(!outcome.issue_deleted);

        // The resolved ticket is gone, counters took the resolution
        assert!(harness.db().fetch_report(&report.id).await.is_err());
        let stats = harness.db().fetch_report_stats().await.unwrap();
        assert_eq!(stats.reviewed, 1);
        assert_eq!(stats.total_resolved, 1);

        // Reporter notified, owner warned about the report volume
        let inbox = harness
            .db()
            .fetch_notifications(&reporter.id, false, 0, 10)
            .await
            .unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::ReportReviewed);
        assert!(inbox[0].message.contains("checked"));

        let owner_inbox = harness
            .db()
            .fetch_notifications(&owner.id, false, 0, 10)
            .await
            .unwrap();
        assert_eq!(owner_inbox.len(), 1);
        assert_eq!(owner_inbox[0].kind, NotificationKind::IssueWarning);

        // Unknown decisions are rejected
        let response = harness
            .client
            .put(format!("/admin/reports/{}/review", report.id))
            .header(ContentType::JSON)
            .header(Header::new("x-session-token", admin_token))
            .body(json!({ "status": "escalated" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[rocket::async_test]
    async fn review_requires_the_admin_role() {
        let harness = TestHarness::new().await;
        let (_, token) = harness.new_user(UserRole::User).await;

        let response = harness
            .client
            .put("/admin/reports/some-report/review")
            .header(ContentType::JSON)
            .header(Header::new("x-session-token", token))
            .body(json!({ "status": "reviewed" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Forbidden);
    }

    #[rocket::async_test]
    async fn action_taken_deletes_the_issue() {
        let harness = TestHarness::new().await;
        let (owner, _) = harness.new_user(UserRole::User).await;
        let (reporter, _) = harness.new_user(UserRole::User).await;
        let (_, admin_token) = harness.new_user(UserRole::Admin).await;

        let issue = Issue::new(
            "Not a real issue".to_string(),
            "Advertising".to_string(),
            IssueCategory::Other,
            "1 Spam Way".to_string(),
            owner.id.clone(),
        );
        harness.db().insert_issue(&issue).await.unwrap();

        let report = Report::create(
            harness.db(),
            &issue,
            reporter.id.clone(),
            ReportReason::Inappropriate,
            String::new(),
        )
        .await
        .unwrap();

        let response = harness
            .client
            .put(format!("/admin/reports/{}/review", report.id))
            .header(ContentType::JSON)
            .header(Header::new("x-session-token", admin_token))
            .body(json!({ "status": "action_taken", "delete_issue": true }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let outcome: ReviewOutcome = response.into_json().await.expect("`ReviewOutcome`");
        assert!(outcome.issue_deleted);

        assert!(harness.db().fetch_issue(&issue.id).await.is_err());
        assert_eq!(
            harness.db().count_reports_by_issue(&issue.id).await.unwrap(),
            0
        );

        let stats = harness.db().fetch_report_stats().await.unwrap();
        assert_eq!(stats.action_taken, 1);
        assert_eq!(stats.issues_deleted, 1);

        let owner_inbox = harness
            .db()
            .fetch_notifications(&owner.id, false, 0, 10)
            .await
            .unwrap();
        assert_eq!(owner_inbox.len(), 1);
        assert_eq!(owner_inbox[0].kind, NotificationKind::IssueDeleted);
    }
}
