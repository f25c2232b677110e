use rocket::serde::json::Json;
use rocket::State;
use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

use civica_database::{Admin, Database, Report};
use civica_result::{create_error, Result};

/// # Dismissal Data
#[derive(Validate, Deserialize, JsonSchema)]
pub struct DataDismissReport {
    /// Note recorded on the dismissed report
    #[validate(length(max = 500))]
    note: Option<String>,
}

/// # Dismiss Report
///
/// Quick-dismiss a report. The record is kept with its review stamp for
/// audit purposes; nobody is notified and the lifetime counters are
/// untouched.
#[openapi(tag = "Moderation")]
#[delete("/reports/<report_id>", data = "<data>")]
pub async fn dismiss_report(
    db: &State<Database>,
    admin: Admin,
    report_id: String,
    data: Option<Json<DataDismissReport>>,
) -> Result<Json<Report>> {
    let note = match data {
        Some(data) => {
            let data = data.into_inner();
            data.validate().map_err(|error| {
                create_error!(FailedValidation {
                    error: error.to_string()
                })
            })?;
            data.note
        }
        None => None,
    };

    let mut report = db.fetch_report(&report_id).await?;
    report.dismiss(db, &admin.0, note).await?;

    Ok(Json(report))
}

#[cfg(test)]
mod test {
    use crate::util::test::TestHarness;
    use civica_database::{Issue, IssueCategory, Report, ReportReason, ReportStatus, UserRole};
    use rocket::http::{Header, Status};

    #[rocket::async_test]
    async fn quick_dismiss_keeps_the_record() {
        let harness = TestHarness::new().await;
        let (owner, _) = harness.new_user(UserRole::User).await;
        let (reporter, _) = harness.new_user(UserRole::User).await;
        let (_, admin_token) = harness.new_user(UserRole::Admin).await;

        let issue = Issue::new(
            "Minor scuff".to_string(),
            "Paint chipped on a bench".to_string(),
            IssueCategory::Other,
            "Park Lane".to_string(),
            owner.id.clone(),
        );
        harness.db().insert_issue(&issue).await.unwrap();

        let report = Report::create(
            harness.db(),
            &issue,
            reporter.id.clone(),
            ReportReason::Other,
            String::new(),
        )
        .await
        .unwrap();

        let response = harness
            .client
            .delete(format!("/admin/reports/{}", report.id))
            .header(Header::new("x-session-token", admin_token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let dismissed: Report = response.into_json().await.expect("`Report`");
        assert_eq!(dismissed.status, ReportStatus::Dismissed);
        assert_eq!(
            dismissed.review_note.as_deref(),
            Some("Dismissed by moderator")
        );

        // Still on record, counters untouched, nobody notified
        let stored = harness.db().fetch_report(&report.id).await.unwrap();
        assert_eq!(stored.status, ReportStatus::Dismissed);

        let stats = harness.db().fetch_report_stats().await.unwrap();
        assert_eq!(stats.total_resolved, 0);

        assert!(harness
            .db()
            .fetch_notifications(&reporter.id, false, 0, 10)
            .await
            .unwrap()
            .is_empty());
    }
}
