use rocket::serde::json::Json;
use rocket::State;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use civica_database::{Database, Report, User};
use civica_result::Result;

/// # Report Status
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct ReportStatusResponse {
    /// Whether the caller has reported this issue
    pub has_reported: bool,
    /// The caller's report, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
}

/// # Fetch Report Status
///
/// Check whether the caller has already reported an issue; drives the
/// "already reported" state in clients.
#[openapi(tag = "Reports")]
#[get("/<issue_id>/report/status")]
pub async fn report_status(
    db: &State<Database>,
    user: User,
    issue_id: String,
) -> Result<Json<ReportStatusResponse>> {
    let report = db
        .fetch_report_by_issue_reporter(&issue_id, &user.id)
        .await?;

    Ok(Json(ReportStatusResponse {
        has_reported: report.is_some(),
        report,
    }))
}
