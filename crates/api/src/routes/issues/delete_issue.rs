use rocket::serde::json::Json;
use rocket::State;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use civica_database::{Database, RemovedBy, User};
use civica_result::{create_error, Result};

/// # Deletion Result
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct DeleteIssueResponse {
    /// Whether the issue and its dependent records were removed
    pub deleted: bool,
}

/// # Delete Issue
///
/// Remove an issue along with its comments, upvotes and reports. Only the
/// issue owner or an administrator may do this; everyone who reported the
/// issue is notified first.
#[openapi(tag = "Issues")]
#[delete("/<issue_id>")]
pub async fn delete_issue(
    db: &State<Database>,
    user: User,
    issue_id: String,
) -> Result<Json<DeleteIssueResponse>> {
    let issue = db.fetch_issue(&issue_id).await?;

    let is_owner = issue.created_by == user.id;
    if !is_owner && !user.is_privileged() {
        return Err(create_error!(NotOwner));
    }

    issue
        .delete(
            db,
            if is_owner {
                RemovedBy::Owner
            } else {
                RemovedBy::Moderator
            },
        )
        .await?;

    Ok(Json(DeleteIssueResponse { deleted: true }))
}

#[cfg(test)]
mod test {
    use crate::util::test::TestHarness;
    use civica_database::{Issue, IssueCategory, NotificationKind, Report, ReportReason, UserRole};
    use rocket::http::{Header, Status};

    #[rocket::async_test]
    async fn only_the_owner_or_an_admin_may_delete() {
        let harness = TestHarness::new().await;
        let (owner, owner_token) = harness.new_user(UserRole::User).await;
        let (reporter, _) = harness.new_user(UserRole::User).await;
        let (_, stranger_token) = harness.new_user(UserRole::User).await;

        let issue = Issue::new(
            "Wrong bin collected".to_string(),
            "Recycling went to landfill".to_string(),
            IssueCategory::Garbage,
            "20 Elm Close".to_string(),
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
            .delete(format!("/issues/{}", issue.id))
            .header(Header::new("x-session-token", stranger_token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Forbidden);

        let response = harness
            .client
            .delete(format!("/issues/{}", issue.id))
            .header(Header::new("x-session-token", owner_token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        assert!(harness.db().fetch_issue(&issue.id).await.is_err());

        // Reporters are told who removed it
        let inbox = harness
            .db()
            .fetch_notifications(&reporter.id, false, 0, 10)
            .await
            .unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::IssueDeleted);
        assert!(inbox[0].message.contains("its owner"));
    }
}
