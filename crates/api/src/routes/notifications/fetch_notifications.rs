use rocket::serde::json::Json;
use rocket::State;
use schemars::JsonSchema;
use serde::Deserialize;

use civica_database::{Database, Notification, User};
use civica_result::Result;

use crate::util::pagination::Page;

/// # Query Parameters
#[derive(Deserialize, JsonSchema, FromForm)]
pub struct OptionsFetchNotifications {
    /// Page to fetch, starting at 1
    page: Option<u64>,
    /// Items per page
    limit: Option<i64>,
    /// Only include unread notifications
    unread_only: Option<bool>,
}

/// # Fetch Notifications
///
/// Fetch the caller's notifications, newest first.
#[openapi(tag = "Notifications")]
#[get("/?<options..>")]
pub async fn fetch_notifications(
    db: &State<Database>,
    user: User,
    options: OptionsFetchNotifications,
) -> Result<Json<Page<Notification>>> {
    let page = options.page.unwrap_or(1).max(1);
    let limit = options.limit.unwrap_or(20).max(1);
    let skip = (page - 1) * limit as u64;
    let unread_only = options.unread_only.unwrap_or(false);

    let notifications = db
        .fetch_notifications(&user.id, unread_only, skip, limit)
        .await?;
    let total = db.count_notifications(&user.id, unread_only).await?;

    Ok(Json(Page::new(notifications, total, page, limit)))
}

#[cfg(test)]
mod test {
    use crate::util::pagination::Page;
    use crate::util::test::TestHarness;
    use civica_database::{Notification, NotificationData, NotificationKind, UserRole};
    use rocket::http::{Header, Status};

    #[rocket::async_test]
    async fn inbox_flow() {
        let harness = TestHarness::new().await;
        let (user, token) = harness.new_user(UserRole::User).await;

        for n in 0..2 {
            Notification::dispatch(
                harness.db(),
                user.id.clone(),
                NotificationKind::ReportReviewed,
                format!("Report Reviewed {n}"),
                "Your report has been reviewed.".to_string(),
                NotificationData::default(),
            )
            .await
            .unwrap();
        }

        let response = harness
            .client
            .get("/notifications")
            .header(Header::new("x-session-token", token.clone()))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body: Page<Notification> = response.into_json().await.expect("`Page`");
        assert_eq!(body.total, 2);
        assert!(body.data.iter().all(|notification| !notification.read));

        // Mark one read; the unread count and filter follow
        let first = body.data[0].id.clone();
        let response = harness
            .client
            .put(format!("/notifications/{first}/read"))
            .header(Header::new("x-session-token", token.clone()))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let response = harness
            .client
            .get("/notifications?unread_only=true")
            .header(Header::new("x-session-token", token.clone()))
            .dispatch()
            .await;
        let body: Page<Notification> = response.into_json().await.expect("`Page`");
        assert_eq!(body.total, 1);

        // Clear everything
        let response = harness
            .client
            .delete("/notifications")
            .header(Header::new("x-session-token", token.clone()))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let response = harness
            .client
            .get("/notifications")
            .header(Header::new("x-session-token", token))
            .dispatch()
            .await;
        let body: Page<Notification> = response.into_json().await.expect("`Page`");
        assert_eq!(body.total, 0);
    }
}
