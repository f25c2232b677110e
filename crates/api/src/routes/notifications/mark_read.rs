use rocket::serde::json::Json;
use rocket::State;

use civica_database::{Database, Notification, User};
use civica_result::Result;

/// # Mark Notification Read
///
/// Mark one of the caller's notifications as read.
#[openapi(tag = "Notifications")]
#[put("/<notification_id>/read")]
pub async fn mark_read(
    db: &State<Database>,
    user: User,
    notification_id: String,
) -> Result<Json<Notification>> {
    let mut notification = db.fetch_notification(&notification_id, &user.id).await?;
    db.mark_notification_read(&notification_id, &user.id)
        .await?;
    notification.read = true;

    Ok(Json(notification))
}
