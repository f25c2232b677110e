use rocket::State;

use civica_database::{Database, User};
use civica_result::Result;

/// # Delete Notification
///
/// Delete one of the caller's notifications.
#[openapi(tag = "Notifications")]
#[delete("/<notification_id>")]
pub async fn delete_notification(
    db: &State<Database>,
    user: User,
    notification_id: String,
) -> Result<()> {
    db.delete_notification(&notification_id, &user.id).await
}
