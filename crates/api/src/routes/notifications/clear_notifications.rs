use rocket::State;

use civica_database::{Database, User};
use civica_result::Result;

/// # Clear Notifications
///
/// Delete all of the caller's notifications.
#[openapi(tag = "Notifications")]
#[delete("/")]
pub async fn clear_notifications(db: &State<Database>, user: User) -> Result<()> {
    db.delete_notifications_by_user(&user.id).await
}
