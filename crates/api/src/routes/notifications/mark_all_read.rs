use rocket::State;

use civica_database::{Database, User};
use civica_result::Result;

/// # Mark All Read
///
/// Mark every one of the caller's notifications as read.
#[openapi(tag = "Notifications")]
#[put("/read-all")]
pub async fn mark_all_read(db: &State<Database>, user: User) -> Result<()> {
    db.mark_all_notifications_read(&user.id).await
}
