use rocket::serde::json::Json;
use rocket::State;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use civica_database::{Database, User};
use civica_result::Result;

/// # Unread Count
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct UnreadCountResponse {
    /// Unread notifications for the caller
    pub count: u64,
}

/// # Fetch Unread Count
///
/// Count the caller's unread notifications; polled by clients for the
/// badge.
#[openapi(tag = "Notifications")]
#[get("/unread-count")]
pub async fn unread_count(db: &State<Database>, user: User) -> Result<Json<UnreadCountResponse>> {
    let count = db.count_unread_notifications(&user.id).await?;

    Ok(Json(UnreadCountResponse { count }))
}
