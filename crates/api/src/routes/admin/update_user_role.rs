use rocket::serde::json::Json;
use rocket::State;
use schemars::JsonSchema;
use serde::Deserialize;

use civica_database::{Admin, Database, User, UserRole};
use civica_result::{create_error, Result};

/// # Role Data
#[derive(Deserialize, JsonSchema)]
pub struct DataUpdateRole {
    /// New role: `user` or `admin`
    role: String,
}

/// # Update User Role
///
/// Grant or revoke a user's administrator role.
#[openapi(tag = "Moderation")]
#[put("/users/<user_id>/role", data = "<data>")]
pub async fn update_user_role(
    db: &State<Database>,
    _admin: Admin,
    user_id: String,
    data: Json<DataUpdateRole>,
) -> Result<Json<User>> {
    let role = match data.role.as_str() {
        "user" => UserRole::User,
        "admin" => UserRole::Admin,
        _ => return Err(create_error!(InvalidRole)),
    };

    let user = db.update_user_role(&user_id, role).await?;

    Ok(Json(user))
}

#[cfg(test)]
mod test {
    use crate::util::test::TestHarness;
    use civica_database::{User, UserRole};
    use rocket::http::{ContentType, Header, Status};

    #[rocket::async_test]
    async fn promotes_and_rejects_unknown_roles() {
        let harness = TestHarness::new().await;
        let (_, admin_token) = harness.new_user(UserRole::Admin).await;
        let (user, _) = harness.new_user(UserRole::User).await;

        let response = harness
            .client
            .put(format!("/admin/users/{}/role", user.id))
            .header(ContentType::JSON)
            .header(Header::new("x-session-token", admin_token.clone()))
            .body(json!({ "role": "admin" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let updated: User = response.into_json().await.expect("`User`");
        assert!(updated.is_privileged());

        let response = harness
            .client
            .put(format!("/admin/users/{}/role", user.id))
            .header(ContentType::JSON)
            .header(Header::new("x-session-token", admin_token))
            .body(json!({ "role": "owner" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
    }
}
