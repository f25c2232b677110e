use bson::to_bson;
use civica_result::Result;

use crate::MongoDb;
use crate::{User, UserRole};

use super::AbstractUsers;

static COL: &str = "users";

#[async_trait]
impl AbstractUsers for MongoDb {
    /// Insert a new user into the database
    async fn insert_user(&self, user: &User) -> Result<()> {
        query!(self, insert_one, COL, &user).map(|_| ())
    }

    /// Fetch a user from the database
    async fn fetch_user(&self, id: &str) -> Result<User> {
        query!(self, find_one_by_id, COL, id)?.ok_or_else(|| create_error!(UnknownUser))
    }

    /// Fetch multiple users by their ids
    async fn fetch_users<'a>(&self, ids: &'a [String]) -> Result<Vec<User>> {
        query!(
            self,
            find,
            COL,
            doc! {
                "_id": {
                    "$in": ids
                }
            }
        )
    }

    /// Update the role granted to a user
    async fn update_user_role(&self, id: &str, role: UserRole) -> Result<User> {
        self.col::<User>(COL)
            .update_one(
                doc! {
                    "_id": id
                },
                doc! {
                    "$set": {
                        "role": to_bson(&role).map_err(|_| create_error!(InternalError))?
                    }
                },
            )
            .await
            .map_err(|_| create_database_error!("update_one", COL))
            .and_then(|result| {
                if result.matched_count == 0 {
                    Err(create_error!(UnknownUser))
                } else {
                    Ok(())
                }
            })?;

        self.fetch_user(id).await
    }
}
