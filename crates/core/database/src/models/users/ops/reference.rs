use civica_result::Result;

use crate::ReferenceDb;
use crate::{User, UserRole};

use super::AbstractUsers;

#[async_trait]
impl AbstractUsers for ReferenceDb {
    /// Insert a new user into the database
    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.lock().await;
        if users.contains_key(&user.id) {
            Err(create_database_error!("insert_one", "users"))
        } else {
            users.insert(user.id.to_string(), user.clone());
            Ok(())
        }
    }

    /// Fetch a user from the database
    async fn fetch_user(&self, id: &str) -> Result<User> {
        let users = self.users.lock().await;
        users
            .get(id)
            .cloned()
            .ok_or_else(|| create_error!(UnknownUser))
    }

    /// Fetch multiple users by their ids
    async fn fetch_users<'a>(&self, ids: &'a [String]) -> Result<Vec<User>> {
        let users = self.users.lock().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    /// Update the role granted to a user
    async fn update_user_role(&self, id: &str, role: UserRole) -> Result<User> {
        let mut users = self.users.lock().await;
        if let Some(user) = users.get_mut(id) {
            user.role = role;
            Ok(user.clone())
        } else {
            Err(create_error!(UnknownUser))
        }
    }
}
