use iso8601_timestamp::Timestamp;

auto_derived!(
    /// Access level granted to a user
    #[derive(Copy, Default, Eq, Hash)]
    #[serde(rename_all = "snake_case")]
    pub enum UserRole {
        #[default]
        User,
        Admin,
    }

    /// Citizen or administrator account, synced from the identity provider
    pub struct User {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Display name
        pub name: String,
        /// Email address
        pub email: String,
        /// Avatar URL
        #[serde(default)]
        pub avatar: String,
        /// Access level
        #[serde(default)]
        pub role: UserRole,
        /// When this account was first seen
        pub created_at: Timestamp,
    }

    /// Projection of a user embedded into admin-facing views
    pub struct UserSnapshot {
        /// Unique Id
        #[serde(rename = "_id", default)]
        pub id: String,
        /// Display name
        #[serde(default)]
        pub name: String,
        /// Email address
        #[serde(skip_serializing_if = "Option::is_none")]
        pub email: Option<String>,
        /// Avatar URL
        #[serde(skip_serializing_if = "Option::is_none")]
        pub avatar: Option<String>,
    }
);

/// Authenticated user holding the admin role
#[derive(Debug, Clone)]
pub struct Admin(pub User);

impl User {
    /// Whether this user may access moderation surfaces
    pub fn is_privileged(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    /// Full snapshot embedded next to reports this user submitted
    pub fn snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            email: Some(self.email.clone()),
            avatar: Some(self.avatar.clone()),
        }
    }

    /// Minimal snapshot embedded next to reviews this user performed
    pub fn reviewer_snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            email: None,
            avatar: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{User, UserRole};
    use iso8601_timestamp::Timestamp;

    #[async_std::test]
    async fn role_updates_are_persisted() {
        database_test!(|db| async move {
            let user = User {
                id: "user".to_string(),
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                avatar: String::new(),
                role: UserRole::User,
                created_at: Timestamp::now_utc(),
            };

            db.insert_user(&user).await.unwrap();
            assert!(!db.fetch_user("user").await.unwrap().is_privileged());

            db.update_user_role("user", UserRole::Admin).await.unwrap();
            assert!(db.fetch_user("user").await.unwrap().is_privileged());

            assert!(db
                .update_user_role("missing", UserRole::Admin)
                .await
                .is_err());
        });
    }
}
