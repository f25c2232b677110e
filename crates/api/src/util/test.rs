use std::ops::Deref;

use rocket::local::asynchronous::Client;

use civica_database::{Database, Session, User, UserRole};
use iso8601_timestamp::Timestamp;

pub struct TestHarness {
    pub client: Client,
}

impl TestHarness {
    pub async fn new() -> TestHarness {
        dotenv::dotenv().ok();

        // Route tests always run against an isolated reference database
        if std::env::var("TEST_DB").is_err() {
            std::env::set_var("TEST_DB", "REFERENCE");
        }

        let client = Client::tracked(crate::web().await)
            .await
            .expect("valid rocket instance");

        TestHarness { client }
    }

    pub fn db(&self) -> &Database {
        self.client
            .rocket()
            .state::<Database>()
            .expect("`Database`")
    }

    /// Create a user with the given role and a session token for them
    pub async fn new_user(&self, role: UserRole) -> (User, String) {
        let id = ulid::Ulid::new().to_string();
        let user = User {
            id: id.clone(),
            name: format!("user-{id}"),
            email: format!("{id}@example.com"),
            avatar: String::new(),
            role,
            created_at: Timestamp::now_utc(),
        };
        self.db().insert_user(&user).await.expect("insert user");

        let token = ulid::Ulid::new().to_string();
        self.db()
            .insert_session(&Session {
                id: ulid::Ulid::new().to_string(),
                token: token.clone(),
                user_id: user.id.clone(),
            })
            .await
            .expect("insert session");

        (user, token)
    }
}

impl Deref for TestHarness {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}
