auto_derived!(
    /// One citizen's upvote on an issue
    pub struct Upvote {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Issue being upvoted
        pub issue_id: String,
        /// Id of the upvoting user
        pub user_id: String,
    }
);

impl Upvote {
    pub fn new(issue_id: String, user_id: String) -> Upvote {
        Upvote {
            id: ulid::Ulid::new().to_string(),
            issue_id,
            user_id,
        }
    }
}
