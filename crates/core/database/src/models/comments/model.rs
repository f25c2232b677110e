use iso8601_timestamp::Timestamp;

auto_derived!(
    /// Citizen comment on an issue
    pub struct Comment {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Issue this comment is on
        pub issue_id: String,
        /// Id of the comment author
        pub author_id: String,
        /// Comment body
        pub content: String,
        /// When this comment was posted
        pub created_at: Timestamp,
    }
);

impl Comment {
    pub fn new(issue_id: String, author_id: String, content: String) -> Comment {
        Comment {
            id: ulid::Ulid::new().to_string(),
            issue_id,
            author_id,
            content,
            created_at: Timestamp::now_utc(),
        }
    }
}
