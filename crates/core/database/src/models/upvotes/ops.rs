use civica_result::Result;

use crate::Upvote;

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractUpvotes: Sync + Send {
    /// Insert a new upvote into the database
    async fn insert_upvote(&self, upvote: &Upvote) -> Result<()>;

    /// Delete all upvotes on an issue
    async fn delete_upvotes_by_issue(&self, issue_id: &str) -> Result<()>;
}
