use civica_result::Result;

use crate::Comment;

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractComments: Sync + Send {
    /// Insert a new comment into the database
    async fn insert_comment(&self, comment: &Comment) -> Result<()>;

    /// Delete all comments on an issue
    async fn delete_comments_by_issue(&self, issue_id: &str) -> Result<()>;
}
