use civica_result::Result;

use crate::Comment;
use crate::ReferenceDb;

use super::AbstractComments;

#[async_trait]
impl AbstractComments for ReferenceDb {
    /// Insert a new comment into the database
    async fn insert_comment(&self, comment: &Comment) -> Result<()> {
        let mut comments = self.comments.lock().await;
        if comments.contains_key(&comment.id) {
            Err(create_database_error!("insert_one", "comments"))
        } else {
            comments.insert(comment.id.to_string(), comment.clone());
            Ok(())
        }
    }

    /// Delete all comments on an issue
    async fn delete_comments_by_issue(&self, issue_id: &str) -> Result<()> {
        let mut comments = self.comments.lock().await;
        comments.retain(|_, comment| comment.issue_id != issue_id);
        Ok(())
    }
}
