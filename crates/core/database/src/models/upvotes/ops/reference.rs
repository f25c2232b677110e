use civica_result::Result;

use crate::ReferenceDb;
use crate::Upvote;

use super::AbstractUpvotes;

#[async_trait]
impl AbstractUpvotes for ReferenceDb {
    /// Insert a new upvote into the database
    async fn insert_upvote(&self, upvote: &Upvote) -> Result<()> {
        let mut upvotes = self.upvotes.lock().await;
        if upvotes.contains_key(&upvote.id) {
            Err(create_database_error!("insert_one", "upvotes"))
        } else {
            upvotes.insert(upvote.id.to_string(), upvote.clone());
            Ok(())
        }
    }

    /// Delete all upvotes on an issue
    async fn delete_upvotes_by_issue(&self, issue_id: &str) -> Result<()> {
        let mut upvotes = self.upvotes.lock().await;
        upvotes.retain(|_, upvote| upvote.issue_id != issue_id);
        Ok(())
    }
}
