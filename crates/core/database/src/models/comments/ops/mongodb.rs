use civica_result::Result;

use crate::Comment;
use crate::MongoDb;

use super::AbstractComments;

static COL: &str = "comments";

#[async_trait]
impl AbstractComments for MongoDb {
    /// Insert a new comment into the database
    async fn insert_comment(&self, comment: &Comment) -> Result<()> {
        query!(self, insert_one, COL, &comment).map(|_| ())
    }

    /// Delete all comments on an issue
    async fn delete_comments_by_issue(&self, issue_id: &str) -> Result<()> {
        query!(
            self,
            delete_many,
            COL,
            doc! {
                "issue_id": issue_id
            }
        )
        .map(|_| ())
    }
}
