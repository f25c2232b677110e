use civica_result::Result;

use crate::MongoDb;
use crate::Upvote;

use super::AbstractUpvotes;

static COL: &str = "upvotes";

#[async_trait]
impl AbstractUpvotes for MongoDb {
    /// Insert a new upvote into the database
    async fn insert_upvote(&self, upvote: &Upvote) -> Result<()> {
        query!(self, insert_one, COL, &upvote).map(|_| ())
    }

    /// Delete all upvotes on an issue
    async fn delete_upvotes_by_issue(&self, issue_id: &str) -> Result<()> {
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
