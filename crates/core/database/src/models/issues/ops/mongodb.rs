use civica_result::Result;

use crate::Issue;
use crate::MongoDb;

use super::AbstractIssues;

static COL: &str = "issues";

#[async_trait]
impl AbstractIssues for MongoDb {
    /// Insert a new issue into the database
    async fn insert_issue(&self, issue: &Issue) -> Result<()> {
        query!(self, insert_one, COL, &issue).map(|_| ())
    }

    /// Fetch an issue from the database
    async fn fetch_issue(&self, id: &str) -> Result<Issue> {
        query!(self, find_one_by_id, COL, id)?.ok_or_else(|| create_error!(UnknownIssue))
    }

    /// Fetch multiple issues by their ids
    async fn fetch_issues<'a>(&self, ids: &'a [String]) -> Result<Vec<Issue>> {
        query!(
            self,
            find,
            COL,
            doc! {
                "_id": {
                    "$in": ids
                }
            }
        )
    }

    /// Delete an issue record
    async fn delete_issue(&self, id: &str) -> Result<()> {
        query!(self, delete_one_by_id, COL, id).map(|_| ())
    }
}
