use civica_result::Result;

use crate::Issue;

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractIssues: Sync + Send {
    /// Insert a new issue into the database
    async fn insert_issue(&self, issue: &Issue) -> Result<()>;

    /// Fetch an issue from the database
    async fn fetch_issue(&self, id: &str) -> Result<Issue>;

    /// Fetch multiple issues by their ids
    async fn fetch_issues<'a>(&self, ids: &'a [String]) -> Result<Vec<Issue>>;

    /// Delete an issue record
    ///
    /// Dependent records are untouched; use [`Issue::delete`] for the full
    /// cascade.
    async fn delete_issue(&self, id: &str) -> Result<()>;
}
