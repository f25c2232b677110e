use civica_result::Result;

use crate::Issue;
use crate::ReferenceDb;

use super::AbstractIssues;

#[async_trait]
impl AbstractIssues for ReferenceDb {
    /// Insert a new issue into the database
    async fn insert_issue(&self, issue: &Issue) -> Result<()> {
        let mut issues = self.issues.lock().await;
        if issues.contains_key(&issue.id) {
            Err(create_database_error!("insert_one", "issues"))
        } else {
            issues.insert(issue.id.to_string(), issue.clone());
            Ok(())
        }
    }

    /// Fetch an issue from the database
    async fn fetch_issue(&self, id: &str) -> Result<Issue> {
        let issues = self.issues.lock().await;
        issues
            .get(id)
            .cloned()
            .ok_or_else(|| create_error!(UnknownIssue))
    }

    /// Fetch multiple issues by their ids
    async fn fetch_issues<'a>(&self, ids: &'a [String]) -> Result<Vec<Issue>> {
        let issues = self.issues.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| issues.get(id).cloned())
            .collect())
    }

    /// Delete an issue record
    async fn delete_issue(&self, id: &str) -> Result<()> {
        let mut issues = self.issues.lock().await;
        if issues.remove(id).is_some() {
            Ok(())
        } else {
            Err(create_error!(UnknownIssue))
        }
    }
}
