mod comments;
mod issue_reports;
mod issues;
mod migrations;
mod notifications;
mod report_stats;
mod sessions;
mod upvotes;
mod users;

pub use comments::*;
pub use issue_reports::*;
pub use issues::*;
pub use migrations::*;
pub use notifications::*;
pub use report_stats::*;
pub use sessions::*;
pub use upvotes::*;
pub use users::*;

use crate::{Database, ReferenceDb};

#[cfg(feature = "mongodb")]
use crate::MongoDb;

pub trait AbstractDatabase:
    Sync
    + Send
    + comments::AbstractComments
    + issue_reports::AbstractReports
    + issues::AbstractIssues
    + migrations::AbstractMigrations
    + notifications::AbstractNotifications
    + report_stats::AbstractReportStats
    + sessions::AbstractSessions
    + upvotes::AbstractUpvotes
    + users::AbstractUsers
{
}

impl AbstractDatabase for ReferenceDb {}

#[cfg(feature = "mongodb")]
impl AbstractDatabase for MongoDb {}

impl std::ops::Deref for Database {
    type Target = dyn AbstractDatabase;

    fn deref(&self) -> &Self::Target {
        match &self {
            Database::Reference(dummy) => dummy,
            #[cfg(feature = "mongodb")]
            Database::MongoDb(mongo) => mongo,
        }
    }
}
