use civica_result::Result;

use crate::{ReportReason, ReportStats, ReviewDecision};

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractReportStats: Sync + Send {
    /// Fold one resolution into the lifetime counters
    ///
    /// Must be a single atomic increment; concurrent administrators resolve
    /// reports at the same time.
    async fn increment_report_stats(
        &self,
        decision: ReviewDecision,
        reason: ReportReason,
        issue_deleted: bool,
    ) -> Result<()>;

    /// Fetch the lifetime counters, creating the zeroed document if absent
    async fn fetch_report_stats(&self) -> Result<ReportStats>;
}
