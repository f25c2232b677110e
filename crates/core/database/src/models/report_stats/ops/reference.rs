use civica_result::Result;

use crate::ReferenceDb;
use crate::{ReportReason, ReportStats, ReviewDecision, STATS_DOCUMENT_ID};

use super::AbstractReportStats;

#[async_trait]
impl AbstractReportStats for ReferenceDb {
    /// Fold one resolution into the lifetime counters
    async fn increment_report_stats(
        &self,
        decision: ReviewDecision,
        reason: ReportReason,
        issue_deleted: bool,
    ) -> Result<()> {
        let mut report_stats = self.report_stats.lock().await;
        report_stats
            .entry(STATS_DOCUMENT_ID.to_string())
            .or_default()
            .record(decision, reason, issue_deleted);

        Ok(())
    }

    /// Fetch the lifetime counters, creating the zeroed document if absent
    async fn fetch_report_stats(&self) -> Result<ReportStats> {
        let mut report_stats = self.report_stats.lock().await;
        Ok(report_stats
            .entry(STATS_DOCUMENT_ID.to_string())
            .or_default()
            .clone())
    }
}
