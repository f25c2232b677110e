use crate::{ReportReason, ReviewDecision};

/// Fixed id of the one stats document per deployment
pub static STATS_DOCUMENT_ID: &str = "global_stats";

auto_derived!(
    /// Lifetime resolution counters per report reason
    #[derive(Default, Eq)]
    pub struct ReasonStats {
        #[serde(default)]
        pub spam: u64,
        #[serde(default)]
        pub inaccurate: u64,
        #[serde(default)]
        pub duplicate: u64,
        #[serde(default)]
        pub inappropriate: u64,
        #[serde(default)]
        pub already_resolved: u64,
        #[serde(default)]
        pub other: u64,
    }

    /// Lifetime moderation counters
    ///
    /// Reports are deleted once resolved; these counters are the durable
    /// record of what moderation has done.
    #[derive(Eq)]
    pub struct ReportStats {
        /// Fixed Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Reports ever resolved
        #[serde(default)]
        pub total_resolved: u64,
        /// Resolutions that dismissed the report
        #[serde(default)]
        pub dismissed: u64,
        /// Resolutions that reviewed the report
        #[serde(default)]
        pub reviewed: u64,
        /// Resolutions where action was taken
        #[serde(default)]
        pub action_taken: u64,
        /// Resolutions broken down by report reason
        #[serde(default)]
        pub reason_stats: ReasonStats,
        /// Issues deleted as a moderation outcome
        #[serde(default)]
        pub issues_deleted: u64,
    }
);

impl Default for ReportStats {
    fn default() -> Self {
        ReportStats {
            id: STATS_DOCUMENT_ID.to_string(),
            total_resolved: 0,
            dismissed: 0,
            reviewed: 0,
            action_taken: 0,
            reason_stats: ReasonStats::default(),
            issues_deleted: 0,
        }
    }
}

impl ReasonStats {
    /// Bump the counter for one reason
    pub fn increment(&mut self, reason: ReportReason) {
        match reason {
            ReportReason::Spam => self.spam += 1,
            ReportReason::Inaccurate => self.inaccurate += 1,
            ReportReason::Duplicate => self.duplicate += 1,
            ReportReason::Inappropriate => self.inappropriate += 1,
            ReportReason::AlreadyResolved => self.already_resolved += 1,
            ReportReason::Other => self.other += 1,
        }
    }
}

impl ReportStats {
    /// Fold one resolution into the counters
    pub fn record(&mut self, decision: ReviewDecision, reason: ReportReason, issue_deleted: bool) {
        self.total_resolved += 1;

        match decision {
            ReviewDecision::Dismissed => self.dismissed += 1,
            ReviewDecision::Reviewed => self.reviewed += 1,
            ReviewDecision::ActionTaken => self.action_taken += 1,
        }

        self.reason_stats.increment(reason);

        if issue_deleted {
            self.issues_deleted += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{ReportReason, ReportStats, ReviewDecision, STATS_DOCUMENT_ID};

    #[async_std::test]
    async fn counters_accumulate() {
        database_test!(|db| async move {
            // Lazily created with zeroed counters
            let stats = db.fetch_report_stats().await.unwrap();
            assert_eq!(stats, ReportStats::default());
            assert_eq!(stats.id, STATS_DOCUMENT_ID);

            // Reading again must not change anything
            assert_eq!(db.fetch_report_stats().await.unwrap(), stats);

            db.increment_report_stats(ReviewDecision::Reviewed, ReportReason::Spam, false)
                .await
                .unwrap();
            db.increment_report_stats(ReviewDecision::Dismissed, ReportReason::Other, false)
                .await
                .unwrap();
            db.increment_report_stats(ReviewDecision::ActionTaken, ReportReason::Spam, true)
                .await
                .unwrap();

            let stats = db.fetch_report_stats().await.unwrap();
            assert_eq!(stats.total_resolved, 3);
            assert_eq!(stats.reviewed, 1);
            assert_eq!(stats.dismissed, 1);
            assert_eq!(stats.action_taken, 1);
            assert_eq!(stats.issues_deleted, 1);
            assert_eq!(stats.reason_stats.spam, 2);
            assert_eq!(stats.reason_stats.other, 1);
            assert_eq!(
                stats.total_resolved,
                stats.dismissed + stats.reviewed + stats.action_taken
            );
        });
    }
}
