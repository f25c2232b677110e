use bson::{to_document, Document};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument, UpdateOptions};

use civica_result::Result;

use crate::MongoDb;
use crate::{ReportReason, ReportStats, ReviewDecision, STATS_DOCUMENT_ID};

use super::AbstractReportStats;

static COL: &str = "report_stats";

#[async_trait]
impl AbstractReportStats for MongoDb {
    /// Fold one resolution into the lifetime counters
    async fn increment_report_stats(
        &self,
        decision: ReviewDecision,
        reason: ReportReason,
        issue_deleted: bool,
    ) -> Result<()> {
        let mut inc: Document = doc! {
            "total_resolved": 1_i64
        };

        inc.insert(decision.as_str(), 1_i64);
        inc.insert(format!("reason_stats.{}", reason.as_str()), 1_i64);

        if issue_deleted {
            inc.insert("issues_deleted", 1_i64);
        }

        self.col::<ReportStats>(COL)
            .update_one(
                doc! {
                    "_id": STATS_DOCUMENT_ID
                },
                doc! {
                    "$inc": inc
                },
            )
            .with_options(UpdateOptions::builder().upsert(true).build())
            .await
            .map(|_| ())
            .map_err(|_| create_database_error!("update_one", COL))
    }

    /// Fetch the lifetime counters, creating the zeroed document if absent
    async fn fetch_report_stats(&self) -> Result<ReportStats> {
        self.col::<ReportStats>(COL)
            .find_one_and_update(
                doc! {
                    "_id": STATS_DOCUMENT_ID
                },
                doc! {
                    "$setOnInsert": to_document(&ReportStats::default())
                        .map_err(|_| create_error!(InternalError))?
                },
            )
            .with_options(
                FindOneAndUpdateOptions::builder()
                    .upsert(true)
                    .return_document(ReturnDocument::After)
                    .build(),
            )
            .await
            .map_err(|_| create_database_error!("find_one_and_update", COL))?
            .ok_or_else(|| create_error!(InternalError))
    }
}
