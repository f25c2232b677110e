use std::collections::HashMap;

use civica_result::Result;

use crate::{
    GroupedReportQuery, GroupedReportsPage, PartialReport, Report, ReportAnalytics, ReportQuery,
    ReportStatus, ReportView,
};

#[cfg(feature = "mongodb")]
mod mongodb;
mod reference;

#[async_trait]
pub trait AbstractReports: Sync + Send {
    /// Insert a new report into the database
    ///
    /// Fails with `AlreadyReported` if the reporter already has a report on
    /// the issue; the unique index makes this race-safe.
    async fn insert_report(&self, report: &Report) -> Result<()>;

    /// Fetch a report from the database
    async fn fetch_report(&self, id: &str) -> Result<Report>;

    /// Fetch a reporter's report on an issue, if any
    async fn fetch_report_by_issue_reporter(
        &self,
        issue_id: &str,
        reporter_id: &str,
    ) -> Result<Option<Report>>;

    /// Fetch all reports on an issue
    async fn fetch_reports_by_issue(&self, issue_id: &str) -> Result<Vec<Report>>;

    /// Fetch a page of a reporter's reports, newest first
    async fn fetch_reports_by_reporter(
        &self,
        reporter_id: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Report>>;

    /// Count a reporter's reports
    async fn count_reports_by_reporter(&self, reporter_id: &str) -> Result<u64>;

    /// Count all reports on an issue, regardless of status
    async fn count_reports_by_issue(&self, issue_id: &str) -> Result<u64>;

    /// Update a report with the given partial
    async fn update_report(&self, id: &str, partial: &PartialReport) -> Result<()>;

    /// Delete a report from the database
    async fn delete_report(&self, id: &str) -> Result<()>;

    /// Delete all reports on an issue
    async fn delete_reports_by_issue(&self, issue_id: &str) -> Result<()>;

    /// Fetch a filtered page of reports joined with their snapshots,
    /// alongside the total match count
    ///
    /// Reports whose issue has been deleted surface with `issue` unset.
    async fn fetch_report_views(&self, query: &ReportQuery) -> Result<(Vec<ReportView>, u64)>;

    /// Count all reports by their moderation state
    async fn count_reports_by_status(&self) -> Result<HashMap<ReportStatus, u64>>;

    /// Fetch a page of reports grouped per issue
    ///
    /// Groups never include issues that have been deleted; pagination
    /// bounds the number of groups.
    async fn fetch_grouped_reports(&self, query: &GroupedReportQuery)
        -> Result<GroupedReportsPage>;

    /// Compute the moderation analytics snapshot over a trailing window
    async fn report_analytics(&self, window_days: i64) -> Result<ReportAnalytics>;
}
