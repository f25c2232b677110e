use std::collections::{HashMap, HashSet};

use iso8601_timestamp::{Duration, Timestamp};

use civica_result::Result;

use crate::ReferenceDb;
use crate::{
    apply_min_reports, group_report_rows, paginate_groups, sort_groups, summarize_report_counts,
    DailyCount, GroupedReportQuery, GroupedReportsPage, Issue, IssueDigest, MostReportedIssue,
    PartialReport, ReasonCount, Report, ReportAnalytics, ReportAnalyticsOverview, ReportQuery,
    ReportReason, ReportStatus, ReportView,
};

use super::AbstractReports;

/// Day component of an ISO-8601 timestamp
fn day_key(timestamp: &Timestamp) -> String {
    timestamp.to_string()[..10].to_string()
}

/// Case-insensitive match across issue title and description plus report
/// details
fn matches_search(report: &Report, issue: Option<&Issue>, needle: &str) -> bool {
    issue.is_some_and(|issue| {
        issue.title.to_lowercase().contains(needle)
            || issue.description.to_lowercase().contains(needle)
    }) || report.details.to_lowercase().contains(needle)
}

#[async_trait]
impl AbstractReports for ReferenceDb {
    /// Insert a new report into the database
    async fn insert_report(&self, report: &Report) -> Result<()> {
        let mut issue_reports = self.issue_reports.lock().await;

        // Stand-in for the (issue, reporter) unique index
        if issue_reports.values().any(|existing| {
            existing.issue_id == report.issue_id && existing.reporter_id == report.reporter_id
        }) {
            return Err(create_error!(AlreadyReported));
        }

        if issue_reports.contains_key(&report.id) {
            Err(create_database_error!("insert_one", "issue_reports"))
        } else {
            issue_reports.insert(report.id.to_string(), report.clone());
            Ok(())
        }
    }

    /// Fetch a report from the database
    async fn fetch_report(&self, id: &str) -> Result<Report> {
        let issue_reports = self.issue_reports.lock().await;
        issue_reports
            .get(id)
            .cloned()
            .ok_or_else(|| create_error!(UnknownReport))
    }

    /// Fetch a reporter's report on an issue, if any
    async fn fetch_report_by_issue_reporter(
        &self,
        issue_id: &str,
        reporter_id: &str,
    ) -> Result<Option<Report>> {
        let issue_reports = self.issue_reports.lock().await;
        Ok(issue_reports
            .values()
            .find(|report| report.issue_id == issue_id && report.reporter_id == reporter_id)
            .cloned())
    }

    /// Fetch all reports on an issue
    async fn fetch_reports_by_issue(&self, issue_id: &str) -> Result<Vec<Report>> {
        let issue_reports = self.issue_reports.lock().await;
        Ok(issue_reports
            .values()
            .filter(|report| report.issue_id == issue_id)
            .cloned()
            .collect())
    }

    /// Fetch a page of a reporter's reports, newest first
    async fn fetch_reports_by_reporter(
        &self,
        reporter_id: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Report>> {
        let issue_reports = self.issue_reports.lock().await;
        let mut reports: Vec<Report> = issue_reports
            .values()
            .filter(|report| report.reporter_id == reporter_id)
            .cloned()
            .collect();

        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(reports
            .into_iter()
            .skip(skip as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    /// Count a reporter's reports
    async fn count_reports_by_reporter(&self, reporter_id: &str) -> Result<u64> {
        let issue_reports = self.issue_reports.lock().await;
        Ok(issue_reports
            .values()
            .filter(|report| report.reporter_id == reporter_id)
            .count() as u64)
    }

    /// Count all reports on an issue, regardless of status
    async fn count_reports_by_issue(&self, issue_id: &str) -> Result<u64> {
        let issue_reports = self.issue_reports.lock().await;
        Ok(issue_reports
            .values()
            .filter(|report| report.issue_id == issue_id)
            .count() as u64)
    }

    /// Update a report with the given partial
    async fn update_report(&self, id: &str, partial: &PartialReport) -> Result<()> {
        let mut issue_reports = self.issue_reports.lock().await;
        if let Some(report) = issue_reports.get_mut(id) {
            report.apply_options(partial.clone());
            Ok(())
        } else {
            Err(create_error!(UnknownReport))
        }
    }

    /// Delete a report from the database
    async fn delete_report(&self, id: &str) -> Result<()> {
        let mut issue_reports = self.issue_reports.lock().await;
        if issue_reports.remove(id).is_some() {
            Ok(())
        } else {
            Err(create_error!(UnknownReport))
        }
    }

    /// Delete all reports on an issue
    async fn delete_reports_by_issue(&self, issue_id: &str) -> Result<()> {
        let mut issue_reports = self.issue_reports.lock().await;
        issue_reports.retain(|_, report| report.issue_id != issue_id);
        Ok(())
    }

    /// Fetch a filtered page of reports joined with their snapshots
    async fn fetch_report_views(&self, query: &ReportQuery) -> Result<(Vec<ReportView>, u64)> {
        let reports: Vec<Report> = {
            let issue_reports = self.issue_reports.lock().await;
            issue_reports
                .values()
                .filter(|report| query.status.map_or(true, |status| report.status == status))
                .filter(|report| query.reason.map_or(true, |reason| report.reason == reason))
                .cloned()
                .collect()
        };

        let issues = self.issues.lock().await.clone();
        let users = self.users.lock().await.clone();
        let needle = query.search.as_ref().map(|search| search.to_lowercase());

        let mut matched: Vec<(Report, Option<Issue>)> = reports
            .into_iter()
            .map(|report| {
                let issue = issues.get(&report.issue_id).cloned();
                (report, issue)
            })
            .filter(|(_, issue)| {
                query
                    .category
                    .map_or(true, |category| {
                        issue.as_ref().is_some_and(|issue| issue.category == category)
                    })
            })
            .filter(|(_, issue)| {
                query.issue_status.map_or(true, |status| {
                    issue.as_ref().is_some_and(|issue| issue.status == status)
                })
            })
            .filter(|(report, issue)| {
                needle
                    .as_ref()
                    .map_or(true, |needle| matches_search(report, issue.as_ref(), needle))
            })
            .collect();

        let total = matched.len() as u64;
        matched.sort_by(|a, b| b.0.created_at.cmp(&a.0.created_at));

        let views = matched
            .into_iter()
            .skip(query.skip as usize)
            .take(query.limit.max(0) as usize)
            .map(|(report, issue)| {
                let reporter = users.get(&report.reporter_id).cloned();
                let reviewer = report
                    .reviewed_by
                    .as_ref()
                    .and_then(|id| users.get(id))
                    .cloned();
                ReportView::from_report(report, issue.as_ref(), reporter.as_ref(), reviewer.as_ref())
            })
            .collect();

        Ok((views, total))
    }

    /// Count all reports by their moderation state
    async fn count_reports_by_status(&self) -> Result<HashMap<ReportStatus, u64>> {
        let issue_reports = self.issue_reports.lock().await;
        let mut counts = HashMap::new();
        for report in issue_reports.values() {
            *counts.entry(report.status).or_default() += 1;
        }

        Ok(counts)
    }

    /// Fetch a page of reports grouped per issue
    async fn fetch_grouped_reports(
        &self,
        query: &GroupedReportQuery,
    ) -> Result<GroupedReportsPage> {
        let reports: Vec<Report> = {
            let issue_reports = self.issue_reports.lock().await;
            issue_reports.values().cloned().collect()
        };
        let issues = self.issues.lock().await.clone();
        let users = self.users.lock().await.clone();

        // Aggregate figures cover every active report, ignoring the filters
        let mut counts_per_issue: HashMap<&str, u64> = HashMap::new();
        for report in &reports {
            if issues.contains_key(&report.issue_id) {
                *counts_per_issue.entry(report.issue_id.as_str()).or_default() += 1;
            }
        }
        let stats = summarize_report_counts(counts_per_issue.into_values());

        // Filter, join and drop orphans, then group
        let needle = query.search.as_ref().map(|search| search.to_lowercase());
        let mut rows = Vec::new();
        for report in reports {
            if query.status.is_some_and(|status| report.status != status) {
                continue;
            }

            let issue = match issues.get(&report.issue_id) {
                Some(issue) => issue,
                None => continue,
            };

            if query.category.is_some_and(|category| issue.category != category) {
                continue;
            }
            if query
                .issue_status
                .is_some_and(|status| issue.status != status)
            {
                continue;
            }
            if let Some(needle) = &needle {
                if !matches_search(&report, Some(issue), needle) {
                    continue;
                }
            }

            let reporter = users.get(&report.reporter_id).cloned();
            let reviewer = report
                .reviewed_by
                .as_ref()
                .and_then(|id| users.get(id))
                .cloned();
            rows.push(ReportView::from_report(
                report,
                Some(issue),
                reporter.as_ref(),
                reviewer.as_ref(),
            ));
        }

        let mut groups = group_report_rows(rows);
        apply_min_reports(&mut groups, query.min_reports);
        let total = groups.len() as u64;
        sort_groups(&mut groups, query.sort_by);
        let groups = paginate_groups(groups, query.skip, query.limit);

        Ok(GroupedReportsPage {
            groups,
            total,
            stats,
        })
    }

    /// Compute the moderation analytics snapshot over a trailing window
    async fn report_analytics(&self, window_days: i64) -> Result<ReportAnalytics> {
        let reports: Vec<Report> = {
            let issue_reports = self.issue_reports.lock().await;
            issue_reports.values().cloned().collect()
        };
        let issues = self.issues.lock().await.clone();

        let total_reports = reports.len() as u64;
        let active: Vec<&Report> = reports
            .iter()
            .filter(|report| issues.contains_key(&report.issue_id))
            .collect();

        let active_cases = active
            .iter()
            .map(|report| report.issue_id.as_str())
            .collect::<HashSet<_>>()
            .len() as u64;

        let pending: Vec<&&Report> = active
            .iter()
            .filter(|report| report.status == ReportStatus::Pending)
            .collect();
        let pending_cases = pending
            .iter()
            .map(|report| report.issue_id.as_str())
            .collect::<HashSet<_>>()
            .len() as u64;
        let pending_reports = pending.len() as u64;

        let mut reason_counts: HashMap<ReportReason, u64> = HashMap::new();
        let mut status_breakdown: HashMap<ReportStatus, u64> = HashMap::new();
        for report in &active {
            *reason_counts.entry(report.reason).or_default() += 1;
            *status_breakdown.entry(report.status).or_default() += 1;
        }

        let mut reason_breakdown: Vec<ReasonCount> = reason_counts
            .into_iter()
            .map(|(reason, count)| ReasonCount { reason, count })
            .collect();
        reason_breakdown.sort_by(|a, b| b.count.cmp(&a.count));

        let window_start = Timestamp::now_utc() - Duration::days(window_days);
        let mut daily: HashMap<String, u64> = HashMap::new();
        for report in &active {
            if report.created_at >= window_start {
                *daily.entry(day_key(&report.created_at)).or_default() += 1;
            }
        }
        let mut reports_over_time: Vec<DailyCount> = daily
            .into_iter()
            .map(|(day, count)| DailyCount { day, count })
            .collect();
        reports_over_time.sort_by(|a, b| a.day.cmp(&b.day));

        let mut counts_per_issue: HashMap<&str, u64> = HashMap::new();
        for report in &active {
            *counts_per_issue.entry(report.issue_id.as_str()).or_default() += 1;
        }
        let mut ranking: Vec<(&str, u64)> = counts_per_issue.into_iter().collect();
        ranking.sort_by(|a, b| b.1.cmp(&a.1));
        let most_reported_issues: Vec<MostReportedIssue> = ranking
            .into_iter()
            .take(10)
            .filter_map(|(issue_id, report_count)| {
                issues.get(issue_id).map(|issue| MostReportedIssue {
                    issue: IssueDigest {
                        id: issue.id.clone(),
                        title: issue.title.clone(),
                        category: issue.category,
                        status: issue.status,
                    },
                    report_count,
                })
            })
            .collect();

        let today = day_key(&Timestamp::now_utc());
        let reviewed_today = active
            .iter()
            .filter(|report| {
                report
                    .reviewed_at
                    .as_ref()
                    .is_some_and(|reviewed_at| day_key(reviewed_at) == today)
            })
            .count() as u64;

        Ok(ReportAnalytics {
            overview: ReportAnalyticsOverview {
                active_cases,
                pending_cases,
                total_reports,
                active_reports: active.len() as u64,
                orphaned_reports: total_reports - active.len() as u64,
                pending_reports,
                reviewed_today,
            },
            reason_breakdown,
            status_breakdown,
            reports_over_time,
            most_reported_issues,
        })
    }
}
