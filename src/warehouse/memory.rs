use super::{Identifier, ObjectKind, Warehouse, WarehouseError};
use crate::forms::{AuditFilter, AuditStatus, TimeRange};
use crate::health::MappingCounts;
use crate::models::{self, AuditEntry};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, DurationRound, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::time::Duration;

/// Warehouse backed by fixed rows held in memory.
///
/// Aggregations over the audit log are computed from the stored entries, so the
/// same filter semantics apply as against the real warehouse. Individual
/// operations can be made to fail or stall to exercise degraded paths.
#[derive(Debug, Default, Clone)]
pub struct InMemoryWarehouse {
    objects: HashMap<ObjectKind, i64>,
    rows: HashMap<String, i64>,
    mappings: Option<MappingCounts>,
    overview: models::OverviewMetrics,
    audit: Vec<AuditEntry>,
    load_errors: Vec<models::LoadError>,
    quality: Vec<models::QualitySummary>,
    severity: Vec<models::SeverityCount>,
    failed_checks: Vec<models::FailedQualityCheck>,
    failing: HashSet<String>,
    stalled: HashMap<String, Duration>,
}

impl InMemoryWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objects(mut self, kind: ObjectKind, count: i64) -> Self {
        self.objects.insert(kind, count);
        self
    }

    /// Row count for a table or view, keyed by its unqualified name.
    pub fn with_rows(mut self, name: &str, count: i64) -> Self {
        self.rows.insert(name.to_string(), count);
        self
    }

    pub fn with_mappings(mut self, active: i64, total: i64) -> Self {
        self.mappings = Some(MappingCounts { active, total });
        self
    }

    pub fn with_overview(mut self, overview: models::OverviewMetrics) -> Self {
        self.overview = overview;
        self
    }

    pub fn with_audit_entries(mut self, entries: Vec<AuditEntry>) -> Self {
        self.audit.extend(entries);
        self
    }

    pub fn with_load_errors(mut self, errors: Vec<models::LoadError>) -> Self {
        self.load_errors = errors;
        self
    }

    pub fn with_quality(
        mut self,
        summary: Vec<models::QualitySummary>,
        severity: Vec<models::SeverityCount>,
        failed: Vec<models::FailedQualityCheck>,
    ) -> Self {
        self.quality = summary;
        self.severity = severity;
        self.failed_checks = failed;
        self
    }

    /// Makes the named trait operation (e.g. `"count_rows"`) return `Unavailable`.
    pub fn failing(mut self, operation: &str) -> Self {
        self.failing.insert(operation.to_string());
        self
    }

    /// Makes the named trait operation sleep before answering.
    pub fn stalled(mut self, operation: &str, delay: Duration) -> Self {
        self.stalled.insert(operation.to_string(), delay);
        self
    }

    async fn guard(&self, operation: &str) -> Result<(), WarehouseError> {
        if let Some(delay) = self.stalled.get(operation) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(operation) {
            return Err(WarehouseError::Unavailable(format!(
                "{} is disabled on this warehouse",
                operation
            )));
        }
        Ok(())
    }

    fn audit_within(&self, hours: Option<i64>) -> impl Iterator<Item = &AuditEntry> {
        let since = hours.map(|hours| Utc::now() - ChronoDuration::hours(hours));
        self.audit
            .iter()
            .filter(move |entry| since.map_or(true, |since| entry.start_time > since))
    }

    fn newest_first(mut entries: Vec<AuditEntry>) -> Vec<AuditEntry> {
        entries.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        entries
    }
}

fn limit(len: usize, limit: i64) -> usize {
    len.min(usize::try_from(limit).unwrap_or(0))
}

fn hour_bucket(time: DateTime<Utc>) -> DateTime<Utc> {
    time.duration_trunc(ChronoDuration::hours(1)).unwrap_or(time)
}

#[async_trait]
impl Warehouse for InMemoryWarehouse {
    async fn ping(&self) -> Result<(), WarehouseError> {
        self.guard("ping").await
    }

    async fn count_objects(&self, kind: ObjectKind) -> Result<i64, WarehouseError> {
        self.guard("count_objects").await?;
        Ok(self.objects.get(&kind).copied().unwrap_or(0))
    }

    async fn count_rows(&self, table: &Identifier) -> Result<i64, WarehouseError> {
        self.guard("count_rows").await?;
        self.rows.get(table.name()).copied().ok_or_else(|| {
            WarehouseError::Query(format!("relation \"{}\" does not exist", table))
        })
    }

    async fn count_mappings(&self) -> Result<MappingCounts, WarehouseError> {
        self.guard("count_mappings").await?;
        self.mappings
            .ok_or_else(|| WarehouseError::Query("account mappings are missing".to_string()))
    }

    async fn count_errors_since(&self, hours: i64) -> Result<i64, WarehouseError> {
        self.guard("count_errors_since").await?;
        let count = self
            .audit_within(Some(hours))
            .filter(|entry| entry.status == AuditStatus::Error.as_str())
            .count();
        Ok(count as i64)
    }

    async fn overview(&self) -> Result<models::OverviewMetrics, WarehouseError> {
        self.guard("overview").await?;
        Ok(self.overview.clone())
    }

    async fn recent_activity(&self, limit_rows: i64) -> Result<Vec<AuditEntry>, WarehouseError> {
        self.guard("recent_activity").await?;
        let mut entries =
            Self::newest_first(self.audit_within(Some(24)).cloned().collect::<Vec<_>>());
        entries.truncate(limit(entries.len(), limit_rows));
        Ok(entries.into_iter().map(AuditEntry::truncated).collect())
    }

    async fn procedure_stats(
        &self,
        range: TimeRange,
    ) -> Result<Vec<models::ProcedureStats>, WarehouseError> {
        self.guard("procedure_stats").await?;

        let mut grouped: BTreeMap<&str, Vec<&AuditEntry>> = BTreeMap::new();
        for entry in self.audit_within(range.hours()) {
            grouped.entry(entry.procedure_name.as_str()).or_default().push(entry);
        }

        let mut stats: Vec<_> = grouped
            .into_iter()
            .map(|(name, entries)| {
                let durations: Vec<f64> =
                    entries.iter().filter_map(|e| e.duration_seconds).collect();
                let round2 = |value: f64| (value * 100.0).round() / 100.0;
                models::ProcedureStats {
                    procedure_name: name.to_string(),
                    total_executions: entries.len() as i64,
                    successful: entries.iter().filter(|e| e.status == "SUCCESS").count() as i64,
                    failed: entries.iter().filter(|e| e.status == "ERROR").count() as i64,
                    avg_duration_sec: (!durations.is_empty())
                        .then(|| round2(durations.iter().sum::<f64>() / durations.len() as f64)),
                    max_duration_sec: durations.iter().copied().reduce(f64::max).map(round2),
                    total_rows_affected: entries.iter().filter_map(|e| e.rows_affected).sum(),
                }
            })
            .collect();
        stats.sort_by(|a, b| b.total_executions.cmp(&a.total_executions));
        Ok(stats)
    }

    async fn execution_success(
        &self,
        hours: i64,
    ) -> Result<Vec<models::ExecutionSuccess>, WarehouseError> {
        self.guard("execution_success").await?;

        let mut grouped: BTreeMap<&str, (i64, i64)> = BTreeMap::new();
        for entry in self.audit_within(Some(hours)) {
            let counts = grouped.entry(entry.procedure_name.as_str()).or_default();
            counts.0 += 1;
            if entry.status == "SUCCESS" {
                counts.1 += 1;
            }
        }

        Ok(grouped
            .into_iter()
            .map(|(name, (executions, successful))| models::ExecutionSuccess {
                procedure_name: name.to_string(),
                executions,
                successful,
                success_rate: models::success_rate(successful, executions),
            })
            .collect())
    }

    async fn performance_trend(
        &self,
        range: TimeRange,
    ) -> Result<Vec<models::PerformancePoint>, WarehouseError> {
        self.guard("performance_trend").await?;

        let mut buckets: BTreeMap<(DateTime<Utc>, &str), Vec<f64>> = BTreeMap::new();
        for entry in self.audit_within(range.hours()) {
            buckets
                .entry((hour_bucket(entry.start_time), entry.procedure_name.as_str()))
                .or_default()
                .extend(entry.duration_seconds);
        }

        Ok(buckets
            .into_iter()
            .map(|((hour, name), durations)| models::PerformancePoint {
                hour,
                procedure_name: name.to_string(),
                avg_duration_sec: (!durations.is_empty()).then(|| {
                    let avg = durations.iter().sum::<f64>() / durations.len() as f64;
                    (avg * 100.0).round() / 100.0
                }),
            })
            .collect())
    }

    async fn error_trend(&self, days: i64) -> Result<Vec<models::ErrorTrendPoint>, WarehouseError> {
        self.guard("error_trend").await?;

        let mut buckets: BTreeMap<DateTime<Utc>, i64> = BTreeMap::new();
        for entry in self
            .audit_within(Some(days * 24))
            .filter(|e| e.status == AuditStatus::Error.as_str())
        {
            *buckets.entry(hour_bucket(entry.start_time)).or_default() += 1;
        }

        Ok(buckets
            .into_iter()
            .map(|(hour, error_count)| models::ErrorTrendPoint { hour, error_count })
            .collect())
    }

    async fn audit_log(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, WarehouseError> {
        self.guard("audit_log").await?;

        let matches = self
            .audit_within(filter.range.hours())
            .filter(|entry| {
                filter
                    .status
                    .map_or(true, |status| entry.status == status.as_str())
            })
            .filter(|entry| {
                filter
                    .procedure
                    .as_deref()
                    .map_or(true, |name| entry.procedure_name == name)
            })
            .filter(|entry| {
                filter
                    .deal_id
                    .as_deref()
                    .map_or(true, |deal| entry.deal_id.as_deref() == Some(deal))
            })
            .cloned()
            .collect::<Vec<_>>();

        let mut entries = Self::newest_first(matches);
        entries.truncate(limit(entries.len(), filter.limit));
        Ok(entries.into_iter().map(AuditEntry::truncated).collect())
    }

    async fn audit_procedures(&self) -> Result<Vec<String>, WarehouseError> {
        self.guard("audit_procedures").await?;
        let names: BTreeSet<_> = self.audit.iter().map(|e| e.procedure_name.clone()).collect();
        Ok(names.into_iter().collect())
    }

    async fn audit_deals(&self) -> Result<Vec<String>, WarehouseError> {
        self.guard("audit_deals").await?;
        let deals: BTreeSet<_> = self.audit.iter().filter_map(|e| e.deal_id.clone()).collect();
        Ok(deals.into_iter().collect())
    }

    async fn error_summary(&self, days: i64) -> Result<Vec<models::ErrorSummary>, WarehouseError> {
        self.guard("error_summary").await?;

        let mut grouped: BTreeMap<&str, Vec<&AuditEntry>> = BTreeMap::new();
        for entry in self
            .audit_within(Some(days * 24))
            .filter(|e| e.status == AuditStatus::Error.as_str())
        {
            grouped.entry(entry.procedure_name.as_str()).or_default().push(entry);
        }

        let mut summary: Vec<_> = grouped
            .into_iter()
            .filter_map(|(name, entries)| {
                let last_error_time = entries.iter().map(|e| e.start_time).max()?;
                let deals: BTreeSet<_> = entries.iter().filter_map(|e| e.deal_id.as_deref()).collect();
                Some(models::ErrorSummary {
                    procedure_name: name.to_string(),
                    error_count: entries.len() as i64,
                    affected_deals: deals.len() as i64,
                    last_error_time,
                })
            })
            .collect();
        summary.sort_by(|a, b| b.error_count.cmp(&a.error_count));
        Ok(summary)
    }

    async fn recent_errors(&self, limit_rows: i64) -> Result<Vec<models::ErrorDetail>, WarehouseError> {
        self.guard("recent_errors").await?;

        let errors = self
            .audit
            .iter()
            .filter(|e| e.status == AuditStatus::Error.as_str())
            .cloned()
            .collect::<Vec<_>>();
        let mut errors = Self::newest_first(errors);
        errors.truncate(limit(errors.len(), limit_rows));

        Ok(errors
            .into_iter()
            .map(|e| models::ErrorDetail {
                error_time: e.start_time,
                procedure_name: e.procedure_name,
                deal_id: e.deal_id,
                error_message: e.error_message,
                duration_seconds: e.duration_seconds,
            })
            .collect())
    }

    async fn load_errors(&self, limit_rows: i64) -> Result<Vec<models::LoadError>, WarehouseError> {
        self.guard("load_errors").await?;
        let mut errors = self.load_errors.clone();
        errors.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        errors.truncate(limit(errors.len(), limit_rows));
        Ok(errors)
    }

    async fn quality_summary(&self) -> Result<Vec<models::QualitySummary>, WarehouseError> {
        self.guard("quality_summary").await?;
        Ok(self.quality.clone())
    }

    async fn failed_by_severity(&self) -> Result<Vec<models::SeverityCount>, WarehouseError> {
        self.guard("failed_by_severity").await?;
        let mut severity = self.severity.clone();
        severity.sort_by_key(|row| models::severity_rank(&row.severity));
        Ok(severity)
    }

    async fn failed_quality_checks(
        &self,
        limit_rows: i64,
    ) -> Result<Vec<models::FailedQualityCheck>, WarehouseError> {
        self.guard("failed_quality_checks").await?;
        let mut failed = self.failed_checks.clone();
        failed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        failed.truncate(limit(failed.len(), limit_rows));
        Ok(failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(procedure: &str, status: &str, hours_ago: i64, deal: Option<&str>) -> AuditEntry {
        AuditEntry {
            start_time: Utc::now() - ChronoDuration::hours(hours_ago),
            procedure_name: procedure.to_string(),
            deal_id: deal.map(str::to_string),
            status: status.to_string(),
            duration_seconds: Some(2.0),
            rows_affected: Some(10),
            message: Some("x".repeat(250)),
            error_message: None,
        }
    }

    fn warehouse() -> InMemoryWarehouse {
        InMemoryWarehouse::new().with_audit_entries(vec![
            entry("load_trial_balance", "SUCCESS", 2, Some("DEAL-1")),
            entry("load_trial_balance", "ERROR", 30, Some("DEAL-2")),
            entry("generate_fdd_schedules", "SUCCESS", 1, Some("DEAL-1")),
            entry("generate_fdd_schedules", "ERROR", 200, None),
        ])
    }

    #[tokio::test]
    async fn test_audit_filter_by_status_and_range() {
        let filter = AuditFilter {
            range: TimeRange::Last7Days,
            status: Some(AuditStatus::Error),
            ..Default::default()
        };
        let rows = warehouse().audit_log(&filter).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].deal_id.as_deref(), Some("DEAL-2"));
    }

    #[tokio::test]
    async fn test_audit_log_is_newest_first_and_truncated() {
        let filter = AuditFilter {
            range: TimeRange::All,
            ..Default::default()
        };
        let rows = warehouse().audit_log(&filter).await.unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.windows(2).all(|w| w[0].start_time >= w[1].start_time));
        assert!(rows
            .iter()
            .all(|r| r.message.as_ref().map_or(0, |m| m.chars().count()) == 100));
    }

    #[tokio::test]
    async fn test_error_count_respects_window() {
        let warehouse = warehouse();
        assert_eq!(warehouse.count_errors_since(24).await.unwrap(), 0);
        assert_eq!(warehouse.count_errors_since(168).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failing_operation_is_unavailable() {
        let warehouse = warehouse().failing("count_objects");
        let err = warehouse.count_objects(ObjectKind::Table).await.unwrap_err();
        assert!(matches!(err, WarehouseError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_unknown_relation_is_query_error() {
        let table = Identifier::parse("missing_view").unwrap();
        let err = InMemoryWarehouse::new().count_rows(&table).await.unwrap_err();
        assert!(matches!(err, WarehouseError::Query(_)));
    }

    #[tokio::test]
    async fn test_procedure_stats_groups_by_name() {
        let stats = warehouse().procedure_stats(TimeRange::All).await.unwrap();
        assert_eq!(stats.len(), 2);
        let load = stats
            .iter()
            .find(|s| s.procedure_name == "load_trial_balance")
            .unwrap();
        assert_eq!(load.total_executions, 2);
        assert_eq!(load.failed, 1);
        assert_eq!(load.success_rate(), 50.0);
        assert_eq!(load.total_rows_affected, 20);
    }

    #[tokio::test]
    async fn test_performance_trend_buckets_by_hour() {
        let warehouse = warehouse();
        let points = warehouse.performance_trend(TimeRange::Last24Hours).await.unwrap();
        assert_eq!(points.len(), 2);
        assert!(points.windows(2).all(|w| w[0].hour <= w[1].hour));
        assert!(points
            .iter()
            .all(|p| p.hour.timestamp() % 3600 == 0 && p.avg_duration_sec == Some(2.0)));

        let all = warehouse.performance_trend(TimeRange::All).await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_error_trend_counts_errors_in_window() {
        let hour = hour_bucket(Utc::now() - ChronoDuration::hours(30));
        let at = |minutes: i64, status: &str| AuditEntry {
            start_time: hour + ChronoDuration::minutes(minutes),
            ..entry("load_trial_balance", status, 0, Some("DEAL-3"))
        };
        let warehouse = InMemoryWarehouse::new().with_audit_entries(vec![
            at(5, "ERROR"),
            at(40, "ERROR"),
            at(50, "WARNING"),
            entry("load_trial_balance", "ERROR", 200, None),
        ]);

        let trend = warehouse.error_trend(7).await.unwrap();
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].hour, hour);
        assert_eq!(trend[0].error_count, 2);
    }
}
