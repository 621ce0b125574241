use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AuditEntry;

/// Headline numbers of the overview page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, sqlx::FromRow)]
pub struct OverviewMetrics {
    pub total_deals: i64,
    pub trial_balance_rows: i64,
    pub ai_insights: i64,
    pub errors_last_7_days: i64,
    pub avg_schedule_generation_secs: Option<f64>,
    pub failed_quality_checks_7_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overview {
    pub metrics: OverviewMetrics,
    pub recent_activity: Vec<AuditEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct ProcedureStats {
    pub procedure_name: String,
    pub total_executions: i64,
    pub successful: i64,
    pub failed: i64,
    pub avg_duration_sec: Option<f64>,
    pub max_duration_sec: Option<f64>,
    pub total_rows_affected: i64,
}

impl ProcedureStats {
    /// Share of successful executions, rounded to one decimal.
    pub fn success_rate(&self) -> f64 {
        success_rate(self.successful, self.total_executions)
    }
}

/// Per-procedure execution outcome over a trailing window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct ExecutionSuccess {
    pub procedure_name: String,
    pub executions: i64,
    pub successful: i64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct ErrorSummary {
    pub procedure_name: String,
    pub error_count: i64,
    pub affected_deals: i64,
    pub last_error_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct ErrorDetail {
    pub error_time: DateTime<Utc>,
    pub procedure_name: String,
    pub deal_id: Option<String>,
    pub error_message: Option<String>,
    pub duration_seconds: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct LoadError {
    pub deal_id: Option<String>,
    pub file_name: Option<String>,
    pub error_type: Option<String>,
    pub error_message: Option<String>,
    pub line_content: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Average duration of one procedure within one hour bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct PerformancePoint {
    pub hour: DateTime<Utc>,
    pub procedure_name: String,
    pub avg_duration_sec: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct ErrorTrendPoint {
    pub hour: DateTime<Utc>,
    pub error_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDiagnostics {
    pub summary: Vec<ErrorSummary>,
    pub trend: Vec<ErrorTrendPoint>,
    pub recent: Vec<ErrorDetail>,
    pub load_errors: Vec<LoadError>,
}

pub fn success_rate(successful: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let rate = successful as f64 * 100.0 / total as f64;
    (rate * 10.0).round() / 10.0
}
