use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct QualitySummary {
    pub check_type: String,
    pub total_checks: i64,
    pub passed: i64,
    pub failed: i64,
    pub pass_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct SeverityCount {
    pub severity: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct FailedQualityCheck {
    pub deal_id: Option<String>,
    pub check_name: String,
    pub check_type: String,
    pub severity: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityDashboard {
    pub summary: Vec<QualitySummary>,
    pub failed_by_severity: Vec<SeverityCount>,
    pub recent_failures: Vec<FailedQualityCheck>,
}

impl QualityDashboard {
    pub fn totals(&self) -> (i64, i64, i64) {
        self.summary.iter().fold((0, 0, 0), |(total, passed, failed), row| {
            (total + row.total_checks, passed + row.passed, failed + row.failed)
        })
    }
}

/// Sort key matching the dashboard order: ERROR, WARNING, then everything else.
pub fn severity_rank(severity: &str) -> u8 {
    match severity {
        "ERROR" => 1,
        "WARNING" => 2,
        _ => 3,
    }
}
