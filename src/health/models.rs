use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::ExecutionSuccess;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthTier {
    Excellent,
    Good,
    NeedsAttention,
}

impl fmt::Display for HealthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "EXCELLENT"),
            Self::Good => write!(f, "GOOD"),
            Self::NeedsAttention => write!(f, "NEEDS ATTENTION"),
        }
    }
}

/// Whether a check ran against a real query result or fell back to its policy default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckSource {
    Evaluated,
    Defaulted,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticResult {
    pub name: String,
    pub passed: bool,
    pub source: CheckSource,
}

impl DiagnosticResult {
    pub fn evaluated(name: impl Into<String>, passed: bool) -> Self {
        Self {
            name: name.into(),
            passed,
            source: CheckSource::Evaluated,
        }
    }

    pub fn defaulted(name: impl Into<String>, passed: bool) -> Self {
        Self {
            name: name.into(),
            passed,
            source: CheckSource::Defaulted,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReport {
    pub checks: Vec<DiagnosticResult>,
    pub score: f64,
    pub tier: HealthTier,
}

impl HealthReport {
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|check| check.passed).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &DiagnosticResult> {
        self.checks.iter().filter(|check| !check.passed)
    }
}

/// Active vs. total rows of the account mapping table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MappingCounts {
    pub active: i64,
    pub total: i64,
}

/// Raw numbers behind the checks. `None` means the probe failed or timed out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HealthSnapshot {
    pub tables: Option<i64>,
    pub views: Option<i64>,
    pub procedures: Option<i64>,
    pub fact_rows: Option<i64>,
    pub mappings: Option<MappingCounts>,
    pub schedule_view_rows: Option<i64>,
    pub pivot_view_rows: Option<i64>,
    pub recent_errors: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub report: HealthReport,
    /// Whether a trivial round trip to the warehouse succeeded.
    pub warehouse_reachable: bool,
    pub snapshot: HealthSnapshot,
    pub executions: Vec<ExecutionSuccess>,
    pub checked_at: DateTime<Utc>,
}

impl HealthCheckResponse {
    pub fn is_healthy(&self) -> bool {
        self.report.tier != HealthTier::NeedsAttention
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub view: String,
    pub rows: Option<i64>,
    pub ready: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub troubleshooting: Vec<String>,
}
