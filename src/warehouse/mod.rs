//! Warehouse access
//!
//! Everything the admin service knows about the data lives in the external SQL
//! warehouse. Handlers and the health checker only see the [`Warehouse`] trait:
//!
//! 1. `postgres.rs` implements it over an `sqlx` pool with bound parameters
//! 2. `memory.rs` implements it over fixed rows, for tests and local runs
//! 3. Table and view names come from configuration as validated [`Identifier`]s

use crate::forms::{AuditFilter, TimeRange};
use crate::health::MappingCounts;
use crate::models;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod errors;
pub mod identifier;
pub mod memory;
pub mod postgres;

pub use errors::WarehouseError;
pub use identifier::Identifier;
pub use memory::InMemoryWarehouse;
pub use postgres::{PgWarehouse, WarehouseTables};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Table,
    View,
    Procedure,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "tables"),
            Self::View => write!(f, "views"),
            Self::Procedure => write!(f, "procedures"),
        }
    }
}

#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Cheapest possible round trip
    async fn ping(&self) -> Result<(), WarehouseError>;

    /// Number of objects of `kind` in the configured schema
    async fn count_objects(&self, kind: ObjectKind) -> Result<i64, WarehouseError>;

    async fn count_rows(&self, table: &Identifier) -> Result<i64, WarehouseError>;

    /// Active and total rows of the account mapping table
    async fn count_mappings(&self) -> Result<MappingCounts, WarehouseError>;

    /// Audit log entries with status ERROR started within the last `hours`
    async fn count_errors_since(&self, hours: i64) -> Result<i64, WarehouseError>;

    async fn overview(&self) -> Result<models::OverviewMetrics, WarehouseError>;

    /// Latest audit entries of the last 24 hours, newest first
    async fn recent_activity(&self, limit: i64) -> Result<Vec<models::AuditEntry>, WarehouseError>;

    async fn procedure_stats(
        &self,
        range: TimeRange,
    ) -> Result<Vec<models::ProcedureStats>, WarehouseError>;

    async fn execution_success(
        &self,
        hours: i64,
    ) -> Result<Vec<models::ExecutionSuccess>, WarehouseError>;

    /// Hourly average duration per procedure, oldest bucket first
    async fn performance_trend(
        &self,
        range: TimeRange,
    ) -> Result<Vec<models::PerformancePoint>, WarehouseError>;

    /// Hourly ERROR counts over the last `days`, oldest bucket first
    async fn error_trend(&self, days: i64) -> Result<Vec<models::ErrorTrendPoint>, WarehouseError>;

    async fn audit_log(&self, filter: &AuditFilter)
        -> Result<Vec<models::AuditEntry>, WarehouseError>;

    async fn audit_procedures(&self) -> Result<Vec<String>, WarehouseError>;

    async fn audit_deals(&self) -> Result<Vec<String>, WarehouseError>;

    async fn error_summary(&self, days: i64) -> Result<Vec<models::ErrorSummary>, WarehouseError>;

    async fn recent_errors(&self, limit: i64) -> Result<Vec<models::ErrorDetail>, WarehouseError>;

    async fn load_errors(&self, limit: i64) -> Result<Vec<models::LoadError>, WarehouseError>;

    async fn quality_summary(&self) -> Result<Vec<models::QualitySummary>, WarehouseError>;

    async fn failed_by_severity(&self) -> Result<Vec<models::SeverityCount>, WarehouseError>;

    async fn failed_quality_checks(
        &self,
        limit: i64,
    ) -> Result<Vec<models::FailedQualityCheck>, WarehouseError>;
}
