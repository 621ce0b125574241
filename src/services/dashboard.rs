use crate::models::{AuditFilterOptions, ErrorDiagnostics, Overview, QualityDashboard};
use crate::warehouse::{Warehouse, WarehouseError};

/// Rows shown in the overview activity feed.
pub const RECENT_ACTIVITY_ROWS: i64 = 20;
pub const RECENT_ERROR_ROWS: i64 = 50;
pub const LOAD_ERROR_ROWS: i64 = 100;
pub const FAILED_CHECK_ROWS: i64 = 50;
/// Trailing window of the per-procedure error summary and the hourly error trend.
pub const ERROR_SUMMARY_DAYS: i64 = 7;

/// Composes the multi-query dashboard pages out of single warehouse calls.
pub struct DashboardService<'a> {
    warehouse: &'a dyn Warehouse,
}

impl<'a> DashboardService<'a> {
    pub fn new(warehouse: &'a dyn Warehouse) -> Self {
        Self { warehouse }
    }

    #[tracing::instrument(name = "Load overview", skip(self))]
    pub async fn overview(&self) -> Result<Overview, WarehouseError> {
        let (metrics, recent_activity) = tokio::try_join!(
            self.warehouse.overview(),
            self.warehouse.recent_activity(RECENT_ACTIVITY_ROWS)
        )?;

        Ok(Overview {
            metrics,
            recent_activity,
        })
    }

    #[tracing::instrument(name = "Load audit filter options", skip(self))]
    pub async fn audit_filters(&self) -> Result<AuditFilterOptions, WarehouseError> {
        let (procedures, deals) = tokio::try_join!(
            self.warehouse.audit_procedures(),
            self.warehouse.audit_deals()
        )?;

        Ok(AuditFilterOptions { procedures, deals })
    }

    #[tracing::instrument(name = "Load error diagnostics", skip(self))]
    pub async fn errors(&self) -> Result<ErrorDiagnostics, WarehouseError> {
        let (summary, trend, recent, load_errors) = tokio::try_join!(
            self.warehouse.error_summary(ERROR_SUMMARY_DAYS),
            self.warehouse.error_trend(ERROR_SUMMARY_DAYS),
            self.warehouse.recent_errors(RECENT_ERROR_ROWS),
            self.warehouse.load_errors(LOAD_ERROR_ROWS)
        )?;

        tracing::debug!(
            procedures_with_errors = summary.len(),
            recent = recent.len(),
            load_errors = load_errors.len(),
            "Error diagnostics loaded"
        );

        Ok(ErrorDiagnostics {
            summary,
            trend,
            recent,
            load_errors,
        })
    }

    #[tracing::instrument(name = "Load quality dashboard", skip(self))]
    pub async fn quality(&self) -> Result<QualityDashboard, WarehouseError> {
        let (summary, failed_by_severity, recent_failures) = tokio::try_join!(
            self.warehouse.quality_summary(),
            self.warehouse.failed_by_severity(),
            self.warehouse.failed_quality_checks(FAILED_CHECK_ROWS)
        )?;

        Ok(QualityDashboard {
            summary,
            failed_by_severity,
            recent_failures,
        })
    }
}
