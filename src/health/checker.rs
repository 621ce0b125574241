use super::checks::DiagnosticChecks;
use super::models::{HealthCheckResponse, HealthSnapshot, ReadinessReport};
use super::scorer::{HealthError, HealthScorer};
use crate::configuration::{HealthSettings, Settings, WarehouseSettings};
use crate::warehouse::{Identifier, ObjectKind, Warehouse, WarehouseError, WarehouseTables};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Relations whose row counts feed the checks.
#[derive(Debug, Clone)]
pub struct HealthTargets {
    pub fact_table: Identifier,
    pub mapping_table: Identifier,
    pub schedule_view: Identifier,
    pub pivot_view: Identifier,
}

impl HealthTargets {
    pub fn from_settings(settings: &WarehouseSettings) -> Result<Self, WarehouseError> {
        let tables = WarehouseTables::from_settings(settings)?;
        Ok(Self {
            fact_table: tables.fact,
            mapping_table: tables.mappings,
            schedule_view: tables.schedule_view,
            pivot_view: tables.pivot_view,
        })
    }
}

pub struct HealthChecker {
    warehouse: Arc<dyn Warehouse>,
    targets: HealthTargets,
    settings: HealthSettings,
}

impl HealthChecker {
    pub fn new(warehouse: Arc<dyn Warehouse>, targets: HealthTargets, settings: HealthSettings) -> Self {
        Self {
            warehouse,
            targets,
            settings,
        }
    }

    pub fn from_settings(
        warehouse: Arc<dyn Warehouse>,
        settings: &Settings,
    ) -> Result<Self, WarehouseError> {
        let targets = HealthTargets::from_settings(&settings.warehouse)?;
        Ok(Self::new(warehouse, targets, settings.health.clone()))
    }

    fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.check_timeout_secs.max(1))
    }

    /// Runs every probe, scores the checks and attaches the evidence.
    #[tracing::instrument(name = "Run health check", skip(self))]
    pub async fn check_all(&self) -> Result<HealthCheckResponse, HealthError> {
        let (reachable, snapshot, executions) = tokio::join!(
            self.probe("ping", self.warehouse.ping()),
            self.snapshot(),
            self.probe(
                "execution_success",
                self.warehouse
                    .execution_success(self.settings.execution_window_hours)
            )
        );

        let checks = DiagnosticChecks::evaluate(
            &snapshot,
            &self.settings.minimums,
            self.settings.missing_error_count,
        );
        let report = HealthScorer::compute_results(checks.results())?;

        let warehouse_reachable = reachable.is_some();
        tracing::info!(
            warehouse_reachable,
            score = report.score,
            tier = %report.tier,
            failed = report.checks.len() - report.passed_count(),
            "Health check completed"
        );

        Ok(HealthCheckResponse {
            report,
            warehouse_reachable,
            snapshot,
            executions: executions.unwrap_or_default(),
            checked_at: Utc::now(),
        })
    }

    /// Collects the raw numbers behind the checks. Failed probes are `None`.
    pub async fn snapshot(&self) -> HealthSnapshot {
        let warehouse = self.warehouse.as_ref();

        let (
            tables,
            views,
            procedures,
            fact_rows,
            mappings,
            schedule_view_rows,
            pivot_view_rows,
            recent_errors,
        ) = tokio::join!(
            self.probe("tables", warehouse.count_objects(ObjectKind::Table)),
            self.probe("views", warehouse.count_objects(ObjectKind::View)),
            self.probe("procedures", warehouse.count_objects(ObjectKind::Procedure)),
            self.probe("fact_rows", warehouse.count_rows(&self.targets.fact_table)),
            self.probe("mappings", warehouse.count_mappings()),
            self.probe(
                "schedule_view_rows",
                warehouse.count_rows(&self.targets.schedule_view)
            ),
            self.probe("pivot_view_rows", warehouse.count_rows(&self.targets.pivot_view)),
            self.probe(
                "recent_errors",
                warehouse.count_errors_since(self.settings.error_window_hours)
            ),
        );

        HealthSnapshot {
            tables,
            views,
            procedures,
            fact_rows,
            mappings,
            schedule_view_rows,
            pivot_view_rows,
            recent_errors,
        }
    }

    /// Whether the pivoted view the database tab export reads from has rows.
    #[tracing::instrument(name = "Check database tab readiness", skip(self))]
    pub async fn database_tab_ready(&self) -> ReadinessReport {
        let pivot = &self.targets.pivot_view;
        let rows = self
            .probe("pivot_view_rows", self.warehouse.count_rows(pivot))
            .await;
        let ready = rows.map_or(false, |rows| rows > 0);

        let troubleshooting = if ready {
            Vec::new()
        } else {
            vec![
                format!(
                    "Check active account mappings: SELECT COUNT(*) FROM {} WHERE is_active = TRUE",
                    self.targets.mapping_table
                ),
                "If none are active, reload them: CALL load_account_mappings()".to_string(),
                format!("Verify the fix: SELECT COUNT(*) FROM {}", pivot),
            ]
        };

        ReadinessReport {
            view: pivot.to_string(),
            rows,
            ready,
            troubleshooting,
        }
    }

    async fn probe<T, F>(&self, name: &'static str, query: F) -> Option<T>
    where
        F: Future<Output = Result<T, WarehouseError>>,
    {
        match timeout(self.check_timeout(), query).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(err)) => {
                tracing::warn!(probe = name, error = %err, "Health probe failed");
                None
            }
            Err(_) => {
                tracing::warn!(
                    probe = name,
                    timeout_secs = self.check_timeout().as_secs(),
                    "Health probe timed out"
                );
                None
            }
        }
    }
}
