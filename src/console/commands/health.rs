use std::sync::Arc;

use crate::cli::render::{number_or_dash, rule};
use crate::cli::{CliError, CommandContext};
use crate::console::commands::CallableTrait;
use crate::health::{CheckSource, HealthCheckResponse, HealthChecker};
use crate::warehouse::Warehouse;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// health
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `fdd-admin health [--json]`
///
/// Runs the diagnostic checks and prints the score. Exits with status 2 when
/// the tier is NEEDS ATTENTION.
pub struct HealthCommand {
    pub context: CommandContext,
    pub json: bool,
}

impl HealthCommand {
    pub fn new(context: CommandContext, json: bool) -> Self {
        Self { context, json }
    }
}

impl CallableTrait for HealthCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let settings = self.context.settings()?;
        let rt = self.context.runtime()?;

        let response = rt.block_on(async {
            let warehouse: Arc<dyn Warehouse> = Arc::new(self.context.connect_lazy(&settings)?);
            let checker = HealthChecker::from_settings(warehouse, &settings)?;
            Ok::<_, CliError>(checker.check_all().await?)
        })?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            print_report(&response);
        }

        if !response.is_healthy() {
            return Err(Box::new(CliError::Unhealthy {
                score: response.report.score,
                tier: response.report.tier,
            }));
        }
        Ok(())
    }
}

fn print_report(response: &HealthCheckResponse) {
    let report = &response.report;
    println!(
        "System health: {:.1}% ({})  {}/{} checks passed",
        report.score,
        report.tier,
        report.passed_count(),
        report.checks.len()
    );
    if !response.warehouse_reachable {
        println!("⚠️  Warehouse did not answer a ping; failed checks may be connection errors");
    }
    println!();
    println!("{:<22} {:<8} {:<10}", "CHECK", "RESULT", "SOURCE");
    println!("{}", rule(42));
    for check in &report.checks {
        let source = match check.source {
            CheckSource::Evaluated => "evaluated",
            CheckSource::Defaulted => "defaulted",
        };
        println!(
            "{:<22} {:<8} {:<10}",
            check.name,
            if check.passed { "PASS" } else { "FAIL" },
            source
        );
    }

    let snapshot = &response.snapshot;
    println!();
    println!(
        "Tables: {}  Views: {}  Procedures: {}",
        number_or_dash(snapshot.tables),
        number_or_dash(snapshot.views),
        number_or_dash(snapshot.procedures),
    );
    println!(
        "Fact rows: {}  Active mappings: {}  Errors in window: {}",
        number_or_dash(snapshot.fact_rows),
        snapshot.mappings.map_or_else(
            || "-".to_string(),
            |m| format!("{}/{}", m.active, m.total)
        ),
        number_or_dash(snapshot.recent_errors),
    );

    if !response.executions.is_empty() {
        println!();
        println!(
            "{:<32} {:>10} {:>10} {:>8}",
            "PROCEDURE (24H)", "EXECUTIONS", "SUCCESS", "RATE"
        );
        println!("{}", rule(63));
        for row in &response.executions {
            println!(
                "{:<32} {:>10} {:>10} {:>7.1}%",
                row.procedure_name, row.executions, row.successful, row.success_rate
            );
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// database-tab
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `fdd-admin database-tab`
pub struct DatabaseTabCommand {
    pub context: CommandContext,
}

impl DatabaseTabCommand {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }
}

impl CallableTrait for DatabaseTabCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let settings = self.context.settings()?;
        let rt = self.context.runtime()?;

        let readiness = rt.block_on(async {
            let warehouse: Arc<dyn Warehouse> = Arc::new(self.context.connect_lazy(&settings)?);
            let checker = HealthChecker::from_settings(warehouse, &settings)?;
            Ok::<_, CliError>(checker.database_tab_ready().await)
        })?;

        match readiness.rows {
            Some(rows) if readiness.ready => {
                println!("✅ {} has {} rows, database tab can be generated", readiness.view, rows);
            }
            Some(_) => println!("❌ {} is empty", readiness.view),
            None => println!("❌ {} could not be queried", readiness.view),
        }

        if !readiness.troubleshooting.is_empty() {
            println!();
            println!("Troubleshooting:");
            for (idx, step) in readiness.troubleshooting.iter().enumerate() {
                println!("  {}. {}", idx + 1, step);
            }
        }

        Ok(())
    }
}
