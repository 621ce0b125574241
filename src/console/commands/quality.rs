use crate::cli::render::{or_dash, rule, truncate};
use crate::cli::{CliError, CommandContext};
use crate::console::commands::CallableTrait;
use crate::models::SeverityCount;
use crate::services::DashboardService;

/// `Failed by severity: ERROR 2, WARNING 1, INFO 4`, in the order given.
fn severity_line(rows: &[SeverityCount]) -> String {
    let counts: Vec<String> = rows
        .iter()
        .map(|row| format!("{} {}", row.severity, row.count))
        .collect();
    format!("Failed by severity: {}", counts.join(", "))
}

/// `fdd-admin quality [--json]`
pub struct QualityCommand {
    pub context: CommandContext,
    pub json: bool,
}

impl QualityCommand {
    pub fn new(context: CommandContext, json: bool) -> Self {
        Self { context, json }
    }
}

impl CallableTrait for QualityCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let settings = self.context.settings()?;
        let rt = self.context.runtime()?;

        let quality = rt.block_on(async {
            let warehouse = self.context.connect(&settings).await?;
            Ok::<_, CliError>(DashboardService::new(&warehouse).quality().await?)
        })?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&quality)?);
            return Ok(());
        }

        let (total, passed, failed) = quality.totals();
        println!("Quality checks: {total} total, {passed} passed, {failed} failed");
        if !quality.failed_by_severity.is_empty() {
            println!("{}", severity_line(&quality.failed_by_severity));
        }
        println!();
        println!("{:<28} {:>7} {:>7} {:>7} {:>7}", "CHECK TYPE", "TOTAL", "PASSED", "FAILED", "RATE");
        println!("{}", rule(60));
        for row in &quality.summary {
            println!(
                "{:<28} {:>7} {:>7} {:>7} {:>6.1}%",
                truncate(&row.check_type, 26),
                row.total_checks,
                row.passed,
                row.failed,
                row.pass_rate,
            );
        }

        if quality.recent_failures.is_empty() {
            println!("\n✅ No failed quality checks");
            return Ok(());
        }

        println!();
        println!("{:<12} {:<28} {:<9}  {}", "DEAL", "CHECK", "SEVERITY", "MESSAGE");
        println!("{}", rule(100));
        for row in &quality.recent_failures {
            println!(
                "{:<12} {:<28} {:<9}  {}",
                truncate(&or_dash(row.deal_id.as_deref()), 10),
                truncate(&row.check_name, 26),
                row.severity,
                truncate(&or_dash(row.message.as_deref()), 45),
            );
        }

        Ok(())
    }
}
