use crate::cli::render::{or_dash, rule, seconds, truncate};
use crate::cli::{CliError, CommandContext};
use crate::console::commands::CallableTrait;
use crate::forms::TimeRange;
use crate::services::DashboardService;
use crate::warehouse::Warehouse;

/// `fdd-admin overview [--json]`
pub struct OverviewCommand {
    pub context: CommandContext,
    pub json: bool,
}

impl OverviewCommand {
    pub fn new(context: CommandContext, json: bool) -> Self {
        Self { context, json }
    }
}

impl CallableTrait for OverviewCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let settings = self.context.settings()?;
        let rt = self.context.runtime()?;

        let overview = rt.block_on(async {
            let warehouse = self.context.connect(&settings).await?;
            Ok::<_, CliError>(DashboardService::new(&warehouse).overview().await?)
        })?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&overview)?);
            return Ok(());
        }

        let m = &overview.metrics;
        println!("Deals:                     {}", m.total_deals);
        println!("Trial balance rows:        {}", m.trial_balance_rows);
        println!("AI insights:               {}", m.ai_insights);
        println!("Errors (7 days):           {}", m.errors_last_7_days);
        println!("Avg schedule generation:   {}", seconds(m.avg_schedule_generation_secs));
        println!("Failed quality checks (7d): {}", m.failed_quality_checks_7_days);

        if overview.recent_activity.is_empty() {
            eprintln!("\nNo activity in the last 24 hours.");
            return Ok(());
        }

        println!();
        println!(
            "{:<10} {:<30} {:<14} {:<8} {:>9}",
            "TIME", "PROCEDURE", "DEAL", "STATUS", "DURATION"
        );
        println!("{}", rule(75));
        for entry in &overview.recent_activity {
            println!(
                "{:<10} {:<30} {:<14} {:<8} {:>9}",
                entry.start_time.format("%H:%M:%S"),
                truncate(&entry.procedure_name, 28),
                truncate(&or_dash(entry.deal_id.as_deref()), 12),
                entry.status,
                seconds(entry.duration_seconds),
            );
        }

        Ok(())
    }
}

/// `fdd-admin procedures [--range] [--json]`
pub struct ProceduresCommand {
    pub context: CommandContext,
    pub range: TimeRange,
    pub json: bool,
}

impl ProceduresCommand {
    pub fn new(context: CommandContext, range: TimeRange, json: bool) -> Self {
        Self {
            context,
            range,
            json,
        }
    }
}

impl CallableTrait for ProceduresCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let settings = self.context.settings()?;
        let rt = self.context.runtime()?;

        let stats = rt.block_on(async {
            let warehouse = self.context.connect(&settings).await?;
            Ok::<_, CliError>(warehouse.procedure_stats(self.range).await?)
        })?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
            return Ok(());
        }

        if stats.is_empty() {
            eprintln!("No executions in the selected range.");
            return Ok(());
        }

        println!(
            "{:<32} {:>6} {:>6} {:>6} {:>7} {:>9} {:>9}",
            "PROCEDURE", "TOTAL", "OK", "FAILED", "RATE", "AVG", "MAX"
        );
        println!("{}", rule(81));
        for row in &stats {
            println!(
                "{:<32} {:>6} {:>6} {:>6} {:>6.1}% {:>9} {:>9}",
                truncate(&row.procedure_name, 30),
                row.total_executions,
                row.successful,
                row.failed,
                row.success_rate(),
                seconds(row.avg_duration_sec),
                seconds(row.max_duration_sec),
            );
        }

        Ok(())
    }
}

/// `fdd-admin trend [--range] [--json]`
pub struct TrendCommand {
    pub context: CommandContext,
    pub range: TimeRange,
    pub json: bool,
}

impl TrendCommand {
    pub fn new(context: CommandContext, range: TimeRange, json: bool) -> Self {
        Self {
            context,
            range,
            json,
        }
    }
}

impl CallableTrait for TrendCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let settings = self.context.settings()?;
        let rt = self.context.runtime()?;

        let points = rt.block_on(async {
            let warehouse = self.context.connect(&settings).await?;
            Ok::<_, CliError>(warehouse.performance_trend(self.range).await?)
        })?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&points)?);
            return Ok(());
        }

        if points.is_empty() {
            eprintln!("No executions in the selected range.");
            return Ok(());
        }

        println!("{:<18} {:<32} {:>9}", "HOUR", "PROCEDURE", "AVG");
        println!("{}", rule(61));
        for point in &points {
            println!(
                "{:<18} {:<32} {:>9}",
                point.hour.format("%Y-%m-%d %H:00"),
                truncate(&point.procedure_name, 30),
                seconds(point.avg_duration_sec),
            );
        }

        Ok(())
    }
}
