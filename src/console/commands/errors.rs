use crate::cli::render::{or_dash, rule, truncate};
use crate::cli::{CliError, CommandContext};
use crate::console::commands::CallableTrait;
use crate::services::DashboardService;

/// `fdd-admin errors [--json]`
pub struct ErrorsCommand {
    pub context: CommandContext,
    pub json: bool,
}

impl ErrorsCommand {
    pub fn new(context: CommandContext, json: bool) -> Self {
        Self { context, json }
    }
}

impl CallableTrait for ErrorsCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let settings = self.context.settings()?;
        let rt = self.context.runtime()?;

        let errors = rt.block_on(async {
            let warehouse = self.context.connect(&settings).await?;
            Ok::<_, CliError>(DashboardService::new(&warehouse).errors().await?)
        })?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&errors)?);
            return Ok(());
        }

        if errors.summary.is_empty() {
            println!("✅ No errors in the last 7 days");
        } else {
            println!("{:<32} {:>7} {:>6}  {}", "PROCEDURE", "ERRORS", "DEALS", "LAST ERROR");
            println!("{}", rule(70));
            for row in &errors.summary {
                println!(
                    "{:<32} {:>7} {:>6}  {}",
                    truncate(&row.procedure_name, 30),
                    row.error_count,
                    row.affected_deals,
                    row.last_error_time.format("%Y-%m-%d %H:%M:%S"),
                );
            }
        }

        if !errors.trend.is_empty() {
            println!();
            println!("{:<18} {:>7}", "HOUR", "ERRORS");
            println!("{}", rule(26));
            for point in &errors.trend {
                println!(
                    "{:<18} {:>7}",
                    point.hour.format("%Y-%m-%d %H:00"),
                    point.error_count
                );
            }
        }

        if !errors.recent.is_empty() {
            println!();
            println!("{:<20} {:<28} {:<12}  {}", "TIME", "PROCEDURE", "DEAL", "MESSAGE");
            println!("{}", rule(110));
            for row in &errors.recent {
                println!(
                    "{:<20} {:<28} {:<12}  {}",
                    row.error_time.format("%Y-%m-%d %H:%M:%S"),
                    truncate(&row.procedure_name, 26),
                    truncate(&or_dash(row.deal_id.as_deref()), 10),
                    truncate(&or_dash(row.error_message.as_deref()), 45),
                );
            }
        }

        if errors.load_errors.is_empty() {
            println!("\n✅ No load errors");
        } else {
            println!();
            println!("{:<12} {:<28} {:<16}  {}", "DEAL", "FILE", "TYPE", "MESSAGE");
            println!("{}", rule(100));
            for row in &errors.load_errors {
                println!(
                    "{:<12} {:<28} {:<16}  {}",
                    truncate(&or_dash(row.deal_id.as_deref()), 10),
                    truncate(&or_dash(row.file_name.as_deref()), 26),
                    truncate(&or_dash(row.error_type.as_deref()), 14),
                    truncate(&or_dash(row.error_message.as_deref()), 40),
                );
            }
        }

        Ok(())
    }
}
