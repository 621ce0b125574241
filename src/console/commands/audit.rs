use serde_valid::Validate;

use crate::cli::render::{or_dash, rule, seconds, truncate};
use crate::cli::{CliError, CommandContext};
use crate::console::commands::CallableTrait;
use crate::forms::AuditFilter;
use crate::helpers::audit_csv;
use crate::warehouse::Warehouse;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutput {
    Table,
    Json,
    Csv,
}

/// `fdd-admin audit [--range] [--status] [--procedure] [--deal-id] [--limit] [--json | --csv]`
pub struct AuditCommand {
    pub context: CommandContext,
    pub filter: AuditFilter,
    pub output: AuditOutput,
}

impl AuditCommand {
    pub fn new(context: CommandContext, filter: AuditFilter, output: AuditOutput) -> Self {
        Self {
            context,
            filter: filter.normalized(),
            output,
        }
    }
}

impl CallableTrait for AuditCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.filter
            .validate()
            .map_err(|errors| CliError::InvalidArgument(errors.to_string()))?;

        let settings = self.context.settings()?;
        let rt = self.context.runtime()?;

        let entries = rt.block_on(async {
            let warehouse = self.context.connect(&settings).await?;
            Ok::<_, CliError>(warehouse.audit_log(&self.filter).await?)
        })?;

        match self.output {
            AuditOutput::Json => {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            AuditOutput::Csv => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&audit_csv(&entries)?)?;
                stdout.flush()?;
                return Ok(());
            }
            AuditOutput::Table => {}
        }

        if entries.is_empty() {
            eprintln!("No audit entries match the filters.");
            return Ok(());
        }

        println!(
            "{:<20} {:<28} {:<12} {:<8} {:>9} {:>8}  {}",
            "STARTED", "PROCEDURE", "DEAL", "STATUS", "DURATION", "ROWS", "MESSAGE"
        );
        println!("{}", rule(120));
        for entry in &entries {
            let message = entry
                .error_message
                .as_deref()
                .or(entry.message.as_deref());
            println!(
                "{:<20} {:<28} {:<12} {:<8} {:>9} {:>8}  {}",
                entry.start_time.format("%Y-%m-%d %H:%M:%S"),
                truncate(&entry.procedure_name, 26),
                truncate(&or_dash(entry.deal_id.as_deref()), 10),
                entry.status,
                seconds(entry.duration_seconds),
                entry.rows_affected.map_or_else(|| "-".to_string(), |r| r.to_string()),
                truncate(&or_dash(message), 40),
            );
        }

        eprintln!("\n{} audit entries shown.", entries.len());
        Ok(())
    }
}
