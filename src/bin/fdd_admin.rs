//! `fdd-admin` command line.
//!
//! Reads the same configuration as the server and queries the warehouse
//! directly:
//!
//! ```text
//! fdd-admin health --json
//! fdd-admin audit --range last-7-days --status ERROR
//! fdd-admin audit --range all --csv > audit_log.csv
//! fdd-admin errors
//! ```

use clap::{Parser, Subcommand};
use fdd_admin::cli::error::exit_code_of;
use fdd_admin::cli::CommandContext;
use fdd_admin::console::commands::{audit, errors, health, overview, quality, CallableTrait};
use fdd_admin::forms::{AuditFilter, AuditStatus, TimeRange, MAX_AUDIT_ROWS};
use fdd_admin::telemetry::{get_subscriber, init_subscriber};

#[derive(Parser, Debug)]
#[command(
    name = "fdd-admin",
    version,
    about = "Health checks and monitoring for the FDD warehouse pipeline"
)]
struct Cli {
    /// Configuration file, without extension
    #[arg(long, global = true, default_value = "configuration", env = "FDD_ADMIN_CONFIG")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the diagnostic checks and print the health score
    Health {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Check whether the database tab view has rows
    DatabaseTab,
    /// Headline metrics and the last 24 hours of activity
    Overview {
        #[arg(long)]
        json: bool,
    },
    /// Execution statistics per procedure
    Procedures {
        #[arg(long, value_enum, default_value_t = TimeRange::Last24Hours)]
        range: TimeRange,
        #[arg(long)]
        json: bool,
    },
    /// Hourly average duration per procedure
    Trend {
        #[arg(long, value_enum, default_value_t = TimeRange::Last24Hours)]
        range: TimeRange,
        #[arg(long)]
        json: bool,
    },
    /// Browse the procedure audit log
    Audit {
        #[arg(long, value_enum, default_value_t = TimeRange::Last24Hours)]
        range: TimeRange,
        #[arg(long, value_enum, ignore_case = true)]
        status: Option<AuditStatus>,
        #[arg(long)]
        procedure: Option<String>,
        #[arg(long)]
        deal_id: Option<String>,
        /// Maximum rows, 1 to 1000
        #[arg(long, default_value_t = MAX_AUDIT_ROWS)]
        limit: i64,
        #[arg(long)]
        json: bool,
        /// Write the rows as CSV to stdout
        #[arg(long, conflicts_with = "json")]
        csv: bool,
    },
    /// Error summary, hourly error trend, recent errors and load errors
    Errors {
        #[arg(long)]
        json: bool,
    },
    /// Data quality check results
    Quality {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let subscriber = get_subscriber("fdd-admin".into(), "warn".into(), std::io::stderr);
    init_subscriber(subscriber);

    let command = get_command(cli);
    if let Err(err) = command.call() {
        eprintln!("Error: {}", err);
        std::process::exit(exit_code_of(err.as_ref()));
    }
    Ok(())
}

fn get_command(cli: Cli) -> Box<dyn CallableTrait> {
    let context = CommandContext::new(cli.config);

    match cli.command {
        Commands::Health { json } => Box::new(health::HealthCommand::new(context, json)),
        Commands::DatabaseTab => Box::new(health::DatabaseTabCommand::new(context)),
        Commands::Overview { json } => Box::new(overview::OverviewCommand::new(context, json)),
        Commands::Procedures { range, json } => {
            Box::new(overview::ProceduresCommand::new(context, range, json))
        }
        Commands::Trend { range, json } => {
            Box::new(overview::TrendCommand::new(context, range, json))
        }
        Commands::Audit {
            range,
            status,
            procedure,
            deal_id,
            limit,
            json,
            csv,
        } => {
            let filter = AuditFilter {
                range,
                status,
                procedure,
                deal_id,
                limit,
            };
            let output = match (json, csv) {
                (true, _) => audit::AuditOutput::Json,
                (_, true) => audit::AuditOutput::Csv,
                _ => audit::AuditOutput::Table,
            };
            Box::new(audit::AuditCommand::new(context, filter, output))
        }
        Commands::Errors { json } => Box::new(errors::ErrorsCommand::new(context, json)),
        Commands::Quality { json } => Box::new(quality::QualityCommand::new(context, json)),
    }
}
