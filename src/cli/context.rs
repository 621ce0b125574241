use crate::cli::error::CliError;
use crate::configuration::{get_configuration_from, Settings};
use crate::warehouse::PgWarehouse;
use tokio::runtime::Runtime;

/// Configuration and connection shared by every console command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config_path: String,
}

impl CommandContext {
    pub fn new(config_path: impl Into<String>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn settings(&self) -> Result<Settings, CliError> {
        Ok(get_configuration_from(&self.config_path)?)
    }

    pub fn runtime(&self) -> Result<Runtime, CliError> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::Runtime(e.to_string()))
    }

    pub async fn connect(&self, settings: &Settings) -> Result<PgWarehouse, CliError> {
        Ok(PgWarehouse::connect(&settings.database, &settings.warehouse).await?)
    }

    /// Defers connecting so that an unreachable warehouse shows up as failed checks.
    pub fn connect_lazy(&self, settings: &Settings) -> Result<PgWarehouse, CliError> {
        Ok(PgWarehouse::connect_lazy(&settings.database, &settings.warehouse)?)
    }
}
