use std::fmt;

use crate::health::{HealthError, HealthTier};
use crate::warehouse::WarehouseError;

/// Exit status when the report is produced but the tier is NEEDS ATTENTION.
pub const EXIT_UNHEALTHY: i32 = 2;

#[derive(Debug)]
pub enum CliError {
    Config(config::ConfigError),
    Warehouse(WarehouseError),
    Health(HealthError),
    Unhealthy { score: f64, tier: HealthTier },
    InvalidArgument(String),
    Runtime(String),
    Output(serde_json::Error),
    Io(std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unhealthy { .. } => EXIT_UNHEALTHY,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "Failed to read configuration: {err}"),
            Self::Warehouse(err) => write!(f, "Warehouse error: {err}"),
            Self::Health(err) => write!(f, "Health check failed: {err}"),
            Self::Unhealthy { score, tier } => {
                write!(f, "System health is {tier} ({score:.1}%)")
            }
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            Self::Runtime(msg) => write!(f, "Failed to create async runtime: {msg}"),
            Self::Output(err) => write!(f, "Failed to render output: {err}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<WarehouseError> for CliError {
    fn from(err: WarehouseError) -> Self {
        Self::Warehouse(err)
    }
}

impl From<HealthError> for CliError {
    fn from(err: HealthError) -> Self {
        Self::Health(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Exit status for an error returned from a command.
pub fn exit_code_of(err: &(dyn std::error::Error + 'static)) -> i32 {
    err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}
