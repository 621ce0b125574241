use crate::health::{ExpectedMinimums, MissingErrorCountPolicy};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub app_port: u16,
    pub app_host: String,
    #[serde(default)]
    pub warehouse: WarehouseSettings,
    #[serde(default)]
    pub health: HealthSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database_name: String,
    #[serde(default)]
    pub require_ssl: bool,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database_name)
            .ssl_mode(ssl_mode)
    }
}

/// Where the pipeline objects live inside the warehouse.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WarehouseSettings {
    pub schema: String,
    pub fact_table: String,
    pub mapping_table: String,
    pub audit_table: String,
    pub insights_table: String,
    pub quality_table: String,
    pub load_errors_table: String,
    // derived views the exports are generated from
    pub schedule_view: String,
    pub pivot_view: String,
    pub schedule_procedure: String,
}

impl Default for WarehouseSettings {
    fn default() -> Self {
        Self {
            schema: "trial_balance".to_string(),
            fact_table: "trial_balance_raw".to_string(),
            mapping_table: "account_mappings".to_string(),
            audit_table: "audit_log".to_string(),
            insights_table: "ai_insights".to_string(),
            quality_table: "data_quality_checks".to_string(),
            load_errors_table: "load_errors".to_string(),
            schedule_view: "v_trial_balance_for_schedules".to_string(),
            pivot_view: "v_database_tab_pivoted".to_string(),
            schedule_procedure: "generate_fdd_schedules".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HealthSettings {
    pub minimums: ExpectedMinimums,
    /// Trailing window of the "no recent errors" check
    pub error_window_hours: i64,
    /// Trailing window of the informational execution success table
    pub execution_window_hours: i64,
    pub check_timeout_secs: u64,
    pub missing_error_count: MissingErrorCountPolicy,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            minimums: ExpectedMinimums::default(),
            error_window_hours: 168,
            execution_window_hours: 24,
            check_timeout_secs: 5,
            missing_error_count: MissingErrorCountPolicy::default(),
        }
    }
}

impl HealthSettings {
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.check_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "health.check_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    get_configuration_from("configuration")
}

/// Reads `<path>` (`.yaml`, `.toml`, `.json`), then `APP__`-prefixed environment
/// variables, e.g. `APP__DATABASE__HOST`.
pub fn get_configuration_from(path: &str) -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let settings: Settings = settings.try_deserialize()?;
    settings.health.validate()?;
    Ok(settings)
}
