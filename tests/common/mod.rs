#![allow(dead_code)]

use chrono::{Duration, Utc};
use fdd_admin::configuration::{
    DatabaseSettings, HealthSettings, Settings, WarehouseSettings,
};
use fdd_admin::models::{AuditEntry, LoadError, OverviewMetrics};
use fdd_admin::warehouse::{InMemoryWarehouse, ObjectKind};
use std::net::TcpListener;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub fn settings() -> Settings {
    Settings {
        database: DatabaseSettings {
            username: "postgres".to_string(),
            password: "password".to_string(),
            host: "127.0.0.1".to_string(),
            port: 5432,
            database_name: "fdd".to_string(),
            require_ssl: false,
            max_connections: 1,
            acquire_timeout_secs: 1,
        },
        app_port: 0,
        app_host: "127.0.0.1".to_string(),
        warehouse: WarehouseSettings::default(),
        health: HealthSettings {
            check_timeout_secs: 1,
            ..Default::default()
        },
    }
}

pub fn audit_entry(procedure: &str, status: &str, deal: &str, hours_ago: i64) -> AuditEntry {
    AuditEntry {
        start_time: Utc::now() - Duration::hours(hours_ago),
        procedure_name: procedure.to_string(),
        deal_id: Some(deal.to_string()),
        status: status.to_string(),
        duration_seconds: Some(4.25),
        rows_affected: Some(100),
        message: Some(format!("{} finished for {}", procedure, deal)),
        error_message: (status == "ERROR").then(|| "numeric value out of range".to_string()),
    }
}

/// Fully deployed pipeline with two days of activity and one old error.
pub fn healthy_warehouse() -> InMemoryWarehouse {
    InMemoryWarehouse::new()
        .with_objects(ObjectKind::Table, 14)
        .with_objects(ObjectKind::View, 5)
        .with_objects(ObjectKind::Procedure, 16)
        .with_rows("trial_balance_raw", 12_000)
        .with_rows("v_trial_balance_for_schedules", 640)
        .with_rows("v_database_tab_pivoted", 85)
        .with_mappings(410, 410)
        .with_overview(OverviewMetrics {
            total_deals: 4,
            trial_balance_rows: 12_000,
            ai_insights: 9,
            errors_last_7_days: 0,
            avg_schedule_generation_secs: Some(12.4),
            failed_quality_checks_7_days: 1,
        })
        .with_audit_entries(vec![
            audit_entry("load_trial_balance", "SUCCESS", "DEAL-001", 1),
            audit_entry("load_trial_balance", "SUCCESS", "DEAL-002", 3),
            audit_entry("generate_fdd_schedules", "SUCCESS", "DEAL-001", 2),
            audit_entry("generate_fdd_schedules", "WARNING", "DEAL-003", 30),
            audit_entry("generate_fdd_schedules", "ERROR", "DEAL-004", 24 * 10),
        ])
        .with_load_errors(vec![LoadError {
            deal_id: Some("DEAL-004".to_string()),
            file_name: Some("tb_2023.csv".to_string()),
            error_type: Some("PARSE".to_string()),
            error_message: Some("unexpected column count".to_string()),
            line_content: Some("1000,Cash,,".to_string()),
            created_at: Utc::now() - Duration::days(10),
        }])
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(healthy_warehouse()).await
}

pub async fn spawn_app_with(warehouse: InMemoryWarehouse) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let server = fdd_admin::startup::run(listener, Arc::new(warehouse), settings())
        .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    TestApp { address }
}
