mod common;

use fdd_admin::models::{FailedQualityCheck, QualitySummary, SeverityCount};
use serde_json::Value;

#[tokio::test]
async fn overview_lists_last_day_of_activity() {
    let app = common::spawn_app().await;

    let response = app.get("/overview").await;
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["item"]["metrics"]["total_deals"], 4);

    let activity = body["item"]["recent_activity"].as_array().unwrap();
    assert_eq!(activity.len(), 3);
    assert_eq!(activity[0]["procedure_name"], "load_trial_balance");
}

#[tokio::test]
async fn procedure_stats_follow_range() {
    let app = common::spawn_app().await;

    let body: Value = app
        .get("/monitoring/procedures?range=last_24_hours")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["meta"]["range"], "last_24_hours");
    assert_eq!(body["list"].as_array().unwrap().len(), 2);

    let body: Value = app
        .get("/monitoring/procedures?range=all")
        .await
        .json()
        .await
        .unwrap();
    let stats = body["list"].as_array().unwrap();
    let schedules = stats
        .iter()
        .find(|s| s["procedure_name"] == "generate_fdd_schedules")
        .unwrap();
    assert_eq!(schedules["total_executions"], 3);
    assert_eq!(schedules["failed"], 1);
}

#[tokio::test]
async fn unknown_range_is_rejected() {
    let app = common::spawn_app().await;

    let response = app.get("/monitoring/procedures?range=last_decade").await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid query parameters");
}

#[tokio::test]
async fn errors_page_combines_three_views() {
    let app = common::spawn_app().await;

    let body: Value = app.get("/errors").await.json().await.unwrap();

    // the only ERROR is ten days old
    assert!(body["item"]["summary"].as_array().unwrap().is_empty());
    assert_eq!(body["item"]["recent"].as_array().unwrap().len(), 1);
    assert!(body["item"]["trend"].as_array().unwrap().is_empty());
    assert_eq!(body["item"]["load_errors"][0]["file_name"], "tb_2023.csv");
}

#[tokio::test]
async fn performance_trend_is_hourly_per_procedure() {
    let app = common::spawn_app().await;

    let body: Value = app
        .get("/monitoring/trend?range=last_24_hours")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["meta"]["range"], "last_24_hours");
    let points = body["list"].as_array().unwrap();
    assert_eq!(points.len(), 3);
    assert!(points.iter().all(|p| p["avg_duration_sec"] == 4.25));

    let body: Value = app
        .get("/monitoring/trend?range=all")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["list"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn error_trend_covers_last_seven_days() {
    let warehouse = common::healthy_warehouse().with_audit_entries(vec![
        common::audit_entry("load_trial_balance", "ERROR", "DEAL-002", 2),
        common::audit_entry("load_trial_balance", "ERROR", "DEAL-002", 50),
    ]);
    let app = common::spawn_app_with(warehouse).await;

    let body: Value = app.get("/errors").await.json().await.unwrap();

    let trend = body["item"]["trend"].as_array().unwrap();
    assert_eq!(trend.len(), 2);
    assert!(trend[0]["hour"].as_str().unwrap() < trend[1]["hour"].as_str().unwrap());
    assert!(trend.iter().all(|p| p["error_count"] == 1));
}

#[tokio::test]
async fn quality_page_reports_totals() {
    let warehouse = common::healthy_warehouse().with_quality(
        vec![QualitySummary {
            check_type: "BALANCE".to_string(),
            total_checks: 20,
            passed: 19,
            failed: 1,
            pass_rate: 95.0,
        }],
        vec![SeverityCount {
            severity: "ERROR".to_string(),
            count: 1,
        }],
        vec![FailedQualityCheck {
            deal_id: Some("DEAL-002".to_string()),
            check_name: "trial_balance_sums_to_zero".to_string(),
            check_type: "BALANCE".to_string(),
            severity: "ERROR".to_string(),
            message: Some("off by 0.02".to_string()),
            created_at: chrono::Utc::now(),
        }],
    );
    let app = common::spawn_app_with(warehouse).await;

    let body: Value = app.get("/quality").await.json().await.unwrap();

    assert_eq!(body["meta"]["total"], 20);
    assert_eq!(body["meta"]["failed"], 1);
    assert_eq!(
        body["item"]["recent_failures"][0]["check_name"],
        "trial_balance_sums_to_zero"
    );
}

#[tokio::test]
async fn unavailable_warehouse_maps_to_503() {
    let app = common::spawn_app_with(common::healthy_warehouse().failing("overview")).await;

    let response = app.get("/overview").await;

    assert_eq!(response.status().as_u16(), 503);
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("unavailable"));
}
