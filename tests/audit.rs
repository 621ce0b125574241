mod common;

use serde_json::Value;

#[tokio::test]
async fn default_filter_is_last_24_hours() {
    let app = common::spawn_app().await;

    let body: Value = app.get("/audit").await.json().await.unwrap();

    assert_eq!(body["list"].as_array().unwrap().len(), 3);
    assert_eq!(body["meta"]["count"], 3);
    assert_eq!(body["meta"]["filter"]["range"], "last_24_hours");
}

#[tokio::test]
async fn filters_combine() {
    let app = common::spawn_app().await;

    let body: Value = app
        .get("/audit?range=all&status=ERROR&procedure=generate_fdd_schedules")
        .await
        .json()
        .await
        .unwrap();
    let rows = body["list"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["deal_id"], "DEAL-004");

    let body: Value = app
        .get("/audit?range=all&deal_id=DEAL-001")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["list"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn blank_filters_mean_all() {
    let app = common::spawn_app().await;

    let body: Value = app
        .get("/audit?range=all&procedure=&deal_id=")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["list"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn hostile_values_are_treated_as_data() {
    let app = common::spawn_app().await;

    let response = app
        .get("/audit?range=all&deal_id=x%27%3B%20DROP%20TABLE%20audit_log%3B%20--")
        .await;

    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert!(body["list"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn limit_outside_bounds_is_rejected() {
    let app = common::spawn_app().await;

    for limit in ["0", "1001"] {
        let response = app.get(&format!("/audit?limit={}", limit)).await;
        assert_eq!(response.status().as_u16(), 400, "limit={}", limit);
    }

    let body: Value = app
        .get("/audit?range=all&limit=2")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["list"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_status_is_rejected() {
    let app = common::spawn_app().await;

    let response = app.get("/audit?status=MAYBE").await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn filter_options_are_distinct() {
    let app = common::spawn_app().await;

    let body: Value = app.get("/audit/filters").await.json().await.unwrap();

    assert_eq!(
        body["item"]["procedures"],
        serde_json::json!(["generate_fdd_schedules", "load_trial_balance"])
    );
    assert_eq!(body["item"]["deals"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn csv_export_uses_the_same_filters() {
    let app = common::spawn_app().await;

    let response = app
        .get("/audit?range=all&procedure=load_trial_balance&format=csv")
        .await;
    assert!(response.status().is_success());
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(response.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .contains("audit_log_"));

    let body = response.text().await.unwrap();
    let lines: Vec<_> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("start_time,procedure_name,deal_id,status"));
    assert!(lines[1].contains(",load_trial_balance,DEAL-001,SUCCESS,4.25,100,"));
}

#[tokio::test]
async fn unknown_export_format_is_rejected() {
    let app = common::spawn_app().await;

    let response = app.get("/audit?format=xlsx").await;

    assert_eq!(response.status().as_u16(), 400);
}
