use crate::health::{HealthCheckResponse, HealthChecker, ReadinessReport};
use crate::helpers::JsonResponse;
use actix_web::{get, web, Error, Responder};
use std::sync::Arc;

#[tracing::instrument(name = "System health report", skip(checker))]
#[get("")]
pub async fn report(checker: web::Data<Arc<HealthChecker>>) -> Result<impl Responder, Error> {
    let response = checker.check_all().await?;
    let message = response.report.tier.to_string();

    Ok(JsonResponse::<HealthCheckResponse>::build()
        .set_item(response)
        .ok(message))
}

#[tracing::instrument(name = "Database tab readiness", skip(checker))]
#[get("/database-tab")]
pub async fn database_tab(
    checker: web::Data<Arc<HealthChecker>>,
) -> Result<impl Responder, Error> {
    let readiness = checker.database_tab_ready().await;
    let message = if readiness.ready {
        "Ready"
    } else {
        "Not ready"
    };

    Ok(JsonResponse::<ReadinessReport>::build()
        .set_item(readiness)
        .ok(message))
}
