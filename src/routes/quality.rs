use crate::helpers::JsonResponse;
use crate::models::QualityDashboard;
use crate::services::DashboardService;
use crate::warehouse::Warehouse;
use actix_web::{get, web, Error, Responder};
use serde_json::json;
use std::sync::Arc;

#[tracing::instrument(name = "Data quality", skip(warehouse))]
#[get("")]
pub async fn dashboard(warehouse: web::Data<Arc<dyn Warehouse>>) -> Result<impl Responder, Error> {
    let quality = DashboardService::new(warehouse.get_ref().as_ref())
        .quality()
        .await?;
    let (total, passed, failed) = quality.totals();

    Ok(JsonResponse::<QualityDashboard>::build()
        .set_item(quality)
        .set_meta(json!({ "total": total, "passed": passed, "failed": failed }))
        .ok("OK"))
}
