use crate::helpers::JsonResponse;
use crate::models::Overview;
use crate::services::DashboardService;
use crate::warehouse::Warehouse;
use actix_web::{get, web, Error, Responder};
use std::sync::Arc;

#[tracing::instrument(name = "Dashboard overview", skip(warehouse))]
#[get("")]
pub async fn overview(warehouse: web::Data<Arc<dyn Warehouse>>) -> Result<impl Responder, Error> {
    DashboardService::new(warehouse.get_ref().as_ref())
        .overview()
        .await
        .map(|overview| JsonResponse::<Overview>::build().set_item(overview).ok("OK"))
        .map_err(Error::from)
}
