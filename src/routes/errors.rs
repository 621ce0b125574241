use crate::helpers::JsonResponse;
use crate::models::ErrorDiagnostics;
use crate::services::DashboardService;
use crate::warehouse::Warehouse;
use actix_web::{get, web, Error, Responder};
use std::sync::Arc;

#[tracing::instrument(name = "Error diagnostics", skip(warehouse))]
#[get("")]
pub async fn diagnostics(
    warehouse: web::Data<Arc<dyn Warehouse>>,
) -> Result<impl Responder, Error> {
    DashboardService::new(warehouse.get_ref().as_ref())
        .errors()
        .await
        .map(|errors| {
            JsonResponse::<ErrorDiagnostics>::build()
                .set_item(errors)
                .ok("OK")
        })
        .map_err(Error::from)
}
