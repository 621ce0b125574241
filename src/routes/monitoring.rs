use crate::forms::RangeQuery;
use crate::helpers::JsonResponse;
use crate::models::{PerformancePoint, ProcedureStats};
use crate::warehouse::Warehouse;
use actix_web::{get, web, Error, Responder};
use serde_json::json;
use std::sync::Arc;

#[tracing::instrument(name = "Procedure statistics", skip(warehouse), fields(range = ?query.range))]
#[get("/procedures")]
pub async fn procedures(
    warehouse: web::Data<Arc<dyn Warehouse>>,
    query: web::Query<RangeQuery>,
) -> Result<impl Responder, Error> {
    let range = query.range;
    warehouse
        .procedure_stats(range)
        .await
        .map(|stats| {
            JsonResponse::<ProcedureStats>::build()
                .set_list(stats)
                .set_meta(json!({ "range": range }))
                .ok("OK")
        })
        .map_err(Error::from)
}

#[tracing::instrument(name = "Performance trend", skip(warehouse), fields(range = ?query.range))]
#[get("/trend")]
pub async fn trend(
    warehouse: web::Data<Arc<dyn Warehouse>>,
    query: web::Query<RangeQuery>,
) -> Result<impl Responder, Error> {
    let range = query.range;
    warehouse
        .performance_trend(range)
        .await
        .map(|points| {
            JsonResponse::<PerformancePoint>::build()
                .set_list(points)
                .set_meta(json!({ "range": range }))
                .ok("OK")
        })
        .map_err(Error::from)
}
