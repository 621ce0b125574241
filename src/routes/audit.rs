use crate::forms::{AuditFilter, ExportFormat, ExportQuery};
use crate::helpers::{audit_csv, audit_csv_file_name, JsonResponse};
use crate::models::{AuditEntry, AuditFilterOptions};
use crate::services::DashboardService;
use crate::warehouse::Warehouse;
use actix_web::http::header;
use actix_web::{error, get, web, Either, Error, HttpResponse, Responder};
use serde_json::json;
use serde_valid::Validate;
use std::sync::Arc;

#[tracing::instrument(name = "Audit log", skip(warehouse))]
#[get("")]
pub async fn list(
    warehouse: web::Data<Arc<dyn Warehouse>>,
    query: web::Query<AuditFilter>,
    export: web::Query<ExportQuery>,
) -> Result<Either<impl Responder, HttpResponse>, Error> {
    let filter = query.into_inner().normalized();
    if let Err(errors) = filter.validate() {
        let errors = errors.to_string();
        tracing::debug!(errors = %errors, "Rejected audit filter");
        return Err(JsonResponse::<AuditEntry>::build().form_error(errors));
    }

    let entries = warehouse.audit_log(&filter).await?;

    if export.format == ExportFormat::Csv {
        let body = audit_csv(&entries).map_err(|err| {
            tracing::error!("Failed to render audit CSV: {:?}", err);
            error::ErrorInternalServerError("Failed to render audit CSV")
        })?;
        let file_name = audit_csv_file_name(chrono::Utc::now());

        return Ok(Either::Right(
            HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file_name),
                ))
                .body(body),
        ));
    }

    let meta = json!({ "count": entries.len(), "filter": filter });
    Ok(Either::Left(
        JsonResponse::<AuditEntry>::build()
            .set_list(entries)
            .set_meta(meta)
            .ok("OK"),
    ))
}

#[tracing::instrument(name = "Audit filter options", skip(warehouse))]
#[get("/filters")]
pub async fn filters(warehouse: web::Data<Arc<dyn Warehouse>>) -> Result<impl Responder, Error> {
    DashboardService::new(warehouse.get_ref().as_ref())
        .audit_filters()
        .await
        .map(|options| {
            JsonResponse::<AuditFilterOptions>::build()
                .set_item(options)
                .ok("OK")
        })
        .map_err(Error::from)
}
