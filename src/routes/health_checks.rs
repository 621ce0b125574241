use actix_web::{get, HttpResponse};

/// Liveness probe. Never touches the warehouse.
#[get("")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
