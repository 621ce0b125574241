use crate::configuration::Settings;
use crate::health::HealthChecker;
use crate::routes;
use crate::warehouse::Warehouse;
use actix_cors::Cors;
use actix_web::{dev::Server, error, web, App, HttpResponse, HttpServer};
use serde_json::json;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub fn run(
    listener: TcpListener,
    warehouse: Arc<dyn Warehouse>,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let health_checker = HealthChecker::from_settings(warehouse.clone(), &settings)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
    let health_checker = web::Data::new(Arc::new(health_checker));

    let warehouse: web::Data<Arc<dyn Warehouse>> = web::Data::new(warehouse);

    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        let body = json!({
            "message": "Invalid query parameters",
            "meta": { "errors": err.to_string() },
        });
        error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .service(web::scope("/health_check").service(routes::health_check))
            .service(
                web::scope("/health")
                    .service(routes::health::report)
                    .service(routes::health::database_tab),
            )
            .service(web::scope("/overview").service(routes::overview::overview))
            .service(
                web::scope("/monitoring")
                    .service(routes::monitoring::procedures)
                    .service(routes::monitoring::trend),
            )
            .service(
                web::scope("/audit")
                    .service(routes::audit::list)
                    .service(routes::audit::filters),
            )
            .service(web::scope("/errors").service(routes::errors::diagnostics))
            .service(web::scope("/quality").service(routes::quality::dashboard))
            .app_data(query_config.clone())
            .app_data(health_checker.clone())
            .app_data(warehouse.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
