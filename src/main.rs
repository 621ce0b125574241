use fdd_admin::configuration::get_configuration;
use fdd_admin::startup::run;
use fdd_admin::telemetry::{get_subscriber, init_subscriber};
use fdd_admin::warehouse::{PgWarehouse, Warehouse};
use std::net::TcpListener;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("fdd-admin".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let settings = get_configuration().expect("Failed to read configuration.");

    tracing::info!(
        db_host = %settings.database.host,
        db_port = settings.database.port,
        db_name = %settings.database.database_name,
        schema = %settings.warehouse.schema,
        "Using warehouse"
    );

    let warehouse = PgWarehouse::connect_lazy(&settings.database, &settings.warehouse)
        .expect("Invalid warehouse configuration.");
    let warehouse: Arc<dyn Warehouse> = Arc::new(warehouse);

    let address = format!("{}:{}", settings.app_host, settings.app_port);
    tracing::info!("Start server at {:?}", &address);
    let listener = TcpListener::bind(&address)
        .unwrap_or_else(|err| panic!("failed to bind to {}: {}", address, err));

    run(listener, warehouse, settings)?.await
}
