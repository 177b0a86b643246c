use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info};
use uzoagro_match::config::Settings;
use uzoagro_match::core::Matcher;
use uzoagro_match::logging;
use uzoagro_match::routes::{self, handle_json_payload_error, matches::AppState};
use uzoagro_match::services::{Dataset, Gazetteer};

fn startup_error(what: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", what, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", what, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging depends on settings, so configuration errors go to stderr
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, format!("Configuration error: {}", e))
    })?;

    logging::init(&settings.logging);

    info!("Starting UzoAgro matching service...");

    let matching_config = settings
        .matching
        .to_matching_config()
        .map_err(|e| startup_error("Invalid matching configuration", e))?;
    let matcher = Arc::new(
        Matcher::new(matching_config).map_err(|e| startup_error("Invalid matching configuration", e))?,
    );

    info!("Matcher initialized with weights: {:?}, top_k: {}", matcher.config().weights, matcher.config().top_k);

    // Datasets are loaded once and kept in memory for the life of the process
    let dataset = Dataset::load(&settings.data.transporters_path, &settings.data.requests_path)
        .map_err(|e| startup_error("Failed to load datasets", e))?;

    let app_state = AppState {
        dataset: Arc::new(dataset),
        matcher,
        gazetteer: Arc::new(Gazetteer::default()),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
