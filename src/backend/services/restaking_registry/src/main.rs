use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use restaking_registry::api::{api_routes, AppState};
use restaking_registry::repositories::sqlite::{initialize_schema, seed_initial_data, Database};
use restaking_registry::AppConfig;

#[actix_web::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting restaking_registry service");

    let db = Database::connect(&config.database)
        .await
        .context("failed to open database")?;
    initialize_schema(&db).await.context("failed to create schema")?;
    seed_initial_data(&db).await.context("failed to seed database")?;

    let state = web::Data::new(AppState::from_database(db.clone()));
    let (host, port) = config.bind_address();

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .service(api_routes())
    });
    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    tracing::info!(%host, port, "Server listening");
    server
        .bind((host.as_str(), port))
        .with_context(|| format!("failed to bind {host}:{port}"))?
        .run()
        .await?;

    db.close().await;
    Ok(())
}
