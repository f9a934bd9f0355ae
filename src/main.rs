use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use log::info;

use health_assistant::classifier::ModelRegistry;
use health_assistant::config::AppConfig;
use health_assistant::handlers::{self, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load().context("failed to load configuration")?;

    // A missing or corrupt model is fatal.
    let models = ModelRegistry::load(&config.model_dir).with_context(|| {
        format!(
            "failed to load prediction models from {}",
            config.model_dir.display()
        )
    })?;

    let state = web::Data::new(AppState::new(models, config.recent_limit));
    let (host, port) = config.bind_address();
    info!("Server running at http://{host}:{port}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .workers(config.workers.max(1))
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
