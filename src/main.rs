use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing::info;

use student_predictor::config::AppConfig;
use student_predictor::{api, load_predictor, logging, PredictionEngine};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = AppConfig::from_env().context("failed to read configuration")?;
    info!(data_path = %config.data_path.display(), "loading prediction model");

    // Training is CPU-bound; keep it off the runtime thread.
    let data_path = config.data_path.clone();
    let predictor = tokio::task::spawn_blocking(move || load_predictor(data_path))
        .await
        .context("model loading task failed")?;
    let predictor = web::Data::from(predictor);
    let engine = web::Data::new(PredictionEngine::default());

    info!(host = %config.host, port = config.port, "starting student performance API");

    HttpServer::new(move || {
        App::new()
            .app_data(engine.clone())
            .app_data(predictor.clone())
            .configure(api::configure)
    })
    .bind(config.bind_address())
    .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?
    .run()
    .await
    .context("server error")?;

    Ok(())
}
