mod config;
mod predictor;
mod routes;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use config::AppConfig;
use predictor::ModelState;
use routes::configure_routes;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = AppConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    // A missing model does not stop the server; the page reports the
    // failure instead of showing the form.
    let model_path = config.model_path();
    log::info!("Loading model from {}", model_path.display());
    let model_state = web::Data::new(ModelState::initialize(&model_path));

    let frontend_dir = config.frontend_dir.clone();
    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(model_state.clone())
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
