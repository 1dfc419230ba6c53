use actix_files::NamedFile;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde::Serialize;
use std::sync::Arc;
use crate::classifier::Classifier;
use crate::config::AppConfig;
use crate::error::AppError;

#[derive(Serialize, Debug)]
struct PredictionResponse {
    label: String,
    confidence: f32,
}

async fn index() -> Result<NamedFile, AppError> {
    NamedFile::open_async("./static/index.html").await.map_err(|e| {
        log::error!("Error serving index.html: {}", e);
        AppError::Io(e)
    })
}

async fn classify(
    classifier: web::Data<Arc<Classifier>>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    log::debug!("Received classify request with {} bytes", body.len());

    let prediction = classifier.predict(&body)?;
    log::info!(
        "Predicted {} at {:.2}%",
        prediction.category.display_name(),
        prediction.confidence * 100.0
    );

    Ok(HttpResponse::Ok().json(PredictionResponse {
        label: prediction.category.display_name().to_string(),
        confidence: prediction.confidence,
    }))
}

pub async fn start_web_server(
    config: Arc<AppConfig>,
    classifier: Arc<Classifier>,
) -> std::io::Result<()> {
    let port = config.web_port;
    let classifier_data = web::Data::new(classifier);

    log::info!("Starting web server on port: {}", port);
    log::debug!("Serving static files from ./static directory.");

    HttpServer::new(move || {
        App::new()
            .app_data(classifier_data.clone())
            // Full-resolution posters exceed the default 256 KiB payload limit
            .app_data(web::PayloadConfig::new(20 * 1024 * 1024))
            .service(actix_files::Files::new("/static", "./static"))
            .service(web::resource("/api/classify").route(web::post().to(classify)))
            .default_service(web::to(index)) // Serve index.html for any unmatched route
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await
}
