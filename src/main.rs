use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlers, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, get, web};
use dotenv::dotenv;
use env_logger::Env;
use log::info;

mod middleware;
mod remote;
mod router;
mod thread;
mod utils;

use middleware::not_found::not_found;
use router::index::routes;
use serde_json::json;
use thread::service::ThreadService;

#[get("/")]
async fn default() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Welcome to the comments service",
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": std::env::var("SERVICE_NAME").unwrap_or_else(|_| "Unknown".to_string()),
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logger with environment variable support
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting server on http://localhost:8000");

    // A failed load is terminal: there is nothing to serve without the document.
    let (remote_store, document) = remote::store::connect_to_store()
        .await
        .expect("Failed to load the comment thread from the remote store");

    let thread_service = web::Data::new(ThreadService::new(document, remote_store));

    // Start the HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(thread_service.clone())
            .configure(routes)
            .wrap(ErrorHandlers::new().handler(StatusCode::NOT_FOUND, not_found))
            .service(default)
    })
    .bind(("localhost", 8000))?
    .run()
    .await?;

    info!("Server has stopped");

    Ok(())
}
