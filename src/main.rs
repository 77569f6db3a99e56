mod db;
mod errors;
mod handlers;
mod models;
mod reports;
mod utils;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use handlers::default::ServerStart;
use log::info;
use std::env;
use std::time::Instant;

fn build_cors(allowed_origins: &str) -> Cors {
    if allowed_origins.trim() == "*" {
        return Cors::permissive();
    }
    allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .fold(Cors::default().allow_any_method().allow_any_header(), |cors, origin| {
            cors.allowed_origin(origin)
        })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let allowed_origins = env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string());

    let pool = db::create_pool().await;
    db::init_schema(&pool)
        .await
        .expect("Failed to initialize the database schema");

    let started = ServerStart(Instant::now());

    info!("Starting server at 127.0.0.1:8080");

    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&allowed_origins))
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(started))
            .service(
                web::resource("/")
                    .route(web::get().to(handlers::default::welcome)),
            )
            .service(
                web::resource("/health")
                    .route(web::get().to(handlers::default::health)),
            )
            .service(
                web::resource("/cafes")
                    .route(web::post().to(handlers::cafe::create_cafe))
                    .route(web::get().to(handlers::cafe::get_cafes)),
            )
            .service(
                web::resource("/cafes/{id}")
                    .route(web::get().to(handlers::cafe::get_cafe))
                    .route(web::put().to(handlers::cafe::update_cafe))
                    .route(web::delete().to(handlers::cafe::delete_cafe)),
            )
            .service(
                web::resource("/employees")
                    .route(web::post().to(handlers::employee::create_employee))
                    .route(web::get().to(handlers::employee::get_employees)),
            )
            .service(
                web::resource("/employees/{id}")
                    .route(web::get().to(handlers::employee::get_employee))
                    .route(web::put().to(handlers::employee::update_employee))
                    .route(web::delete().to(handlers::employee::delete_employee)),
            )
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
}
