use actix_web::{web, HttpResponse};
use serde_json::json;
use std::time::Instant;

/// Process start time, injected as app data so `/health` can report uptime.
#[derive(Clone, Copy)]
pub struct ServerStart(pub Instant);

pub async fn welcome() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Welcome to the Café Management System API!",
    }))
}

pub async fn health(started: web::Data<ServerStart>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "Healthy",
        "uptime": started.0.elapsed().as_secs_f64(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn welcome_returns_greeting() {
        let app = test::init_service(
            App::new().service(web::resource("/").route(web::get().to(welcome))),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Welcome to the Café Management System API!");
    }

    #[actix_web::test]
    async fn health_reports_status_and_uptime() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ServerStart(Instant::now())))
                .service(web::resource("/health").route(web::get().to(health))),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "Healthy");
        assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    }
}
