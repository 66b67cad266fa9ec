//! Application factory
//!
//! Builds the Actix-web application around an already initialised state.

use actix_web::{middleware::Logger, web, App, HttpResponse};

use carnet_core::repositories::{StudentDirectory, TokenCache};
use carnet_shared::{error_codes, ErrorResponse};

use crate::handlers::error::json_error_handler;
use crate::middleware::cors::create_cors;
use crate::routes::credential::{generate, validate, AppState};

/// Create and configure the application with all dependencies
pub fn create_app<C, D>(
    app_state: web::Data<AppState<C, D>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    C: TokenCache + 'static,
    D: StudentDirectory + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Logger::default())
        .wrap(create_cors())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/qr")
                    .route("/generate", web::post().to(generate::<C, D>))
                    .route("/validate", web::post().to(validate::<C, D>)),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "carnet-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
