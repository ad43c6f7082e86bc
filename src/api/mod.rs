//! API module - HTTP routes and handlers

pub mod handlers;
pub mod openapi;

use actix_web::{error, web, HttpResponse};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers::banners::ErrorResponse;
use crate::api::openapi::ApiDoc;

/// Configure all API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(
                web::scope("/banners")
                    .route("/generate", web::post().to(handlers::banners::generate_banners))
            )
    )
    // Function-style entry point used by existing callers
    .route("/", web::post().to(handlers::banners::generate_banners))
    .route("/health", web::get().to(handlers::health::health_check))
    // Swagger UI and OpenAPI spec
    .service(
        SwaggerUi::new("/swagger-ui/{_:.*}")
            .url("/api-docs/openapi.json", ApiDoc::openapi())
    );
}

/// JSON extractor config: malformed bodies get the `{ "error" }` envelope
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| {
            let response = HttpResponse::BadRequest().json(ErrorResponse {
                error: format!("Invalid request body: {}", err),
            });
            error::InternalError::from_response(err, response).into()
        })
}
