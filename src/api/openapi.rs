//! OpenAPI 3.0 specification definition

use utoipa::OpenApi;

use crate::api::handlers::{
    health::HealthResponse,
    banners::{GenerateBannersRequest, GenerateBannersResponse, ErrorResponse},
};
use crate::domain::BannerLayout;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Candidate Banner API",
        version = "1.0.0",
        description = "Collage banner generation for candidate voting pages"
    ),
    servers(
        (url = "/", description = "Current server")
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "banners", description = "Banner generation endpoints")
    ),
    paths(
        crate::api::handlers::health::health_check,
        crate::api::handlers::banners::generate_banners,
    ),
    components(
        schemas(
            HealthResponse,
            GenerateBannersRequest,
            GenerateBannersResponse,
            ErrorResponse,
            BannerLayout,
        )
    )
)]
pub struct ApiDoc;
