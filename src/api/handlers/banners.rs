//! Banner generation endpoint

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::AppState;
use crate::domain::BannerLayout;
use crate::engine::{BannerDraft, BannerRequest, CollageError};

/// Request body for banner generation
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenerateBannersRequest {
    /// Event id
    #[serde(rename = "id_event")]
    pub event_id: Option<i64>,
    /// Category id within the event
    #[serde(rename = "id_category")]
    pub category_id: Option<i64>,
    /// Frame color as `#rrggbb` (defaults to the configured frame color)
    #[serde(rename = "frameColor")]
    pub frame_color: Option<String>,
    /// Storage bucket holding photos and assets (defaults to the configured bucket)
    pub bucket: Option<String>,
    /// Label and title color as `#rgb` or `#rrggbb`; invalid values fall back to the default
    #[serde(rename = "textColor")]
    pub text_color: Option<String>,
    /// Page layout, `grid` (default) or `story`
    pub layout: Option<BannerLayout>,
}

impl From<GenerateBannersRequest> for BannerDraft {
    fn from(body: GenerateBannersRequest) -> Self {
        BannerDraft {
            event_id: body.event_id,
            category_id: body.category_id,
            frame_color: body.frame_color,
            text_color: body.text_color,
            bucket: body.bucket,
            layout: body.layout,
        }
    }
}

/// Response for successful generation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBannersResponse {
    /// Public banner URLs in page order
    pub banners: Vec<String>,
    pub total_banners: usize,
    pub total_candidates: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// POST /api/v1/banners/generate - Generate banners for a category
#[utoipa::path(
    post,
    path = "/api/v1/banners/generate",
    tag = "banners",
    request_body = GenerateBannersRequest,
    responses(
        (status = 200, description = "Banners generated and published", body = GenerateBannersResponse),
        (status = 400, description = "Missing parameter, invalid color or no candidates", body = ErrorResponse),
        (status = 500, description = "Lookup, asset or publish failure", body = ErrorResponse)
    )
)]
pub async fn generate_banners(
    state: web::Data<AppState>,
    body: web::Json<GenerateBannersRequest>,
) -> HttpResponse {
    let start = Instant::now();

    let request = match BannerRequest::validate(body.into_inner().into(), &state.defaults) {
        Ok(request) => request,
        Err(e) => return error_response(&e),
    };

    info!(
        event_id = request.event_id,
        category_id = request.category_id,
        bucket = %request.bucket,
        "Processing banner generation request"
    );

    match state.composer.generate(&request).await {
        Ok(batch) => {
            info!(
                banners = batch.total_banners,
                candidates = batch.total_candidates,
                generation_time_ms = start.elapsed().as_millis() as u64,
                "Banners generated successfully"
            );

            HttpResponse::Ok().json(GenerateBannersResponse {
                banners: batch.banners,
                total_banners: batch.total_banners,
                total_candidates: batch.total_candidates,
            })
        }
        Err(e) => error_response(&e),
    }
}

fn error_response(err: &CollageError) -> HttpResponse {
    if err.is_client_error() {
        warn!(error = %err, "Rejected banner request");
    } else {
        error!(error = ?err, "Banner generation failed");
    }

    HttpResponse::build(err.status_code()).json(ErrorResponse { error: err.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{configure_routes, json_config};
    use crate::config::AssetSettings;
    use crate::engine::testing::{candidates, png_bytes, MemoryFetcher, MemorySource, MemoryStore, TEST_FONT};
    use crate::engine::{CollageComposer, RequestDefaults};
    use crate::domain::Category;
    use actix_web::{test, App};
    use image::{Rgba, RgbaImage};
    use serde_json::json;
    use std::sync::Arc;

    fn state(count: i64) -> web::Data<AppState> {
        let fetcher = MemoryFetcher::default()
            .with("https://store.test/candidates/assets/font.ttf", TEST_FONT.to_vec())
            .with(
                "https://store.test/candidates/assets/background.png",
                png_bytes(&RgbaImage::from_pixel(1365, 1365, Rgba([20, 20, 20, 255]))),
            )
            .with(
                "https://store.test/candidates/assets/frame.png",
                png_bytes(&RgbaImage::new(1365, 1365)),
            );
        let source = MemorySource::new(
            candidates(1, 2, count),
            Some(Category { event_id: 1, category_id: 2, display_name: "Mister".to_string() }),
        );

        web::Data::new(AppState {
            composer: Arc::new(CollageComposer::new(
                Arc::new(source),
                Arc::new(MemoryStore::default()),
                Arc::new(fetcher),
                AssetSettings::default(),
                None,
            )),
            defaults: RequestDefaults {
                frame_color: "#d4af37".to_string(),
                text_color: "#ffffff".to_string(),
                bucket: "candidates".to_string(),
            },
            started_at: Instant::now(),
        })
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state)
                    .app_data(json_config())
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_generate_success() {
        let app = app!(state(2));
        let req = test::TestRequest::post()
            .uri("/api/v1/banners/generate")
            .set_json(json!({ "id_event": 1, "id_category": 2, "frameColor": "#ff0000" }))
            .to_request();

        let resp: GenerateBannersResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.total_banners, 1);
        assert_eq!(resp.total_candidates, 2);
        assert_eq!(
            resp.banners,
            vec!["https://store.test/candidates/event_1_category_2_banner_1.png"]
        );
    }

    #[actix_web::test]
    async fn test_response_uses_camel_case() {
        let app = app!(state(1));
        let req = test::TestRequest::post()
            .uri("/")
            .set_json(json!({ "id_event": 1, "id_category": 2 }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["totalBanners"], 1);
        assert_eq!(body["totalCandidates"], 1);
    }

    #[actix_web::test]
    async fn test_missing_parameter_is_bad_request() {
        let app = app!(state(1));
        let req = test::TestRequest::post()
            .uri("/api/v1/banners/generate")
            .set_json(json!({ "id_category": 2 }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "Missing required parameter: id_event");
    }

    #[actix_web::test]
    async fn test_no_candidates_is_bad_request() {
        let app = app!(state(0));
        let req = test::TestRequest::post()
            .uri("/api/v1/banners/generate")
            .set_json(json!({ "id_event": 1, "id_category": 2 }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.error.contains("No candidates found"));
    }

    #[actix_web::test]
    async fn test_invalid_frame_color_is_bad_request() {
        let app = app!(state(1));
        let req = test::TestRequest::post()
            .uri("/api/v1/banners/generate")
            .set_json(json!({ "id_event": 1, "id_category": 2, "frameColor": "gold" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_malformed_json_uses_error_envelope() {
        let app = app!(state(1));
        let req = test::TestRequest::post()
            .uri("/api/v1/banners/generate")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"id_event\": ")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.error.starts_with("Invalid request body"));
    }

    #[actix_web::test]
    async fn test_asset_failure_is_server_error() {
        let data = web::Data::new(AppState {
            composer: Arc::new(CollageComposer::new(
                Arc::new(MemorySource::new(candidates(1, 2, 1), None)),
                Arc::new(MemoryStore::default()),
                Arc::new(MemoryFetcher::default()),
                AssetSettings::default(),
                Some("Candidates".to_string()),
            )),
            defaults: state(0).defaults.clone(),
            started_at: Instant::now(),
        });
        let app = app!(data);
        let req = test::TestRequest::post()
            .uri("/api/v1/banners/generate")
            .set_json(json!({ "id_event": 1, "id_category": 2 }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.error.contains("assets/font.ttf"));
    }
}
