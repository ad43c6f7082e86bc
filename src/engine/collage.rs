//! Collage composer
//!
//! Turns an event/category pair into one published banner per page of
//! candidates. Pages are processed strictly in order:
//!
//! 1. fetch candidates (ordered by number) and the category title
//! 2. split into pages of the layout's slot count
//! 3. per page: load templates, load photos, compose, encode, publish
//!
//! Lookup failures abort before anything is published. A missing or broken
//! candidate photo only blanks its slot. A failed upload aborts the request;
//! pages already published stay in storage.

use std::sync::Arc;

use ab_glyph::FontArc;
use actix_web::http::StatusCode;
use futures::future::join_all;
use image::DynamicImage;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::AssetSettings;
use crate::db::{CandidateSource, DbError};
use crate::domain::candidate::{banner_key, candidate_photo_key, name_label};
use crate::domain::layout::{plan_pages, PagePlan};
use crate::domain::BannerLayout;
use crate::storage::{BannerStore, StorageError};
use super::assets::{fetch_image, AssetError, AssetFetcher, FontCache};
use super::color::{hex_to_rgb, normalize_hex6, ColorError, Rgb};
use super::compositor::{encode_png, CellLayer, Compositor, PageLayers};
use super::template::PageTemplate;

/// Banner generation errors
#[derive(Debug, Error)]
pub enum CollageError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error(transparent)]
    InvalidColor(#[from] ColorError),
    #[error("No candidates found for event {event_id}, category {category_id}")]
    NoCandidatesFound { event_id: i64, category_id: i64 },
    #[error("Failed to fetch candidates: {0}")]
    DataFetch(#[source] DbError),
    #[error("Failed to fetch category: {0}")]
    CategoryLookup(String),
    #[error("Failed to load asset {url}: {source}")]
    Asset {
        url: String,
        #[source]
        source: AssetError,
    },
    #[error("Failed to publish banner {page}: {source}")]
    Publish {
        page: usize,
        #[source]
        source: StorageError,
    },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CollageError {
    /// Whether the caller sent an unusable request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CollageError::MissingParameter(_)
                | CollageError::InvalidColor(_)
                | CollageError::NoCandidatesFound { .. }
        )
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Unvalidated request fields as received from the caller
#[derive(Debug, Clone, Default)]
pub struct BannerDraft {
    pub event_id: Option<i64>,
    pub category_id: Option<i64>,
    pub frame_color: Option<String>,
    pub text_color: Option<String>,
    pub bucket: Option<String>,
    pub layout: Option<BannerLayout>,
}

/// Values used for omitted request fields
#[derive(Debug, Clone)]
pub struct RequestDefaults {
    pub frame_color: String,
    pub text_color: String,
    pub bucket: String,
}

/// A validated banner generation request
#[derive(Debug, Clone)]
pub struct BannerRequest {
    pub event_id: i64,
    pub category_id: i64,
    pub frame_color: Rgb,
    pub text_color: Rgb,
    pub bucket: String,
    pub layout: BannerLayout,
}

impl BannerRequest {
    /// Check required ids and resolve colors.
    ///
    /// The frame color is strict and rejects malformed input; the text color
    /// silently falls back to the default.
    pub fn validate(draft: BannerDraft, defaults: &RequestDefaults) -> Result<Self, CollageError> {
        let event_id = draft.event_id.ok_or(CollageError::MissingParameter("id_event"))?;
        let category_id = draft.category_id.ok_or(CollageError::MissingParameter("id_category"))?;

        let frame_color = match non_empty(draft.frame_color) {
            Some(hex) => hex_to_rgb(&hex)?,
            None => hex_to_rgb(&defaults.frame_color)?,
        };

        let text_hex = normalize_hex6(
            draft.text_color.as_deref().unwrap_or(""),
            &defaults.text_color,
        );
        let text_color = hex_to_rgb(&text_hex)?;

        Ok(BannerRequest {
            event_id,
            category_id,
            frame_color,
            text_color,
            bucket: non_empty(draft.bucket).unwrap_or_else(|| defaults.bucket.clone()),
            layout: draft.layout.unwrap_or_default(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Result of a generation run
#[derive(Debug, Clone)]
pub struct BannerBatch {
    /// Public URLs in page order
    pub banners: Vec<String>,
    pub total_banners: usize,
    pub total_candidates: usize,
}

/// Orchestrates data lookup, compositing and publishing
pub struct CollageComposer {
    source: Arc<dyn CandidateSource>,
    store: Arc<dyn BannerStore>,
    fetcher: Arc<dyn AssetFetcher>,
    fonts: FontCache,
    assets: AssetSettings,
    fallback_title: Option<String>,
}

impl CollageComposer {
    pub fn new(
        source: Arc<dyn CandidateSource>,
        store: Arc<dyn BannerStore>,
        fetcher: Arc<dyn AssetFetcher>,
        assets: AssetSettings,
        fallback_title: Option<String>,
    ) -> Self {
        CollageComposer {
            source,
            store,
            fetcher,
            fonts: FontCache::new(),
            assets,
            fallback_title,
        }
    }

    pub fn font_loaded(&self) -> bool {
        self.fonts.is_loaded()
    }

    /// Generate and publish every banner page for `request`
    #[instrument(
        skip(self, request),
        fields(
            run_id = %uuid::Uuid::new_v4(),
            event_id = request.event_id,
            category_id = request.category_id,
            layout = request.layout.as_str(),
        )
    )]
    pub async fn generate(&self, request: &BannerRequest) -> Result<BannerBatch, CollageError> {
        let candidates = self
            .source
            .candidates(request.event_id, request.category_id)
            .await
            .map_err(CollageError::DataFetch)?;

        if candidates.is_empty() {
            return Err(CollageError::NoCandidatesFound {
                event_id: request.event_id,
                category_id: request.category_id,
            });
        }

        let title = self.category_title(request).await?;
        let font = self.load_font(&request.bucket).await?;

        let preset = request.layout.preset();
        let compositor = Compositor::new(preset, font, request.text_color.to_rgba(255));
        let plans = plan_pages(&candidates, preset);

        info!(
            candidates = candidates.len(),
            pages = plans.len(),
            "Generating banners"
        );

        let mut banners = Vec::with_capacity(plans.len());
        for plan in &plans {
            let url = self.publish_page(request, plan, &title, &compositor).await?;
            banners.push(url);
        }

        Ok(BannerBatch {
            total_banners: banners.len(),
            total_candidates: candidates.len(),
            banners,
        })
    }

    async fn category_title(&self, request: &BannerRequest) -> Result<String, CollageError> {
        match self.source.category(request.event_id, request.category_id).await {
            Ok(Some(category)) => Ok(category.display_name.to_uppercase()),
            Ok(None) => match self.fallback_title {
                Some(ref fallback) => {
                    warn!(fallback = %fallback, "Category not found, using fallback title");
                    Ok(fallback.to_uppercase())
                }
                None => Err(CollageError::CategoryLookup(format!(
                    "category {} of event {} not found",
                    request.category_id, request.event_id
                ))),
            },
            Err(e) => Err(CollageError::CategoryLookup(e.to_string())),
        }
    }

    async fn load_font(&self, bucket: &str) -> Result<FontArc, CollageError> {
        let url = self.store.public_url(bucket, &self.assets.font);
        self.fonts
            .get_or_load(self.fetcher.as_ref(), &url)
            .await
            .map_err(|source| CollageError::Asset { url, source })
    }

    async fn load_asset(&self, bucket: &str, key: &str) -> Result<DynamicImage, CollageError> {
        let url = self.store.public_url(bucket, key);
        fetch_image(self.fetcher.as_ref(), &url)
            .await
            .map_err(|source| CollageError::Asset { url, source })
    }

    /// Fetch all photos of a page concurrently; each failure only affects its slot.
    async fn load_photos(&self, request: &BannerRequest, plan: &PagePlan<'_>) -> Vec<Option<DynamicImage>> {
        let loads = plan.entries.iter().map(|entry| {
            let slot_index = entry.slot_index;
            let number = entry.candidate.candidate_number;
            let key = candidate_photo_key(request.event_id, request.category_id, number);
            let url = self.store.public_url(&request.bucket, &key);

            async move {
                match fetch_image(self.fetcher.as_ref(), &url).await {
                    Ok(photo) => Some(photo),
                    Err(e) => {
                        warn!(
                            slot = slot_index,
                            candidate = number,
                            url = %url,
                            error = %e,
                            "Candidate photo unavailable, leaving slot blank"
                        );
                        None
                    }
                }
            }
        });

        join_all(loads).await
    }

    async fn publish_page(
        &self,
        request: &BannerRequest,
        plan: &PagePlan<'_>,
        title: &str,
        compositor: &Compositor<FontArc>,
    ) -> Result<String, CollageError> {
        let (background_key, frame_key) = self.assets.template_keys(request.layout);
        let background = self.load_asset(&request.bucket, background_key).await?;
        let frame = self.load_asset(&request.bucket, frame_key).await?;
        let photos = self.load_photos(request, plan).await;

        let cells = build_cells(plan, photos);
        let title = title.to_string();
        let preset = request.layout.preset();
        let frame_color = request.frame_color;
        let compositor = compositor.clone();

        let png = tokio::task::spawn_blocking(move || {
            let template = PageTemplate::prepare(background, frame, preset, frame_color);
            let canvas = compositor.compose(&PageLayers { template, cells, title });
            encode_png(&canvas)
        })
        .await
        .map_err(|e| CollageError::Internal(format!("Task join error: {}", e)))?
        .map_err(|e| CollageError::Internal(e.to_string()))?;

        let key = banner_key(request.event_id, request.category_id, plan.number());
        self.store
            .upload(&request.bucket, &key, png, "image/png")
            .await
            .map_err(|source| CollageError::Publish { page: plan.number(), source })?;

        let url = self.store.public_url(&request.bucket, &key);
        info!(page = plan.number(), url = %url, "Published banner");

        Ok(url)
    }
}

/// Pair slot assignments with their loaded photos and labels
fn build_cells(plan: &PagePlan<'_>, photos: Vec<Option<DynamicImage>>) -> Vec<CellLayer> {
    plan.entries
        .iter()
        .zip(photos)
        .map(|(entry, photo)| CellLayer {
            slot: entry.slot,
            photo,
            label: name_label(entry.global_number, &entry.candidate.display_name),
        })
        .collect()
}
