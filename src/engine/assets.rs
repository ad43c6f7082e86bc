//! Remote asset retrieval, decoding and the shared font cache

use std::time::Duration;

use ab_glyph::FontArc;
use async_trait::async_trait;
use bytes::Bytes;
use image::DynamicImage;
use once_cell::sync::OnceCell;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::FetchSettings;

/// Asset errors
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to fetch asset: HTTP {status} from {url}")]
    Fetch { status: u16, url: String },
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid asset URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Invalid font data: {0}")]
    Font(String),
}

/// Source of raw asset bytes
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch the current content at `url`, bypassing any HTTP cache.
    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, AssetError>;
}

/// HTTP implementation backed by reqwest
pub struct HttpAssetFetcher {
    client: reqwest::Client,
}

impl HttpAssetFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(HttpAssetFetcher { client })
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    #[instrument(skip(self))]
    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, AssetError> {
        let target = cache_busted(url)?;

        let response = self
            .client
            .get(target)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|source| AssetError::Transport { url: url.to_string(), source })?;

        if !response.status().is_success() {
            return Err(AssetError::Fetch {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| AssetError::Transport { url: url.to_string(), source })?;

        debug!(bytes = bytes.len(), "Asset fetched");
        Ok(bytes)
    }
}

/// Append a unique query parameter so intermediaries never serve a stale copy.
/// Photos are replaced in place under the same object key.
fn cache_busted(url: &str) -> Result<Url, AssetError> {
    let mut parsed = Url::parse(url).map_err(|e| AssetError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    parsed
        .query_pairs_mut()
        .append_pair("cb", &chrono::Utc::now().timestamp_millis().to_string());

    Ok(parsed)
}

/// Decode PNG/JPEG/... bytes into a raster
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, AssetError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Fetch and decode in one step
pub async fn fetch_image(fetcher: &dyn AssetFetcher, url: &str) -> Result<DynamicImage, AssetError> {
    let bytes = fetcher.fetch_bytes(url).await?;
    decode_image(&bytes)
}

/// Font of one composer, loaded on first use and never invalidated.
///
/// The first successful load wins for every later request, whatever bucket
/// it names. Concurrent first requests may each download the font; whichever
/// parsed copy is stored first is kept and the others are dropped.
#[derive(Default)]
pub struct FontCache {
    font: OnceCell<FontArc>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.font.get().is_some()
    }

    pub async fn get_or_load(&self, fetcher: &dyn AssetFetcher, url: &str) -> Result<FontArc, AssetError> {
        if let Some(font) = self.font.get() {
            return Ok(font.clone());
        }

        let bytes = fetcher.fetch_bytes(url).await?;
        let font = FontArc::try_from_vec(bytes.to_vec())
            .map_err(|e| AssetError::Font(e.to_string()))?;

        info!(url = %url, bytes = bytes.len(), "Loaded banner font");

        Ok(self.font.get_or_init(|| font).clone())
    }
}
