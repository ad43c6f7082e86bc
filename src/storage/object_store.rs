//! S3-compatible object storage client for banner assets
//!
//! ## Bucket layout
//! ```text
//! {bucket}/
//! ├── assets/                                         # shared templates
//! │   ├── background.png, frame.png                   # grid layout
//! │   ├── background_story.png, frame_story.png       # story layout
//! │   └── font.ttf
//! ├── event_{e}_category_{c}_candidate_{n}.jpg        # candidate photos (input)
//! └── event_{e}_category_{c}_banner_{page}.png        # generated banners (output)
//! ```

use async_trait::async_trait;
use aws_sdk_s3::{
    Client as S3Client,
    config::{BehaviorVersion, Builder, Credentials, Region},
    primitives::ByteStream,
};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::config::StorageSettings;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage not configured: {0}")]
    NotConfigured(String),

    #[error("Upload of {key} to bucket {bucket} failed: {reason}")]
    UploadFailed {
        bucket: String,
        key: String,
        reason: String,
    },
}

/// Destination for generated banners
#[async_trait]
pub trait BannerStore: Send + Sync {
    /// Public HTTP address of an object
    fn public_url(&self, bucket: &str, key: &str) -> String;

    /// Write `data` at `key`, replacing any existing object
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

/// Object storage client speaking the S3 API
#[derive(Clone)]
pub struct ObjectStore {
    client: S3Client,
    public_url_base: String,
}

impl ObjectStore {
    /// Create a new client from settings
    pub fn new(settings: &StorageSettings) -> Result<Self, StorageError> {
        if settings.endpoint_url.is_empty() {
            return Err(StorageError::NotConfigured("endpoint_url is empty".to_string()));
        }
        if settings.public_url_base.is_empty() {
            return Err(StorageError::NotConfigured("public_url_base is empty".to_string()));
        }

        debug!(endpoint = %settings.endpoint_url, "Creating object storage client");

        let credentials = Credentials::new(
            &settings.access_key_id,
            &settings.secret_access_key,
            None, // session token
            None, // expiry
            "banner-static-credentials",
        );

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&settings.endpoint_url)
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: S3Client::from_conf(config),
            public_url_base: settings.public_url_base.clone(),
        })
    }
}

#[async_trait]
impl BannerStore for ObjectStore {
    fn public_url(&self, bucket: &str, key: &str) -> String {
        public_object_url(&self.public_url_base, bucket, key)
    }

    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let size = data.len();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .cache_control("no-cache")
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: format!("{}", aws_sdk_s3::error::DisplayErrorContext(&e)),
            })?;

        info!("Uploaded {} ({} bytes) to bucket {}", key, size, bucket);
        Ok(())
    }
}

/// `{base}/{bucket}/{key}` with exactly one slash between parts
pub fn public_object_url(base: &str, bucket: &str, key: &str) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        bucket.trim_matches('/'),
        key.trim_start_matches('/')
    )
}
