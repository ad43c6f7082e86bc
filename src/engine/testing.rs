//! In-memory fakes for the fetch, data and publish seams

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use image::RgbaImage;

use crate::db::{CandidateSource, DbError};
use crate::domain::{Candidate, Category};
use crate::storage::{BannerStore, StorageError};
use super::assets::{AssetError, AssetFetcher};
use super::compositor::encode_png;

pub const TEST_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

pub const STORE_BASE: &str = "https://store.test";

pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    encode_png(image).unwrap()
}

/// Candidates numbered 1..=count named "Candidate {n}"
pub fn candidates(event_id: i64, category_id: i64, count: i64) -> Vec<Candidate> {
    (1..=count)
        .map(|n| Candidate {
            event_id,
            category_id,
            candidate_number: n,
            display_name: format!("Candidate {}", n),
        })
        .collect()
}

/// Serves fixed bytes per URL; unknown URLs answer 404
#[derive(Default)]
pub struct MemoryFetcher {
    assets: HashMap<String, Bytes>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MemoryFetcher {
    pub fn with(mut self, url: &str, data: Vec<u8>) -> Self {
        self.assets.insert(url.to_string(), Bytes::from(data));
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl AssetFetcher for MemoryFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, AssetError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;

        self.assets.get(url).cloned().ok_or_else(|| AssetError::Fetch {
            status: 404,
            url: url.to_string(),
        })
    }
}

pub struct MemorySource {
    candidates: Vec<Candidate>,
    category: Option<Category>,
    fail: bool,
}

impl MemorySource {
    pub fn new(candidates: Vec<Candidate>, category: Option<Category>) -> Self {
        MemorySource { candidates, category, fail: false }
    }

    pub fn failing() -> Self {
        MemorySource { candidates: Vec::new(), category: None, fail: true }
    }

    fn check(&self) -> Result<(), DbError> {
        if self.fail {
            return Err(DbError::Config("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CandidateSource for MemorySource {
    async fn candidates(&self, event_id: i64, category_id: i64) -> Result<Vec<Candidate>, DbError> {
        self.check()?;
        let mut found: Vec<_> = self
            .candidates
            .iter()
            .filter(|c| c.event_id == event_id && c.category_id == category_id)
            .cloned()
            .collect();
        found.sort_by_key(|c| c.candidate_number);
        Ok(found)
    }

    async fn category(&self, event_id: i64, category_id: i64) -> Result<Option<Category>, DbError> {
        self.check()?;
        Ok(self
            .category
            .clone()
            .filter(|c| c.event_id == event_id && c.category_id == category_id))
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Records uploads in order; optionally rejects one key
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<Vec<StoredObject>>,
    reject_key: Option<String>,
}

impl MemoryStore {
    pub fn rejecting(key: &str) -> Self {
        MemoryStore {
            objects: Mutex::new(Vec::new()),
            reject_key: Some(key.to_string()),
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl BannerStore for MemoryStore {
    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", STORE_BASE, bucket, key)
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        if self.reject_key.as_deref() == Some(key) {
            return Err(StorageError::UploadFailed {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: "access denied".to_string(),
            });
        }

        self.objects.lock().unwrap().push(StoredObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            data,
            content_type: content_type.to_string(),
        });
        Ok(())
    }
}
