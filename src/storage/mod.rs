//! Storage module for banner publishing
//!
//! Candidate photos, template assets and generated banners live in an
//! S3-compatible object store, so we use the AWS SDK with a custom endpoint.

mod object_store;

pub use object_store::{BannerStore, ObjectStore, StorageError};
