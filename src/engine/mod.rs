//! Banner generation engine
//!
//! This module contains the core collage logic including:
//! - Asset fetching and the process-wide font cache
//! - Color parsing and frame recoloring
//! - Cover-fit geometry and text fitting
//! - Page compositing and the per-request orchestration

pub mod assets;
mod collage;
pub mod color;
mod compositor;
mod geometry;
mod template;
mod text;

#[cfg(test)]
pub(crate) mod testing;

pub use assets::HttpAssetFetcher;
pub use collage::{BannerDraft, BannerRequest, CollageComposer, CollageError, RequestDefaults};
