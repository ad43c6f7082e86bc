//! Domain models for candidate banners
//!
//! Contains candidate records, file naming conventions and layout geometry.

pub mod candidate;
pub mod layout;

pub use candidate::{Candidate, Category};
pub use layout::{BannerLayout, LayoutPreset, Slot};
