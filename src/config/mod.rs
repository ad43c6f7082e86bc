//! Configuration module for the banner service

use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};
use std::path::PathBuf;

use crate::domain::BannerLayout;

/// Main application settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
    pub assets: AssetSettings,
    pub render: RenderSettings,
    pub fetch: FetchSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Database configuration for PostgreSQL
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<usize>,
}

/// S3-compatible object storage holding photos, template assets and banners
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub endpoint_url: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Public object URL prefix; objects resolve to `{base}/{bucket}/{key}`
    pub public_url_base: String,
    /// Bucket used when a request does not name one
    pub default_bucket: String,
}

/// Object keys of the template assets inside the request bucket
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub grid_background: String,
    pub grid_frame: String,
    pub story_background: String,
    pub story_frame: String,
    pub font: String,
}

/// Rendering defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub default_frame_color: String,
    pub default_text_color: String,
    /// Title used when the category row is missing; `None` makes it an error
    pub fallback_title: Option<String>,
}

/// Outbound HTTP client configuration for asset downloads
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables (prefixed with BANNER_)
    /// 2. config/local.toml (gitignored)
    /// 3. config/default.toml
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));

        let builder = Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            .add_source(environment());

        builder.build()?.try_deserialize()
    }
}

/// BANNER_SERVER__PORT, BANNER_STORAGE__ENDPOINT_URL, etc.
fn environment() -> Environment {
    Environment::with_prefix("BANNER")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl AssetSettings {
    /// Background and frame keys for a layout
    pub fn template_keys(&self, layout: BannerLayout) -> (&str, &str) {
        match layout {
            BannerLayout::Grid => (&self.grid_background, &self.grid_frame),
            BannerLayout::Story => (&self.story_background, &self.story_frame),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            url: String::new(),
            max_connections: Some(10),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            endpoint_url: String::new(),
            region: "auto".to_string(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            public_url_base: String::new(),
            default_bucket: "candidates".to_string(),
        }
    }
}

impl Default for AssetSettings {
    fn default() -> Self {
        AssetSettings {
            grid_background: "assets/background.png".to_string(),
            grid_frame: "assets/frame.png".to_string(),
            story_background: "assets/background_story.png".to_string(),
            story_frame: "assets/frame_story.png".to_string(),
            font: "assets/font.ttf".to_string(),
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            default_frame_color: "#d4af37".to_string(),
            default_text_color: "#ffffff".to_string(),
            fallback_title: None,
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: format!("candidate-banner/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
