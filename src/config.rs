//! Runtime configuration.
//!
//! Resolution order, later wins:
//! 1. built-in defaults,
//! 2. a JSON file (`$ATLAS_CONFIG`, or `<config dir>/africa-atlas/config.json` if present),
//! 3. environment variables `ATLAS_API_URL`, `ATLAS_TIMEOUT_SECS`, `ATLAS_TILE_URL`,
//!    `ATLAS_LOG_LEVEL`,
//! 4. command-line flags (applied by the binaries).

use crate::map_view::MAX_TILE_ZOOM;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Esri World Imagery; note the `{y}/{x}` order.
pub const DEFAULT_TILE_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";

pub const DEFAULT_TILE_ATTRIBUTION: &str = "Tiles © Esri — Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, Getmapping, Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base of the versioned API, e.g. `http://localhost:8000/api/v1`.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub tile_url_template: String,
    pub tile_attribution: String,
    pub max_zoom: u8,
    /// Background threads used to download tiles and flags.
    pub image_workers: usize,
    /// Decoded tiles and flags kept in memory at once.
    pub image_cache_capacity: usize,
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            request_timeout_secs: 10,
            connect_timeout_secs: 5,
            tile_url_template: DEFAULT_TILE_URL.into(),
            tile_attribution: DEFAULT_TILE_ATTRIBUTION.into(),
            max_zoom: 18,
            image_workers: 4,
            image_cache_capacity: 512,
            log_level: "info".into(),
        }
    }
}

impl Config {
    /// Defaults, then the config file if one exists, then the process environment.
    pub fn load() -> Result<Self> {
        let mut cfg = match Self::file_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        cfg.apply_vars(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// `$ATLAS_CONFIG` if set, otherwise the per-user config location.
    pub fn file_path() -> Option<PathBuf> {
        if let Ok(p) = std::env::var("ATLAS_CONFIG") {
            return Some(PathBuf::from(p));
        }
        dirs::config_dir().map(|d| d.join("africa-atlas").join("config.json"))
    }

    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let mut cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        if cfg.max_zoom > MAX_TILE_ZOOM {
            log::warn!("max_zoom {} capped at {}", cfg.max_zoom, MAX_TILE_ZOOM);
            cfg.max_zoom = MAX_TILE_ZOOM;
        }
        Ok(cfg)
    }

    /// Overlay values from a variable lookup (the environment in production).
    pub fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ATLAS_API_URL").filter(|s| !s.trim().is_empty()) {
            self.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup("ATLAS_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout_secs = secs,
                _ => log::warn!("ignoring ATLAS_TIMEOUT_SECS={raw:?}"),
            }
        }
        if let Some(tpl) = lookup("ATLAS_TILE_URL").filter(|s| !s.trim().is_empty()) {
            self.tile_url_template = tpl;
        }
        if let Some(level) = lookup("ATLAS_LOG_LEVEL").filter(|s| !s.trim().is_empty()) {
            self.log_level = level.trim().to_ascii_lowercase();
        }
    }

    /// Service root: the API base without its `/api/v1` suffix. `/health` and
    /// `/african-capitals` live there.
    pub fn service_root(&self) -> String {
        service_root(&self.api_base_url)
    }
}

pub(crate) fn service_root(api_base_url: &str) -> String {
    let base = api_base_url.trim_end_matches('/');
    base.strip_suffix("/api/v1").unwrap_or(base).to_string()
}
