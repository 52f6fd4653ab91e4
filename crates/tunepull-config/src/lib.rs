// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::Path;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub base_url: String,
    pub media: String,
    pub entity: String,
    pub result_limit: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://itunes.apple.com".to_string(),
            media: "music".to_string(),
            entity: "song".to_string(),
            result_limit: 20,
        }
    }
}

/// Duration tier bounds and weights for candidate scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub duration_close_seconds: u64,
    pub duration_near_seconds: u64,
    pub duration_close_weight: f64,
    pub duration_near_weight: f64,
    pub duration_far_weight: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            duration_close_seconds: 5,
            duration_near_seconds: 30,
            duration_close_weight: 1.0,
            duration_near_weight: 0.7,
            duration_far_weight: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    pub default_country: String,
    /// "18" is the catalog's generic-music genre code.
    pub default_genre_id: String,
    pub default_advisory: String,
    pub artwork_source_resolution: String,
    pub artwork_target_resolution: String,
    pub artwork_cache_capacity: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            default_country: "USA".to_string(),
            default_genre_id: "18".to_string(),
            default_advisory: "notExplicit".to_string(),
            artwork_source_resolution: "100x100".to_string(),
            artwork_target_resolution: "600x600".to_string(),
            artwork_cache_capacity: 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefetchConfig {
    /// Bounded prefix of the selected file list that gets its metadata
    /// read up front. Files beyond the cap are loaded on demand.
    pub max_files: usize,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self { max_files: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub matching: MatchingConfig,
    pub enrichment: EnrichmentConfig,
    pub prefetch: PrefetchConfig,
    pub telemetry: TelemetryConfig,
}

/// Load configuration from defaults, optional TOML file, and environment overrides (prefix: TUNEPULL_).
pub fn load(config_path: Option<&Path>) -> Result<AppConfig> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("TUNEPULL_").split("__"));

    let config: AppConfig = figment.extract()?;
    info!(target: "config", "configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_expected_constants() {
        let config = AppConfig::default();
        assert_eq!(config.catalog.result_limit, 20);
        assert_eq!(config.matching.duration_close_seconds, 5);
        assert_eq!(config.matching.duration_near_seconds, 30);
        assert_eq!(config.enrichment.default_genre_id, "18");
        assert_eq!(config.enrichment.default_country, "USA");
        assert_eq!(config.prefetch.max_files, 10);
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let config = load(None).expect("defaults should load");
        assert_eq!(config.catalog.base_url, "https://itunes.apple.com");
        assert_eq!(config.telemetry.log_level, "info");
    }
}
