// src/config/layout.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::fingerprint::FingerprintParams;
use crate::force::DecayingForceLayout;
use crate::landscape::LandscapeParams;
use crate::report::quotes::DEFAULT_QUOTE_LIMIT;
use crate::tension::TensionParams;
use crate::wrap::LabelStyle;

pub const ENV_LANDSCAPE_CONFIG_PATH: &str = "LANDSCAPE_CONFIG_PATH";
pub const DEFAULT_LANDSCAPE_CONFIG_PATH: &str = "config/landscape.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    pub limit: usize,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_QUOTE_LIMIT,
        }
    }
}

/// Every tunable of the derived figures. Each section and field is optional in TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub landscape: LandscapeParams,
    pub label: LabelStyle,
    pub tension: TensionParams,
    pub simulation: DecayingForceLayout,
    pub fingerprint: FingerprintParams,
    pub quotes: QuoteConfig,
}

impl LayoutConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing layout config")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading layout config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Load from `path`, falling back to built-in defaults when the file is absent
    /// or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from_file(path) {
            Ok(cfg) => {
                tracing::info!(path = %path.display(), "layout config loaded");
                cfg
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "layout config unavailable, using defaults");
                Self::default()
            }
        }
    }
}

/// Config path from `$LANDSCAPE_CONFIG_PATH`, else `config/landscape.toml`.
/// Read once at bootstrap.
pub fn resolve_path() -> PathBuf {
    std::env::var(ENV_LANDSCAPE_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LANDSCAPE_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::UniquenessPolicy;
    use std::env;

    #[test]
    fn empty_toml_is_all_defaults() {
        assert_eq!(LayoutConfig::from_toml_str("").unwrap(), LayoutConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = LayoutConfig::from_toml_str(
            r#"
            [landscape]
            height = 400.0
            radius_range = [30.0, 80.0]

            [tension]
            threshold = 40.0

            [fingerprint.uniqueness]
            mode = "placeholder"
            value = 70.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.landscape.height, 400.0);
        assert_eq!(cfg.landscape.width, 800.0);
        assert_eq!(cfg.landscape.radius_range, [30.0, 80.0]);
        assert_eq!(cfg.tension.threshold, 40.0);
        assert_eq!(cfg.tension.link_distance, 150.0);
        assert_eq!(
            cfg.fingerprint.uniqueness,
            UniquenessPolicy::Placeholder { value: 70.0 }
        );
        assert_eq!(cfg.quotes.limit, 4);
    }

    #[test]
    fn bad_toml_is_an_error_with_context() {
        let err = LayoutConfig::from_toml_str("landscape = 3").unwrap_err();
        assert!(format!("{err:#}").contains("parsing layout config"));
    }

    #[test]
    fn missing_file_falls_back() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = LayoutConfig::load_or_default(&tmp.path().join("nope.toml"));
        assert_eq!(cfg, LayoutConfig::default());
    }

    #[serial_test::serial]
    #[test]
    fn env_overrides_path() {
        env::remove_var(ENV_LANDSCAPE_CONFIG_PATH);
        assert_eq!(resolve_path(), PathBuf::from(DEFAULT_LANDSCAPE_CONFIG_PATH));
        env::set_var(ENV_LANDSCAPE_CONFIG_PATH, "/tmp/x.toml");
        assert_eq!(resolve_path(), PathBuf::from("/tmp/x.toml"));
        env::remove_var(ENV_LANDSCAPE_CONFIG_PATH);
    }
}
