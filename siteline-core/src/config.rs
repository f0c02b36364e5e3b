//! Application configuration.
//!
//! Loaded from `<config dir>/siteline/siteline.toml`. Every section is
//! optional; a missing file yields the defaults.

use std::path::{Path, PathBuf};

use etcetera::BaseStrategy;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::overlay::OverlaySize;
use crate::portal::{PortalRoot, PORTAL_ROOT_ID};

/// Directory under the platform config dir holding `siteline.toml`.
pub const APP_DIR: &str = "siteline";
pub const CONFIG_FILE: &str = "siteline.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SitelineConfig {
    pub window: WindowConfig,
    pub logging: LoggingConfig,
    pub overlay: OverlayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_file: Option<PathBuf>,
    pub level: String,
    /// Log lines containing any of these are dropped.
    pub suppressed_patterns: Vec<String>,
}

/// Overlay layer settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Id of the shared mount point overlays render into.
    pub portal_root_id: String,
    /// Size used by dialogs that do not ask for one.
    pub default_size: OverlaySize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Siteline".to_string(),
            width: 1280.0,
            height: 860.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: Some(std::env::temp_dir().join("siteline.log")),
            level: "info".to_string(),
            suppressed_patterns: vec![
                "SelectionDidChange".to_string(),
                "Dispatched unknown event".to_string(),
                "mousemove".to_string(),
                "pointermove".to_string(),
            ],
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            portal_root_id: PORTAL_ROOT_ID.to_string(),
            default_size: OverlaySize::default(),
        }
    }
}

impl SitelineConfig {
    /// Platform location of the config file, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        match etcetera::choose_base_strategy() {
            Ok(strategy) => Some(strategy.config_dir().join(APP_DIR).join(CONFIG_FILE)),
            Err(err) => {
                log::warn!("Cannot resolve config directory: {err}");
                None
            }
        }
    }

    /// Load from [`Self::default_path`].
    ///
    /// A missing file gives the defaults; a malformed one is an error.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    #[must_use]
    pub fn with_window_size(mut self, width: f64, height: f64) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.logging.log_file = Some(path.into());
        self
    }

    /// Set the log level (e.g. "info", "debug").
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    #[must_use]
    pub fn with_portal_root_id(mut self, id: impl Into<String>) -> Self {
        self.overlay.portal_root_id = id.into();
        self
    }

    #[must_use]
    pub fn with_default_size(mut self, size: OverlaySize) -> Self {
        self.overlay.default_size = size;
        self
    }

    /// The configured portal mount point.
    pub fn portal_root(&self) -> PortalRoot {
        PortalRoot::new(self.overlay.portal_root_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = SitelineConfig::default();
        assert_eq!(config.window.title, "Siteline");
        assert!((config.window.width - 1280.0).abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.overlay.portal_root_id, "portal-root");
        assert_eq!(config.overlay.default_size, OverlaySize::Medium);
    }

    #[test]
    fn builder_methods_override_defaults() {
        let config = SitelineConfig::default()
            .with_window_title("Site office")
            .with_window_size(800.0, 600.0)
            .with_log_level("debug")
            .with_log_file("/var/log/siteline.log")
            .with_portal_root_id("overlay-root")
            .with_default_size(OverlaySize::Large);

        assert_eq!(config.window.title, "Site office");
        assert!((config.window.height - 600.0).abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.log_file, Some(PathBuf::from("/var/log/siteline.log")));
        assert_eq!(config.portal_root().id(), "overlay-root");
        assert_eq!(config.overlay.default_size, OverlaySize::Large);
    }

    #[test]
    fn deserialize_partial_config() {
        let toml_str = r#"
[window]
title = "custom"

[overlay]
default_size = "lg"
"#;
        let config = toml::from_str::<SitelineConfig>(toml_str).expect("should deserialize");
        assert_eq!(config.window.title, "custom");
        // Width should be default
        assert!((config.window.width - 1280.0).abs() < f64::EPSILON);
        assert_eq!(config.overlay.default_size, OverlaySize::Large);
        assert_eq!(config.overlay.portal_root_id, PORTAL_ROOT_ID);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[logging]\nlevel = \"trace\"\nsuppressed_patterns = []").expect("write");

        let config = SitelineConfig::load_from(file.path()).expect("should load");
        assert_eq!(config.logging.level, "trace");
        assert!(config.logging.suppressed_patterns.is_empty());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[overlay]\ndefault_size = \"huge\"").expect("write");

        let err = SitelineConfig::load_from(file.path()).expect_err("unknown size");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_from_nonexistent_path_returns_error() {
        let result = SitelineConfig::load_from(Path::new("/nonexistent/siteline.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
