//! # Config Module
//!
//! Tunable settings for a collage run, read from JSON.
//!
//! ## Lookup
//! 1. `--config <path>` on the command line
//! 2. `<config dir>/crop-collage/config.json` if it exists
//! 3. Built-in defaults
//!
//! Command-line flags override whatever was loaded. Every field is
//! optional in the file.
//!
//! ```json
//! {
//!   "palette": ["#ff3b30", "#007aff"],
//!   "face_threshold": 0.4,
//!   "coarse_threshold": 0.5,
//!   "canvas": { "width": 1400, "height": 800 }
//! }
//! ```

use crate::core::coloring::{GroupingMode, Palette};
use crate::core::layout::CanvasConfig;
use crate::core::matcher::DEFAULT_COARSE_THRESHOLD;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings for one collage run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollageConfig {
    /// Colors drawn for clusters
    pub palette: Palette,
    /// Face crops at or below this distance are similar
    pub face_threshold: f64,
    /// Object crops at or below this distance are similar
    pub object_threshold: f64,
    /// Parent images at or below this distance are near-duplicates
    pub coarse_threshold: f64,
    /// Number of parent images sampled per run
    pub sample: usize,
    pub canvas: CanvasConfig,
    pub grouping: GroupingMode,
    /// Fixed seed for sampling, colors and jitter
    pub seed: Option<u64>,
}

impl Default for CollageConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            face_threshold: 0.4,
            object_threshold: 0.25,
            coarse_threshold: DEFAULT_COARSE_THRESHOLD,
            sample: 200,
            canvas: CanvasConfig::default(),
            grouping: GroupingMode::default(),
            seed: None,
        }
    }
}

impl CollageConfig {
    /// Read and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load the per-user config file if there is one, else the defaults
    pub fn discover() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/crop-collage/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("crop-collage").join("config.json"))
    }

    /// Reject values no run could use
    pub fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = [
            ("face", self.face_threshold),
            ("object", self.object_threshold),
            ("coarse", self.coarse_threshold),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        let fraction = self.canvas.max_fraction;
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(ConfigError::InvalidCanvas {
                field: "max_fraction",
                value: fraction,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coloring::Color;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        let config = CollageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.coarse_threshold, 0.5);
        assert_eq!(config.sample, 200);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r##"{ "palette": ["#010203"], "coarse_threshold": 0.3, "canvas": { "width": 640 } }"##,
        )
        .unwrap();

        let config = CollageConfig::load(&path).unwrap();

        assert_eq!(config.palette.colors(), &[Color::rgb(1, 2, 3)]);
        assert_eq!(config.coarse_threshold, 0.3);
        assert_eq!(config.canvas.width, 640);
        assert_eq!(config.canvas.height, 800);
        assert_eq!(config.face_threshold, 0.4);
    }

    #[test]
    fn empty_palette_fails_to_parse() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "palette": [] }"#).unwrap();

        let result = CollageConfig::load(&path);

        match result {
            Err(ConfigError::ParseFailed { reason, .. }) => {
                assert!(reason.contains("at least one color"))
            }
            other => panic!("expected ParseFailed, got {:?}", other),
        }
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let config = CollageConfig {
            face_threshold: -0.1,
            ..CollageConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold { name: "face", .. })
        ));
    }

    #[test]
    fn oversized_canvas_fraction_is_rejected() {
        let mut config = CollageConfig::default();
        config.canvas.max_fraction = 1.5;

        let error = config.validate().unwrap_err();

        assert!(matches!(
            error,
            ConfigError::InvalidCanvas {
                field: "max_fraction",
                ..
            }
        ));
        assert!(error.to_string().contains("at most 1"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = CollageConfig::load(Path::new("/nonexistent/config.json"));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }

    #[test]
    fn grouping_mode_reads_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "grouping": "disjoint-set", "seed": 7 }"#).unwrap();

        let config = CollageConfig::load(&path).unwrap();

        assert_eq!(config.grouping, GroupingMode::DisjointSet);
        assert_eq!(config.seed, Some(7));
    }
}
