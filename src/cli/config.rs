//! TOML configuration file support.
//!
//! Detection settings can be kept in a file instead of repeated on every call:
//!
//! ```toml
//! # gcpeak.toml
//! [detection]
//! height_threshold = 0.02
//! gradient_threshold = 0.004
//! area_method = "trapezoidal"
//! min_baseline_samples = 10
//! baseline_degree = 5
//!
//! [acquisition]
//! instrument_name = "GC-1"
//! comment = "column B"
//! ```
//!
//! Command-line flags override file values, which override the defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use gcpeak::detection::{AreaMethod, DetectionConfig, DEFAULT_BASELINE_DEGREE};

/// Root configuration structure for gcpeak.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Detection settings.
    #[serde(default)]
    pub detection: DetectionSection,

    /// Acquisition metadata defaults.
    #[serde(default)]
    pub acquisition: AcquisitionSection,
}

/// The `[detection]` section.
#[derive(Debug, Default, Deserialize)]
pub struct DetectionSection {
    /// Minimum rise above baseline that starts a peak.
    pub height_threshold: Option<f64>,

    /// Minimum slope that starts a peak.
    pub gradient_threshold: Option<f64>,

    /// `addition` or `trapezoidal`.
    pub area_method: Option<AreaMethod>,

    /// Baseline window and minimum trace length.
    pub min_baseline_samples: Option<usize>,

    /// Degree of the manual baseline polynomial.
    pub baseline_degree: Option<usize>,
}

/// The `[acquisition]` section.
#[derive(Debug, Default, Deserialize)]
pub struct AcquisitionSection {
    /// Instrument name for imported or generated traces.
    pub instrument_name: Option<String>,

    /// Comment for imported or generated traces.
    pub comment: Option<String>,
}

/// Detection values given on the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetectionOverrides {
    pub height_threshold: Option<f64>,
    pub gradient_threshold: Option<f64>,
    pub area_method: Option<AreaMethod>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load from `path` if given, else use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Combine command-line overrides, file values and defaults.
    pub fn detection_config(&self, overrides: DetectionOverrides) -> Result<DetectionConfig> {
        let defaults = DetectionConfig::default();
        let section = &self.detection;

        let height = overrides
            .height_threshold
            .or(section.height_threshold)
            .unwrap_or(defaults.thresholds.height);
        let gradient = overrides
            .gradient_threshold
            .or(section.gradient_threshold)
            .unwrap_or(defaults.thresholds.gradient);
        if !(height.is_finite() && height > 0.0) || !(gradient.is_finite() && gradient > 0.0) {
            anyhow::bail!(
                "Thresholds must be positive numbers (height {}, gradient {})",
                height,
                gradient
            );
        }

        Ok(DetectionConfig::new(height, gradient)
            .with_area_method(
                overrides
                    .area_method
                    .or(section.area_method)
                    .unwrap_or(defaults.area_method),
            )
            .with_min_baseline_samples(
                section
                    .min_baseline_samples
                    .unwrap_or(defaults.min_baseline_samples),
            ))
    }

    /// Degree of the manual baseline polynomial.
    pub fn baseline_degree(&self) -> usize {
        self.detection.baseline_degree.unwrap_or(DEFAULT_BASELINE_DEGREE)
    }

    /// Instrument name, falling back to `default`.
    pub fn instrument_name(&self, default: &str) -> String {
        self.acquisition
            .instrument_name
            .clone()
            .unwrap_or_else(|| default.to_string())
    }

    /// Comment, empty if unset.
    pub fn comment(&self) -> String {
        self.acquisition.comment.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [detection]
            height_threshold = 0.02
            gradient_threshold = 0.004
            area_method = "trapezoidal"
            min_baseline_samples = 20
            baseline_degree = 3

            [acquisition]
            instrument_name = "GC-2"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.detection.height_threshold, Some(0.02));
        assert_eq!(config.detection.area_method, Some(AreaMethod::Trapezoidal));
        assert_eq!(config.baseline_degree(), 3);
        assert_eq!(config.instrument_name("GC-1"), "GC-2");
        assert_eq!(config.comment(), "");

        let detection = config.detection_config(DetectionOverrides::default()).unwrap();
        assert_eq!(detection.thresholds.gradient, 0.004);
        assert_eq!(detection.min_baseline_samples, 20);
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::from_str("[detection]\nheight_threshold = 0.02\n").unwrap();
        let overrides = DetectionOverrides {
            height_threshold: Some(0.5),
            area_method: Some(AreaMethod::Trapezoidal),
            ..Default::default()
        };

        let detection = config.detection_config(overrides).unwrap();
        assert_eq!(detection.thresholds.height, 0.5);
        assert_eq!(detection.thresholds.gradient, DetectionConfig::default().thresholds.gradient);
        assert_eq!(detection.area_method, AreaMethod::Trapezoidal);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.detection.height_threshold, None);
        assert_eq!(
            config.detection_config(DetectionOverrides::default()).unwrap(),
            DetectionConfig::default()
        );
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        let overrides = DetectionOverrides {
            gradient_threshold: Some(0.0),
            ..Default::default()
        };
        assert!(Config::default().detection_config(overrides).is_err());
    }
}
