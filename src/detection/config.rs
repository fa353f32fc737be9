use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of leading samples averaged into the initial baseline, and the
/// minimum trace length that is analyzed at all.
pub const DEFAULT_MIN_BASELINE_SAMPLES: usize = 10;

/// Default height threshold above baseline (detector units)
pub const DEFAULT_HEIGHT_THRESHOLD: f64 = 0.01;

/// Default gradient threshold (detector units per sample)
pub const DEFAULT_GRADIENT_THRESHOLD: f64 = 0.002;

/// Factor applied to every computed peak area before it is stored.
///
/// Both area methods use the same factor so their magnitudes stay comparable
/// in the peak table, even though their units differ.
pub const AREA_SCALE: f64 = 100.0;

/// How a peak's area is integrated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaMethod {
    /// Sum of baseline-corrected intensities divided by the elapsed time of
    /// the peak. This is an average height, not an integral.
    #[default]
    Addition,
    /// Trapezoidal integral of baseline-corrected intensity over time
    Trapezoidal,
}

impl AreaMethod {
    /// Lowercase name used in configuration files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaMethod::Addition => "addition",
            AreaMethod::Trapezoidal => "trapezoidal",
        }
    }
}

impl fmt::Display for AreaMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AreaMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "addition" => Ok(AreaMethod::Addition),
            "trapezoidal" => Ok(AreaMethod::Trapezoidal),
            other => Err(format!(
                "unknown area method '{}' (expected 'addition' or 'trapezoidal')",
                other
            )),
        }
    }
}

/// Height and gradient thresholds used by the automatic scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum rise above the running baseline for a peak start, and the
    /// maximum distance above baseline for a clean peak end
    pub height: f64,
    /// Minimum slope that starts a peak; a fifth of it bounds the slope at a
    /// clean peak end
    pub gradient: f64,
}

impl Thresholds {
    /// Create a threshold pair
    pub fn new(height: f64, gradient: f64) -> Self {
        Self { height, gradient }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT_THRESHOLD,
            gradient: DEFAULT_GRADIENT_THRESHOLD,
        }
    }
}

/// Immutable configuration passed into every detection call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Threshold pair for the automatic scan
    pub thresholds: Thresholds,

    /// Integration method for peak areas
    #[serde(default)]
    pub area_method: AreaMethod,

    /// Baseline window size and minimum analyzable trace length
    #[serde(default = "default_min_baseline_samples")]
    pub min_baseline_samples: usize,
}

fn default_min_baseline_samples() -> usize {
    DEFAULT_MIN_BASELINE_SAMPLES
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            area_method: AreaMethod::default(),
            min_baseline_samples: DEFAULT_MIN_BASELINE_SAMPLES,
        }
    }
}

impl DetectionConfig {
    /// Configuration with the given thresholds and default everything else
    pub fn new(height_threshold: f64, gradient_threshold: f64) -> Self {
        Self {
            thresholds: Thresholds::new(height_threshold, gradient_threshold),
            ..Default::default()
        }
    }

    /// Replace the area method
    pub fn with_area_method(mut self, area_method: AreaMethod) -> Self {
        self.area_method = area_method;
        self
    }

    /// Replace the baseline window size (clamped to at least one sample)
    pub fn with_min_baseline_samples(mut self, samples: usize) -> Self {
        self.min_baseline_samples = samples.max(1);
        self
    }

    /// Replace the thresholds
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Baseline window size, never zero
    pub(crate) fn baseline_window(&self) -> usize {
        self.min_baseline_samples.max(1)
    }
}
