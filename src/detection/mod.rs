//! # Peak Detection Module
//!
//! This module turns a [`Trace`](crate::trace::Trace) into peaks and a
//! baseline estimate.
//!
//! - [`detect`]: automatic scan driven by height and gradient thresholds
//! - [`detect_manual`]: integration of user-picked boundaries against a
//!   fitted baseline curve
//! - [`normalize`]: relative areas as a percentage of the total
//!
//! Every call receives an immutable [`DetectionConfig`]; nothing in this
//! module keeps state between calls.
//!
//! ## Area units
//!
//! The two [`AreaMethod`]s do not share units. `Addition` divides the summed
//! baseline-corrected intensity by the elapsed time of the peak, while
//! `Trapezoidal` is a true integral over time. Both are multiplied by
//! [`AREA_SCALE`]. Relative areas are comparable within one method only.
//!
//! ## Usage
//!
//! ```rust
//! use gcpeak::detection::{detect, DetectionConfig};
//! use gcpeak::trace::Trace;
//!
//! let times: Vec<f64> = (0..13).map(|i| i as f64).collect();
//! let intensities = vec![0., 0., 0., 0., 0., 1., 3., 5., 3., 1., 0., 0., 0.];
//! let trace = Trace::new(times, intensities)?;
//!
//! let detection = detect(&trace, &DetectionConfig::new(0.5, 0.3));
//! assert_eq!(detection.peaks.len(), 1);
//! assert_eq!(detection.peaks[0].peak_max, 7);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod auto;
mod baseline;
mod config;
mod error;
pub mod geometry;
mod manual;
mod normalize;
mod types;

#[cfg(test)]
mod tests;

pub use auto::{detect, find_end, EndCondition};
pub use baseline::{
    evaluate_polynomial, BaselineFitStrategy, PolynomialBaseline, DEFAULT_BASELINE_DEGREE,
};
pub use config::{
    AreaMethod, DetectionConfig, Thresholds, AREA_SCALE, DEFAULT_GRADIENT_THRESHOLD,
    DEFAULT_HEIGHT_THRESHOLD, DEFAULT_MIN_BASELINE_SAMPLES,
};
pub use error::DetectionError;
pub use manual::{boundary_pairs, detect_manual, merge_boundaries};
pub use normalize::normalize;
pub use types::{BaselineModel, Detection, Peak};
