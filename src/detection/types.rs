use serde::{Deserialize, Serialize};

use crate::trace::Trace;

use super::DetectionError;

/// A single detected or manually integrated peak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Index of the first sample of the peak
    pub peak_start: usize,

    /// Index of the last sample of the peak
    pub peak_end: usize,

    /// Index of the apex
    pub peak_max: usize,

    /// Scaled area (see [`AREA_SCALE`](super::AREA_SCALE))
    pub peak_area: f64,

    /// Local baseline level under this peak
    pub peak_baseline: f64,

    /// Percentage of the total peak area of the trace
    #[serde(default)]
    pub relative_peak_area: f64,
}

impl Peak {
    /// `(start, end)` index pair
    pub fn bounds(&self) -> (usize, usize) {
        (self.peak_start, self.peak_end)
    }

    /// True if `index` lies within `[start, end]`
    pub fn contains(&self, index: usize) -> bool {
        index >= self.peak_start && index <= self.peak_end
    }

    /// Retention time of the apex in minutes
    pub fn retention_time(&self, trace: &Trace) -> f64 {
        trace.times()[self.peak_max]
    }
}

/// Estimated baseline value for every index of a trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaselineModel(Vec<f64>);

impl BaselineModel {
    /// Wrap one value per trace index
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Constant baseline over `len` samples
    pub fn flat(len: usize, level: f64) -> Self {
        Self(vec![level; len])
    }

    /// Baseline values, one per trace index
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Baseline at `index`
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Number of covered indices
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no index is covered
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Output of one detection pass
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Peaks in order of detection (automatic) or by start index (manual)
    pub peaks: Vec<Peak>,

    /// Baseline covering every trace index
    pub baseline: BaselineModel,

    /// Indices not covered by any peak
    pub baseline_indices: Vec<usize>,

    /// Non-fatal conditions met while producing this result
    pub warnings: Vec<DetectionError>,
}

impl Detection {
    /// True if any warning was raised
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Indices of `0..len` not covered by any inclusive `[start, end]` interval
pub(crate) fn uncovered_indices(len: usize, intervals: &[(usize, usize)]) -> Vec<usize> {
    let mut covered = vec![false; len];
    for &(start, end) in intervals {
        for flag in covered.iter_mut().take(end.saturating_add(1)).skip(start) {
            *flag = true;
        }
    }
    covered
        .iter()
        .enumerate()
        .filter_map(|(i, &c)| (!c).then_some(i))
        .collect()
}
