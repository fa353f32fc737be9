//! Automatic peak detection.
//!
//! A single left-to-right scan alternates between two states:
//!
//! ```text
//!            start found                    clean end / not found
//! SeekingStart ─────────▶ InPeak(start) ─────────────────────────▶ SeekingStart
//!      ▲                       │  ▲
//!      └──── trace exhausted   │  │ valley: the end index is the next start
//!                              └──┘
//! ```
//!
//! While seeking a start, every sample close enough to the running baseline
//! joins the baseline set and the running baseline is re-derived from the most
//! recent baseline samples. Inside a peak the baseline is frozen.

use log::{debug, warn};

use crate::trace::Trace;

use super::geometry::build_peak;
use super::normalize::normalize;
use super::types::uncovered_indices;
use super::{BaselineModel, Detection, DetectionConfig, DetectionError, Peak, Thresholds};

/// How the search for a peak end terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCondition {
    /// Signal returned to baseline at this index
    CleanEnd(usize),
    /// Signal rose again before returning to baseline; the index is shared
    /// by this peak's end and the next peak's start
    Valley(usize),
    /// Trace ended before either condition
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekingStart(usize),
    InPeak(usize),
}

/// Running baseline estimate maintained while seeking peak starts
struct BaselineTracker<'a> {
    intensities: &'a [f64],
    window: usize,
    indices: Vec<usize>,
    level: f64,
    running: Vec<Option<f64>>,
}

impl<'a> BaselineTracker<'a> {
    fn new(intensities: &'a [f64], window: usize) -> Self {
        let seed = &intensities[..window.min(intensities.len())];
        let level = if seed.is_empty() {
            0.0
        } else {
            seed.iter().sum::<f64>() / seed.len() as f64
        };
        Self {
            intensities,
            window,
            indices: vec![0],
            level,
            running: vec![None; intensities.len()],
        }
    }

    fn level(&self) -> f64 {
        self.level
    }

    /// Record the level in effect at `index`, then consider the sample as
    /// baseline and refresh the running level.
    fn observe(&mut self, index: usize, height_threshold: f64) {
        self.running[index] = Some(self.level);
        let accept = self.intensities[index] < self.level + 2.0 * height_threshold;
        if accept && self.indices.last().map_or(true, |&last| index > last) {
            self.indices.push(index);
        }

        let recent = &self.indices[self.indices.len().saturating_sub(self.window)..];
        self.level =
            recent.iter().map(|&i| self.intensities[i]).sum::<f64>() / recent.len() as f64;
    }

    /// Running baseline per index; indices never observed take the final level.
    fn into_values(self) -> Vec<f64> {
        let level = self.level;
        self.running.into_iter().map(|v| v.unwrap_or(level)).collect()
    }
}

/// Scan forward from `from` for the start of the next peak.
fn find_start(
    trace: &Trace,
    from: usize,
    thresholds: &Thresholds,
    tracker: &mut BaselineTracker<'_>,
) -> Option<usize> {
    let gradient = trace.gradient();
    let intensities = trace.intensities();

    for j in from..trace.len().saturating_sub(1) {
        if gradient[j] > thresholds.gradient
            && gradient[j + 1] > thresholds.gradient
            && intensities[j + 1] > tracker.level() + thresholds.height
        {
            return Some(j.saturating_sub(1));
        }
        tracker.observe(j, thresholds.height);
    }
    None
}

/// Scan forward from `start` for the end of the current peak.
///
/// The end is only searched for after the slope has turned negative once.
pub fn find_end(
    trace: &Trace,
    start: usize,
    baseline: f64,
    thresholds: &Thresholds,
) -> EndCondition {
    let gradient = trace.gradient();
    let intensities = trace.intensities();
    let mut downslope = false;

    for k in start..trace.len().saturating_sub(1) {
        if !downslope {
            if gradient[k] < 0.0 {
                downslope = true;
            }
        } else if gradient[k].abs() < thresholds.gradient / 5.0
            && intensities[k] < baseline + thresholds.height
        {
            return EndCondition::CleanEnd(k);
        } else if gradient[k] > 0.0 && gradient[k + 1] > 0.0 {
            return EndCondition::Valley(k);
        }
    }
    EndCondition::NotFound
}

/// Detect peaks automatically and normalize their areas.
///
/// Traces shorter than [`DetectionConfig::min_baseline_samples`] produce no
/// peaks, a flat baseline at the mean intensity and an
/// [`DetectionError::InsufficientData`] warning.
pub fn detect(trace: &Trace, config: &DetectionConfig) -> Detection {
    let n = trace.len();
    let window = config.baseline_window();
    if n < window {
        let warning = DetectionError::InsufficientData { len: n, min: window };
        warn!("{}", warning);
        return Detection {
            peaks: Vec::new(),
            baseline: BaselineModel::flat(n, trace.mean_intensity()),
            baseline_indices: (0..n).collect(),
            warnings: vec![warning],
        };
    }

    let thresholds = &config.thresholds;
    let mut tracker = BaselineTracker::new(trace.intensities(), window);
    let mut peaks: Vec<Peak> = Vec::new();
    let last = n - 1;
    let mut state = ScanState::SeekingStart(0);

    loop {
        match state {
            ScanState::SeekingStart(from) => {
                if from >= last {
                    break;
                }
                match find_start(trace, from, thresholds, &mut tracker) {
                    Some(start) => state = ScanState::InPeak(start),
                    None => break,
                }
            }
            ScanState::InPeak(start) => {
                let baseline = tracker.level();
                let (end, next) = match find_end(trace, start, baseline, thresholds) {
                    EndCondition::CleanEnd(k) => (k, ScanState::SeekingStart(k)),
                    EndCondition::Valley(k) => (k, ScanState::InPeak(k)),
                    EndCondition::NotFound => (last, ScanState::SeekingStart(last)),
                };
                let peak = build_peak(trace, start, end, baseline, config.area_method);
                debug!(
                    "Peak {} at [{}, {}], apex {}, baseline {:.5}, area {:.5}",
                    peaks.len() + 1,
                    peak.peak_start,
                    peak.peak_end,
                    peak.peak_max,
                    peak.peak_baseline,
                    peak.peak_area
                );
                peaks.push(peak);
                state = next;
            }
        }
    }

    let mut values = tracker.into_values();
    for peak in &peaks {
        for value in &mut values[peak.peak_start..=peak.peak_end] {
            *value = peak.peak_baseline;
        }
    }
    let intervals: Vec<(usize, usize)> = peaks.iter().map(Peak::bounds).collect();
    let baseline_indices = uncovered_indices(n, &intervals);

    let mut warnings = Vec::new();
    if let Err(e) = normalize(&mut peaks) {
        warn!("{}", e);
        warnings.push(e);
    }

    Detection {
        peaks,
        baseline: BaselineModel::new(values),
        baseline_indices,
        warnings,
    }
}
