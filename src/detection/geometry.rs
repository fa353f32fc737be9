//! Apex and area computation shared by automatic and manual detection.

use crate::trace::Trace;

use super::{AreaMethod, Peak, AREA_SCALE};

/// Index of the maximum intensity in `[start, end)`.
///
/// When several samples share the maximum, their indices are averaged
/// (truncating) so the apex sits in the middle of a flat top.
#[allow(clippy::float_cmp)]
pub fn peak_max(intensities: &[f64], start: usize, end: usize) -> usize {
    let end = end.min(intensities.len());
    if start >= end {
        return start;
    }

    let mut max_value = f64::NEG_INFINITY;
    let mut index_sum = 0usize;
    let mut count = 0usize;
    for (index, &y) in intensities.iter().enumerate().take(end).skip(start) {
        if y > max_value {
            max_value = y;
            index_sum = index;
            count = 1;
        } else if y == max_value {
            index_sum += index;
            count += 1;
        }
    }
    index_sum / count
}

/// Unscaled area of `[start, end)` above a constant baseline.
pub fn peak_area(
    trace: &Trace,
    start: usize,
    end: usize,
    baseline: f64,
    method: AreaMethod,
) -> f64 {
    let times = trace.times();
    let intensities = trace.intensities();
    if start >= end || end >= times.len() {
        return 0.0;
    }

    match method {
        AreaMethod::Addition => {
            let sum: f64 = intensities[start..end].iter().map(|y| y - baseline).sum();
            sum / (times[end] - times[start])
        }
        AreaMethod::Trapezoidal => times[start..end]
            .windows(2)
            .zip(intensities[start..end].windows(2))
            .map(|(t, y)| (t[1] - t[0]) * ((y[0] - baseline) + (y[1] - baseline)) / 2.0)
            .sum(),
    }
}

/// Build a peak record for `[start, end]` with the given local baseline.
pub fn build_peak(
    trace: &Trace,
    start: usize,
    end: usize,
    baseline: f64,
    method: AreaMethod,
) -> Peak {
    Peak {
        peak_start: start,
        peak_end: end,
        peak_max: peak_max(trace.intensities(), start, end),
        peak_area: AREA_SCALE * peak_area(trace, start, end, baseline, method),
        peak_baseline: baseline,
        relative_peak_area: 0.0,
    }
}
