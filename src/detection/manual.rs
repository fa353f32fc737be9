//! Integration of manually picked peak boundaries.
//!
//! Picked `(start, end)` pairs are merged with the boundaries of any peaks
//! already on the trace, a baseline curve is fitted through every sample not
//! covered by a peak, and each peak is then measured against the mean of the
//! fitted baseline across its own index range.

use log::{debug, info, warn};

use crate::trace::Trace;

use super::baseline::BaselineFitStrategy;
use super::geometry::build_peak;
use super::normalize::normalize;
use super::types::uncovered_indices;
use super::{BaselineModel, Detection, DetectionConfig, DetectionError};

/// Split a flat pick list into `(start, end)` pairs, validating each one.
pub fn boundary_pairs(
    boundaries: &[usize],
    len: usize,
) -> Result<Vec<(usize, usize)>, DetectionError> {
    if boundaries.len() % 2 != 0 {
        return Err(DetectionError::MalformedBoundary(format!(
            "expected start/end pairs but got {} indices",
            boundaries.len()
        )));
    }

    let pairs: Vec<(usize, usize)> = boundaries.chunks_exact(2).map(|c| (c[0], c[1])).collect();
    for &pair in &pairs {
        validate_pair(pair, len)?;
    }
    Ok(pairs)
}

fn validate_pair((start, end): (usize, usize), len: usize) -> Result<(), DetectionError> {
    if end >= len {
        return Err(DetectionError::MalformedBoundary(format!(
            "peak ({}, {}) extends past the last sample index {}",
            start,
            end,
            len.saturating_sub(1)
        )));
    }
    if start >= end {
        return Err(DetectionError::MalformedBoundary(format!(
            "peak ({}, {}) must start before it ends",
            start, end
        )));
    }
    Ok(())
}

/// Merge picked pairs with existing peak boundaries, sorted by start index.
pub fn merge_boundaries(
    picked: &[(usize, usize)],
    existing: &[(usize, usize)],
) -> Vec<(usize, usize)> {
    let mut merged: Vec<(usize, usize)> = picked.iter().chain(existing).copied().collect();
    merged.sort_unstable();
    merged
}

/// Resolve a baseline selection to a half-open index range within the trace.
fn baseline_range(
    selection: Option<(usize, usize)>,
    len: usize,
) -> Result<(usize, usize), DetectionError> {
    let Some((a, b)) = selection else {
        return Ok((0, len));
    };
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if hi > len || lo >= hi {
        return Err(DetectionError::MalformedBoundary(format!(
            "baseline range ({}, {}) is empty or outside 0..{}",
            a, b, len
        )));
    }
    Ok((lo, hi))
}

/// Integrate manually supplied peaks against a fitted baseline.
///
/// `boundaries` is a flat list of picked indices consumed as start/end pairs;
/// `existing` holds the boundaries of peaks already on the trace. The
/// baseline is fitted over `baseline_selection` (half-open, either order) or
/// the whole trace. Everything is validated before any work is done.
pub fn detect_manual(
    trace: &Trace,
    boundaries: &[usize],
    existing: &[(usize, usize)],
    baseline_selection: Option<(usize, usize)>,
    config: &DetectionConfig,
    strategy: &dyn BaselineFitStrategy,
) -> Result<Detection, DetectionError> {
    if boundaries.is_empty() && existing.is_empty() {
        return Err(DetectionError::NoInput);
    }

    let n = trace.len();
    let picked = boundary_pairs(boundaries, n)?;
    for &pair in existing {
        validate_pair(pair, n)?;
    }
    let (range_start, range_end) = baseline_range(baseline_selection, n)?;

    let intervals = merge_boundaries(&picked, existing);

    let baseline_indices: Vec<usize> = uncovered_indices(n, &intervals)
        .into_iter()
        .filter(|&i| i >= range_start && i < range_end)
        .collect();

    let base_times: Vec<f64> = baseline_indices.iter().map(|&i| trace.times()[i]).collect();
    let base_values: Vec<f64> = baseline_indices.iter().map(|&i| trace.intensities()[i]).collect();
    debug!(
        "Fitting {} baseline over {} points in [{}, {})",
        strategy.name(),
        baseline_indices.len(),
        range_start,
        range_end
    );
    let fitted = strategy.fit(&base_times, &base_values, trace.times())?;
    if fitted.len() != n {
        return Err(DetectionError::BaselineFit(format!(
            "{} produced {} values for {} samples",
            strategy.name(),
            fitted.len(),
            n
        )));
    }

    // Mean over [start, end) assumes evenly spaced samples.
    let mut peaks: Vec<_> = intervals
        .iter()
        .map(|&(start, end)| {
            let local = fitted[start..end].iter().sum::<f64>() / (end - start) as f64;
            build_peak(trace, start, end, local, config.area_method)
        })
        .collect();

    let mut warnings = Vec::new();
    if let Err(e) = normalize(&mut peaks) {
        warn!("{}", e);
        warnings.push(e);
    }

    info!(
        "Manually integrated {} peaks ({} picked, {} existing)",
        peaks.len(),
        picked.len(),
        existing.len()
    );

    Ok(Detection {
        peaks,
        baseline: BaselineModel::new(fitted),
        baseline_indices,
        warnings,
    })
}
