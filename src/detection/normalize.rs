use super::{DetectionError, Peak};

/// Fill in each peak's relative area as a percentage of the total.
///
/// On failure no peak is modified. An empty list is left as is.
pub fn normalize(peaks: &mut [Peak]) -> Result<(), DetectionError> {
    if peaks.is_empty() {
        return Ok(());
    }

    let total: f64 = peaks.iter().map(|p| p.peak_area).sum();
    if total == 0.0 || !total.is_finite() {
        return Err(DetectionError::Normalization(format!(
            "total peak area is {}",
            total
        )));
    }

    let relative: Vec<f64> = peaks.iter().map(|p| 100.0 * p.peak_area / total).collect();
    if let Some(i) = relative.iter().position(|r| !r.is_finite()) {
        return Err(DetectionError::Normalization(format!(
            "relative area of peak {} is not finite",
            i + 1
        )));
    }

    for (peak, value) in peaks.iter_mut().zip(relative) {
        peak.relative_peak_area = value;
    }
    Ok(())
}
