use super::*;
use crate::trace::Trace;

fn unit_spaced(intensities: Vec<f64>) -> Trace {
    let times = (0..intensities.len()).map(|i| i as f64).collect();
    Trace::new(times, intensities).unwrap()
}

fn single_peak_trace() -> Trace {
    unit_spaced(vec![0., 0., 0., 0., 0., 1., 3., 5., 3., 1., 0., 0., 0.])
}

/// Two bumps that dip to 3 between them without returning to baseline
fn valley_trace() -> Trace {
    let mut y = vec![0.0; 12];
    y.extend([1., 3., 5., 6., 5., 4., 3., 4., 5., 6., 5., 3., 1., 0.]);
    y.extend([0.0; 6]);
    unit_spaced(y)
}

fn gaussian_on_drift(len: usize, center: f64, sigma: f64, height: f64) -> Trace {
    let times: Vec<f64> = (0..len).map(|i| i as f64).collect();
    let intensities = times
        .iter()
        .map(|t| 0.1 + 0.01 * t + height * (-(t - center).powi(2) / (2.0 * sigma * sigma)).exp())
        .collect();
    Trace::new(times, intensities).unwrap()
}

#[test]
fn test_single_peak_scenario() {
    let trace = single_peak_trace();
    let detection = detect(&trace, &DetectionConfig::new(0.5, 0.3));

    assert_eq!(detection.peaks.len(), 1);
    let peak = &detection.peaks[0];
    assert_eq!(trace.intensities()[peak.peak_max], 5.0);
    assert_eq!(peak.peak_max, 7);
    assert_eq!(peak.bounds(), (3, 11));
    assert!(peak.peak_baseline.abs() < 1e-12);
    assert!((peak.relative_peak_area - 100.0).abs() < 1e-9);
    assert!(detection.warnings.is_empty());
}

#[test]
fn test_single_peak_areas() {
    let trace = single_peak_trace();

    let addition = detect(&trace, &DetectionConfig::new(0.5, 0.3));
    // (0+0+1+3+5+3+1+0) / (11 - 3) * 100
    assert!((addition.peaks[0].peak_area - 162.5).abs() < 1e-9);

    let trapezoidal = detect(
        &trace,
        &DetectionConfig::new(0.5, 0.3).with_area_method(AreaMethod::Trapezoidal),
    );
    assert!((trapezoidal.peaks[0].peak_area - 1300.0).abs() < 1e-9);
}

#[test]
fn test_baseline_model_covers_every_index() {
    let trace = single_peak_trace();
    let detection = detect(&trace, &DetectionConfig::new(0.5, 0.3));

    assert_eq!(detection.baseline.len(), trace.len());
    for value in detection.baseline.values() {
        assert!(value.abs() < 1e-12);
    }
    assert_eq!(detection.baseline_indices, vec![0, 1, 2, 12]);
}

#[test]
fn test_valley_splits_adjacent_peaks() {
    let trace = valley_trace();
    let detection = detect(&trace, &DetectionConfig::new(0.5, 0.3));

    assert_eq!(detection.peaks.len(), 2);
    let (first, second) = (&detection.peaks[0], &detection.peaks[1]);
    assert_eq!(first.peak_end, second.peak_start);
    assert_eq!(first.bounds(), (10, 19));
    assert_eq!(second.bounds(), (19, 26));
    assert_eq!(first.peak_max, 15);
    assert_eq!(second.peak_max, 21);

    let total: f64 = detection.peaks.iter().map(|p| p.relative_peak_area).sum();
    assert!((total - 100.0).abs() < 1e-9);
}

#[test]
fn test_peak_running_off_the_end_is_closed() {
    let mut y = vec![0.0; 12];
    y.extend([1., 2., 3., 4., 5.]);
    let trace = unit_spaced(y);
    let detection = detect(&trace, &DetectionConfig::new(0.5, 0.3));

    assert_eq!(detection.peaks.len(), 1);
    assert_eq!(detection.peaks[0].bounds(), (10, 16));
    assert_eq!(detection.peaks[0].peak_max, 15);
}

#[test]
fn test_short_trace_yields_flat_baseline() {
    let trace = unit_spaced(vec![1.0, 2.0, 6.0, 3.0]);
    let detection = detect(&trace, &DetectionConfig::new(0.5, 0.3));

    assert!(detection.peaks.is_empty());
    assert_eq!(detection.baseline, BaselineModel::flat(4, 3.0));
    assert_eq!(
        detection.warnings,
        vec![DetectionError::InsufficientData { len: 4, min: 10 }]
    );
}

#[test]
fn test_empty_trace() {
    let trace = Trace::new(Vec::new(), Vec::new()).unwrap();
    let detection = detect(&trace, &DetectionConfig::default());
    assert!(detection.peaks.is_empty());
    assert!(detection.baseline.is_empty());
}

#[test]
fn test_flat_trace_has_no_peaks() {
    let trace = unit_spaced(vec![0.2; 40]);
    let detection = detect(&trace, &DetectionConfig::new(0.05, 0.01));
    assert!(detection.peaks.is_empty());
    assert_eq!(detection.baseline_indices.len(), 40);
    assert!(detection.warnings.is_empty());
}

#[test]
fn test_detection_is_repeatable() {
    let trace = valley_trace();
    let config = DetectionConfig::new(0.5, 0.3);
    assert_eq!(detect(&trace, &config), detect(&trace, &config));
}

#[test]
fn test_find_end_conditions() {
    let thresholds = Thresholds::new(0.5, 0.3);
    let trace = single_peak_trace();
    assert_eq!(find_end(&trace, 3, 0.0, &thresholds), EndCondition::CleanEnd(11));

    let trace = valley_trace();
    assert_eq!(find_end(&trace, 10, 0.0, &thresholds), EndCondition::Valley(19));

    let rising = unit_spaced((0..12).map(|i| i as f64).collect());
    assert_eq!(find_end(&rising, 0, 0.0, &thresholds), EndCondition::NotFound);
}

#[test]
fn test_peak_max_averages_ties() {
    assert_eq!(geometry::peak_max(&[0.0, 5.0, 5.0, 5.0, 0.0], 0, 5), 2);
    assert_eq!(geometry::peak_max(&[5.0, 0.0, 5.0], 0, 3), 1);
    assert_eq!(geometry::peak_max(&[1.0, 4.0, 4.0, 0.0], 0, 4), 1);
    assert_eq!(geometry::peak_max(&[-3.0, -1.0, -2.0], 0, 3), 1);
}

#[test]
fn test_triangle_area_methods() {
    // Symmetric triangle of height 10 and base 20: analytic area 100.
    let mut y: Vec<f64> = (0..=20).map(|i| 10.0 - (i as f64 - 10.0).abs()).collect();
    y.extend([0.0; 3]);
    let trace = unit_spaced(y);
    let analytic = 100.0;

    let trapezoidal = geometry::peak_area(&trace, 0, 21, 0.0, AreaMethod::Trapezoidal);
    assert!((trapezoidal - analytic).abs() / analytic < 0.01);

    // Addition yields an average height; times the elapsed time it tracks the area.
    let addition = geometry::peak_area(&trace, 0, 21, 0.0, AreaMethod::Addition);
    let elapsed = trace.times()[21] - trace.times()[0];
    assert!((addition * elapsed - analytic).abs() / analytic < 0.01);
}

#[test]
fn test_normalize_sums_to_hundred() {
    let trace = valley_trace();
    let mut peaks = detect(&trace, &DetectionConfig::new(0.5, 0.3)).peaks;
    for peak in &mut peaks {
        peak.relative_peak_area = 0.0;
    }
    normalize(&mut peaks).unwrap();
    let total: f64 = peaks.iter().map(|p| p.relative_peak_area).sum();
    assert!((total - 100.0).abs() < 1e-9);
}

#[test]
fn test_normalize_zero_total_leaves_peaks_untouched() {
    let mut peaks = vec![
        Peak {
            peak_start: 0,
            peak_end: 2,
            peak_max: 1,
            peak_area: 4.0,
            peak_baseline: 0.0,
            relative_peak_area: 12.0,
        },
        Peak {
            peak_start: 3,
            peak_end: 5,
            peak_max: 4,
            peak_area: -4.0,
            peak_baseline: 0.0,
            relative_peak_area: 7.0,
        },
    ];
    let err = normalize(&mut peaks).unwrap_err();
    assert!(matches!(err, DetectionError::Normalization(_)));
    assert_eq!(peaks[0].relative_peak_area, 12.0);
    assert_eq!(peaks[1].relative_peak_area, 7.0);

    assert!(normalize(&mut []).is_ok());
}

#[test]
fn test_merge_boundaries() {
    let picked = boundary_pairs(&[10, 15], 20).unwrap();
    assert_eq!(merge_boundaries(&picked, &[(2, 5)]), vec![(2, 5), (10, 15)]);

    let picked = boundary_pairs(&[12, 14, 1, 3], 20).unwrap();
    assert_eq!(
        merge_boundaries(&picked, &[(6, 8)]),
        vec![(1, 3), (6, 8), (12, 14)]
    );
}

#[test]
fn test_boundary_validation() {
    assert!(matches!(
        boundary_pairs(&[1, 2, 3], 10),
        Err(DetectionError::MalformedBoundary(_))
    ));
    assert!(matches!(
        boundary_pairs(&[1, 10], 10),
        Err(DetectionError::MalformedBoundary(_))
    ));
    assert!(matches!(
        boundary_pairs(&[5, 5], 10),
        Err(DetectionError::MalformedBoundary(_))
    ));
}

#[test]
fn test_manual_requires_input() {
    let trace = single_peak_trace();
    let err = detect_manual(
        &trace,
        &[],
        &[],
        None,
        &DetectionConfig::default(),
        &PolynomialBaseline::default(),
    )
    .unwrap_err();
    assert_eq!(err, DetectionError::NoInput);
}

#[test]
fn test_manual_fits_drifting_baseline() {
    let trace = gaussian_on_drift(61, 30.0, 2.0, 5.0);
    let detection = detect_manual(
        &trace,
        &[20, 40],
        &[],
        None,
        &DetectionConfig::default(),
        &PolynomialBaseline::default(),
    )
    .unwrap();

    assert_eq!(detection.peaks.len(), 1);
    let peak = &detection.peaks[0];
    assert_eq!(peak.peak_max, 30);
    // Mean of 0.1 + 0.01 t over t = 20..40 (exclusive)
    assert!((peak.peak_baseline - 0.395).abs() < 1e-3);
    assert!((peak.relative_peak_area - 100.0).abs() < 1e-9);

    assert_eq!(detection.baseline.len(), trace.len());
    for (t, b) in trace.times().iter().zip(detection.baseline.values()) {
        assert!((b - (0.1 + 0.01 * t)).abs() < 1e-3);
    }
    assert!(!detection.baseline_indices.contains(&20));
    assert!(!detection.baseline_indices.contains(&40));
    assert!(detection.baseline_indices.contains(&41));
}

#[test]
fn test_manual_reuses_existing_peaks() {
    let trace = gaussian_on_drift(61, 30.0, 2.0, 5.0);
    let config = DetectionConfig::default();
    let strategy = PolynomialBaseline::default();

    let detection = detect_manual(&trace, &[5, 9], &[(20, 40)], None, &config, &strategy).unwrap();
    let bounds: Vec<_> = detection.peaks.iter().map(Peak::bounds).collect();
    assert_eq!(bounds, vec![(5, 9), (20, 40)]);

    let only_existing = detect_manual(&trace, &[], &[(20, 40)], None, &config, &strategy).unwrap();
    assert_eq!(only_existing.peaks.len(), 1);
}

#[test]
fn test_manual_baseline_range() {
    let trace = gaussian_on_drift(61, 30.0, 2.0, 5.0);
    let config = DetectionConfig::default();
    let strategy = PolynomialBaseline::default();

    let detection =
        detect_manual(&trace, &[20, 40], &[], Some((50, 10)), &config, &strategy).unwrap();
    assert_eq!(detection.baseline_indices.first(), Some(&10));
    assert_eq!(detection.baseline_indices.last(), Some(&49));

    let err = detect_manual(&trace, &[20, 40], &[], Some((5, 5)), &config, &strategy).unwrap_err();
    assert!(matches!(err, DetectionError::MalformedBoundary(_)));
}

#[test]
fn test_running_baseline_lags_one_sample() {
    let mut y = vec![0.0; 10];
    y.extend([1.0, 1.0]);
    let trace = unit_spaced(y);
    let detection = detect(&trace, &DetectionConfig::new(10.0, 10.0));

    assert!(detection.peaks.is_empty());
    assert_eq!(detection.baseline.len(), 12);
    // Index 10 keeps the level in effect before it joined the baseline set.
    let mut expected = vec![0.0; 11];
    expected.push(0.1);
    for (value, want) in detection.baseline.values().iter().zip(&expected) {
        assert!((value - want).abs() < 1e-12, "{:?}", detection.baseline);
    }
}
