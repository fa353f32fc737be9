use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use log::{info, warn};
use std::path::PathBuf;

use gcpeak::acquisition::{AcquisitionConfig, AcquisitionWorker};
use gcpeak::record::{export_traces, save_records, with_record_extension};

use super::config::{Config, DetectionOverrides};
use super::print_table;

/// Run length in minutes
const RUN_MINUTES: f64 = 8.0;

/// Sampling interval in minutes
const SAMPLE_INTERVAL: f64 = 0.01;

/// Component elution times (minutes), relative heights and widths
const COMPONENTS: [(f64, f64, f64); 4] = [
    (1.20, 0.80, 0.04),
    (2.35, 1.60, 0.06),
    (2.60, 0.90, 0.06),
    (5.10, 0.45, 0.09),
];

/// Generate demo runs, stream them through the acquisition worker and save
/// the processed records.
pub fn run(
    config: &Config,
    output: PathBuf,
    runs: usize,
    text: Option<PathBuf>,
    overrides: DetectionOverrides,
) -> Result<()> {
    info!("gcpeak Demo - Synthetic GC Runs");
    info!("===============================");

    let detection = config.detection_config(overrides)?;
    let acquisition = AcquisitionConfig::new(detection)
        .with_instrument_name(config.instrument_name("demo-gc"))
        .with_comment(config.comment());

    let worker =
        AcquisitionWorker::spawn(acquisition).context("Failed to start acquisition worker")?;
    let results = worker.results();
    let started = Utc::now();

    for run_index in 0..runs {
        let samples = generate_run(run_index);
        info!("Run {}: streaming {} samples", run_index + 1, samples.len());
        for (time, intensity) in samples {
            worker.push_sample(time, intensity)?;
        }
        let minutes = (RUN_MINUTES * (run_index + 1) as f64).round() as i64;
        worker.complete_run(started + Duration::minutes(minutes), None)?;
    }
    let stats = worker.finish().context("Acquisition worker failed")?;
    info!(
        "Acquisition finished: {} samples, {} runs processed, {} rejected",
        stats.samples_received, stats.runs_processed, stats.runs_rejected
    );

    let mut chromatograms = Vec::with_capacity(runs);
    for result in results.try_iter() {
        match result {
            Ok(run) => {
                for warning in &run.report.warnings {
                    warn!("{}", warning);
                }
                chromatograms.push(run.chromatogram);
            }
            Err(e) => warn!("{}", e),
        }
    }

    for gc in &chromatograms {
        print_table(&gc.peak_table());
    }

    let output = with_record_extension(output);
    save_records(&output, &chromatograms)
        .with_context(|| format!("Failed to save records to {}", output.display()))?;
    println!("Saved {} demo records to {}", chromatograms.len(), output.display());

    if let Some(text) = text {
        export_traces(&text, chromatograms.iter().map(|gc| gc.trace()))
            .with_context(|| format!("Failed to export traces to {}", text.display()))?;
        println!("Exported raw traces to {}", text.display());
    }

    Ok(())
}

/// One synthetic run: Gaussian components on a slowly drifting baseline with a
/// small deterministic ripple. Later runs are slightly more concentrated.
fn generate_run(run_index: usize) -> Vec<(f64, f64)> {
    let scale = 1.0 + 0.15 * run_index as f64;
    let samples = (RUN_MINUTES / SAMPLE_INTERVAL).round() as usize;

    (0..samples)
        .map(|i| {
            let t = i as f64 * SAMPLE_INTERVAL;
            let drift = 0.05 + 0.004 * t;
            let ripple = 0.0005 * (t * 47.0 + run_index as f64).sin();
            let signal: f64 = COMPONENTS
                .iter()
                .map(|&(center, height, width)| {
                    scale * height * (-(t - center).powi(2) / (2.0 * width * width)).exp()
                })
                .sum();
            (t, drift + ripple + signal)
        })
        .collect()
}
