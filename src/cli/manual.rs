use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use gcpeak::chromatogram::GasChromatogram;
use gcpeak::detection::PolynomialBaseline;
use gcpeak::record::{load_records, save_records};

use super::config::Config;
use super::print_table;

/// Arguments of the `manual` command
pub struct ManualRequest {
    pub input: PathBuf,
    pub record: usize,
    pub peaks: Vec<f64>,
    pub baseline: Option<Vec<f64>>,
    pub delete: Vec<f64>,
    pub comment: Option<String>,
    pub output: Option<PathBuf>,
}

fn index_at(gc: &GasChromatogram, time: f64) -> Result<usize> {
    gc.trace()
        .closest_index(time)
        .with_context(|| format!("Record {} has an empty trace", gc.id()))
}

/// Apply deletions and manual picks to one record and save the file
pub fn run(config: &Config, request: ManualRequest) -> Result<()> {
    let mut records = load_records(&request.input)
        .with_context(|| format!("Failed to load records from {}", request.input.display()))?;
    let count = records.len();
    let gc = request
        .record
        .checked_sub(1)
        .and_then(|i| records.get_mut(i))
        .with_context(|| format!("Record {} not found, file holds {}", request.record, count))?;

    edit_record(gc, &request, config.baseline_degree())?;
    print_table(&gc.peak_table());

    let output = request.output.unwrap_or(request.input);
    save_records(&output, &records)
        .with_context(|| format!("Failed to save records to {}", output.display()))?;
    println!("Saved {} records to {}", records.len(), output.display());
    Ok(())
}

/// Comment, deletions, then integration of staged picks.
///
/// Existing peaks are only re-integrated when peak or baseline picks were
/// given; a comment or a deletion alone leaves every other area as it was.
fn edit_record(
    gc: &mut GasChromatogram,
    request: &ManualRequest,
    baseline_degree: usize,
) -> Result<()> {
    if let Some(comment) = &request.comment {
        gc.set_comment(comment.as_str());
    }

    for time in &request.delete {
        let index = index_at(gc, *time)?;
        match gc.delete_peak_at(index) {
            Some(deletion) => {
                println!(
                    "Deleted peak at {:.3} min",
                    deletion.removed.retention_time(gc.trace())
                );
                if let Some(warning) = deletion.warning {
                    warn!("{}", warning);
                }
            }
            None => warn!("No peak at {:.3} min", time),
        }
    }

    for pair in request.peaks.chunks_exact(2) {
        let start = index_at(gc, pair[0])?;
        let end = index_at(gc, pair[1])?;
        gc.stage_peak_start(start);
        gc.stage_peak_end(end);
    }
    if let Some(range) = &request.baseline {
        if let [start, end] = range[..] {
            gc.stage_baseline_start(index_at(gc, start)?);
            gc.stage_baseline_end(index_at(gc, end)?);
        }
    }

    if gc.picks().is_empty() {
        return Ok(());
    }

    let strategy = PolynomialBaseline::new(baseline_degree);
    let report = gc
        .process_manual(&strategy)
        .context("Manual integration failed")?;
    for warning in &report.warnings {
        warn!("{}", warning);
    }
    info!("Manual integration produced {} peaks", report.peak_count);
    Ok(())
}
