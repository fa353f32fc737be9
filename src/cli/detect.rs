use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use gcpeak::chromatogram::{AcquisitionInfo, GasChromatogram};
use gcpeak::record::{
    import_traces, load_records, save_records, with_record_extension, RECORD_EXTENSION,
};

use super::config::{Config, DetectionOverrides};
use super::print_table;

fn is_record_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(RECORD_EXTENSION)
}

/// Detect peaks in every trace of `input`
pub fn run(
    config: &Config,
    input: PathBuf,
    output: Option<PathBuf>,
    csv: Option<PathBuf>,
    instrument: Option<String>,
    comment: Option<String>,
    overrides: DetectionOverrides,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("File does not exist: {}", input.display());
    }
    let detection = config.detection_config(overrides)?;

    let mut chromatograms = if is_record_file(&input) {
        load_records(&input)
            .with_context(|| format!("Failed to load records from {}", input.display()))?
    } else {
        let traces = import_traces(&input)
            .with_context(|| format!("Failed to read traces from {}", input.display()))?;
        let instrument = instrument.unwrap_or_else(|| config.instrument_name("unknown"));
        let comment = comment.unwrap_or_else(|| config.comment());
        traces
            .into_iter()
            .map(|trace| {
                let acquisition = AcquisitionInfo::new(Utc::now(), instrument.clone())
                    .with_comment(comment.clone());
                GasChromatogram::new(trace, acquisition, detection)
            })
            .collect()
    };

    for gc in &mut chromatograms {
        let report = gc.reprocess_with(detection);
        for warning in &report.warnings {
            warn!("Record {}: {}", gc.id(), warning);
        }
    }
    info!(
        "Processed {} chromatograms (height {}, gradient {}, {} areas)",
        chromatograms.len(),
        detection.thresholds.height,
        detection.thresholds.gradient,
        detection.area_method
    );

    for gc in &chromatograms {
        print_table(&gc.peak_table());
    }

    if let Some(csv) = csv {
        let mut file =
            File::create(&csv).with_context(|| format!("Failed to create {}", csv.display()))?;
        for gc in &chromatograms {
            gc.peak_table()
                .write_csv(&mut file)
                .context("Failed to write peak table")?;
            writeln!(file)?;
        }
        info!("Wrote peak tables to {}", csv.display());
    }

    if let Some(output) = output {
        let output = with_record_extension(output);
        save_records(&output, &chromatograms)
            .with_context(|| format!("Failed to save records to {}", output.display()))?;
        println!("Saved {} records to {}", chromatograms.len(), output.display());
    }

    Ok(())
}
