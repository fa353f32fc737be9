use anyhow::{Context, Result};
use std::path::PathBuf;

use gcpeak::record::{export_traces, load_records};

use super::print_table;

/// Display information about a record file
pub fn run(file: PathBuf, export_text: Option<PathBuf>, detailed: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let records =
        load_records(&file).with_context(|| format!("Failed to load {}", file.display()))?;

    println!("gcpeak Record File");
    println!("==================");
    println!("File: {}", file.display());
    println!("Records: {}", records.len());
    println!();

    for (i, gc) in records.iter().enumerate() {
        let trace = gc.trace();
        let config = gc.config();

        println!("Record {} ({})", i + 1, gc.id());
        println!("  Samples: {}", trace.len());
        if let (Some(first), Some(last)) = (trace.times().first(), trace.times().last()) {
            println!("  Time range: {:.3} - {:.3} min", first, last);
        }
        println!(
            "  Thresholds: height {}, gradient {}",
            config.thresholds.height, config.thresholds.gradient
        );
        println!("  Area method: {}", config.area_method);
        println!("  Processed: {}", if gc.is_processed() { "yes" } else { "no" });
        println!("  Baseline points: {}", gc.baseline_indices().len());
        println!("  Peaks: {}", gc.peaks().len());
        println!();

        let table = gc.peak_table();
        if detailed {
            println!("{}", table.to_detailed_string());
        } else {
            print_table(&table);
        }
    }

    if let Some(text) = export_text {
        export_traces(&text, records.iter().map(|gc| gc.trace()))
            .with_context(|| format!("Failed to export traces to {}", text.display()))?;
        println!("Exported {} traces to {}", records.len(), text.display());
    }

    Ok(())
}
