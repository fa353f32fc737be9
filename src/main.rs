//! # gcpeak
//!
//! Command-line front end for the gas-chromatography peak detector.
//!
//! ## Usage
//!
//! ```bash
//! # Detect peaks in a text trace file and save the records
//! gcpeak detect run.txt -o run.gcard --height 0.02 --gradient 0.004
//!
//! # Integrate manually picked peaks (times in minutes)
//! gcpeak manual run.gcard --peak 2.10 2.45 --baseline 0.5 6.0
//!
//! # Generate demo data
//! gcpeak demo demo.gcard
//!
//! # Show the peak tables of a record file
//! gcpeak info run.gcard
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
