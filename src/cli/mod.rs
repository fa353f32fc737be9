use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use gcpeak::detection::AreaMethod;

mod config;
mod demo;
mod detect;
mod info;
mod manual;

use config::DetectionOverrides;

/// gcpeak - Gas Chromatography Peak Detection
#[derive(Parser)]
#[command(name = "gcpeak")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Area integration method.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AreaMethodArg {
    /// Baseline-corrected sum divided by the peak's elapsed time
    Addition,
    /// Trapezoidal integral over time
    Trapezoidal,
}

impl From<AreaMethodArg> for AreaMethod {
    fn from(arg: AreaMethodArg) -> Self {
        match arg {
            AreaMethodArg::Addition => AreaMethod::Addition,
            AreaMethodArg::Trapezoidal => AreaMethod::Trapezoidal,
        }
    }
}

/// Threshold flags shared by the processing commands.
#[derive(clap::Args, Debug, Default)]
pub struct ThresholdArgs {
    /// Height threshold above baseline
    #[arg(long, value_name = "H")]
    height: Option<f64>,

    /// Gradient threshold
    #[arg(long, value_name = "G")]
    gradient: Option<f64>,

    /// Area integration method
    #[arg(long, value_enum)]
    area_method: Option<AreaMethodArg>,
}

impl From<&ThresholdArgs> for DetectionOverrides {
    fn from(args: &ThresholdArgs) -> Self {
        Self {
            height_threshold: args.height,
            gradient_threshold: args.gradient,
            area_method: args.area_method.map(AreaMethod::from),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Detect peaks in a text trace file or reprocess a record file
    Detect {
        /// Input file (.gcard records or space separated `time intensity` text)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Save the processed records to this file
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Write the peak tables as CSV
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,

        /// Instrument name for traces read from text
        #[arg(long)]
        instrument: Option<String>,

        /// Comment for traces read from text
        #[arg(long)]
        comment: Option<String>,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Integrate manually picked peaks of one record
    Manual {
        /// Input record file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Record number within the file (1-based)
        #[arg(short, long, default_value_t = 1)]
        record: usize,

        /// Peak boundaries in minutes (repeatable)
        #[arg(long, num_args = 2, value_names = ["START", "END"], action = clap::ArgAction::Append)]
        peak: Vec<f64>,

        /// Restrict the baseline fit to this time range in minutes
        #[arg(long, num_args = 2, value_names = ["START", "END"])]
        baseline: Option<Vec<f64>>,

        /// Delete the peak containing this time before integrating (repeatable)
        #[arg(long, value_name = "TIME", action = clap::ArgAction::Append)]
        delete: Vec<f64>,

        /// Replace the record comment
        #[arg(long)]
        comment: Option<String>,

        /// Output record file (defaults to overwriting the input)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Generate demo chromatograms through the acquisition pipeline
    Demo {
        /// Output record file
        #[arg(value_name = "OUTPUT", default_value = "demo_gc_runs.gcard")]
        output: PathBuf,

        /// Number of runs to generate
        #[arg(short = 'n', long, default_value_t = 3)]
        runs: usize,

        /// Also export the raw traces as text
        #[arg(long, value_name = "FILE")]
        text: Option<PathBuf>,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Display the records and peak tables of a record file
    Info {
        /// Input record file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Export the raw traces as text
        #[arg(long, value_name = "FILE")]
        export_text: Option<PathBuf>,

        /// Show areas at full precision
        #[arg(long)]
        detailed: bool,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Detect {
            input,
            output,
            csv,
            instrument,
            comment,
            thresholds,
        } => detect::run(
            &config,
            input,
            output,
            csv,
            instrument,
            comment,
            DetectionOverrides::from(&thresholds),
        ),
        Commands::Manual {
            input,
            record,
            peak,
            baseline,
            delete,
            comment,
            output,
        } => manual::run(
            &config,
            manual::ManualRequest {
                input,
                record,
                peaks: peak,
                baseline,
                delete,
                comment,
                output,
            },
        ),
        Commands::Demo {
            output,
            runs,
            text,
            thresholds,
        } => demo::run(&config, output, runs, text, DetectionOverrides::from(&thresholds)),
        Commands::Info {
            file,
            export_text,
            detailed,
        } => info::run(file, export_text, detailed),
    }
}

/// Print a peak table, colored when the feature is enabled.
pub(crate) fn print_table(table: &gcpeak::chromatogram::PeakTable) {
    #[cfg(feature = "colorized_output")]
    {
        println!("{}", table.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", table);
    }
}
