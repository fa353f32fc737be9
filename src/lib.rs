//! # gcpeak - Gas Chromatography Peak Detection
//!
//! `gcpeak` turns the raw signal of a gas-chromatography run into an analytical
//! record: a baseline estimate and a list of peaks with boundaries, apex, area
//! and relative area.
//!
//! ## Key Features
//!
//! - **Automatic Detection**: a single scan driven by a height and a gradient
//!   threshold separates baseline from signal and splits overlapping peaks at
//!   the valley between them.
//!
//! - **Manual Integration**: user-picked peak boundaries are integrated against
//!   a least-squares polynomial baseline fitted through every uncovered sample.
//!
//! - **Record Management**: chromatograms carry their acquisition metadata and
//!   can be reprocessed, edited and saved to versioned `.gcard` files.
//!
//! - **Acquisition Pipeline**: a background worker buffers samples from the
//!   instrument and processes each run as soon as it completes.
//!
//! ## Quick Start
//!
//! ```rust
//! use gcpeak::prelude::*;
//!
//! let times: Vec<f64> = (0..13).map(|i| i as f64 * 0.1).collect();
//! let intensities = vec![0., 0., 0., 0., 0., 1., 3., 5., 3., 1., 0., 0., 0.];
//! let trace = Trace::new(times, intensities)?;
//!
//! let mut gc = GasChromatogram::new(
//!     trace,
//!     AcquisitionInfo::new(chrono::Utc::now(), "GC-1"),
//!     DetectionConfig::new(0.5, 0.3),
//! );
//! let report = gc.find_peaks();
//! assert_eq!(report.peak_count, 1);
//!
//! println!("{}", gc.peak_table());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`trace`]: validated time/intensity samples with their gradient
//! - [`detection`]: automatic and manual peak detection, area normalization
//! - [`chromatogram`]: the record aggregate, peak tables and the record store
//! - [`acquisition`]: background worker fed by the instrument reader
//! - [`record`]: `.gcard` persistence and plain-text trace files

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![allow(clippy::too_many_arguments)]

pub mod acquisition;
pub mod chromatogram;
pub mod detection;
pub mod record;
pub mod trace;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::acquisition::{AcquisitionConfig, AcquisitionWorker, ProcessedRun};
    pub use crate::chromatogram::{
        AcquisitionInfo, ChromatogramStore, GasChromatogram, PeakTable, ProcessingReport,
    };
    pub use crate::detection::{
        detect, detect_manual, normalize, AreaMethod, BaselineFitStrategy, Detection,
        DetectionConfig, DetectionError, Peak, PolynomialBaseline, Thresholds,
    };
    pub use crate::record::{load_records, save_records, RecordError};
    pub use crate::trace::{Trace, TraceError};
}
