//! # Chromatogram Module
//!
//! [`GasChromatogram`] is the aggregate the rest of the crate works with: one
//! immutable [`Trace`](crate::trace::Trace), its acquisition metadata, the
//! detection configuration, and the results of the last processing pass.
//!
//! ## Operations
//!
//! - automatic processing and reprocessing with new thresholds
//! - manual processing of staged boundary picks against a fitted baseline
//! - clearing peaks or baseline, deleting a single peak with renormalization
//! - peak table output for display and copying
//!
//! [`ChromatogramStore`] holds many records and guarantees that a record is
//! processed by at most one caller at a time.

mod error;
mod gas_chromatogram;
mod picks;
mod report;
mod store;
mod types;


pub use error::StoreError;
pub use gas_chromatogram::GasChromatogram;
pub use picks::ManualPicks;
pub use report::{PeakRow, PeakTable, CSV_HEADER};
pub use store::ChromatogramStore;
pub use types::{AcquisitionInfo, PeakDeletion, ProcessingReport};
