//! # Record Persistence
//!
//! Chromatograms are saved as `.gcard` files: a small JSON document with a
//! format version and a list of records. Every field other than the trace and
//! the acquisition timestamp has a default, so files written by older versions
//! keep loading as fields are added.
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "created": "2024-05-01T12:00:00Z",
//!   "records": [
//!     {
//!       "id": "…",
//!       "trace": { "times": [...], "intensities": [...] },
//!       "acquisition": { "timestamp": "…", "instrument_name": "GC-1", "comment": "" },
//!       "processing": {
//!         "thresholds": { "height": 0.01, "gradient": 0.002 },
//!         "area_method": "addition"
//!       },
//!       "baseline": [...],
//!       "baseline_indices": [...],
//!       "peaks": [...]
//!     }
//!   ]
//! }
//! ```
//!
//! Raw traces can also be exchanged as plain text, see [`read_traces`] and
//! [`write_traces`].

mod error;
mod file;
mod text;

#[cfg(test)]
mod tests;

/// Current record format version
pub const RECORD_FORMAT_VERSION: u32 = 1;

/// File extension of record files
pub const RECORD_EXTENSION: &str = "gcard";

pub use error::RecordError;
pub use file::{
    load_records, read_records, save_records, with_record_extension, write_records,
    ChromatogramRecord, RecordFile,
};
pub use text::{export_traces, import_traces, read_traces, write_traces};
