use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detection::{DetectionError, Peak};

/// Acquisition metadata recorded with every chromatogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionInfo {
    /// When the run completed
    pub timestamp: DateTime<Utc>,

    /// Instrument or channel that produced the trace
    #[serde(default)]
    pub instrument_name: String,

    /// Free-form operator comment
    #[serde(default)]
    pub comment: String,
}

impl AcquisitionInfo {
    /// Metadata for a run completed at `timestamp` on `instrument_name`
    pub fn new(timestamp: DateTime<Utc>, instrument_name: impl Into<String>) -> Self {
        Self {
            timestamp,
            instrument_name: instrument_name.into(),
            comment: String::new(),
        }
    }

    /// Attach an operator comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

impl Default for AcquisitionInfo {
    fn default() -> Self {
        Self::new(Utc::now(), "")
    }
}

/// Summary of one processing pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingReport {
    /// Peaks on the chromatogram after processing
    pub peak_count: usize,

    /// Non-fatal conditions raised during processing
    pub warnings: Vec<DetectionError>,
}

impl ProcessingReport {
    /// True if processing raised any warning
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Outcome of deleting a peak
#[derive(Debug, Clone, PartialEq)]
pub struct PeakDeletion {
    /// The peak that was removed
    pub removed: Peak,

    /// Set when the remaining peaks could not be renormalized
    pub warning: Option<DetectionError>,
}
