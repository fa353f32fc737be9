use crate::trace::TraceError;

/// Errors that can occur while reading or writing records and trace files
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error serializing/deserializing JSON
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reading or writing delimited text
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Stored samples do not form a valid trace
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    /// Record file written by a newer format version
    #[error("Unsupported record format version {found} (supported up to {supported})")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },

    /// A line of a text trace file could not be parsed
    #[error("Invalid line {line}: {reason}")]
    InvalidLine {
        /// 1-based line number
        line: u64,
        /// What was wrong with it
        reason: String,
    },

    /// Stored results do not fit the stored trace
    #[error("Inconsistent record: {0}")]
    Inconsistent(String),
}
