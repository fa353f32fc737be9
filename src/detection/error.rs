use crate::trace::TraceError;

/// Errors and warnings raised while detecting or quantifying peaks.
///
/// None of these are fatal. `InsufficientData` and `Normalization` are
/// reported next to a valid result as warnings; the others reject a request
/// before any state changes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DetectionError {
    /// Trace is shorter than the configured minimum sample count
    #[error("Trace has {len} samples, at least {min} are required for peak detection")]
    InsufficientData {
        /// Samples in the trace
        len: usize,
        /// Configured minimum
        min: usize,
    },

    /// Manual processing was requested with no picks and no existing peaks
    #[error("No manual peaks to process")]
    NoInput,

    /// Relative areas could not be computed
    #[error("Error normalizing peak areas: {0}")]
    Normalization(String),

    /// Manual boundaries or baseline selection are unusable
    #[error("Malformed peak boundaries: {0}")]
    MalformedBoundary(String),

    /// The baseline curve could not be fitted
    #[error("Baseline fit failed: {0}")]
    BaselineFit(String),

    /// Trace construction error
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),
}
