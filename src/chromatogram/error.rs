use uuid::Uuid;

use crate::detection::DetectionError;

/// Errors raised by [`ChromatogramStore`](super::ChromatogramStore)
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record with this id
    #[error("No chromatogram with id {0}")]
    NotFound(Uuid),

    /// The record is already being processed
    #[error("Chromatogram {0} is busy")]
    Busy(Uuid),

    /// A thread panicked while holding a lock
    #[error("Lock poisoned: {0}")]
    Poisoned(String),

    /// Processing the record failed
    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),
}
