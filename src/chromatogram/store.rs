//! Registry of chromatograms shared between the acquisition worker and the
//! presentation layer.
//!
//! Each record sits behind its own mutex. Operations take the lock with
//! `try_lock`, so a second request for a record that is still being processed
//! fails with [`StoreError::Busy`] instead of queueing behind it.

use std::sync::{Arc, Mutex, RwLock, TryLockError};

use log::debug;
use uuid::Uuid;

use crate::detection::{BaselineFitStrategy, Thresholds};

use super::error::StoreError;
use super::types::ProcessingReport;
use super::GasChromatogram;

struct StoreEntry {
    id: Uuid,
    record: Arc<Mutex<GasChromatogram>>,
}

/// Thread-safe, insertion-ordered collection of chromatograms
#[derive(Default)]
pub struct ChromatogramStore {
    entries: RwLock<Vec<StoreEntry>>,
}

impl ChromatogramStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chromatogram and return its id
    pub fn insert(&self, chromatogram: GasChromatogram) -> Result<Uuid, StoreError> {
        let id = chromatogram.id();
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Poisoned("store registry".to_string()))?;
        entries.push(StoreEntry {
            id,
            record: Arc::new(Mutex::new(chromatogram)),
        });
        debug!("Stored chromatogram {} ({} total)", id, entries.len());
        Ok(id)
    }

    /// Ids in insertion order
    pub fn ids(&self) -> Result<Vec<Uuid>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Poisoned("store registry".to_string()))?;
        Ok(entries.iter().map(|e| e.id).collect())
    }

    /// Number of stored chromatograms
    pub fn len(&self) -> Result<usize, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Poisoned("store registry".to_string()))?;
        Ok(entries.len())
    }

    /// True when the store holds nothing
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Remove a record. Fails with `Busy` while it is being processed.
    pub fn remove(&self, id: Uuid) -> Result<GasChromatogram, StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Poisoned("store registry".to_string()))?;
        let position = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let chromatogram = lock_record(id, &entries[position].record)?.clone();
        entries.remove(position);
        Ok(chromatogram)
    }

    fn record(&self, id: Uuid) -> Result<Arc<Mutex<GasChromatogram>>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Poisoned("store registry".to_string()))?;
        entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| Arc::clone(&e.record))
            .ok_or(StoreError::NotFound(id))
    }

    /// Run `f` with exclusive access to one record.
    ///
    /// The registry lock is released before `f` runs, so other records stay
    /// available while this one is busy.
    pub fn with_record<F, R>(&self, id: Uuid, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut GasChromatogram) -> R,
    {
        let record = self.record(id)?;
        let mut guard = lock_record(id, &record)?;
        Ok(f(&mut *guard))
    }

    /// Copy of a record
    pub fn snapshot(&self, id: Uuid) -> Result<GasChromatogram, StoreError> {
        self.with_record(id, |gc| gc.clone())
    }

    /// Re-run automatic detection on a record with new thresholds
    pub fn reprocess(
        &self,
        id: Uuid,
        thresholds: Thresholds,
    ) -> Result<ProcessingReport, StoreError> {
        self.with_record(id, |gc| gc.reprocess(thresholds))
    }

    /// Integrate the staged manual picks of a record
    pub fn process_manual(
        &self,
        id: Uuid,
        strategy: &dyn BaselineFitStrategy,
    ) -> Result<ProcessingReport, StoreError> {
        Ok(self.with_record(id, |gc| gc.process_manual(strategy))??)
    }
}

fn lock_record(
    id: Uuid,
    record: &Mutex<GasChromatogram>,
) -> Result<std::sync::MutexGuard<'_, GasChromatogram>, StoreError> {
    match record.try_lock() {
        Ok(guard) => Ok(guard),
        Err(TryLockError::WouldBlock) => Err(StoreError::Busy(id)),
        Err(TryLockError::Poisoned(_)) => {
            Err(StoreError::Poisoned(format!("chromatogram {}", id)))
        }
    }
}
