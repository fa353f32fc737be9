use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chromatogram::{AcquisitionInfo, GasChromatogram};
use crate::detection::{BaselineModel, DetectionConfig, Peak};
use crate::trace::Trace;

use super::{RecordError, RECORD_EXTENSION, RECORD_FORMAT_VERSION};

fn default_format_version() -> u32 {
    RECORD_FORMAT_VERSION
}

/// Persisted form of a [`GasChromatogram`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromatogramRecord {
    /// Record id
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Raw signal
    pub trace: Trace,

    /// Acquisition metadata
    pub acquisition: AcquisitionInfo,

    /// Detection configuration of the last processing pass
    #[serde(default)]
    pub processing: DetectionConfig,

    /// Baseline model, absent if never processed
    #[serde(default)]
    pub baseline: Option<BaselineModel>,

    /// Indices classified as baseline
    #[serde(default)]
    pub baseline_indices: Vec<usize>,

    /// Peaks
    #[serde(default)]
    pub peaks: Vec<Peak>,
}

impl From<&GasChromatogram> for ChromatogramRecord {
    fn from(gc: &GasChromatogram) -> Self {
        Self {
            id: gc.id(),
            trace: gc.trace().clone(),
            acquisition: gc.acquisition().clone(),
            processing: *gc.config(),
            baseline: gc.baseline().cloned(),
            baseline_indices: gc.baseline_indices().to_vec(),
            peaks: gc.peaks().to_vec(),
        }
    }
}

impl ChromatogramRecord {
    /// Check that baseline and peaks fit the stored trace
    pub fn validate(&self) -> Result<(), RecordError> {
        let n = self.trace.len();
        if let Some(baseline) = &self.baseline {
            if baseline.len() != n {
                return Err(RecordError::Inconsistent(format!(
                    "record {}: baseline has {} values for {} samples",
                    self.id,
                    baseline.len(),
                    n
                )));
            }
        }
        if let Some(&i) = self.baseline_indices.iter().find(|&&i| i >= n) {
            return Err(RecordError::Inconsistent(format!(
                "record {}: baseline index {} out of range",
                self.id, i
            )));
        }
        for peak in &self.peaks {
            let ordered = peak.peak_start <= peak.peak_max && peak.peak_max <= peak.peak_end;
            if !ordered || peak.peak_end >= n {
                return Err(RecordError::Inconsistent(format!(
                    "record {}: peak ({}, {}, {}) does not fit {} samples",
                    self.id, peak.peak_start, peak.peak_max, peak.peak_end, n
                )));
            }
        }
        Ok(())
    }

    /// Validate and turn into a chromatogram
    pub fn into_chromatogram(self) -> Result<GasChromatogram, RecordError> {
        self.validate()?;
        Ok(GasChromatogram::restore(
            self.id,
            self.trace,
            self.acquisition,
            self.processing,
            self.baseline,
            self.baseline_indices,
            self.peaks,
        ))
    }
}

/// Top-level contents of a record file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFile {
    /// Format version the file was written with
    #[serde(default = "default_format_version")]
    pub format_version: u32,

    /// When the file was written
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,

    /// Stored chromatograms, in save order
    pub records: Vec<ChromatogramRecord>,
}

impl RecordFile {
    /// File holding the given chromatograms
    pub fn new<'a>(chromatograms: impl IntoIterator<Item = &'a GasChromatogram>) -> Self {
        Self {
            format_version: RECORD_FORMAT_VERSION,
            created: Some(Utc::now()),
            records: chromatograms.into_iter().map(ChromatogramRecord::from).collect(),
        }
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse JSON and check the format version
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let file: RecordFile = serde_json::from_str(json)?;
        file.check_version()?;
        Ok(file)
    }

    fn check_version(&self) -> Result<(), RecordError> {
        if self.format_version > RECORD_FORMAT_VERSION {
            return Err(RecordError::UnsupportedVersion {
                found: self.format_version,
                supported: RECORD_FORMAT_VERSION,
            });
        }
        Ok(())
    }

    /// Validate every record and turn them into chromatograms
    pub fn into_chromatograms(self) -> Result<Vec<GasChromatogram>, RecordError> {
        self.records
            .into_iter()
            .map(ChromatogramRecord::into_chromatogram)
            .collect()
    }
}

/// Append the record extension to a path that has none
pub fn with_record_extension(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(RECORD_EXTENSION)
    }
}

/// Write chromatograms as a record file
pub fn write_records<'a, W: Write>(
    writer: W,
    chromatograms: impl IntoIterator<Item = &'a GasChromatogram>,
) -> Result<(), RecordError> {
    let file = RecordFile::new(chromatograms);
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, &file)?;
    writer.flush()?;
    debug!("Wrote {} records", file.records.len());
    Ok(())
}

/// Read chromatograms from a record file
pub fn read_records<R: Read>(reader: R) -> Result<Vec<GasChromatogram>, RecordError> {
    let file: RecordFile = serde_json::from_reader(BufReader::new(reader))?;
    file.check_version()?;
    file.into_chromatograms()
}

/// Save chromatograms to `path`
pub fn save_records<'a>(
    path: impl AsRef<Path>,
    chromatograms: impl IntoIterator<Item = &'a GasChromatogram>,
) -> Result<(), RecordError> {
    let path = path.as_ref();
    write_records(File::create(path)?, chromatograms)?;
    info!("Saved records to {}", path.display());
    Ok(())
}

/// Load every chromatogram stored at `path`
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<GasChromatogram>, RecordError> {
    let path = path.as_ref();
    let chromatograms = read_records(File::open(path)?)?;
    info!("Loaded {} records from {}", chromatograms.len(), path.display());
    Ok(chromatograms)
}
