use log::{info, warn};
use uuid::Uuid;

use crate::detection::{
    detect, detect_manual, normalize, BaselineFitStrategy, BaselineModel, Detection,
    DetectionConfig, DetectionError, Peak, Thresholds,
};
use crate::trace::Trace;

use super::picks::ManualPicks;
use super::report::PeakTable;
use super::types::{AcquisitionInfo, PeakDeletion, ProcessingReport};

/// One acquisition run together with its processing state.
///
/// The trace never changes after construction. Peaks and baseline are
/// replaced as a whole by every processing pass; a pass that fails leaves
/// them as they were.
#[derive(Debug, Clone, PartialEq)]
pub struct GasChromatogram {
    id: Uuid,
    trace: Trace,
    acquisition: AcquisitionInfo,
    config: DetectionConfig,
    baseline: Option<BaselineModel>,
    baseline_indices: Vec<usize>,
    peaks: Vec<Peak>,
    picks: ManualPicks,
}

impl GasChromatogram {
    /// Unprocessed chromatogram with a fresh id
    pub fn new(trace: Trace, acquisition: AcquisitionInfo, config: DetectionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            trace,
            acquisition,
            config,
            baseline: None,
            baseline_indices: Vec::new(),
            peaks: Vec::new(),
            picks: ManualPicks::new(),
        }
    }

    /// Rebuild a chromatogram from persisted parts
    pub(crate) fn restore(
        id: Uuid,
        trace: Trace,
        acquisition: AcquisitionInfo,
        config: DetectionConfig,
        baseline: Option<BaselineModel>,
        baseline_indices: Vec<usize>,
        peaks: Vec<Peak>,
    ) -> Self {
        Self {
            id,
            trace,
            acquisition,
            config,
            baseline,
            baseline_indices,
            peaks,
            picks: ManualPicks::new(),
        }
    }

    /// Run automatic detection with the current configuration
    pub fn find_peaks(&mut self) -> ProcessingReport {
        let detection = detect(&self.trace, &self.config);
        let report = self.commit(detection);
        info!(
            "Found {} peaks in {} samples (height {}, gradient {})",
            report.peak_count,
            self.trace.len(),
            self.config.thresholds.height,
            self.config.thresholds.gradient
        );
        report
    }

    /// Clear results and re-run automatic detection with new thresholds
    pub fn reprocess(&mut self, thresholds: Thresholds) -> ProcessingReport {
        self.reprocess_with(self.config.with_thresholds(thresholds))
    }

    /// Clear results and re-run automatic detection with a new configuration
    pub fn reprocess_with(&mut self, config: DetectionConfig) -> ProcessingReport {
        self.clear_peaks();
        self.clear_baseline();
        self.config = config;
        self.find_peaks()
    }

    /// Integrate the staged picks together with the existing peaks.
    ///
    /// On success the staged picks are cleared. On failure nothing changes.
    pub fn process_manual(
        &mut self,
        strategy: &dyn BaselineFitStrategy,
    ) -> Result<ProcessingReport, DetectionError> {
        let existing: Vec<(usize, usize)> = self.peaks.iter().map(Peak::bounds).collect();
        let detection = detect_manual(
            &self.trace,
            self.picks.boundaries(),
            &existing,
            self.picks.baseline_selection(),
            &self.config,
            strategy,
        )?;
        let report = self.commit(detection);
        self.picks.clear();
        Ok(report)
    }

    fn commit(&mut self, detection: Detection) -> ProcessingReport {
        let Detection {
            peaks,
            baseline,
            baseline_indices,
            warnings,
        } = detection;
        self.peaks = peaks;
        self.baseline = Some(baseline);
        self.baseline_indices = baseline_indices;
        ProcessingReport {
            peak_count: self.peaks.len(),
            warnings,
        }
    }

    /// Stage a manual peak start
    pub fn stage_peak_start(&mut self, index: usize) {
        self.picks.push_start(index);
    }

    /// Stage a manual peak end; ignored unless a start is pending
    pub fn stage_peak_end(&mut self, index: usize) -> bool {
        self.picks.push_end(index)
    }

    /// Begin a baseline selection
    pub fn stage_baseline_start(&mut self, index: usize) {
        self.picks.baseline_start(index);
    }

    /// Complete the baseline selection
    pub fn stage_baseline_end(&mut self, index: usize) -> bool {
        self.picks.baseline_end(index)
    }

    /// Remove every peak
    pub fn clear_peaks(&mut self) {
        self.peaks.clear();
    }

    /// Remove the baseline model and the baseline index list
    pub fn clear_baseline(&mut self) {
        self.baseline = None;
        self.baseline_indices.clear();
    }

    /// Delete the first peak whose `[start, end]` contains `index` and
    /// renormalize the remaining ones.
    pub fn delete_peak_at(&mut self, index: usize) -> Option<PeakDeletion> {
        let position = self.peaks.iter().position(|p| p.contains(index))?;
        let removed = self.peaks.remove(position);
        let warning = normalize(&mut self.peaks).err();
        if let Some(e) = &warning {
            warn!("{}", e);
        }
        info!(
            "Deleted peak [{}, {}], {} remaining",
            removed.peak_start,
            removed.peak_end,
            self.peaks.len()
        );
        Some(PeakDeletion { removed, warning })
    }

    /// Replace the operator comment
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.acquisition.comment = comment.into();
    }

    /// Record id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Raw signal
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Acquisition metadata
    pub fn acquisition(&self) -> &AcquisitionInfo {
        &self.acquisition
    }

    /// Configuration used by the last processing pass
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Current threshold pair
    pub fn thresholds(&self) -> Thresholds {
        self.config.thresholds
    }

    /// Baseline model, absent until processed or after clearing
    pub fn baseline(&self) -> Option<&BaselineModel> {
        self.baseline.as_ref()
    }

    /// Indices classified as baseline
    pub fn baseline_indices(&self) -> &[usize] {
        &self.baseline_indices
    }

    /// Current peaks
    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    /// Staged manual picks
    pub fn picks(&self) -> &ManualPicks {
        &self.picks
    }

    /// True once a processing pass has produced a baseline
    pub fn is_processed(&self) -> bool {
        self.baseline.is_some()
    }

    /// Retention time, area and relative area per peak
    pub fn peak_table(&self) -> PeakTable {
        PeakTable::new(self)
    }
}
