//! Background acquisition pipeline.
//!
//! Samples stream in from the instrument while a run is in progress. They are
//! buffered on a dedicated worker thread and the detector only sees the trace
//! once the run is complete.
//!
//! ```text
//! ┌─────────────┐   bounded channel    ┌────────────────────┐   results    ┌──────────────┐
//! │ Instrument  │ ──AcquisitionEvent─▶ │ Acquisition worker │ ───────────▶ │ Presentation │
//! │ reader      │                      │ (buffer + detect)  │ ProcessedRun │ layer        │
//! └─────────────┘                      └────────────────────┘              └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use gcpeak::acquisition::{AcquisitionConfig, AcquisitionWorker};
//! use gcpeak::detection::DetectionConfig;
//!
//! let config =
//!     AcquisitionConfig::new(DetectionConfig::new(0.5, 0.3)).with_instrument_name("GC-1");
//! let worker = AcquisitionWorker::spawn(config)?;
//! let results = worker.results();
//!
//! for (i, y) in [0., 0., 0., 0., 0., 1., 3., 5., 3., 1., 0., 0., 0.].iter().enumerate() {
//!     worker.push_sample(i as f64, *y)?;
//! }
//! worker.complete_run(chrono::Utc::now(), None)?;
//!
//! let run = results.recv()??;
//! assert_eq!(run.chromatogram.peaks().len(), 1);
//! worker.finish()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::thread::{self, JoinHandle};

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::{debug, info, warn};

use crate::chromatogram::{AcquisitionInfo, GasChromatogram, ProcessingReport};
use crate::detection::DetectionConfig;
use crate::trace::{Trace, TraceError};

/// Default capacity of the sample channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Errors raised by the acquisition pipeline
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    /// A completed run did not form a valid trace
    #[error("Rejected run: {0}")]
    Trace(#[from] TraceError),

    /// The worker thread is gone
    #[error("Acquisition worker disconnected")]
    Disconnected,

    /// The worker thread could not be started
    #[error("Failed to spawn acquisition worker: {0}")]
    Spawn(String),

    /// The worker thread panicked
    #[error("Acquisition worker panicked")]
    ThreadPanicked,
}

/// Messages from the instrument reader to the worker
#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionEvent {
    /// One sample of the run in progress
    Sample {
        /// Retention time in minutes
        time: f64,
        /// Detector reading
        intensity: f64,
    },
    /// The run in progress is complete
    RunComplete {
        /// Completion time
        timestamp: DateTime<Utc>,
        /// Overrides the configured instrument name
        instrument_name: Option<String>,
    },
    /// Discard the run in progress
    Abort,
}

/// Worker configuration
#[derive(Debug, Clone)]
pub struct AcquisitionConfig {
    /// Configuration for the automatic detection pass
    pub detection: DetectionConfig,
    /// Comment attached to every chromatogram
    pub comment: String,
    /// Instrument name used when a run does not name one
    pub instrument_name: String,
    /// Capacity of the bounded sample channel
    pub channel_capacity: usize,
}

impl AcquisitionConfig {
    /// Configuration with default channel capacity and no names
    pub fn new(detection: DetectionConfig) -> Self {
        Self {
            detection,
            comment: String::new(),
            instrument_name: String::new(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Set the default instrument name
    pub fn with_instrument_name(mut self, name: impl Into<String>) -> Self {
        self.instrument_name = name.into();
        self
    }

    /// Set the run comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Set the sample channel capacity (at least 1)
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}

/// A finished run, ready to become a chromatogram
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedRun {
    /// Sample times
    pub times: Vec<f64>,
    /// Sample intensities
    pub intensities: Vec<f64>,
    /// Completion time
    pub timestamp: DateTime<Utc>,
    /// Instrument that produced the run
    pub instrument_name: String,
}

impl CompletedRun {
    /// Validate the samples and wrap them in an unprocessed chromatogram
    pub fn into_chromatogram(
        self,
        comment: &str,
        config: DetectionConfig,
    ) -> Result<GasChromatogram, TraceError> {
        let trace = Trace::new(self.times, self.intensities)?;
        let acquisition =
            AcquisitionInfo::new(self.timestamp, self.instrument_name).with_comment(comment);
        Ok(GasChromatogram::new(trace, acquisition, config))
    }
}

/// Samples of the run in progress
#[derive(Debug, Default)]
pub struct RunBuffer {
    times: Vec<f64>,
    intensities: Vec<f64>,
}

impl RunBuffer {
    /// Empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sample
    pub fn push(&mut self, time: f64, intensity: f64) {
        self.times.push(time);
        self.intensities.push(intensity);
    }

    /// Buffered sample count
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True when no sample is buffered
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Drop every buffered sample
    pub fn clear(&mut self) {
        self.times.clear();
        self.intensities.clear();
    }

    /// Take the buffered samples as a completed run, leaving the buffer empty
    pub fn complete(
        &mut self,
        timestamp: DateTime<Utc>,
        instrument_name: impl Into<String>,
    ) -> CompletedRun {
        CompletedRun {
            times: std::mem::take(&mut self.times),
            intensities: std::mem::take(&mut self.intensities),
            timestamp,
            instrument_name: instrument_name.into(),
        }
    }
}

/// A run after automatic processing
#[derive(Debug, Clone)]
pub struct ProcessedRun {
    /// The processed chromatogram
    pub chromatogram: GasChromatogram,
    /// Outcome of the detection pass
    pub report: ProcessingReport,
}

/// Counters reported when the worker shuts down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcquisitionStats {
    /// Samples received
    pub samples_received: usize,
    /// Runs turned into chromatograms
    pub runs_processed: usize,
    /// Runs rejected as invalid traces
    pub runs_rejected: usize,
    /// Runs discarded by an abort
    pub runs_aborted: usize,
}

/// Handle to the background acquisition thread.
///
/// Dropping the handle without calling [`finish`](Self::finish) still joins the
/// thread but logs a warning.
pub struct AcquisitionWorker {
    sender: Option<Sender<AcquisitionEvent>>,
    results: Receiver<Result<ProcessedRun, AcquisitionError>>,
    handle: Option<JoinHandle<AcquisitionStats>>,
}

impl AcquisitionWorker {
    /// Start the worker thread (named `gcpeak-acquisition`)
    pub fn spawn(config: AcquisitionConfig) -> Result<Self, AcquisitionError> {
        let (sender, receiver) = bounded::<AcquisitionEvent>(config.channel_capacity.max(1));
        let (result_sender, results) = unbounded();

        let handle = thread::Builder::new()
            .name("gcpeak-acquisition".to_string())
            .spawn(move || run_worker(config, receiver, result_sender))
            .map_err(|e| AcquisitionError::Spawn(e.to_string()))?;

        Ok(Self {
            sender: Some(sender),
            results,
            handle: Some(handle),
        })
    }

    fn send(&self, event: AcquisitionEvent) -> Result<(), AcquisitionError> {
        let sender = self.sender.as_ref().ok_or(AcquisitionError::Disconnected)?;
        sender.send(event).map_err(|_| AcquisitionError::Disconnected)
    }

    /// Queue one sample; blocks while the channel is full
    pub fn push_sample(&self, time: f64, intensity: f64) -> Result<(), AcquisitionError> {
        self.send(AcquisitionEvent::Sample { time, intensity })
    }

    /// Mark the run in progress as complete
    pub fn complete_run(
        &self,
        timestamp: DateTime<Utc>,
        instrument_name: Option<String>,
    ) -> Result<(), AcquisitionError> {
        self.send(AcquisitionEvent::RunComplete {
            timestamp,
            instrument_name,
        })
    }

    /// Discard the run in progress
    pub fn abort_run(&self) -> Result<(), AcquisitionError> {
        self.send(AcquisitionEvent::Abort)
    }

    /// Receiver of processed runs. Stays readable after [`finish`](Self::finish).
    pub fn results(&self) -> Receiver<Result<ProcessedRun, AcquisitionError>> {
        self.results.clone()
    }

    /// Close the channel, process any unfinished run and wait for the thread.
    pub fn finish(mut self) -> Result<AcquisitionStats, AcquisitionError> {
        self.sender.take();
        let handle = self.handle.take().ok_or(AcquisitionError::Disconnected)?;
        handle.join().map_err(|_| AcquisitionError::ThreadPanicked)
    }
}

impl Drop for AcquisitionWorker {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            warn!("AcquisitionWorker dropped without calling finish()");
            let _ = handle.join();
        }
    }
}

fn run_worker(
    config: AcquisitionConfig,
    events: Receiver<AcquisitionEvent>,
    results: Sender<Result<ProcessedRun, AcquisitionError>>,
) -> AcquisitionStats {
    let mut buffer = RunBuffer::new();
    let mut stats = AcquisitionStats::default();

    for event in events {
        match event {
            AcquisitionEvent::Sample { time, intensity } => {
                buffer.push(time, intensity);
                stats.samples_received += 1;
            }
            AcquisitionEvent::RunComplete {
                timestamp,
                instrument_name,
            } => {
                let name = instrument_name.unwrap_or_else(|| config.instrument_name.clone());
                let run = buffer.complete(timestamp, name);
                process_run(run, &config, &results, &mut stats);
            }
            AcquisitionEvent::Abort => {
                debug!("Discarding {} buffered samples", buffer.len());
                buffer.clear();
                stats.runs_aborted += 1;
            }
        }
    }

    if !buffer.is_empty() {
        info!("Channel closed with {} buffered samples, processing as a run", buffer.len());
        let run = buffer.complete(Utc::now(), config.instrument_name.clone());
        process_run(run, &config, &results, &mut stats);
    }
    stats
}

fn process_run(
    run: CompletedRun,
    config: &AcquisitionConfig,
    results: &Sender<Result<ProcessedRun, AcquisitionError>>,
    stats: &mut AcquisitionStats,
) {
    let outcome = match run.into_chromatogram(&config.comment, config.detection) {
        Ok(mut chromatogram) => {
            let report = chromatogram.find_peaks();
            stats.runs_processed += 1;
            Ok(ProcessedRun { chromatogram, report })
        }
        Err(e) => {
            warn!("Rejected run: {}", e);
            stats.runs_rejected += 1;
            Err(AcquisitionError::from(e))
        }
    };
    if results.send(outcome).is_err() {
        debug!("Result receiver dropped, discarding processed run");
    }
}
