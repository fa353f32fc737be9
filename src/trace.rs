//! # Trace Module
//!
//! A [`Trace`] is the raw signal of one acquisition run: strictly increasing
//! retention times (minutes) paired with detector intensities. The first
//! derivative of the intensity series is computed once at construction and
//! travels with the trace, so every detection pass sees the same gradient.
//!
//! Traces are immutable. Reprocessing a chromatogram never touches its trace.

use serde::{Deserialize, Serialize};

/// Errors that can occur while building a trace
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TraceError {
    /// Time and intensity arrays have different lengths
    #[error("Array length mismatch: {time_len} times, {intensity_len} intensities")]
    LengthMismatch {
        /// Number of time points
        time_len: usize,
        /// Number of intensity points
        intensity_len: usize,
    },

    /// A time or intensity value is NaN or infinite
    #[error("Non-finite {array} value at index {index}")]
    NonFiniteValue {
        /// Which array held the value ("time" or "intensity")
        array: &'static str,
        /// Offending sample index
        index: usize,
    },

    /// Time does not strictly increase at the given index
    #[error("Time must strictly increase: time[{index}] = {value} follows {previous}")]
    NonIncreasingTime {
        /// Offending sample index
        index: usize,
        /// Time at `index`
        value: f64,
        /// Time at `index - 1`
        previous: f64,
    },
}

/// Paired time/intensity samples from a single acquisition run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrace", into = "RawTrace")]
pub struct Trace {
    times: Vec<f64>,
    intensities: Vec<f64>,
    gradient: Vec<f64>,
}

/// Serialized shape of a trace; the gradient is derived and never persisted.
#[derive(Serialize, Deserialize)]
struct RawTrace {
    times: Vec<f64>,
    intensities: Vec<f64>,
}

impl TryFrom<RawTrace> for Trace {
    type Error = TraceError;

    fn try_from(raw: RawTrace) -> Result<Self, Self::Error> {
        Trace::new(raw.times, raw.intensities)
    }
}

impl From<Trace> for RawTrace {
    fn from(trace: Trace) -> Self {
        RawTrace {
            times: trace.times,
            intensities: trace.intensities,
        }
    }
}

impl Trace {
    /// Create a trace, validating lengths, finiteness and time ordering.
    pub fn new(times: Vec<f64>, intensities: Vec<f64>) -> Result<Self, TraceError> {
        if times.len() != intensities.len() {
            return Err(TraceError::LengthMismatch {
                time_len: times.len(),
                intensity_len: intensities.len(),
            });
        }

        if let Some(index) = times.iter().position(|t| !t.is_finite()) {
            return Err(TraceError::NonFiniteValue { array: "time", index });
        }
        if let Some(index) = intensities.iter().position(|y| !y.is_finite()) {
            return Err(TraceError::NonFiniteValue {
                array: "intensity",
                index,
            });
        }

        for (index, pair) in times.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(TraceError::NonIncreasingTime {
                    index: index + 1,
                    value: pair[1],
                    previous: pair[0],
                });
            }
        }

        let gradient = gradient(&intensities);
        Ok(Self {
            times,
            intensities,
            gradient,
        })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True when the trace holds no samples
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Retention times in minutes
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Detector intensities
    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    /// First derivative of intensity with respect to sample index
    pub fn gradient(&self) -> &[f64] {
        &self.gradient
    }

    /// Mean of all intensities (0.0 for an empty trace)
    pub fn mean_intensity(&self) -> f64 {
        if self.intensities.is_empty() {
            return 0.0;
        }
        self.intensities.iter().sum::<f64>() / self.intensities.len() as f64
    }

    /// Index of the sample whose time is closest to `time`.
    ///
    /// Used to turn a clicked retention time into a boundary index. Returns
    /// `None` for an empty trace.
    pub fn closest_index(&self, time: f64) -> Option<usize> {
        let pos = self.times.partition_point(|&t| t < time);
        match (pos.checked_sub(1), self.times.get(pos)) {
            (None, None) => None,
            (None, Some(_)) => Some(pos),
            (Some(prev), None) => Some(prev),
            (Some(prev), Some(&next)) => {
                if (time - self.times[prev]).abs() <= (next - time).abs() {
                    Some(prev)
                } else {
                    Some(pos)
                }
            }
        }
    }
}

/// Discrete derivative with unit spacing.
///
/// Interior points use the centered difference, the two boundaries use
/// one-sided differences.
pub fn gradient(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let mut out = Vec::with_capacity(n);
            out.push(values[1] - values[0]);
            for i in 1..n - 1 {
                out.push((values[i + 1] - values[i - 1]) / 2.0);
            }
            out.push(values[n - 1] - values[n - 2]);
            out
        }
    }
}
