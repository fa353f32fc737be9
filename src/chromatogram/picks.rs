//! Staging area for manually picked peak boundaries and baseline selection.

use log::debug;

/// Picks collected before a manual processing pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualPicks {
    boundaries: Vec<usize>,
    baseline: Vec<usize>,
}

impl ManualPicks {
    /// Empty staging area
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a peak start. A start that is still waiting for its end is replaced.
    pub fn push_start(&mut self, index: usize) {
        if self.start_pending() {
            debug!("Replacing pending peak start {:?} with {}", self.boundaries.last(), index);
            self.boundaries.pop();
        }
        self.boundaries.push(index);
    }

    /// Stage a peak end. Only accepted when a start is pending.
    pub fn push_end(&mut self, index: usize) -> bool {
        if !self.start_pending() {
            return false;
        }
        self.boundaries.push(index);
        true
    }

    /// Start a new baseline selection, discarding any previous one
    pub fn baseline_start(&mut self, index: usize) {
        self.baseline.clear();
        self.baseline.push(index);
    }

    /// Complete the baseline selection. Only accepted after a baseline start.
    pub fn baseline_end(&mut self, index: usize) -> bool {
        if self.baseline.len() != 1 {
            return false;
        }
        self.baseline.push(index);
        true
    }

    /// True while the last staged peak start has no end
    pub fn start_pending(&self) -> bool {
        self.boundaries.len() % 2 == 1
    }

    /// Flat list of staged indices, start/end alternating
    pub fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    /// Completed baseline selection, if any
    pub fn baseline_selection(&self) -> Option<(usize, usize)> {
        match self.baseline[..] {
            [a, b] => Some((a, b)),
            _ => None,
        }
    }

    /// True when nothing is staged
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty() && self.baseline.is_empty()
    }

    /// Drop every staged pick
    pub fn clear(&mut self) {
        self.boundaries.clear();
        self.baseline.clear();
    }
}
