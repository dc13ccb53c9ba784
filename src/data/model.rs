use std::fmt;

use super::error::EmptyBatch;

// ---------------------------------------------------------------------------
// SweepPoint – one row of an instrument export
// ---------------------------------------------------------------------------

/// A single measured frequency point. Frequency is always finite and > 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub frequency_hz: f64,
    pub s11_db: f64,
    pub s21_db: f64,
}

// ---------------------------------------------------------------------------
// Sweep – one parsed file
// ---------------------------------------------------------------------------

/// A labelled, non-empty series of points in source-row order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    pub label: String,
    pub points: Vec<SweepPoint>,
}

impl Sweep {
    pub fn new(label: impl Into<String>, points: Vec<SweepPoint>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn frequencies(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.frequency_hz).collect()
    }
}

// ---------------------------------------------------------------------------
// MeasurementSet – all sweeps of one load batch
// ---------------------------------------------------------------------------

/// Sweeps keyed by label in load order, plus the shared frequency axis.
///
/// Alignment between sweeps is positional: index `i` of every sweep is
/// assumed to be the same nominal frequency. Lengths are not checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSet {
    sweeps: Vec<Sweep>,
    frequency_axis: Vec<f64>,
}

impl MeasurementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sweep. The first sweep ever inserted anchors the frequency
    /// axis. A sweep whose label already exists replaces the old one in
    /// place and returns it.
    pub fn insert(&mut self, sweep: Sweep) -> Option<Sweep> {
        if self.sweeps.is_empty() {
            self.frequency_axis = sweep.frequencies();
        }
        match self.sweeps.iter_mut().find(|s| s.label == sweep.label) {
            Some(slot) => Some(std::mem::replace(slot, sweep)),
            None => {
                self.sweeps.push(sweep);
                None
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&Sweep> {
        self.sweeps.iter().find(|s| s.label == label)
    }

    pub fn sweeps(&self) -> &[Sweep] {
        &self.sweeps
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.sweeps.iter().map(|s| s.label.as_str())
    }

    pub fn frequency_axis(&self) -> &[f64] {
        &self.frequency_axis
    }

    pub fn len(&self) -> usize {
        self.sweeps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sweeps.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CompensationResult
// ---------------------------------------------------------------------------

/// Compensated S21 (dB) per label, in the set's load order.
///
/// The reference label is included; its curve is zero wherever the
/// reflection-loss model is defined.
#[derive(Debug, Clone, PartialEq)]
pub struct CompensationResult {
    pub reference: String,
    pub curves: Vec<(String, Vec<f64>)>,
}

impl CompensationResult {
    pub fn get(&self, label: &str) -> Option<&[f64]> {
        self.curves
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| c.as_slice())
    }

    /// Curves for every label except the reference, the ones worth plotting
    /// and exporting.
    pub fn non_reference(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.curves
            .iter()
            .filter(|(l, _)| *l != self.reference)
            .map(|(l, c)| (l.as_str(), c.as_slice()))
    }
}

// ---------------------------------------------------------------------------
// Load report – per-file outcome of a batch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Loaded { points: usize },
    Failed(String),
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Loaded { points } => write!(f, "{points} data points"),
            FileOutcome::Failed(_) => write!(f, "Load Failed"),
        }
    }
}

/// Result of loading a batch: an outcome per submitted file (submission
/// order) and the set built from the successes.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub files: Vec<(String, FileOutcome)>,
    pub set: MeasurementSet,
}

impl LoadReport {
    pub fn attempted(&self) -> usize {
        self.files.len()
    }

    pub fn succeeded(&self) -> usize {
        self.files
            .iter()
            .filter(|(_, o)| matches!(o, FileOutcome::Loaded { .. }))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().filter_map(|(label, o)| match o {
            FileOutcome::Failed(reason) => Some((label.as_str(), reason.as_str())),
            FileOutcome::Loaded { .. } => None,
        })
    }

    /// A batch succeeds when at least one sweep was parsed.
    pub fn is_success(&self) -> bool {
        self.succeeded() > 0
    }

    pub fn into_set(self) -> Result<MeasurementSet, EmptyBatch> {
        if self.is_success() {
            Ok(self.set)
        } else {
            Err(EmptyBatch {
                attempted: self.attempted(),
            })
        }
    }
}
