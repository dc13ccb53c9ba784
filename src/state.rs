use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use s21_compensator::data::compensate::compensate;
use s21_compensator::data::export::export_to_path;
use s21_compensator::data::extract::ExtractConfig;
#[cfg(test)]
use s21_compensator::data::loader::{load_batch, SourceFile};
use s21_compensator::data::loader::load_paths;
use s21_compensator::data::model::{CompensationResult, LoadReport, MeasurementSet};

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Persisted preferences
// ---------------------------------------------------------------------------

/// Settings kept across sessions through eframe storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub dark_mode: bool,
    pub extract: ExtractConfig,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    pub prefs: Preferences,

    /// Outcome of the last load batch (None until files are loaded).
    pub report: Option<LoadReport>,

    /// Label of the reference sweep as entered by the user.
    pub reference: String,

    /// Result of the last Process action.
    pub compensation: Option<CompensationResult>,

    /// Whether the charts were requested.
    pub show_charts: bool,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,
}

impl AppState {
    pub fn with_preferences(prefs: Preferences) -> Self {
        Self {
            prefs,
            ..Self::default()
        }
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        let text = text.into();
        match kind {
            StatusKind::Error => log::error!("{text}"),
            _ => log::info!("{text}"),
        }
        self.status = Some(Status { kind, text });
    }

    pub fn measurement_set(&self) -> Option<&MeasurementSet> {
        self.report
            .as_ref()
            .map(|r| &r.set)
            .filter(|set| !set.is_empty())
    }

    /// Load files picked from disk, replacing everything loaded before.
    pub fn load_paths(&mut self, paths: &[PathBuf]) {
        if paths.is_empty() {
            return;
        }
        if !self.begin_load(paths.len()) {
            return;
        }
        let report = load_paths(paths, &self.prefs.extract);
        self.finish_load(report);
    }

    /// Load in-memory files, replacing everything loaded before.
    #[cfg(test)]
    pub fn load_files(&mut self, files: &[SourceFile]) {
        if files.is_empty() {
            return;
        }
        if !self.begin_load(files.len()) {
            return;
        }
        let report = load_batch(files, &self.prefs.extract);
        self.finish_load(report);
    }

    fn begin_load(&mut self, n: usize) -> bool {
        self.clear();
        if let Err(e) = self.prefs.extract.validate() {
            self.set_status(StatusKind::Error, format!("Invalid settings: {e}"));
            return false;
        }
        self.set_status(StatusKind::Info, format!("Reading {n} files..."));
        true
    }

    fn finish_load(&mut self, report: LoadReport) {
        let (ok, total) = (report.succeeded(), report.attempted());
        if ok > 0 {
            self.set_status(
                StatusKind::Success,
                format!("{ok} of {total} files loaded successfully. Ready to process."),
            );
        } else {
            self.set_status(
                StatusKind::Error,
                format!(
                    "Failed to load any valid data from {total} files. Please check file format."
                ),
            );
        }
        self.report = Some(report);
    }

    /// Compensate all loaded sweeps against the chosen reference.
    pub fn process(&mut self) {
        let Some(set) = self.measurement_set() else {
            self.set_status(StatusKind::Error, "No data loaded.");
            return;
        };
        match compensate(set, &self.reference) {
            Ok(result) => {
                self.compensation = Some(result);
                self.set_status(
                    StatusKind::Success,
                    "Data processed successfully. Ready to plot.",
                );
            }
            Err(e) => {
                self.compensation = None;
                self.show_charts = false;
                self.set_status(StatusKind::Error, format!("Reference file '{}' not found.", e.label));
            }
        }
    }

    pub fn plot(&mut self) {
        if self.compensation.is_some() {
            self.show_charts = true;
            self.set_status(StatusKind::Success, "Charts generated.");
        }
    }

    pub fn export(&mut self, path: &Path) {
        let (Some(set), Some(result)) = (self.measurement_set(), self.compensation.as_ref()) else {
            self.set_status(StatusKind::Error, "No data to export.");
            return;
        };
        match export_to_path(path, set, result) {
            Ok(()) => self.set_status(
                StatusKind::Success,
                format!("CSV file saved to {}.", path.display()),
            ),
            Err(e) => self.set_status(StatusKind::Error, format!("Failed to export: {e}")),
        }
    }

    /// Drop loaded data, results and charts. Preferences are kept.
    pub fn clear(&mut self) {
        self.report = None;
        self.compensation = None;
        self.show_charts = false;
        self.status = None;
    }

    pub fn toggle_theme(&mut self) {
        self.prefs.dark_mode = !self.prefs.dark_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REF: &str = "!h\n!h\n!h\n!h\n!h\nFreq(Hz),S11,S21\n1e9,-10,-1\n2e9,-12,-1.5\n";
    const DUT: &str = "BEGIN\nFrequency,\"dB(S(1,1))\",\"dB(S(2,1))\"\n1e9,-8,-3\n2e9,-9,-4\nEND\n";

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.load_files(&[
            SourceFile::new("ref", REF),
            SourceFile::new("dut", DUT),
            SourceFile::new("junk", "garbage"),
        ]);
        state
    }

    #[test]
    fn test_load_reports_partial_success() {
        let state = loaded();
        let status = state.status.clone().unwrap();
        assert_eq!(status.kind, StatusKind::Success);
        assert_eq!(status.text, "2 of 3 files loaded successfully. Ready to process.");
        assert_eq!(state.measurement_set().unwrap().len(), 2);
    }

    #[test]
    fn test_process_requires_known_reference() {
        let mut state = loaded();
        state.reference = "nope".into();
        state.process();
        assert!(state.compensation.is_none());
        assert_eq!(state.status.unwrap().text, "Reference file 'nope' not found.");
    }

    #[test]
    fn test_process_then_plot() {
        let mut state = loaded();
        state.reference = "ref".into();
        state.process();
        assert!(state.compensation.is_some());
        state.plot();
        assert!(state.show_charts);
    }

    #[test]
    fn test_all_failed_load() {
        let mut state = AppState::default();
        state.load_files(&[SourceFile::new("junk", "garbage")]);
        assert_eq!(state.status.unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn test_new_load_replaces_previous() {
        let mut state = loaded();
        state.reference = "ref".into();
        state.process();
        state.load_files(&[SourceFile::new("dut", DUT)]);
        assert!(state.compensation.is_none());
        assert_eq!(state.measurement_set().unwrap().len(), 1);
    }

    #[test]
    fn test_clear_keeps_preferences() {
        let mut state = loaded();
        state.toggle_theme();
        state.clear();
        assert!(state.report.is_none());
        assert!(state.prefs.dark_mode);
    }

    #[test]
    fn test_invalid_config_blocks_load() {
        let mut state = AppState::default();
        state.prefs.extract.max_rows = 0;
        state.load_files(&[SourceFile::new("ref", REF)]);
        assert!(state.report.is_none());
        assert_eq!(state.status.unwrap().kind, StatusKind::Error);
    }
}
