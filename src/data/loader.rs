use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::extract::{extract, ExtractConfig};
use super::model::{FileOutcome, LoadReport, MeasurementSet, Sweep};

// ---------------------------------------------------------------------------
// Source files
// ---------------------------------------------------------------------------

/// Raw content of one submitted file together with its sweep label.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub label: String,
    pub content: Vec<u8>,
}

impl SourceFile {
    pub fn new(label: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
        }
    }

    /// Read a file from disk, labelling it after its file name.
    pub fn read(path: &Path) -> Result<Self> {
        let content =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        Ok(Self {
            label: label_for_path(path),
            content,
        })
    }
}

/// Sweep label for a path: the file name with a trailing `.csv` removed.
pub fn label_for_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let lower = name.to_ascii_lowercase();
    match lower.strip_suffix(".csv") {
        Some(stem) if !stem.is_empty() => name[..stem.len()].to_string(),
        _ => name,
    }
}

// ---------------------------------------------------------------------------
// Row source
// ---------------------------------------------------------------------------

/// Split raw bytes into rows of string cells.
///
/// No header handling, rows may differ in width, blank lines are skipped and
/// invalid UTF-8 is replaced.
pub fn read_rows(content: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content);

    let mut rows = Vec::new();
    for (row_no, result) in reader.byte_records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut cells: Vec<String> = record
            .iter()
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect();
        if row_no == 0 {
            if let Some(first) = cells.first_mut() {
                if let Some(stripped) = first.strip_prefix('\u{feff}') {
                    *first = stripped.to_string();
                }
            }
        }
        rows.push(cells);
    }
    Ok(rows)
}

/// Parse one file into a sweep.
pub fn parse_sweep(file: &SourceFile, config: &ExtractConfig) -> Result<Sweep> {
    let rows = read_rows(&file.content).context("reading rows")?;
    let points = extract(&rows, config)?;
    Ok(Sweep::new(file.label.clone(), points))
}

// ---------------------------------------------------------------------------
// Batch loading
// ---------------------------------------------------------------------------

/// Parse every file independently and gather the successes into a
/// [`MeasurementSet`].
///
/// Files are parsed in parallel; results are kept in submission order so the
/// first successful file always anchors the frequency axis.
pub fn load_batch(files: &[SourceFile], config: &ExtractConfig) -> LoadReport {
    let parsed: Vec<Result<Sweep>> = files
        .par_iter()
        .map(|file| parse_sweep(file, config))
        .collect();

    let mut report = LoadReport::default();
    for (file, result) in files.iter().zip(parsed) {
        match result {
            Ok(sweep) => {
                let points = sweep.len();
                if report.set.insert(sweep).is_some() {
                    log::warn!("Duplicate label '{}', replacing earlier sweep", file.label);
                }
                report
                    .files
                    .push((file.label.clone(), FileOutcome::Loaded { points }));
            }
            Err(e) => {
                log::warn!("Error in {}: {e:#}", file.label);
                report
                    .files
                    .push((file.label.clone(), FileOutcome::Failed(format!("{e:#}"))));
            }
        }
    }

    log::info!(
        "{} of {} files loaded, frequency axis has {} points",
        report.succeeded(),
        report.attempted(),
        report.set.frequency_axis().len()
    );
    report
}

/// Load a batch straight from disk. Unreadable files count as failures.
pub fn load_paths(paths: &[PathBuf], config: &ExtractConfig) -> LoadReport {
    let mut files = Vec::with_capacity(paths.len());
    let mut unreadable = Vec::new();
    for (i, path) in paths.iter().enumerate() {
        match SourceFile::read(path) {
            Ok(file) => files.push(file),
            Err(e) => {
                log::warn!("{e:#}");
                unreadable.push((i, label_for_path(path), format!("{e:#}")));
            }
        }
    }

    let mut report = load_batch(&files, config);
    // Ascending indices, so each insert lands at its submission position.
    for (i, label, reason) in unreadable {
        report.files.insert(i, (label, FileOutcome::Failed(reason)));
    }
    report
}

/// Convenience wrapper returning just the set; fails when nothing loaded.
pub fn load_set(files: &[SourceFile], config: &ExtractConfig) -> Result<MeasurementSet> {
    Ok(load_batch(files, config).into_set()?)
}
