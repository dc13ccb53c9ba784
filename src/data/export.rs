use std::io::Write;
use std::path::Path;

use super::error::ExportError;
use super::model::{CompensationResult, MeasurementSet};

/// Default file name offered when saving an export.
pub const DEFAULT_EXPORT_NAME: &str = "Compensated_S21_Analysis.csv";

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Header row: `Frequency(Hz)` then one column per non-reference label.
pub fn export_header(result: &CompensationResult) -> Vec<String> {
    std::iter::once("Frequency(Hz)".to_string())
        .chain(
            result
                .non_reference()
                .map(|(label, _)| format!("{label}_CompensatedS21(dB)")),
        )
        .collect()
}

fn format_value(value: Option<&f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.is_infinite() && v.is_sign_positive() => "Infinity".to_string(),
        Some(v) if v.is_infinite() => "-Infinity".to_string(),
        Some(v) => format!("{v:.6}"),
    }
}

/// Write the compensated curves as CSV, one row per frequency-axis index.
///
/// Values past the end of a shorter curve are left empty.
pub fn write_csv<W: Write>(
    writer: W,
    set: &MeasurementSet,
    result: &CompensationResult,
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(export_header(result))?;

    let curves: Vec<&[f64]> = result.non_reference().map(|(_, c)| c).collect();
    for (i, freq) in set.frequency_axis().iter().enumerate() {
        let row = std::iter::once(freq.to_string())
            .chain(curves.iter().map(|c| format_value(c.get(i))));
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_to_path(
    path: &Path,
    set: &MeasurementSet,
    result: &CompensationResult,
) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(file), set, result)?;
    log::info!(
        "Exported {} compensated curves to {}",
        result.non_reference().count(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Plot series
// ---------------------------------------------------------------------------

/// One line for the charting layer: `[frequency_ghz, value_db]` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

/// Frequency in GHz rounded to 3 decimals, as shown on chart axes.
pub fn to_ghz(frequency_hz: f64) -> f64 {
    (frequency_hz / 1e9 * 1000.0).round() / 1000.0
}

fn pair_with_axis(axis: &[f64], values: impl Iterator<Item = f64>) -> Vec<[f64; 2]> {
    axis.iter().zip(values).map(|(&f, v)| [to_ghz(f), v]).collect()
}

/// Raw S21 of every sweep against the shared frequency axis.
pub fn raw_s21_series(set: &MeasurementSet) -> Vec<PlotSeries> {
    set.sweeps()
        .iter()
        .map(|s| PlotSeries {
            label: s.label.clone(),
            points: pair_with_axis(set.frequency_axis(), s.points.iter().map(|p| p.s21_db)),
        })
        .collect()
}

/// Compensated S21 of every non-reference sweep against the shared axis.
pub fn compensated_series(set: &MeasurementSet, result: &CompensationResult) -> Vec<PlotSeries> {
    result
        .non_reference()
        .map(|(label, curve)| PlotSeries {
            label: label.to_string(),
            points: pair_with_axis(set.frequency_axis(), curve.iter().copied()),
        })
        .collect()
}
