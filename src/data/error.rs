use thiserror::Error;

/// Why a single file could not be turned into a sweep.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The header row lacks at least one of frequency / S11 / S21.
    #[error(
        "missing required column (need Freq, S11, S21; found freq={frequency}, s11={s11}, s21={s21})"
    )]
    MissingColumns {
        frequency: bool,
        s11: bool,
        s21: bool,
    },

    /// Every row in the data window was filtered out.
    #[error("empty result: no valid data points found")]
    EmptyResult,
}

/// The requested reference label is not part of the measurement set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("reference file '{label}' not found")]
pub struct ReferenceNotFound {
    pub label: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_rows must be at least 1")]
    InvalidMaxRows,
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("writing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Returned when a batch produced no usable sweep at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to load any valid data from {attempted} files")]
pub struct EmptyBatch {
    pub attempted: usize,
}
