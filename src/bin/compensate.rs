//! Headless pipeline: load sweeps, compensate against a reference, export CSV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use s21_compensator::data::compensate::compensate;
use s21_compensator::data::export::{export_to_path, DEFAULT_EXPORT_NAME};
use s21_compensator::data::extract::ExtractConfig;
use s21_compensator::data::loader::load_paths;
use s21_compensator::data::model::{FileOutcome, LoadReport};

#[derive(Parser)]
#[command(
    name = "s21-compensate",
    about = "Reflection-loss compensated S21 from network-analyzer CSV exports"
)]
struct Cli {
    /// Sweep files (.csv); labels are the file names without extension
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Label of the reference sweep
    #[arg(short, long)]
    reference: String,

    /// Output CSV path
    #[arg(short, long, default_value = DEFAULT_EXPORT_NAME)]
    output: PathBuf,

    /// JSON file with `skip_rows` / `max_rows`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rows skipped before data when a file has no BEGIN marker
    #[arg(long)]
    skip_rows: Option<usize>,

    /// Maximum data rows read when a file has no BEGIN marker
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_rows: Option<u64>,

    /// Print the per-file load report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FileEntry<'a> {
    label: &'a str,
    loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    points: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

fn resolve_config(cli: &Cli) -> Result<ExtractConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ExtractConfig::default(),
    };
    if let Some(skip) = cli.skip_rows {
        config.skip_rows = skip;
    }
    if let Some(max) = cli.max_rows {
        config.max_rows = usize::try_from(max).context("max_rows out of range")?;
    }
    config.validate()?;
    Ok(config)
}

fn print_report(report: &LoadReport, json: bool) -> Result<()> {
    if json {
        let entries: Vec<FileEntry<'_>> = report
            .files
            .iter()
            .map(|(label, outcome)| match outcome {
                FileOutcome::Loaded { points } => FileEntry {
                    label: label.as_str(),
                    loaded: true,
                    points: Some(*points),
                    error: None,
                },
                FileOutcome::Failed(reason) => FileEntry {
                    label: label.as_str(),
                    loaded: false,
                    points: None,
                    error: Some(reason.as_str()),
                },
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for (label, outcome) in &report.files {
            match outcome {
                FileOutcome::Failed(reason) => println!("{label}: {outcome} ({reason})"),
                FileOutcome::Loaded { .. } => println!("{label}: {outcome}"),
            }
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let report = load_paths(&cli.files, &config);
    print_report(&report, cli.json)?;

    let set = report.into_set()?;
    let result = compensate(&set, &cli.reference)?;
    if result.non_reference().next().is_none() {
        log::warn!("Only the reference sweep was loaded; export holds the frequency column only");
    }
    export_to_path(&cli.output, &set, &result)
        .with_context(|| format!("exporting to {}", cli.output.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run(Cli::parse())
}
