//! `kanpo`: fetch one day's Official Gazette issue and record what was found.
//!
//! Exit status is zero whether or not an issue was found; the outcome is
//! reported through the log and the `kanpou_found` step output. Configuration
//! faults exit non-zero.

mod cli;
mod config;
mod logging;
mod step_output;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use kanpo_core::{Phase, TargetDate};
use kanpo_engine::{FetchPipeline, RunReport};
use kanpo_logging::{kanpo_info, kanpo_warn};

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::logging::LogDestination;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(
        LogDestination::from_log_file(cli.log_file.as_deref()),
        logging::level(cli.verbose),
    );

    let file_config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let engine_config = file_config.into_engine_config(&cli);
    let date = match cli.date {
        Some(date) => date,
        None => TargetDate::today_jst().context("determining today's date in Japan")?,
    };

    kanpo_info!("官報 fetch for {}", date);
    kanpo_info!("Output directory: {}", engine_config.output_root.display());
    if engine_config.mode.is_dry_run() {
        kanpo_info!("Dry run: documents are checked, not downloaded");
    }

    let pipeline = FetchPipeline::new(engine_config).context("invalid fetch configuration")?;
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let started = Utc::now();
    let report = runtime.block_on(pipeline.run(date));
    let elapsed = Utc::now() - started;

    summarize(&report, elapsed.num_milliseconds());
    step_output::emit(cli.step_output.as_ref(), &report.outcome)?;
    Ok(())
}

fn summarize(report: &RunReport, elapsed_ms: i64) {
    if report.outcome.found {
        kanpo_info!(
            "Issue found: {} document(s) in {} ({} ms)",
            report.outcome.documents.len(),
            report.run_dir.display(),
            elapsed_ms
        );
        for result in &report.outcome.documents {
            kanpo_info!("  {} -> {}", result.descriptor.label(), result.descriptor.url);
        }
    } else {
        kanpo_info!("No issue retrieved ({:?}, {} ms)", report.phase, elapsed_ms);
    }
    if report.phase == Phase::ManifestFailed {
        kanpo_warn!("Documents were retrieved but the manifest could not be written");
    }
    if report.failed > 0 {
        kanpo_warn!("{} of {} document(s) failed", report.failed, report.attempted);
    }
}
