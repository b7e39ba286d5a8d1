//! CLI entry point for the docfetch tool.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use docfetch_core::config::{load_default_file_config, load_file_config};
use docfetch_core::download::constants::CONNECT_TIMEOUT;
use docfetch_core::{
    BatchRunner, ClassificationProfile, HttpClient, RunReport, Settings, load_manifest,
    write_report,
};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let file_config = match &args.config {
        Some(path) => Some(load_file_config(path)?),
        None => {
            let loaded = load_default_file_config()?;
            if let (Some(path), Some(_)) = (&loaded.path, &loaded.config) {
                debug!(path = %path.display(), "loaded config file");
            }
            loaded.config
        }
    };
    let settings = Settings::from_layers(&args.overrides(), file_config.as_ref())?;
    debug!(?settings, "settings resolved");

    let manifest = load_manifest(&args.manifest, &settings.columns)
        .with_context(|| format!("Failed to load manifest '{}'", args.manifest.display()))?;
    if !manifest.skipped.is_empty() {
        warn!(
            skipped = manifest.skipped.len(),
            "manifest rows without a link were skipped"
        );
    }

    info!(
        rows = manifest.len(),
        output_dir = %settings.output_dir.display(),
        profile = settings.profile.as_str(),
        "Docfetch starting"
    );

    let client = HttpClient::new_with_timeouts(CONNECT_TIMEOUT, settings.timeout)
        .with_profile(ClassificationProfile::for_kind(settings.profile));
    let runner = BatchRunner::new(
        client,
        settings.pacer(),
        settings.naming(),
        settings.output_dir.clone(),
    );

    let summary = runner.run(&manifest.rows).await;
    let exit = summary.exit_outcome();

    let report = RunReport::new(
        settings.report_title.clone(),
        settings.output_dir.clone(),
        args.manifest.clone(),
        summary,
    );
    let report_path = write_report(&settings.report_dir, &settings.report_prefix, &report)
        .context("Failed to write run report")?;

    info!(
        succeeded = report.summary.succeeded(),
        failed = report.summary.failed(),
        total = report.summary.total(),
        report = %report_path.display(),
        "Download complete"
    );

    if args.json {
        println!("{}", report.to_json()?);
    }

    Ok(ExitCode::from(exit.code()))
}
