//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use docfetch_core::config::MAX_SECONDS;
use docfetch_core::{FileConfig, LayoutKind, ProfileKind};

/// Batch download documents listed in a CSV or Excel manifest.
///
/// Every link is fetched, classified by its content, and saved under the
/// extension it really has. A report of failed rows is written at the end.
#[derive(Parser, Debug)]
#[command(name = "docfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Manifest (.csv, or .xlsx/.xls workbook) with group, key, and link columns
    pub manifest: PathBuf,

    /// Root directory for downloaded files [default: downloads]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Classification profile [default: general]
    #[arg(long, value_enum)]
    pub profile: Option<ProfileKind>,

    /// Output layout [default: grouped]
    #[arg(long, value_enum)]
    pub layout: Option<LayoutKind>,

    /// Filename suffix for the grouped layout; empty disables it [default: Investments]
    #[arg(long)]
    pub suffix: Option<String>,

    /// Manifest column holding the group (subdirectory) [default: Oblast]
    #[arg(long)]
    pub group_column: Option<String>,

    /// Manifest column holding the record key [default: Year]
    #[arg(long)]
    pub key_column: Option<String>,

    /// Manifest column holding the link [default: Link]
    #[arg(long)]
    pub url_column: Option<String>,

    /// Minimum delay between downloads in seconds [default: 1]
    #[arg(long, value_parser = clap::value_parser!(u64).range(0..=MAX_SECONDS))]
    pub min_delay: Option<u64>,

    /// Maximum delay between downloads in seconds [default: 10]
    #[arg(long, value_parser = clap::value_parser!(u64).range(0..=MAX_SECONDS))]
    pub max_delay: Option<u64>,

    /// Whole-request timeout in seconds [default: 30]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_SECONDS))]
    pub timeout: Option<u64>,

    /// Directory receiving the run report [default: .]
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Report filename prefix [default: download_report]
    #[arg(long)]
    pub report_prefix: Option<String>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Values given on the command line, as the top config layer.
    #[must_use]
    pub fn overrides(&self) -> FileConfig {
        FileConfig {
            output_dir: self.output_dir.clone(),
            profile: self.profile,
            layout: self.layout,
            suffix: self.suffix.clone(),
            group_column: self.group_column.clone(),
            key_column: self.key_column.clone(),
            url_column: self.url_column.clone(),
            min_delay_secs: self.min_delay,
            max_delay_secs: self.max_delay,
            timeout_secs: self.timeout,
            report_dir: self.report_dir.clone(),
            report_prefix: self.report_prefix.clone(),
            report_title: None,
        }
    }
}
