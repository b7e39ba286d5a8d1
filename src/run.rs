//! Batch orchestration: one manifest row at a time, paced, into a run summary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::download::{HttpClient, sanitize_base_filename};
use crate::manifest::ManifestRow;
use crate::pacing::Pacer;
use crate::report::RunSummary;

/// Built-in output layouts.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// `<output>/<group>/<key>_<suffix><ext>`
    #[default]
    Grouped,
    /// `<output>/<group>_<key><ext>`
    Flat,
}

/// How a manifest row maps to a directory, base filename, and failure id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingScheme {
    /// One subdirectory per group; files named after the record key plus an
    /// optional suffix. Failures are reported as `<group>_<key>`.
    Grouped { suffix: Option<String> },
    /// Everything in the output directory, named `<group>_<key>`. Failures
    /// are reported as `<group> - <key>`.
    Flat,
}

impl Default for NamingScheme {
    fn default() -> Self {
        Self::Grouped { suffix: None }
    }
}

/// Where one row is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowTarget {
    /// Directory that must exist before writing.
    pub directory: PathBuf,
    /// Base path without extension.
    pub base: PathBuf,
    /// Identifier recorded in the run summary on failure.
    pub failure_id: String,
}

impl NamingScheme {
    #[must_use]
    pub fn from_layout(layout: LayoutKind, suffix: Option<String>) -> Self {
        match layout {
            LayoutKind::Grouped => Self::Grouped {
                suffix: suffix.filter(|s| !s.is_empty()),
            },
            LayoutKind::Flat => Self::Flat,
        }
    }

    /// Computes the target for `row` under `output_dir`.
    #[must_use]
    pub fn target(&self, output_dir: &Path, row: &ManifestRow) -> RowTarget {
        match self {
            Self::Grouped { suffix } => {
                let directory = output_dir.join(sanitize_base_filename(&row.group));
                let stem = match suffix {
                    Some(suffix) => format!("{}_{suffix}", row.key),
                    None => row.key.clone(),
                };
                RowTarget {
                    base: directory.join(sanitize_base_filename(&stem)),
                    directory,
                    failure_id: format!("{}_{}", row.group, row.key),
                }
            }
            Self::Flat => RowTarget {
                directory: output_dir.to_path_buf(),
                base: output_dir.join(sanitize_base_filename(&format!(
                    "{}_{}",
                    row.group, row.key
                ))),
                failure_id: format!("{} - {}", row.group, row.key),
            },
        }
    }
}

/// Sequential downloader over manifest rows.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    client: HttpClient,
    pacer: Pacer,
    naming: NamingScheme,
    output_dir: PathBuf,
}

impl BatchRunner {
    #[must_use]
    pub fn new(
        client: HttpClient,
        pacer: Pacer,
        naming: NamingScheme,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            pacer,
            naming,
            output_dir: output_dir.into(),
        }
    }

    /// Processes every row in order and returns the aggregated summary.
    ///
    /// A row failure never stops the run. The pacer waits between rows, not
    /// before the first one.
    #[instrument(skip(self, rows), fields(row_count = rows.len(), output_dir = %self.output_dir.display()))]
    pub async fn run(&self, rows: &[ManifestRow]) -> RunSummary {
        let mut summary = RunSummary::new();

        for (index, row) in rows.iter().enumerate() {
            if index > 0 {
                self.pacer.wait().await;
            }

            info!(
                row = index + 1,
                of = rows.len(),
                group = %row.group,
                key = %row.key,
                "processing row"
            );

            let target = self.naming.target(&self.output_dir, row);
            if let Err(e) = tokio::fs::create_dir_all(&target.directory).await {
                error!(
                    directory = %target.directory.display(),
                    error = %e,
                    "cannot create output directory"
                );
                summary.record_failure(target.failure_id);
                continue;
            }

            let outcome = self.client.fetch_and_save(&row.url, &target.base).await;
            match outcome.path() {
                Some(path) => info!(path = %path.display(), "file saved"),
                None => error!(id = %target.failure_id, "failed to download file"),
            }
            summary.record(target.failure_id, &outcome);
        }

        info!(
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            total = summary.total(),
            "run finished"
        );
        summary
    }
}
