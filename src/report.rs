//! Run statistics and the plain-text run report.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use thiserror::Error;

use crate::download::DownloadOutcome;

/// Default report title.
pub const DEFAULT_REPORT_TITLE: &str = "DOCUMENT DOWNLOAD REPORT";

/// Default report filename prefix.
pub const DEFAULT_REPORT_PREFIX: &str = "download_report";

const RULE_WIDTH: usize = 60;
const SECTION_RULE_WIDTH: usize = 30;

/// Errors writing the run report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error writing report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Process exit classification for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    /// Nothing failed (including the empty run).
    Success,
    /// Some rows succeeded and some failed.
    Partial,
    /// Every row failed.
    Failure,
}

impl ProcessExit {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Partial => 1,
            Self::Failure => 2,
        }
    }
}

/// Aggregated outcomes of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    succeeded: usize,
    failed: usize,
    failures: Vec<String>,
}

impl RunSummary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one outcome; failures are remembered under `id`.
    pub fn record(&mut self, id: impl Into<String>, outcome: &DownloadOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.record_failure(id);
        }
    }

    /// Counts a row that failed before a download was attempted.
    pub fn record_failure(&mut self, id: impl Into<String>) {
        self.failed += 1;
        self.failures.push(id.into());
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Failure identifiers in processing order.
    #[must_use]
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    #[must_use]
    pub fn exit_outcome(&self) -> ProcessExit {
        if self.failed == 0 {
            ProcessExit::Success
        } else if self.succeeded > 0 {
            ProcessExit::Partial
        } else {
            ProcessExit::Failure
        }
    }
}

/// Everything rendered into a report file.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub title: String,
    pub generated_at: DateTime<Local>,
    pub output_dir: PathBuf,
    pub manifest: PathBuf,
    pub summary: RunSummary,
}

impl RunReport {
    /// A report stamped with the current local time.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        manifest: impl Into<PathBuf>,
        summary: RunSummary,
    ) -> Self {
        Self {
            title: title.into(),
            generated_at: Local::now(),
            output_dir: output_dir.into(),
            manifest: manifest.into(),
            summary,
        }
    }

    /// Renders the plain-text report.
    #[must_use]
    pub fn render_text(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let section_rule = "-".repeat(SECTION_RULE_WIDTH);
        let summary = &self.summary;

        let mut lines = vec![
            rule.clone(),
            self.title.clone(),
            rule.clone(),
            format!(
                "Report generated: {}",
                self.generated_at.format("%Y-%m-%d %H:%M:%S")
            ),
            format!("Output directory: {}", self.output_dir.display()),
            format!("Manifest: {}", self.manifest.display()),
            String::new(),
            "SUMMARY:".to_string(),
            section_rule.clone(),
            format!("Successful downloads: {}", summary.succeeded()),
            format!("Failed downloads: {}", summary.failed()),
            format!("Total files processed: {}", summary.total()),
            String::new(),
        ];

        if summary.failed() > 0 {
            lines.push("FAILED DOWNLOADS:".to_string());
            lines.push(section_rule);
            lines.push(format!("Total failures: {}", summary.failed()));
            lines.push(String::new());
            lines.push("Failed items:".to_string());
            lines.extend(
                summary
                    .failures()
                    .iter()
                    .enumerate()
                    .map(|(i, id)| format!("{:2}. {id}", i + 1)),
            );
        } else {
            lines.push("SUCCESS:".to_string());
            lines.push(section_rule);
            lines.push("All downloads completed successfully!".to_string());
            lines.push("No failures to report.".to_string());
        }

        lines.push(String::new());
        lines.push(rule.clone());
        lines.push("END OF REPORT".to_string());
        lines.push(rule);

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Renders the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Report filename: `<prefix>_<YYYYmmdd_HHMMSS>.txt`.
    #[must_use]
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{prefix}_{}.txt", self.generated_at.format("%Y%m%d_%H%M%S"))
    }
}

/// Writes the text report into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the directory or file cannot be written.
pub fn write_report(dir: &Path, prefix: &str, report: &RunReport) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(report.file_name(prefix));
    std::fs::write(&path, report.render_text()).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
