//! Structured result of one fetch-and-classify attempt.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::DownloadError;
use crate::classify::ClassificationResult;

/// Success or failure of a single download, consumed by the orchestration layer.
///
/// Built once per processed URL through [`succeeded`](Self::succeeded) or
/// [`failed`](Self::failed) and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadOutcome {
    success: bool,
    path: Option<PathBuf>,
    classification: Option<ClassificationResult>,
    error: Option<String>,
}

impl DownloadOutcome {
    /// A saved file at `path`, named after `classification`.
    #[must_use]
    pub fn succeeded(path: PathBuf, classification: ClassificationResult) -> Self {
        Self {
            success: true,
            path: Some(path),
            classification: Some(classification),
            error: None,
        }
    }

    /// A failed attempt; no file was written.
    #[must_use]
    pub fn failed(error: &DownloadError) -> Self {
        Self::failed_with_detail(error.to_string())
    }

    /// A failed attempt described by a free-form detail.
    #[must_use]
    pub fn failed_with_detail(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            path: None,
            classification: None,
            error: Some(detail.into()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Resolved file path, present only on success.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn classification(&self) -> Option<ClassificationResult> {
        self.classification
    }

    /// Error detail, present only on failure.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
