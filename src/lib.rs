//! Docfetch Core Library
//!
//! This library provides the core functionality for the docfetch tool, which
//! downloads every link of a CSV or Excel manifest and stores each file under the
//! extension its content actually has, regardless of what the server claims.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`classify`] - Signature and content-type classification with profiles
//! - [`download`] - HTTP fetch-classify-save pipeline
//! - [`manifest`] - CSV and workbook link manifest loading
//! - [`pacing`] - Randomized delay between downloads
//! - [`run`] - Output layouts and the sequential batch runner
//! - [`report`] - Run summary and report files
//! - [`config`] - Layered TOML/CLI configuration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod config;
pub mod download;
pub mod manifest;
pub mod pacing;
pub mod report;
pub mod run;
pub mod user_agent;

// Re-export commonly used types
pub use classify::{
    ClassificationProfile, ClassificationResult, Evidence, FileType, ProfileKind,
    classify_by_content_type, classify_by_signature,
};
pub use config::{FileConfig, Settings};
pub use download::{DownloadError, DownloadOutcome, HttpClient};
pub use manifest::{Manifest, ManifestColumns, ManifestError, ManifestRow, load_manifest};
pub use pacing::Pacer;
pub use report::{ProcessExit, RunReport, RunSummary, write_report};
pub use run::{BatchRunner, LayoutKind, NamingScheme};
pub use user_agent::BROWSER_USER_AGENT;
