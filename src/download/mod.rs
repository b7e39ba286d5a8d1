//! Fetch-and-classify download pipeline.
//!
//! This module fetches a resource over HTTP/HTTPS, buffers the whole body,
//! classifies it with a [`ClassificationProfile`](crate::classify::ClassificationProfile),
//! and writes it under the resolved extension.
//!
//! # Features
//!
//! - Browser User-Agent and a fixed 30s request timeout
//! - Signature classification of the first 8 KiB of the body
//! - Write only after the full body is buffered (no partial files)
//! - Structured [`DownloadOutcome`] instead of propagated errors
//!
//! # Example
//!
//! ```no_run
//! use docfetch_core::download::HttpClient;
//! use std::path::Path;
//!
//! # async fn example() {
//! let client = HttpClient::new();
//! let outcome = client
//!     .fetch_and_save("https://example.com/stats/2021", Path::new("./downloads/2021_Investments"))
//!     .await;
//! println!("success: {}", outcome.is_success());
//! # }
//! ```

mod client;
pub mod constants;
mod error;
pub mod filename;
mod outcome;

pub use client::{HttpClient, SavedFile};
pub use error::DownloadError;
pub use filename::{path_with_extension, sanitize_base_filename};
pub use outcome::DownloadOutcome;
