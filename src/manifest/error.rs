//! Error types for manifest loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading the link manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be opened.
    #[error("cannot open manifest {path}: {source}")]
    Io {
        /// Manifest path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV (bad quoting, invalid UTF-8, unreadable header).
    #[error("malformed manifest: {0}")]
    Csv(#[from] csv::Error),

    /// The workbook could not be opened or its worksheet could not be read.
    #[error("cannot read workbook {path}: {source}")]
    Workbook {
        /// Workbook path.
        path: PathBuf,
        /// The underlying spreadsheet error.
        #[source]
        source: calamine::Error,
    },

    /// The workbook contains no worksheet.
    #[error("workbook {path} has no worksheet")]
    NoWorksheet { path: PathBuf },

    /// One or more configured columns are absent from the header row.
    #[error(
        "missing required columns: {}\n  Available columns: {}",
        missing.join(", "),
        available.join(", ")
    )]
    MissingColumns {
        /// Configured column names not found in the header.
        missing: Vec<String>,
        /// Header names that were found.
        available: Vec<String>,
    },
}

impl ManifestError {
    /// Creates an IO error for the given manifest path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a workbook error for the given manifest path.
    pub fn workbook(path: impl Into<PathBuf>, source: calamine::Error) -> Self {
        Self::Workbook {
            path: path.into(),
            source,
        }
    }
}
