//! Content-based file type classification.
//!
//! A download is classified from two independent sources of evidence:
//!
//! - [`classify_by_signature`] inspects the leading bytes of the payload
//!   (magic numbers, ZIP interior markers, light text sniffing)
//! - [`classify_by_content_type`] maps the server's declared `Content-Type`
//!   through a lookup table
//!
//! [`resolve`] combines both with a fixed precedence: a signature match beats
//! a declared content-type match, which beats the profile's default label.
//! Every table and default lives in a [`ClassificationProfile`], so the
//! general-purpose and spreadsheet-only behaviors share one code path.

mod content_type;
mod profile;
mod signature;

use std::fmt;

use serde::Serialize;

pub use content_type::{
    ContentTypeRule, classify_by_content_type, lookup_content_type, normalize_content_type,
};
pub use profile::{ClassificationProfile, ProfileKind};
pub use signature::{
    SIGNATURE_SCAN_WINDOW, SignatureRule, classify_by_signature, detect_signature,
    office_package_type,
};

/// Resolved file type label for a downloaded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Xls,
    Xlsx,
    Docx,
    Zip,
    Rar,
    SevenZip,
    Gzip,
    Bzip2,
    Xml,
    Json,
    Csv,
    Txt,
    Bin,
    /// Nothing identified the payload.
    Unknown,
}

impl FileType {
    /// Filename extension for this label, including the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Xls => ".xls",
            Self::Xlsx => ".xlsx",
            Self::Docx => ".docx",
            Self::Zip => ".zip",
            Self::Rar => ".rar",
            Self::SevenZip => ".7z",
            Self::Gzip => ".gz",
            Self::Bzip2 => ".bz2",
            Self::Xml => ".xml",
            Self::Json => ".json",
            Self::Csv => ".csv",
            Self::Txt => ".txt",
            Self::Bin => ".bin",
            Self::Unknown => ".file",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Which evidence source produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Evidence {
    /// Byte-level signature or text sniffing of the payload.
    Signature,
    /// The declared `Content-Type` header.
    ContentType,
    /// Neither source matched; the profile default was used.
    Default,
}

impl Evidence {
    /// Human-readable label for logs and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Signature => "content analysis",
            Self::ContentType => "HTTP header",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved label plus the evidence that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub file_type: FileType,
    pub evidence: Evidence,
}

impl ClassificationResult {
    /// Extension of the resolved label.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        self.file_type.extension()
    }
}

/// Applies the precedence chain to the two evidence sources.
///
/// `signature` and `declared` are the *matched* labels (see
/// [`detect_signature`] and [`lookup_content_type`]); `None` means the source
/// had nothing to say.
#[must_use]
pub fn resolve(
    signature: Option<FileType>,
    declared: Option<FileType>,
    profile: &ClassificationProfile,
) -> ClassificationResult {
    if let Some(file_type) = signature {
        return ClassificationResult {
            file_type,
            evidence: Evidence::Signature,
        };
    }
    if let Some(file_type) = declared {
        return ClassificationResult {
            file_type,
            evidence: Evidence::ContentType,
        };
    }
    ClassificationResult {
        file_type: profile.fallback,
        evidence: Evidence::Default,
    }
}

/// Classifies a payload head and declared content-type in one step.
#[must_use]
pub fn classify(
    head: &[u8],
    content_type: &str,
    profile: &ClassificationProfile,
) -> ClassificationResult {
    resolve(
        detect_signature(head, profile),
        lookup_content_type(content_type, profile),
        profile,
    )
}
