//! Classification profiles: signature table, content-type table, and fallback.

use serde::{Deserialize, Serialize};

use super::{ContentTypeRule, FileType, SignatureRule, office_package_type};

const ZIP_LOCAL_HEADER: &[u8] = b"\x50\x4B\x03\x04";
const ZIP_EMPTY_ARCHIVE: &[u8] = b"\x50\x4B\x05\x06";
const ZIP_SPANNED_ARCHIVE: &[u8] = b"\x50\x4B\x07\x08";
const COMPOUND_DOCUMENT: &[u8] = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1";

/// Signature table for mixed document sources, in priority order.
const GENERAL_SIGNATURES: &[SignatureRule] = &[
    SignatureRule::with_disambiguation(ZIP_LOCAL_HEADER, FileType::Zip, office_package_type),
    SignatureRule::with_disambiguation(ZIP_EMPTY_ARCHIVE, FileType::Zip, office_package_type),
    SignatureRule::with_disambiguation(ZIP_SPANNED_ARCHIVE, FileType::Zip, office_package_type),
    SignatureRule::new(b"\x52\x61\x72\x21", FileType::Rar),
    SignatureRule::new(b"\x37\x7A\xBC\xAF\x27\x1C", FileType::SevenZip),
    SignatureRule::new(b"\x25\x50\x44\x46", FileType::Pdf),
    SignatureRule::new(COMPOUND_DOCUMENT, FileType::Xls),
    SignatureRule::new(b"\x1F\x8B", FileType::Gzip),
    SignatureRule::new(b"\x42\x5A\x68", FileType::Bzip2),
];

/// Signature table for spreadsheet-only sources. Any ZIP container is taken
/// to be a workbook.
const SPREADSHEET_SIGNATURES: &[SignatureRule] = &[
    SignatureRule::new(COMPOUND_DOCUMENT, FileType::Xls),
    SignatureRule::new(ZIP_LOCAL_HEADER, FileType::Xlsx),
    SignatureRule::new(ZIP_EMPTY_ARCHIVE, FileType::Xlsx),
    SignatureRule::new(ZIP_SPANNED_ARCHIVE, FileType::Xlsx),
];

const XLS_MIME: &str = "application/vnd.ms-excel";
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const GENERAL_CONTENT_TYPES: &[ContentTypeRule] = &[
    ContentTypeRule::new("application/pdf", FileType::Pdf),
    ContentTypeRule::new(XLS_MIME, FileType::Xls),
    ContentTypeRule::new(XLSX_MIME, FileType::Xlsx),
    ContentTypeRule::new(DOCX_MIME, FileType::Docx),
    ContentTypeRule::new("application/zip", FileType::Zip),
    ContentTypeRule::new("application/x-rar-compressed", FileType::Rar),
    ContentTypeRule::new("application/x-7z-compressed", FileType::SevenZip),
    ContentTypeRule::new("application/gzip", FileType::Gzip),
    ContentTypeRule::new("application/x-bzip2", FileType::Bzip2),
    ContentTypeRule::new("application/octet-stream", FileType::Bin),
    ContentTypeRule::new("text/csv", FileType::Csv),
    ContentTypeRule::new("application/json", FileType::Json),
    ContentTypeRule::new("text/plain", FileType::Txt),
    ContentTypeRule::new("application/xml", FileType::Xml),
    ContentTypeRule::new("text/xml", FileType::Xml),
];

const SPREADSHEET_CONTENT_TYPES: &[ContentTypeRule] = &[
    ContentTypeRule::new(XLS_MIME, FileType::Xls),
    ContentTypeRule::new(XLSX_MIME, FileType::Xlsx),
    // Workbooks are often served as generic binary.
    ContentTypeRule::new("application/octet-stream", FileType::Xlsx),
];

/// Named built-in profiles.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// Wide label set, `.file` when nothing matches.
    #[default]
    General,
    /// Legacy and modern workbooks only, `.xlsx` when nothing matches.
    Spreadsheet,
}

impl ProfileKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Spreadsheet => "spreadsheet",
        }
    }
}

/// Everything that varies between classification deployments.
#[derive(Debug, Clone)]
pub struct ClassificationProfile {
    pub kind: ProfileKind,
    /// Ordered signature table; first match wins.
    pub signatures: Vec<SignatureRule>,
    pub content_types: Vec<ContentTypeRule>,
    /// Label used when no evidence source matches.
    pub fallback: FileType,
    /// Whether XML/JSON/CSV text sniffing runs after the signature table.
    pub sniff_text: bool,
}

impl Default for ClassificationProfile {
    fn default() -> Self {
        Self::general()
    }
}

impl ClassificationProfile {
    /// General-purpose profile for mixed document sources.
    #[must_use]
    pub fn general() -> Self {
        Self {
            kind: ProfileKind::General,
            signatures: GENERAL_SIGNATURES.to_vec(),
            content_types: GENERAL_CONTENT_TYPES.to_vec(),
            fallback: FileType::Unknown,
            sniff_text: true,
        }
    }

    /// Profile for sources known to serve spreadsheets only.
    #[must_use]
    pub fn spreadsheet() -> Self {
        Self {
            kind: ProfileKind::Spreadsheet,
            signatures: SPREADSHEET_SIGNATURES.to_vec(),
            content_types: SPREADSHEET_CONTENT_TYPES.to_vec(),
            fallback: FileType::Xlsx,
            sniff_text: false,
        }
    }

    #[must_use]
    pub fn for_kind(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::General => Self::general(),
            ProfileKind::Spreadsheet => Self::spreadsheet(),
        }
    }
}
