//! Magic-number classification of payload bytes.

use super::{ClassificationProfile, FileType};

/// Number of leading bytes inspected for ZIP interior markers and text sniffing.
pub const SIGNATURE_SCAN_WINDOW: usize = 1024;

/// One entry of a profile's ordered signature table.
#[derive(Debug, Clone, Copy)]
pub struct SignatureRule {
    /// Byte prefix the payload must start with.
    pub magic: &'static [u8],
    /// Label assigned when the prefix matches.
    pub file_type: FileType,
    /// Optional refinement over the scan window; `Some` overrides `file_type`.
    pub disambiguate: Option<fn(&[u8]) -> Option<FileType>>,
}

impl SignatureRule {
    /// A rule with no disambiguation step.
    #[must_use]
    pub const fn new(magic: &'static [u8], file_type: FileType) -> Self {
        Self {
            magic,
            file_type,
            disambiguate: None,
        }
    }

    /// A rule whose label may be refined by inspecting the scan window.
    #[must_use]
    pub const fn with_disambiguation(
        magic: &'static [u8],
        file_type: FileType,
        disambiguate: fn(&[u8]) -> Option<FileType>,
    ) -> Self {
        Self {
            magic,
            file_type,
            disambiguate: Some(disambiguate),
        }
    }

    fn matches(&self, bytes: &[u8]) -> bool {
        bytes.starts_with(self.magic)
    }

    fn label_for(&self, bytes: &[u8]) -> FileType {
        self.disambiguate
            .and_then(|refine| refine(scan_window(bytes)))
            .unwrap_or(self.file_type)
    }
}

/// Identifies the OOXML package type of a ZIP container from its first entries.
///
/// `xl/` marks a spreadsheet, `word/` a word-processing document. A bare
/// `[Content_Types].xml` with neither folder visible is treated as a
/// spreadsheet. Returns `None` for plain archives.
#[must_use]
pub fn office_package_type(window: &[u8]) -> Option<FileType> {
    if contains(window, b"xl/") {
        Some(FileType::Xlsx)
    } else if contains(window, b"word/") {
        Some(FileType::Docx)
    } else if contains(window, b"[Content_Types].xml") {
        Some(FileType::Xlsx)
    } else {
        None
    }
}

/// Returns the label of the first matching signature rule, or of text
/// sniffing when the profile enables it. `None` when nothing matched.
#[must_use]
pub fn detect_signature(bytes: &[u8], profile: &ClassificationProfile) -> Option<FileType> {
    if bytes.is_empty() {
        return None;
    }

    if let Some(rule) = profile.signatures.iter().find(|rule| rule.matches(bytes)) {
        return Some(rule.label_for(bytes));
    }

    if profile.sniff_text {
        return sniff_text(bytes);
    }

    None
}

/// Classifies payload bytes, returning the profile fallback when nothing matched.
#[must_use]
pub fn classify_by_signature(bytes: &[u8], profile: &ClassificationProfile) -> FileType {
    detect_signature(bytes, profile).unwrap_or(profile.fallback)
}

fn scan_window(bytes: &[u8]) -> &[u8] {
    &bytes[..bytes.len().min(SIGNATURE_SCAN_WINDOW)]
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len())
        .any(|candidate| candidate == needle)
}

/// Heuristic detection of text formats. Advisory only.
fn sniff_text(bytes: &[u8]) -> Option<FileType> {
    // Undecodable bytes are dropped rather than replaced.
    let text: String = String::from_utf8_lossy(scan_window(bytes))
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .collect::<String>()
        .to_lowercase();

    if text.starts_with("<?xml") {
        Some(FileType::Xml)
    } else if text.starts_with('{') || text.starts_with('[') {
        Some(FileType::Json)
    } else if text.contains(',') && text.contains('\n') {
        Some(FileType::Csv)
    } else {
        None
    }
}
