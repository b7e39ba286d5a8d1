//! Declared `Content-Type` classification.

use super::{ClassificationProfile, FileType};

/// Maps one normalized MIME type to a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentTypeRule {
    /// Lower-case MIME type without parameters.
    pub mime: &'static str,
    pub file_type: FileType,
}

impl ContentTypeRule {
    #[must_use]
    pub const fn new(mime: &'static str, file_type: FileType) -> Self {
        Self { mime, file_type }
    }
}

/// Strips parameters (`; charset=...`), surrounding whitespace, and case.
#[must_use]
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// Looks up the declared content-type in the profile table.
#[must_use]
pub fn lookup_content_type(content_type: &str, profile: &ClassificationProfile) -> Option<FileType> {
    let mime = normalize_content_type(content_type);
    if mime.is_empty() {
        return None;
    }
    profile
        .content_types
        .iter()
        .find(|rule| rule.mime == mime)
        .map(|rule| rule.file_type)
}

/// Classifies a declared content-type, returning the profile fallback when unknown.
#[must_use]
pub fn classify_by_content_type(content_type: &str, profile: &ClassificationProfile) -> FileType {
    lookup_content_type(content_type, profile).unwrap_or(profile.fallback)
}
