//! Base filename sanitization and final path construction.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::constants::MAX_BASE_FILENAME_LEN;
use crate::classify::FileType;

/// Sanitizes a base filename (no extension) for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems
/// (`< > : " / \ | ? *`) and control characters with `_`, trims leading and
/// trailing whitespace and dots, and caps the result at 200 characters.
/// An input that sanitizes to nothing becomes `_`.
#[must_use]
pub fn sanitize_base_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let capped: String = trimmed.chars().take(MAX_BASE_FILENAME_LEN).collect();

    if capped.is_empty() {
        "_".to_string()
    } else {
        capped
    }
}

/// Appends the label's extension to `base`.
///
/// The extension is appended verbatim rather than through
/// [`Path::set_extension`], so stems that already contain dots keep them.
#[must_use]
pub fn path_with_extension(base: &Path, file_type: FileType) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(file_type.extension());
    PathBuf::from(name)
}
