//! Constants for the download module (timeouts, buffering).

use std::time::Duration;

/// Default HTTP connect timeout.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default whole-request timeout, covering the body as well.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Size of the leading slice handed to signature classification.
pub const FIRST_CHUNK_SIZE: usize = 8192;

/// Upper bound on the buffer reserved up front from a declared `Content-Length`.
///
/// Larger bodies still download; the buffer grows as chunks arrive.
pub const MAX_PREALLOCATED_BODY: usize = 8 * 1024 * 1024;

/// Maximum length, in characters, of a sanitized base filename.
pub const MAX_BASE_FILENAME_LEN: usize = 200;
