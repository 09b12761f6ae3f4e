//! URL encoding utilities for constructing safe API paths.
//!
//! Index patterns are interpolated into the request path, so characters
//! with URL meaning must be percent-encoded. Wildcards (`*`), dashes and
//! commas are meaningful to the backend's index resolution and pass through.
//!
//! # Example
//!
//! ```
//! use logviewer_client::endpoints::url_encoding::encode_index_pattern;
//!
//! assert_eq!(encode_index_pattern("app-wfms-*"), "app-wfms-*");
//! assert_eq!(encode_index_pattern("logs/../admin"), "logs%2F..%2Fadmin");
//! ```

use percent_encoding::{AsciiSet, CONTROLS, percent_encode};

/// Characters that must be percent-encoded in an index pattern path segment.
pub const INDEX_PATTERN_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'#')
    .add(b'+')
    .add(b';')
    .add(b'[')
    .add(b']');

/// Percent-encode an index pattern for use as a URL path segment.
pub fn encode_index_pattern(pattern: &str) -> String {
    percent_encode(pattern.as_bytes(), INDEX_PATTERN_ENCODE_SET).to_string()
}
