//! REST endpoint implementations for the search backend.

mod request;
pub mod search;
pub mod url_encoding;

pub use request::send_request_with_retry;
pub use search::search_index;
pub use url_encoding::encode_index_pattern;
