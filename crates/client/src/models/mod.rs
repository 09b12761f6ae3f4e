//! Data models for search requests and returned log documents.

mod log_record;
mod search;

pub use log_record::LogRecord;
pub use search::{SearchHit, SearchRequest, SearchResponse, SortOrder};
