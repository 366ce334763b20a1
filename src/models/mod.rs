//! Data models for query history.
//!
//! - [`HistoryEntry`] - one recorded query/result pair, as persisted and exported
//!
//! Dates use the custom (de)serializers in the `deserializers` module so that
//! both RFC3339 strings and epoch-millisecond numbers are accepted on read.

pub mod deserializers;
pub mod history;

pub use history::{HistoryEntry, has_content};
