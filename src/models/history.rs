use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single recorded query and the result it produced.
///
/// Entries are immutable once created. Field names on the wire (`text`,
/// `result`, `from`, `to`, `date`) are shared by the durable snapshot and
/// the JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    #[serde(rename = "text")]
    pub query_text: String,
    #[serde(rename = "result")]
    pub result_text: String,
    #[serde(rename = "from")]
    pub source_language: String,
    #[serde(rename = "to")]
    pub target_language: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(
        rename = "date",
        serialize_with = "crate::models::deserializers::serialize_timestamp",
        deserialize_with = "crate::models::deserializers::deserialize_timestamp"
    )]
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry with a fresh id, stamped with the current time.
    ///
    /// The timestamp is kept at millisecond precision so it survives a trip
    /// through the snapshot unchanged.
    pub fn new(
        query_text: &str,
        result_text: &str,
        source_language: &str,
        target_language: &str,
        service: Option<&str>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            query_text: query_text.to_string(),
            result_text: result_text.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            service: service.map(str::to_string),
            timestamp: Utc::now().trunc_subsecs(3),
        }
    }

    /// Whether the entry satisfies the stored-entry invariants
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty() && has_content(&self.query_text) && has_content(&self.result_text)
    }
}

/// True when `text` has something other than whitespace
pub fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}
