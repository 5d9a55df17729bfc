//! Search candidates returned by the archive.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One potential media item to download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Archive identifier (unique within a result set)
    pub identifier: String,

    /// Item title as reported by the archive
    pub title: String,

    /// Release year, if the archive knows it
    pub year: Option<String>,

    /// Creator/director, if the archive knows it
    pub creator: Option<String>,
}

impl Candidate {
    /// Create a candidate with only an identifier and title
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            year: None,
            creator: None,
        }
    }

    /// Builder: set the year
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    /// Builder: set the creator
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }
}

/// Normalize a loosely-typed archive field into a single string.
///
/// The archive returns `title`, `creator` and `year` as either a string,
/// a number, or an array of those. Arrays are joined with ", ".
pub fn flatten_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(flatten_field).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}
