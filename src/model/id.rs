//! Flexible identifier handling for backend payloads.
//!
//! The reading service is inconsistent about identifier shapes: depending on
//! the endpoint, an id may arrive as a bare string, a bare number, or a
//! denormalized object carrying the id under `id` or `_id` alongside other
//! fields. Every id is normalized to a plain string before it participates
//! in grouping or deduplication.

use serde::{Deserialize, Serialize};

/// A scalar identifier that may arrive as a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    /// String form, passed through unchanged.
    Text(String),
    /// Numeric form, converted to its decimal string.
    Number(i64),
}

impl IdValue {
    /// Normalize to the canonical string form.
    #[must_use]
    pub fn normalize(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

impl std::fmt::Display for IdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for IdValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// A chapter identifier: a bare scalar or an embedded object.
///
/// The detail endpoint returns chapter marks whose `chapterId` is the full
/// chapter object; the bulk endpoint returns the bare id. Both normalize to
/// the same string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChapterRef {
    /// Bare id.
    Scalar(IdValue),
    /// Denormalized chapter object; only the id is consumed.
    Embedded(EmbeddedChapter),
}

/// The subset of an embedded chapter object we care about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedChapter {
    /// Chapter id, under `id` or `_id` depending on the endpoint.
    #[serde(alias = "_id")]
    pub id: IdValue,
}

impl ChapterRef {
    /// Normalize to the canonical id string.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::Scalar(v) => v.normalize(),
            Self::Embedded(e) => e.id.normalize(),
        }
    }
}

impl From<&str> for ChapterRef {
    fn from(s: &str) -> Self {
        Self::Scalar(IdValue::from(s))
    }
}
