//! Title payloads and the shelf card shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::IdValue;

/// Denormalized title info as embedded in history payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleInfo {
    /// Title id, under `id` or `_id` depending on the endpoint.
    #[serde(alias = "_id")]
    pub id: IdValue,
    /// Display name.
    pub name: String,
    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// URL slug used to build routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// A title reference: a bare id or the full denormalized title object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TitleRef {
    /// Full denormalized title info.
    Full(TitleInfo),
    /// Bare id.
    Id(IdValue),
}

impl TitleRef {
    /// Normalize to the canonical title id string.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::Id(v) => v.normalize(),
            Self::Full(info) => info.id.normalize(),
        }
    }

    /// Denormalized title info, when the payload carried it.
    #[must_use]
    pub fn info(&self) -> Option<&TitleInfo> {
        match self {
            Self::Id(_) => None,
            Self::Full(info) => Some(info),
        }
    }
}

impl From<&str> for TitleRef {
    fn from(s: &str) -> Self {
        Self::Id(IdValue::from(s))
    }
}

/// A card shown on the continue-reading shelf.
///
/// Cards are derived from grouped history; the carousel itself places no
/// constraints on the record shape beyond an identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleCard {
    /// Title id.
    pub title_id: String,
    /// Display name ("Untitled" when the payload only carried a bare id).
    pub name: String,
    /// Route slug, when known.
    pub slug: Option<String>,
    /// Cover image URL, when known.
    pub cover_image: Option<String>,
    /// Highest chapter number read, when chapter data is present.
    pub latest_chapter: Option<i64>,
    /// Most recent read timestamp for the title.
    pub last_read_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_title_ref() {
        let r: TitleRef = serde_json::from_str(r#""t-9""#).unwrap();
        assert_eq!(r.id(), "t-9");
        assert!(r.info().is_none());
    }

    #[test]
    fn test_full_title_ref() {
        let r: TitleRef = serde_json::from_str(
            r#"{"_id": "t-9", "name": "Tower of Dawn", "coverImage": "/c/t9.jpg", "slug": "tower-of-dawn"}"#,
        )
        .unwrap();
        assert_eq!(r.id(), "t-9");
        let info = r.info().unwrap();
        assert_eq!(info.name, "Tower of Dawn");
        assert_eq!(info.slug.as_deref(), Some("tower-of-dawn"));
    }
}
