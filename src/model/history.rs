//! Reading-history payloads.
//!
//! The bulk history endpoint returns one record per read event, possibly
//! summarized ("light" records carry only the most recent chapter plus an
//! authoritative `chaptersCount`). The per-title detail endpoint returns the
//! full chapter mark list for one title.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ChapterRef;
use super::title::TitleRef;

/// One chapter-read fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterMark {
    /// Chapter id; bare or embedded, normalized via [`ChapterMark::id`].
    pub chapter_id: ChapterRef,
    /// Chapter number within the title.
    pub chapter_number: i64,
    /// Chapter display title, when the payload carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_title: Option<String>,
    /// When the chapter was read.
    pub read_at: DateTime<Utc>,
}

impl ChapterMark {
    /// Canonical chapter id string.
    #[must_use]
    pub fn id(&self) -> String {
        self.chapter_id.id()
    }
}

/// One backend history record.
///
/// Multiple records may exist per title (repeated reads); grouping merges
/// them. A record with no chapters still carries a top-level `readAt` used
/// to seed recency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingRecord {
    /// Title reference; bare id or denormalized object.
    #[serde(alias = "title")]
    pub title_id: TitleRef,
    /// Chapter marks; empty for summarized records without chapter data.
    #[serde(default)]
    pub chapters: Vec<ChapterMark>,
    /// Authoritative total chapters read, present on summarized records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapters_count: Option<u32>,
    /// Record-level timestamp, used when chapter marks are absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

impl ReadingRecord {
    /// Canonical title id string.
    #[must_use]
    pub fn title_id(&self) -> String {
        self.title_id.id()
    }

    /// The most recent timestamp this record attests to.
    ///
    /// Chapter marks win over the record-level `readAt` when both exist.
    #[must_use]
    pub fn last_read_at(&self) -> Option<DateTime<Utc>> {
        self.chapters
            .iter()
            .map(|c| c.read_at)
            .chain(self.read_at)
            .max()
    }
}
