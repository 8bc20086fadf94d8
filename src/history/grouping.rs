//! Title grouping over raw history records.
//!
//! The bulk history payload is a flat list of read events, possibly with
//! several records per title and with chapter ids arriving in mixed shapes.
//! Grouping merges them into one [`TitleGroup`] per title, deduplicated by
//! chapter id, windowed to recent activity, and ordered recency-first.
//!
//! Groups are derived state: they are rebuilt from scratch whenever the
//! input records change and are never mutated in place across renders.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;

use crate::model::{ChapterMark, ReadingRecord, TitleCard, TitleInfo};

/// Trailing window (days) a title must have been read within to stay visible.
pub const RECENCY_WINDOW_DAYS: i64 = 30;

/// All reads of one title, merged across records.
#[derive(Debug, Clone)]
pub struct TitleGroup {
    /// Canonical title id.
    pub title_id: String,
    /// Denormalized title info, when any contributing record carried it.
    pub title: Option<TitleInfo>,
    /// Chapter marks, deduplicated by chapter id (first occurrence wins).
    pub chapters: Vec<ChapterMark>,
    /// Authoritative total chapters read, max across summarized records.
    pub chapters_count: Option<u32>,
    /// Most recent read timestamp across all contributing records.
    pub last_read_at: DateTime<Utc>,
}

impl TitleGroup {
    /// Display name, falling back to the bare id when no info arrived.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.title.as_ref().map_or(&self.title_id, |t| &t.name)
    }

    /// Total chapters read for display.
    ///
    /// The summarized `chaptersCount` is authoritative when it exceeds the
    /// number of marks actually delivered.
    #[must_use]
    pub fn chapters_read(&self) -> usize {
        let listed = self.chapters.len();
        match self.chapters_count {
            Some(count) => listed.max(count as usize),
            None => listed,
        }
    }

    /// Highest chapter number read, when chapter data is present.
    #[must_use]
    pub fn latest_chapter(&self) -> Option<i64> {
        self.chapters.iter().map(|c| c.chapter_number).max()
    }

    /// Shelf card for this group.
    #[must_use]
    pub fn card(&self) -> TitleCard {
        TitleCard {
            title_id: self.title_id.clone(),
            name: self
                .title
                .as_ref()
                .map_or_else(|| "Untitled".to_string(), |t| t.name.clone()),
            slug: self.title.as_ref().and_then(|t| t.slug.clone()),
            cover_image: self.title.as_ref().and_then(|t| t.cover_image.clone()),
            latest_chapter: self.latest_chapter(),
            last_read_at: self.last_read_at,
        }
    }
}

/// Accumulates one title's records before the window filter and sort.
#[derive(Debug, Default)]
struct GroupBuilder {
    title: Option<TitleInfo>,
    chapters: Vec<ChapterMark>,
    seen_chapter_ids: HashSet<String>,
    chapters_count: Option<u32>,
    last_read_at: Option<DateTime<Utc>>,
}

impl GroupBuilder {
    fn absorb(&mut self, record: &ReadingRecord) {
        if self.title.is_none() {
            self.title = record.title_id.info().cloned();
        }

        for mark in &record.chapters {
            if self.seen_chapter_ids.insert(mark.id()) {
                self.chapters.push(mark.clone());
            }
        }

        if let Some(count) = record.chapters_count {
            self.chapters_count = Some(self.chapters_count.map_or(count, |c| c.max(count)));
        }

        self.last_read_at = self.last_read_at.max(record.last_read_at());
    }

    fn build(self, title_id: String) -> Option<TitleGroup> {
        // A record set with no timestamp at all cannot pass the recency
        // window; drop it rather than inventing a time.
        let last_read_at = self.last_read_at?;
        Some(TitleGroup {
            title_id,
            title: self.title,
            chapters: self.chapters,
            chapters_count: self.chapters_count,
            last_read_at,
        })
    }
}

/// Merge raw records into per-title groups with the default trailing window.
#[must_use]
pub fn group_records(records: &[ReadingRecord], now: DateTime<Utc>) -> Vec<TitleGroup> {
    group_records_within(records, now, Duration::days(RECENCY_WINDOW_DAYS))
}

/// Merge raw records into per-title groups.
///
/// Order-insensitive over the input. Groups whose most recent read is older
/// than the trailing `window` relative to `now` are dropped; survivors are
/// sorted most-recent-first.
#[must_use]
pub fn group_records_within(
    records: &[ReadingRecord],
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<TitleGroup> {
    let mut builders: IndexMap<String, GroupBuilder> = IndexMap::new();

    for record in records {
        builders
            .entry(record.title_id())
            .or_default()
            .absorb(record);
    }

    let cutoff = now - window;
    let mut groups: Vec<TitleGroup> = builders
        .into_iter()
        .filter_map(|(title_id, builder)| builder.build(title_id))
        .filter(|group| group.last_read_at >= cutoff)
        .collect();

    groups.sort_by(|a, b| b.last_read_at.cmp(&a.last_read_at));
    groups
}
