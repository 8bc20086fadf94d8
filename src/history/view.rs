//! Reading-history view state: grouped titles plus per-title expansion.
//!
//! [`HistoryView`] owns the derived groups and the UI-facing expansion and
//! removal bookkeeping. It performs no I/O itself: expanding a title yields
//! a [`DetailRequest`] for the caller to dispatch against the history API,
//! and resolutions are fed back in. While a detail fetch is pending, the
//! chapters already known from the bulk payload keep rendering; a failed
//! fetch silently keeps that fallback.
//!
//! Each expansion carries a generation counter. Collapsing a title bumps
//! the generation, so a response that arrives for an abandoned expansion is
//! discarded instead of overwriting a newer render.

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use tracing::debug;

use crate::model::{ChapterMark, ReadingRecord, TitleCard};

use super::grouping::{group_records_within, TitleGroup, RECENCY_WINDOW_DAYS};
use super::session::{sessionize_with_gap, ReadingSession, SESSION_GAP_MINUTES};

/// An on-demand fetch of one title's complete chapter history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    /// Title to fetch.
    pub title_id: String,
    /// Generation the request was issued under.
    pub generation: u64,
}

/// A history deletion the user asked for.
///
/// Whole-title removal is destructive enough to require an explicit
/// confirmation step before dispatch; single-chapter removal is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveIntent {
    /// Title whose history is affected.
    pub title_id: String,
    /// Specific chapter to remove; `None` removes the whole title.
    pub chapter_id: Option<String>,
}

impl RemoveIntent {
    /// Whether the intent must be confirmed before dispatch.
    #[must_use]
    pub fn needs_confirmation(&self) -> bool {
        self.chapter_id.is_none()
    }
}

/// Per-title expansion bookkeeping.
#[derive(Debug, Default)]
struct Expansion {
    open: bool,
    generation: u64,
    pending: bool,
    detail: Option<Vec<ChapterMark>>,
}

/// Grouped history with expansion state.
#[derive(Debug)]
pub struct HistoryView {
    groups: Vec<TitleGroup>,
    expansions: IndexMap<String, Expansion>,
    window: Duration,
    session_gap: Duration,
}

impl Default for HistoryView {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            expansions: IndexMap::new(),
            window: Duration::days(RECENCY_WINDOW_DAYS),
            session_gap: Duration::minutes(SESSION_GAP_MINUTES),
        }
    }
}

impl HistoryView {
    /// Create an empty view with the default window and session gap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty view with configured thresholds.
    #[must_use]
    pub fn with_thresholds(window: Duration, session_gap: Duration) -> Self {
        Self {
            window,
            session_gap,
            ..Self::default()
        }
    }

    /// Rebuild the grouped view from a fresh bulk payload.
    ///
    /// Groups are derived state and are always rebuilt from scratch;
    /// expansion flags and already-fetched details survive the rebuild so a
    /// background refresh does not collapse what the user is looking at.
    pub fn set_records(&mut self, records: &[ReadingRecord], now: DateTime<Utc>) {
        self.groups = group_records_within(records, now, self.window);
    }

    /// Current groups, most recently read first.
    #[must_use]
    pub fn groups(&self) -> &[TitleGroup] {
        &self.groups
    }

    /// Look up one group.
    #[must_use]
    pub fn group(&self, title_id: &str) -> Option<&TitleGroup> {
        self.groups.iter().find(|g| g.title_id == title_id)
    }

    /// Shelf cards for the grouped titles, recency-first.
    #[must_use]
    pub fn cards(&self) -> Vec<TitleCard> {
        self.groups.iter().map(TitleGroup::card).collect()
    }

    /// Whether a title is currently expanded.
    #[must_use]
    pub fn is_expanded(&self, title_id: &str) -> bool {
        self.expansions.get(title_id).is_some_and(|e| e.open)
    }

    /// Whether a detail fetch is in flight for a title.
    #[must_use]
    pub fn is_loading(&self, title_id: &str) -> bool {
        self.expansions.get(title_id).is_some_and(|e| e.pending)
    }

    /// Toggle a title's expansion.
    ///
    /// Opening a title that has no fetched detail yet issues a
    /// [`DetailRequest`]; the caller dispatches it and later feeds the
    /// outcome to [`resolve_detail`](Self::resolve_detail) or
    /// [`fail_detail`](Self::fail_detail). Collapsing bumps the generation
    /// so an in-flight response for the abandoned expansion is discarded.
    pub fn toggle_expand(&mut self, title_id: &str) -> Option<DetailRequest> {
        let entry = self.expansions.entry(title_id.to_string()).or_default();

        if entry.open {
            entry.open = false;
            entry.generation += 1;
            entry.pending = false;
            return None;
        }

        entry.open = true;
        if entry.detail.is_some() || entry.pending {
            return None;
        }

        entry.generation += 1;
        entry.pending = true;
        Some(DetailRequest {
            title_id: title_id.to_string(),
            generation: entry.generation,
        })
    }

    /// Accept a resolved detail fetch.
    ///
    /// The result is deduplicated by chapter id exactly like the bulk
    /// merge. A response whose generation no longer matches is dropped.
    pub fn resolve_detail(&mut self, title_id: &str, generation: u64, chapters: Vec<ChapterMark>) {
        let Some(entry) = self.expansions.get_mut(title_id) else {
            debug!(title_id, "detail response for unknown title, discarding");
            return;
        };
        if entry.generation != generation {
            debug!(
                title_id,
                generation,
                current = entry.generation,
                "stale detail response, discarding"
            );
            return;
        }

        let mut seen = std::collections::HashSet::new();
        let deduped: Vec<ChapterMark> = chapters
            .into_iter()
            .filter(|c| seen.insert(c.id()))
            .collect();

        entry.detail = Some(deduped);
        entry.pending = false;
    }

    /// Record a failed detail fetch.
    ///
    /// Failure keeps the bulk-payload fallback rendering; it is treated as
    /// "still loading elsewhere", not surfaced as an error.
    pub fn fail_detail(&mut self, title_id: &str, generation: u64) {
        if let Some(entry) = self.expansions.get_mut(title_id) {
            if entry.generation == generation {
                entry.pending = false;
            }
        }
    }

    /// Chapters to render for a title.
    ///
    /// Fetched detail supersedes the bulk payload once present; until then
    /// (including while a fetch is pending) the bulk chapters render.
    #[must_use]
    pub fn visible_chapters(&self, title_id: &str) -> &[ChapterMark] {
        if let Some(detail) = self
            .expansions
            .get(title_id)
            .and_then(|e| e.detail.as_deref())
        {
            return detail;
        }
        self.group(title_id).map_or(&[], |g| &g.chapters)
    }

    /// Sessions to render for a title, derived from the visible chapters.
    #[must_use]
    pub fn sessions(&self, title_id: &str) -> Vec<ReadingSession> {
        sessionize_with_gap(self.visible_chapters(title_id), self.session_gap)
    }

    /// Build a removal intent for a whole title.
    #[must_use]
    pub fn remove_title(&self, title_id: &str) -> RemoveIntent {
        RemoveIntent {
            title_id: title_id.to_string(),
            chapter_id: None,
        }
    }

    /// Build a removal intent for a single chapter.
    #[must_use]
    pub fn remove_chapter(&self, title_id: &str, chapter_id: &str) -> RemoveIntent {
        RemoveIntent {
            title_id: title_id.to_string(),
            chapter_id: Some(chapter_id.to_string()),
        }
    }
}
