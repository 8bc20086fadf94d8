//! Sessionization of a title's chapter marks.
//!
//! A reading session is a maximal run of chapters, taken in chapter-number
//! order, whose consecutive read timestamps are close together. Ordering by
//! chapter number rather than wall clock is deliberate: sessions describe
//! progress through the work, so out-of-order backend delivery does not
//! fragment them.

use chrono::{DateTime, Duration, Utc};

use crate::model::ChapterMark;

/// Gap (minutes) between consecutive reads that starts a new session.
pub const SESSION_GAP_MINUTES: i64 = 120;

/// A contiguous run of chapter reads within one title.
#[derive(Debug, Clone)]
pub struct ReadingSession {
    /// Member chapters, ordered by chapter number ascending.
    pub chapters: Vec<ChapterMark>,
}

impl ReadingSession {
    /// Read timestamp of the last (highest-numbered) member.
    ///
    /// Sessions are ordered for display by this value.
    #[must_use]
    pub fn last_read_at(&self) -> DateTime<Utc> {
        self.chapters
            .last()
            .map_or_else(DateTime::<Utc>::default, |c| c.read_at)
    }

    /// Chapter numbers of the members, in chapter order.
    #[must_use]
    pub fn chapter_numbers(&self) -> Vec<i64> {
        self.chapters.iter().map(|c| c.chapter_number).collect()
    }
}

/// Split chapter marks into sessions with the given gap threshold.
///
/// Input order is irrelevant; marks are sorted by chapter number first.
/// The returned sessions are ordered for display by their last member's
/// read timestamp, most recent first.
#[must_use]
pub fn sessionize_with_gap(chapters: &[ChapterMark], gap: Duration) -> Vec<ReadingSession> {
    if chapters.is_empty() {
        return Vec::new();
    }

    let mut ordered: Vec<ChapterMark> = chapters.to_vec();
    ordered.sort_by(|a, b| {
        a.chapter_number
            .cmp(&b.chapter_number)
            .then(a.read_at.cmp(&b.read_at))
    });

    let mut sessions: Vec<ReadingSession> = Vec::new();
    let mut current: Vec<ChapterMark> = Vec::new();

    for mark in ordered {
        if let Some(prev) = current.last() {
            if mark.read_at - prev.read_at >= gap {
                sessions.push(ReadingSession { chapters: current });
                current = Vec::new();
            }
        }
        current.push(mark);
    }
    sessions.push(ReadingSession { chapters: current });

    sessions.sort_by(|a, b| b.last_read_at().cmp(&a.last_read_at()));
    sessions
}

/// Split chapter marks into sessions with the default 2-hour gap.
#[must_use]
pub fn sessionize(chapters: &[ChapterMark]) -> Vec<ReadingSession> {
    sessionize_with_gap(chapters, Duration::minutes(SESSION_GAP_MINUTES))
}
