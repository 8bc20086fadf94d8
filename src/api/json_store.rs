//! File-backed history store.
//!
//! Serves the same wire shapes as the reading service from a local JSON
//! snapshot: an array of raw history records. The bulk read summarizes each
//! record to its most recent chapter plus an authoritative count, exactly
//! like the service's light records; the per-title read returns full
//! chapter lists. Deletes rewrite the snapshot atomically.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{Result, ShelfError};
use crate::model::{ChapterMark, ReadingRecord};
use crate::util::atomic_write;

use super::HistoryApi;

/// History API implementation over a local JSON snapshot file.
#[derive(Debug, Clone)]
pub struct JsonHistoryApi {
    path: PathBuf,
}

impl JsonHistoryApi {
    /// Create a store over `path`. The file is not touched until used.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<ReadingRecord>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ShelfError::HistoryFileNotFound {
                    path: self.path.clone(),
                });
            }
            Err(e) => {
                return Err(ShelfError::io(
                    format!("Failed to read history file: {}", self.path.display()),
                    e,
                ));
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            ShelfError::parse_with_source(
                format!("invalid history snapshot: {}", self.path.display()),
                e,
            )
        })
    }

    async fn save(&self, records: &[ReadingRecord]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(records)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || atomic_write(&path, &bytes))
            .await
            .map_err(|e| ShelfError::io("history write task failed", std::io::Error::other(e)))?
    }
}

/// Reduce a record to its most recent chapter plus the authoritative count.
fn summarize(record: &ReadingRecord) -> ReadingRecord {
    let mut summarized = record.clone();
    if record.chapters.len() > 1 {
        let latest = record
            .chapters
            .iter()
            .max_by_key(|c| c.read_at)
            .cloned()
            .into_iter()
            .collect();
        summarized.chapters = latest;
        let count = summarized.chapters_count.unwrap_or(0);
        summarized.chapters_count = Some(count.max(record.chapters.len() as u32));
    }
    summarized.read_at = record.last_read_at();
    summarized
}

#[async_trait]
impl HistoryApi for JsonHistoryApi {
    async fn fetch_history(&self) -> Result<Vec<ReadingRecord>> {
        Ok(self.load().await?.iter().map(summarize).collect())
    }

    async fn fetch_title_history(&self, title_id: &str) -> Result<Vec<ChapterMark>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|r| r.title_id() == title_id)
            .flat_map(|r| r.chapters)
            .collect())
    }

    async fn delete_history(&self, title_id: &str, chapter_id: Option<&str>) -> Result<()> {
        let mut records = self.load().await?;

        match chapter_id {
            None => {
                let before = records.len();
                records.retain(|r| r.title_id() != title_id);
                if records.len() == before {
                    return Err(ShelfError::rejected("no history for this title"));
                }
            }
            Some(chapter_id) => {
                let mut removed = false;
                for record in records
                    .iter_mut()
                    .filter(|r| r.title_id() == title_id)
                {
                    let before = record.chapters.len();
                    record.chapters.retain(|c| c.id() != chapter_id);
                    removed |= record.chapters.len() != before;
                }
                if !removed {
                    return Err(ShelfError::rejected("chapter not found in history"));
                }
                // Records that only existed for those chapters go away too.
                records.retain(|r| !r.chapters.is_empty() || r.read_at.is_some());
            }
        }

        self.save(&records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SNAPSHOT: &str = r#"[
        {
            "titleId": {"id": "t-1", "name": "Moon Sword", "slug": "moon-sword"},
            "chapters": [
                {"chapterId": "c-1", "chapterNumber": 1, "readAt": "2026-08-01T10:00:00Z"},
                {"chapterId": "c-2", "chapterNumber": 2, "readAt": "2026-08-01T10:30:00Z"},
                {"chapterId": "c-3", "chapterNumber": 3, "readAt": "2026-08-02T09:00:00Z"}
            ]
        },
        {
            "titleId": "t-2",
            "chapters": [
                {"chapterId": {"_id": "x-1"}, "chapterNumber": 12, "readAt": "2026-08-03T20:00:00Z"}
            ]
        }
    ]"#;

    fn store_with_snapshot() -> (tempfile::TempDir, JsonHistoryApi) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, SNAPSHOT).unwrap();
        (dir, JsonHistoryApi::new(path))
    }

    #[tokio::test]
    async fn test_bulk_read_summarizes_multi_chapter_records() {
        let (_dir, store) = store_with_snapshot();
        let records = store.fetch_history().await.unwrap();

        let t1 = records.iter().find(|r| r.title_id() == "t-1").unwrap();
        assert_eq!(t1.chapters.len(), 1);
        assert_eq!(t1.chapters[0].id(), "c-3");
        assert_eq!(t1.chapters_count, Some(3));

        // Single-chapter records pass through unsummarized.
        let t2 = records.iter().find(|r| r.title_id() == "t-2").unwrap();
        assert_eq!(t2.chapters.len(), 1);
        assert_eq!(t2.chapters_count, None);
    }

    #[tokio::test]
    async fn test_detail_read_returns_full_list() {
        let (_dir, store) = store_with_snapshot();
        let chapters = store.fetch_title_history("t-1").await.unwrap();
        assert_eq!(chapters.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_title_rewrites_snapshot() {
        let (_dir, store) = store_with_snapshot();
        store.delete_history("t-1", None).await.unwrap();

        let records = store.fetch_history().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title_id(), "t-2");
    }

    #[tokio::test]
    async fn test_delete_single_chapter() {
        let (_dir, store) = store_with_snapshot();
        store.delete_history("t-1", Some("c-2")).await.unwrap();

        let chapters = store.fetch_title_history("t-1").await.unwrap();
        let ids: Vec<String> = chapters.iter().map(ChapterMark::id).collect();
        assert_eq!(ids, vec!["c-1", "c-3"]);
    }

    #[tokio::test]
    async fn test_delete_unknown_title_is_rejected_and_leaves_file_alone() {
        let (_dir, store) = store_with_snapshot();
        let err = store.delete_history("t-404", None).await.unwrap_err();
        assert!(matches!(err, ShelfError::ApiRejected { .. }));

        // Nothing was lost.
        assert_eq!(store.fetch_history().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_a_distinct_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonHistoryApi::new(dir.path().join("absent.json"));
        let err = store.fetch_history().await.unwrap_err();
        assert!(matches!(err, ShelfError::HistoryFileNotFound { .. }));
    }
}
