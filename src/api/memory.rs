//! In-memory history store for tests and demos.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, ShelfError};
use crate::model::{ChapterMark, ReadingRecord};

use super::HistoryApi;

/// History API implementation over an in-memory record list.
///
/// Deletion failures can be injected to exercise the surfaced-error path.
#[derive(Debug, Default)]
pub struct MemoryHistoryApi {
    records: Mutex<Vec<ReadingRecord>>,
    fail_delete_with: Mutex<Option<String>>,
}

impl MemoryHistoryApi {
    /// Create a store seeded with `records`.
    #[must_use]
    pub fn new(records: Vec<ReadingRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            fail_delete_with: Mutex::new(None),
        }
    }

    /// Replace the stored records.
    pub fn set_records(&self, records: Vec<ReadingRecord>) {
        *self.records.lock().expect("history store lock") = records;
    }

    /// Make the next delete fail with `message`.
    pub fn fail_next_delete(&self, message: impl Into<String>) {
        *self.fail_delete_with.lock().expect("history store lock") = Some(message.into());
    }
}

#[async_trait]
impl HistoryApi for MemoryHistoryApi {
    async fn fetch_history(&self) -> Result<Vec<ReadingRecord>> {
        Ok(self.records.lock().expect("history store lock").clone())
    }

    async fn fetch_title_history(&self, title_id: &str) -> Result<Vec<ChapterMark>> {
        Ok(self
            .records
            .lock()
            .expect("history store lock")
            .iter()
            .filter(|r| r.title_id() == title_id)
            .flat_map(|r| r.chapters.clone())
            .collect())
    }

    async fn delete_history(&self, title_id: &str, chapter_id: Option<&str>) -> Result<()> {
        if let Some(message) = self.fail_delete_with.lock().expect("history store lock").take() {
            return Err(ShelfError::rejected(message));
        }

        let mut records = self.records.lock().expect("history store lock");
        match chapter_id {
            None => records.retain(|r| r.title_id() != title_id),
            Some(chapter_id) => {
                for record in records.iter_mut().filter(|r| r.title_id() == title_id) {
                    record.chapters.retain(|c| c.id() != chapter_id);
                }
                records.retain(|r| !r.chapters.is_empty() || r.read_at.is_some());
            }
        }
        Ok(())
    }
}
