//! Boundaries to the reading service.
//!
//! The client touches exactly three external surfaces: the history API
//! (bulk read, per-title detail read, delete), a navigation sink that
//! receives route pushes, and whatever data source feeds the shelf. All
//! three are traits here so the core stays independent of transport; the
//! shipped [`JsonHistoryApi`] serves the same wire shapes from a local
//! snapshot file, and [`MemoryHistoryApi`] backs tests.

mod json_store;
mod memory;
mod route;

pub use json_store::JsonHistoryApi;
pub use memory::MemoryHistoryApi;
pub use route::{Navigator, Route, RouteRecorder};

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{ChapterMark, ReadingRecord};

/// Reading-history endpoints.
///
/// The bulk read may return summarized records (most recent chapter plus an
/// authoritative `chaptersCount`); the per-title read returns the complete
/// chapter list. Deletion failures carry a human-readable message that is
/// surfaced to the user verbatim.
#[async_trait]
pub trait HistoryApi: Send + Sync {
    /// Fetch the bulk history payload.
    async fn fetch_history(&self) -> Result<Vec<ReadingRecord>>;

    /// Fetch the complete chapter history for one title.
    async fn fetch_title_history(&self, title_id: &str) -> Result<Vec<ChapterMark>>;

    /// Remove history entries.
    ///
    /// With `chapter_id` set, removes that single chapter mark; otherwise
    /// removes every entry for the title.
    async fn delete_history(&self, title_id: &str, chapter_id: Option<&str>) -> Result<()>;
}
