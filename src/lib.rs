//! manga-shelf: terminal client for a manga/manhwa reading service.
//!
//! This crate provides the reading-site client's two stateful cores and the
//! shell around them:
//!
//! - **Session-grouped reading history**: a flat, possibly-duplicated,
//!   possibly-summarized list of backend history records becomes a
//!   deduplicated, time-windowed, per-title view whose chapters split into
//!   reading sessions, with on-demand detail expansion and deletion.
//! - **Inertial shelf carousel**: a horizontally scrollable strip of title
//!   cards with pointer-drag scrolling, click-vs-drag disambiguation,
//!   button paging, and a seamless auto-scroll loop.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use manga_shelf::history::HistoryView;
//! use manga_shelf::model::ReadingRecord;
//!
//! fn main() -> manga_shelf::Result<()> {
//!     let records: Vec<ReadingRecord> =
//!         serde_json::from_str(r#"[{"titleId": "t-1", "readAt": "2026-08-01T10:00:00Z"}]"#)?;
//!
//!     let mut view = HistoryView::new();
//!     view.set_records(&records, Utc::now());
//!     for group in view.groups() {
//!         println!("{}: {} chapters", group.display_name(), group.chapters_read());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`model`]: wire shapes for history payloads, with id normalization
//! - [`history`]: grouping, sessionization, range labels, view state
//! - [`carousel`]: the drag/paging/auto-scroll state machine
//! - [`api`]: boundary traits for the history service and navigation sink
//! - [`tui`]: interactive shelf built on ratatui/crossterm
//! - [`cli`]: scriptable command-line interface
//! - [`config`]: TOML configuration
//! - [`error`]: error types and handling
//! - [`util`]: atomic writes and time display helpers

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod api;
pub mod carousel;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod tui;
pub mod util;

// Re-export commonly used types at the crate root
pub use error::{Result, ShelfError};
pub use model::{ChapterMark, ReadingRecord};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for convenient imports.
pub mod prelude {

    pub use crate::api::{HistoryApi, JsonHistoryApi, MemoryHistoryApi, Navigator, Route};
    pub use crate::carousel::{Carousel, CarouselOptions, PointerKind, ScrollDirection};
    pub use crate::error::{Result, ShelfError};
    pub use crate::history::{session_label, sessionize, HistoryView, TitleGroup};
    pub use crate::model::{ChapterMark, ReadingRecord, TitleCard, TitleInfo};
}
