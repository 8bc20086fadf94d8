//! Reading-history core: grouping, sessionization, and view state.
//!
//! The pipeline is purely derived data over the bulk history payload:
//! records merge into per-title groups ([`grouping`]), a group's chapters
//! split into reading sessions ([`session`]), sessions render as range
//! labels ([`format`]), and [`view`] layers expansion/removal bookkeeping
//! on top without doing any I/O of its own.

pub mod format;
pub mod grouping;
pub mod session;
pub mod view;

pub use format::session_label;
pub use grouping::{group_records, group_records_within, TitleGroup, RECENCY_WINDOW_DAYS};
pub use session::{sessionize, sessionize_with_gap, ReadingSession, SESSION_GAP_MINUTES};
pub use view::{DetailRequest, HistoryView, RemoveIntent};
