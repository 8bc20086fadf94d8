//! Terminal User Interface for manga-shelf.
//!
//! Provides a two-panel interface:
//! - Top: continue-reading shelf (draggable, auto-scrolling carousel)
//! - Bottom: reading history grouped by title and session
//!
//! Built with ratatui for cross-platform terminal support. Mouse capture is
//! enabled so the shelf supports drag-scrolling with click suppression.

mod app;
mod components;
mod events;
mod state;
mod theme;

pub use app::run;
pub use events::{ApiEvent, Event};
pub use state::{AppState, Panel};
pub use theme::Theme;

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::api::HistoryApi;
use crate::config::Config;
use crate::error::Result;

/// Launch the TUI application.
pub fn launch(config: &Config, api: Arc<dyn HistoryApi>, runtime: Handle) -> Result<()> {
    app::run(config, api, runtime)
}
