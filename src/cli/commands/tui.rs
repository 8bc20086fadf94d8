//! TUI launcher command.

use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::api::HistoryApi;
use crate::cli::{Cli, TuiArgs};
use crate::config::Config;
use crate::error::Result;

use super::open_store;

/// Run the TUI command.
pub fn run(cli: &Cli, args: &TuiArgs, config: &Config, runtime: &Runtime) -> Result<()> {
    let mut config = config.clone();
    if let Some(theme) = &args.theme {
        config.theme.name = theme.clone();
    }

    let api: Arc<dyn HistoryApi> = Arc::new(open_store(cli, &config)?);
    crate::tui::launch(&config, api, runtime.handle().clone())
}
