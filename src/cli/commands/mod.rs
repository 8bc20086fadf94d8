//! CLI command implementations.

pub mod history;
pub mod remove;
pub mod tui;

use crate::api::JsonHistoryApi;
use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;

/// Build the history store from the CLI/config-resolved snapshot path.
pub fn open_store(cli: &Cli, config: &Config) -> Result<JsonHistoryApi> {
    let path = config.history_file(cli.history_file.as_deref())?;
    Ok(JsonHistoryApi::new(path))
}
