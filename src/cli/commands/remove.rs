//! Remove command implementation.
//!
//! Deletes a whole title (with confirmation) or a single chapter from the
//! reading history. Failures surface the backend message verbatim and
//! leave the history untouched.

use console::style;
use dialoguer::Confirm;
use tokio::runtime::Runtime;

use crate::api::HistoryApi;
use crate::cli::{Cli, RemoveArgs};
use crate::config::Config;
use crate::error::{Result, ShelfError};

use super::open_store;

/// Run the remove command.
pub fn run(cli: &Cli, args: &RemoveArgs, config: &Config, runtime: &Runtime) -> Result<()> {
    let store = open_store(cli, config)?;

    // Removing every chapter of a title is destructive enough to ask first.
    let whole_title = args.chapter.is_none();
    if whole_title && !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove all chapters of \"{}\" from history?",
                args.title_id
            ))
            .default(false)
            .interact()
            .map_err(|e| ShelfError::TuiError {
                message: format!("confirmation prompt failed: {e}"),
            })?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    runtime.block_on(store.delete_history(&args.title_id, args.chapter.as_deref()))?;

    match &args.chapter {
        Some(chapter) => println!(
            "{} chapter {} of {}",
            style("Removed").green(),
            chapter,
            args.title_id
        ),
        None => println!("{} {}", style("Removed").green(), args.title_id),
    }
    Ok(())
}
