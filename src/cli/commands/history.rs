//! History command implementation.
//!
//! Prints the grouped reading history: one block per title, most recently
//! read first, with each reading session rendered as a chapter-range label.

use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;
use tokio::runtime::Runtime;

use crate::api::HistoryApi;
use crate::cli::{Cli, HistoryArgs, OutputFormat};
use crate::error::Result;
use crate::history::{session_label, HistoryView};
use crate::util::ago;

use super::open_store;

/// One title in the JSON output.
#[derive(Debug, Serialize)]
struct GroupInfo {
    title_id: String,
    name: String,
    chapters_read: usize,
    last_read_at: DateTime<Utc>,
    sessions: Vec<SessionInfo>,
}

/// One session in the JSON output.
#[derive(Debug, Serialize)]
struct SessionInfo {
    label: String,
    chapter_numbers: Vec<i64>,
    last_read_at: DateTime<Utc>,
}

/// Run the history command.
pub fn run(cli: &Cli, args: &HistoryArgs, config: &crate::config::Config, runtime: &Runtime) -> Result<()> {
    let store = open_store(cli, config)?;
    let now = Utc::now();

    let mut view = HistoryView::with_thresholds(
        config.history.window(),
        config.history.session_gap(),
    );

    runtime.block_on(async {
        let records = store.fetch_history().await?;
        view.set_records(&records, now);

        if args.expand {
            // Pull the complete chapter list per title, like expanding
            // every entry in the UI.
            let titles: Vec<String> = view
                .groups()
                .iter()
                .map(|g| g.title_id.clone())
                .collect();
            for title_id in titles {
                if let Some(request) = view.toggle_expand(&title_id) {
                    match store.fetch_title_history(&title_id).await {
                        Ok(chapters) => {
                            view.resolve_detail(&title_id, request.generation, chapters);
                        }
                        Err(e) => {
                            // Tolerated: keep the summarized fallback.
                            tracing::warn!(title_id = %title_id, error = %e, "detail fetch failed");
                            view.fail_detail(&title_id, request.generation);
                        }
                    }
                }
            }
        }

        Ok::<(), crate::error::ShelfError>(())
    })?;

    let limit = args.limit.unwrap_or(usize::MAX);

    match cli.effective_output() {
        OutputFormat::Json => print_json(&view, limit),
        OutputFormat::Text => {
            print_text(&view, now, limit);
            Ok(())
        }
    }
}

fn print_json(view: &HistoryView, limit: usize) -> Result<()> {
    let groups: Vec<GroupInfo> = view
        .groups()
        .iter()
        .take(limit)
        .map(|group| GroupInfo {
            title_id: group.title_id.clone(),
            name: group.display_name().to_string(),
            chapters_read: group.chapters_read(),
            last_read_at: group.last_read_at,
            sessions: view
                .sessions(&group.title_id)
                .iter()
                .map(|session| SessionInfo {
                    label: session_label(&session.chapters),
                    chapter_numbers: session.chapter_numbers(),
                    last_read_at: session.last_read_at(),
                })
                .collect(),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&groups)?);
    Ok(())
}

fn print_text(view: &HistoryView, now: DateTime<Utc>, limit: usize) {
    if view.groups().is_empty() {
        println!("No titles read in the last month.");
        return;
    }

    for group in view.groups().iter().take(limit) {
        println!(
            "{}  {}",
            style(group.display_name()).cyan().bold(),
            style(format!(
                "{} chapters - {}",
                group.chapters_read(),
                ago(group.last_read_at, now)
            ))
            .dim(),
        );
        for session in view.sessions(&group.title_id) {
            println!(
                "    {}  {}",
                session_label(&session.chapters),
                style(ago(session.last_read_at(), now)).dim(),
            );
        }
    }
}
