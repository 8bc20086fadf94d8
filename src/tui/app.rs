//! TUI application main loop.

use std::io;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::runtime::Handle;
use tracing::warn;

use crate::api::{HistoryApi, Navigator};
use crate::carousel::ScrollDirection;
use crate::config::Config;
use crate::error::{Result, ShelfError};
use crate::history::{DetailRequest, RemoveIntent};

use super::components::{render_confirm, render_history, render_shelf, render_status_bar};
use super::events::{ApiEvent, Event, EventHandler, KeyBindings};
use super::state::{card_route, AppState, Panel};

/// Tick rate for the frame loop; auto-scroll advances on every tick.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Run the TUI application.
pub fn run(config: &Config, api: Arc<dyn HistoryApi>, runtime: Handle) -> Result<()> {
    // Setup terminal
    enable_raw_mode().map_err(|e| {
        ShelfError::io(
            "Cannot launch TUI - no interactive terminal available. \
             The TUI requires a terminal with keyboard input support",
            e,
        )
    })?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| ShelfError::io("Failed to enter alternate screen", e))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| ShelfError::io("Failed to create terminal", e))?;

    let mut app = AppState::new(config);

    // Main loop
    let result = run_loop(&mut terminal, &mut app, &api, &runtime);

    // Restore terminal
    disable_raw_mode().map_err(|e| ShelfError::io("Failed to disable raw mode", e))?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .map_err(|e| ShelfError::io("Failed to leave alternate screen", e))?;
    terminal
        .show_cursor()
        .map_err(|e| ShelfError::io("Failed to show cursor", e))?;

    result
}

/// Main event loop using EventHandler.
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    api: &Arc<dyn HistoryApi>,
    runtime: &Handle,
) -> Result<()> {
    let events = EventHandler::new(TICK_RATE);
    let bindings = KeyBindings::default();

    // Kick off the initial bulk load.
    spawn_history_fetch(api, runtime, events.sender());

    loop {
        terminal
            .draw(|f| draw_ui(f, app))
            .map_err(|e| ShelfError::io("Failed to draw TUI", e))?;

        match events.next() {
            Ok(Event::Key(key)) => {
                app.status_message = None;

                // The confirmation modal swallows everything else.
                if app.confirm.is_some() {
                    match (key.modifiers, key.code) {
                        (KeyModifiers::NONE, KeyCode::Char('y')) => {
                            if let Some(intent) = app.confirm_remove() {
                                spawn_delete(api, runtime, events.sender(), intent);
                            }
                        }
                        (KeyModifiers::NONE, KeyCode::Char('n') | KeyCode::Esc) => {
                            app.cancel_remove();
                        }
                        _ => {}
                    }
                    continue;
                }

                if bindings.is_quit(&key) {
                    return Ok(());
                }

                if bindings.is_up(&key) {
                    app.previous();
                    continue;
                }
                if bindings.is_down(&key) {
                    app.next();
                    continue;
                }
                if bindings.is_left(&key) {
                    if app.focus == Panel::Shelf {
                        app.page_shelf(ScrollDirection::Left, Instant::now());
                    }
                    continue;
                }
                if bindings.is_right(&key) {
                    if app.focus == Panel::Shelf {
                        app.page_shelf(ScrollDirection::Right, Instant::now());
                    }
                    continue;
                }
                if bindings.is_select(&key) {
                    match app.focus {
                        Panel::History => app.open_selected(),
                        Panel::Shelf => open_shelf_front(app),
                    }
                    continue;
                }
                if bindings.is_back(&key) {
                    continue;
                }

                match (key.modifiers, key.code) {
                    (KeyModifiers::NONE, KeyCode::Tab) => {
                        app.toggle_focus();
                    }
                    // Expand/collapse the selected title.
                    (KeyModifiers::NONE, KeyCode::Char('e' | ' ')) => {
                        if let Some(request) = app.toggle_selected() {
                            spawn_detail_fetch(api, runtime, events.sender(), request);
                        }
                    }
                    // Ask to remove the selected title's history.
                    (KeyModifiers::NONE, KeyCode::Char('d')) => {
                        app.request_remove_selected();
                    }
                    // Refresh from the authoritative source.
                    (KeyModifiers::NONE, KeyCode::Char('r')) => {
                        app.loading = true;
                        spawn_history_fetch(api, runtime, events.sender());
                    }
                    _ => {}
                }
            }
            Ok(Event::Tick) => {
                app.tick(Instant::now());
            }
            Ok(Event::Resize(_, _)) => {
                // Ratatui re-measures on the next draw; the carousel picks
                // the new viewport up from render_shelf.
            }
            Ok(Event::Mouse(mouse)) => {
                let now = Instant::now();
                let in_shelf = app
                    .shelf_area
                    .is_some_and(|area| {
                        mouse.column >= area.x
                            && mouse.column < area.x + area.width
                            && mouse.row >= area.y
                            && mouse.row < area.y + area.height
                    });
                let column = app
                    .shelf_area
                    .map_or(0.0, |area| f32::from(mouse.column.saturating_sub(area.x)));

                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) if in_shelf => {
                        app.shelf_pointer_down(column, now);
                    }
                    // Movement is forwarded even when the pointer leaves the
                    // strip mid-gesture; it no-ops without an active drag.
                    MouseEventKind::Drag(MouseButton::Left) => {
                        app.shelf_pointer_move(column);
                    }
                    MouseEventKind::Up(MouseButton::Left) => {
                        app.shelf_pointer_up(now);
                        if in_shelf {
                            // The platform click follows the release.
                            app.shelf_click(column, now);
                        }
                    }
                    MouseEventKind::ScrollUp => {
                        app.previous();
                    }
                    MouseEventKind::ScrollDown => {
                        app.next();
                    }
                    _ => {}
                }
            }
            Ok(Event::Api(api_event)) => handle_api_event(app, api, runtime, &events, api_event),
            Err(_) => return Ok(()),
        }
    }
}

/// Apply an asynchronous API completion to the app state.
fn handle_api_event(
    app: &mut AppState,
    api: &Arc<dyn HistoryApi>,
    runtime: &Handle,
    events: &EventHandler,
    event: ApiEvent,
) {
    match event {
        ApiEvent::HistoryLoaded(Ok(records)) => {
            app.apply_records(&records, Utc::now());
        }
        ApiEvent::HistoryLoaded(Err(message)) => {
            app.loading = false;
            app.status_message = Some(message);
        }
        ApiEvent::DetailLoaded {
            title_id,
            generation,
            result: Ok(chapters),
        } => {
            app.view.resolve_detail(&title_id, generation, chapters);
        }
        ApiEvent::DetailLoaded {
            title_id,
            generation,
            result: Err(message),
        } => {
            // Tolerated: the bulk-payload fallback keeps rendering.
            warn!(title_id = %title_id, %message, "chapter detail fetch failed");
            app.view.fail_detail(&title_id, generation);
        }
        ApiEvent::DeleteDone { result: Ok(()) } => {
            app.status_message = Some("Removed from history".to_string());
            // No optimistic pruning: re-derive from the source of truth.
            app.loading = true;
            spawn_history_fetch(api, runtime, events.sender());
        }
        ApiEvent::DeleteDone {
            result: Err(message),
        } => {
            app.status_message = Some(message);
        }
    }
}

/// Navigate to the card at the front of the shelf viewport.
fn open_shelf_front(app: &mut AppState) {
    let front = app.shelf.visible_slots().first().map(|(slot, _)| *slot);
    let route = front
        .and_then(|slot| app.shelf.item_at(slot))
        .map(card_route);
    if let Some(route) = route {
        app.navigator.push(route);
    }
}

/// Fetch the bulk history payload in the background.
fn spawn_history_fetch(api: &Arc<dyn HistoryApi>, runtime: &Handle, tx: mpsc::Sender<Event>) {
    let api = Arc::clone(api);
    runtime.spawn(async move {
        let result = api.fetch_history().await.map_err(|e| e.to_string());
        let _ = tx.send(Event::Api(ApiEvent::HistoryLoaded(result)));
    });
}

/// Fetch one title's complete chapter history in the background.
fn spawn_detail_fetch(
    api: &Arc<dyn HistoryApi>,
    runtime: &Handle,
    tx: mpsc::Sender<Event>,
    request: DetailRequest,
) {
    let api = Arc::clone(api);
    runtime.spawn(async move {
        let result = api
            .fetch_title_history(&request.title_id)
            .await
            .map_err(|e| e.to_string());
        let _ = tx.send(Event::Api(ApiEvent::DetailLoaded {
            title_id: request.title_id,
            generation: request.generation,
            result,
        }));
    });
}

/// Dispatch a deletion in the background.
fn spawn_delete(
    api: &Arc<dyn HistoryApi>,
    runtime: &Handle,
    tx: mpsc::Sender<Event>,
    intent: RemoveIntent,
) {
    let api = Arc::clone(api);
    runtime.spawn(async move {
        let result = api
            .delete_history(&intent.title_id, intent.chapter_id.as_deref())
            .await
            .map_err(|e| e.to_string());
        let _ = tx.send(Event::Api(ApiEvent::DeleteDone { result }));
    });
}

/// Draw the full UI.
fn draw_ui(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_shelf(f, chunks[0], app);
    render_history(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
    render_confirm(f, f.area(), app);
}
