//! TUI application state.

use std::time::Instant;

use chrono::{DateTime, Utc};
use ratatui::layout::Rect;

use crate::api::{Navigator, Route, RouteRecorder};
use crate::carousel::{Carousel, CarouselOptions, PointerKind, ScrollDirection};
use crate::config::Config;
use crate::history::{DetailRequest, HistoryView, RemoveIntent, TitleGroup};
use crate::model::{ReadingRecord, TitleCard};
use crate::tui::theme::Theme;

/// Which panel has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// The continue-reading shelf.
    Shelf,
    /// The grouped reading history.
    History,
}

/// Application state.
///
/// Pure state and transitions; all I/O (API calls, terminal) lives in the
/// run loop, which feeds results back in through these methods.
pub struct AppState {
    /// Grouped history with expansion bookkeeping.
    pub view: HistoryView,
    /// Continue-reading shelf.
    pub shelf: Carousel<TitleCard>,
    /// Navigation sink.
    pub navigator: RouteRecorder,
    /// Focused panel.
    pub focus: Panel,
    /// Selected row in the history panel (group index).
    pub selected: usize,
    /// History panel scroll offset (rows).
    pub history_scroll: usize,
    /// Pending deletion awaiting confirmation.
    pub confirm: Option<RemoveIntent>,
    /// Transient status line message.
    pub status_message: Option<String>,
    /// Current theme.
    pub theme: Theme,
    /// Bulk history fetch in flight.
    pub loading: bool,
    /// Shelf strip area from the last draw, for mouse hit testing.
    pub shelf_area: Option<Rect>,
}

impl AppState {
    /// Create state from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            view: HistoryView::with_thresholds(
                config.history.window(),
                config.history.session_gap(),
            ),
            shelf: Carousel::new(Vec::new(), CarouselOptions::from(&config.carousel)),
            navigator: RouteRecorder::new(),
            focus: Panel::History,
            selected: 0,
            history_scroll: 0,
            confirm: None,
            status_message: None,
            theme: Theme::from_name(&config.theme.name),
            loading: true,
            shelf_area: None,
        }
    }

    /// Apply a fresh bulk payload: regroup and rebuild the shelf cards.
    pub fn apply_records(&mut self, records: &[ReadingRecord], now: DateTime<Utc>) {
        self.view.set_records(records, now);
        self.shelf.set_items(self.view.cards());
        self.loading = false;
        if self.selected >= self.view.groups().len() {
            self.selected = self.view.groups().len().saturating_sub(1);
        }
    }

    /// The group the history cursor is on.
    pub fn selected_group(&self) -> Option<&TitleGroup> {
        self.view.groups().get(self.selected)
    }

    /// Move the history cursor up.
    pub fn previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move the history cursor down.
    pub fn next(&mut self) {
        let last = self.view.groups().len().saturating_sub(1);
        self.selected = (self.selected + 1).min(last);
    }

    /// Toggle focus between the shelf and the history panel.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Panel::Shelf => Panel::History,
            Panel::History => Panel::Shelf,
        };
    }

    /// Toggle expansion of the selected title.
    ///
    /// Returns the detail request to dispatch, when one is needed.
    pub fn toggle_selected(&mut self) -> Option<DetailRequest> {
        let title_id = self.selected_group()?.title_id.clone();
        self.view.toggle_expand(&title_id)
    }

    /// Ask to remove the selected title's history.
    ///
    /// Whole-title removal needs confirmation, so this opens the modal
    /// rather than producing a dispatchable intent.
    pub fn request_remove_selected(&mut self) {
        let Some(title_id) = self.selected_group().map(|g| g.title_id.clone()) else {
            return;
        };
        self.confirm = Some(self.view.remove_title(&title_id));
    }

    /// Confirm the pending deletion, yielding the intent to dispatch.
    pub fn confirm_remove(&mut self) -> Option<RemoveIntent> {
        self.confirm.take()
    }

    /// Dismiss the pending deletion.
    pub fn cancel_remove(&mut self) {
        self.confirm = None;
    }

    /// Continue reading the selected title: route to its freshest chapter.
    pub fn open_selected(&mut self) {
        let Some(group) = self.selected_group() else {
            return;
        };
        let route = continue_route(group);
        self.navigator.push(route);
    }

    /// Resolve a click on the shelf at terminal column `column`.
    ///
    /// Maps the column through the carousel's offset to a display slot and
    /// lets the suppression gate decide whether it navigates.
    pub fn shelf_click(&mut self, column: f32, now: Instant) {
        let stride = self.shelf.card_stride();
        let slot = ((column + self.shelf.offset()) / stride).floor();
        if slot < 0.0 {
            return;
        }
        let route = self.shelf.click(slot as usize, now).map(card_route);
        if let Some(route) = route {
            self.navigator.push(route);
        }
    }

    /// Page the shelf.
    pub fn page_shelf(&mut self, direction: ScrollDirection, now: Instant) {
        self.shelf.scroll(direction, now);
    }

    /// Forward a pointer press on the shelf.
    pub fn shelf_pointer_down(&mut self, column: f32, now: Instant) {
        self.shelf.pointer_down(PointerKind::Mouse, column, now);
    }

    /// Forward pointer movement on the shelf.
    pub fn shelf_pointer_move(&mut self, column: f32) {
        self.shelf.pointer_move(column);
    }

    /// Forward a pointer release on the shelf.
    pub fn shelf_pointer_up(&mut self, now: Instant) {
        self.shelf.pointer_up(now);
    }

    /// Per-tick upkeep: advance auto-scroll, then retire the previous
    /// gesture so its suppression flag clears one tick after pointer-up.
    pub fn tick(&mut self, now: Instant) {
        self.shelf.advance(now);
        self.shelf.finish_gesture();
    }
}

/// Route for a shelf card: the title's detail page.
pub fn card_route(card: &TitleCard) -> Route {
    let slug = card.slug.clone().unwrap_or_else(|| card.title_id.clone());
    Route::Title { slug }
}

/// Route for the continue-reading affordance on a history group.
pub fn continue_route(group: &TitleGroup) -> Route {
    let slug = group
        .title
        .as_ref()
        .and_then(|t| t.slug.clone())
        .unwrap_or_else(|| group.title_id.clone());

    let freshest = group.chapters.iter().max_by_key(|c| c.read_at);
    match freshest {
        Some(chapter) => Route::Chapter {
            slug,
            chapter_id: chapter.id(),
        },
        None => Route::Title { slug },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn app() -> AppState {
        AppState::new(&Config::default())
    }

    fn records() -> Vec<ReadingRecord> {
        serde_json::from_str(
            r#"[
                {
                    "titleId": {"id": "t-1", "name": "Moon Sword", "slug": "moon-sword"},
                    "chapters": [
                        {"chapterId": "c-89", "chapterNumber": 89, "readAt": "2026-08-07T09:00:00Z"},
                        {"chapterId": "c-90", "chapterNumber": 90, "readAt": "2026-08-07T10:00:00Z"}
                    ]
                },
                {"titleId": "t-2", "readAt": "2026-08-06T10:00:00Z"}
            ]"#,
        )
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        "2026-08-08T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_apply_records_builds_shelf_cards() {
        let mut app = app();
        app.apply_records(&records(), now());

        assert!(!app.loading);
        assert_eq!(app.shelf.items().len(), 2);
        assert_eq!(app.shelf.items()[0].name, "Moon Sword");
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut app = app();
        app.apply_records(&records(), now());

        app.next();
        app.next();
        app.next();
        assert_eq!(app.selected, 1);
        app.previous();
        app.previous();
        app.previous();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_continue_route_targets_freshest_chapter() {
        let mut app = app();
        app.apply_records(&records(), now());

        app.open_selected();
        assert_eq!(
            app.navigator.last().unwrap().path(),
            "/title/moon-sword/chapter/c-90"
        );
    }

    #[test]
    fn test_chapterless_group_routes_to_title_page() {
        let mut app = app();
        app.apply_records(&records(), now());

        app.next(); // t-2, no chapters
        app.open_selected();
        assert_eq!(app.navigator.last().unwrap().path(), "/title/t-2");
    }

    #[test]
    fn test_remove_flow_needs_confirmation() {
        let mut app = app();
        app.apply_records(&records(), now());

        app.request_remove_selected();
        assert!(app.confirm.is_some());

        let intent = app.confirm_remove().unwrap();
        assert_eq!(intent.title_id, "t-1");
        assert!(intent.needs_confirmation());
        assert!(app.confirm.is_none());
    }

    #[test]
    fn test_shelf_click_navigates_on_clean_tap() {
        let mut app = app();
        app.apply_records(&records(), now());
        let t0 = Instant::now();

        app.shelf_pointer_down(10.0, t0);
        app.shelf_pointer_up(t0 + std::time::Duration::from_millis(40));
        app.shelf_click(10.0, t0 + std::time::Duration::from_millis(50));

        assert_eq!(app.navigator.last().unwrap().path(), "/title/moon-sword");
    }

    #[test]
    fn test_shelf_click_suppressed_after_drag() {
        let mut app = app();
        app.apply_records(&records(), now());
        let t0 = Instant::now();

        app.shelf_pointer_down(40.0, t0);
        app.shelf_pointer_move(5.0);
        app.shelf_pointer_up(t0 + std::time::Duration::from_millis(60));
        app.shelf_click(5.0, t0 + std::time::Duration::from_millis(70));

        assert!(app.navigator.last().is_none());
    }
}
