//! Inertial carousel state machine.
//!
//! A carousel renders an ordered collection of cards in a horizontally
//! scrollable strip with three interaction modes: manual drag, button
//! paging, and an optional continuous auto-scroll loop. The tricky part is
//! telling a "click to open" gesture apart from a "drag to scroll" gesture,
//! and keeping the auto-scroll loop from fighting the user.
//!
//! This module is pure state: positions are abstract horizontal units
//! (pixels in a browser, columns in a terminal), timestamps are injected
//! [`Instant`]s, and rendering/navigation belong to the caller. Only one
//! writer moves the scroll offset at a time: starting a gesture pauses the
//! auto-scroll loop before any movement is applied, and the loop only
//! advances while no gesture or quiet period is active. That single-writer
//! rule is a scheduling convention, not a lock.
//!
//! Click suppression is two-phase. The browser dispatches the synthetic
//! click after the pointer-up, so the "a drag just happened" flag must
//! survive pointer-up and be cleared by an explicit end-of-gesture step
//! ([`Carousel::finish_gesture`]) that the event loop runs one tick later.

use std::time::{Duration, Instant};

/// Paging direction for button-triggered scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Toward lower offsets.
    Left,
    /// Toward higher offsets.
    Right,
}

/// Pointer family driving a gesture.
///
/// Mouse drags move the offset directly. Touch drags leave scrolling to the
/// platform's native momentum and only track the drag flag, so suppression
/// still works without double-applying movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Mouse or equivalent: movement is applied to the offset here.
    Mouse,
    /// Touch: movement is tracked for suppression only.
    Touch,
}

/// Tunable carousel behavior.
#[derive(Debug, Clone)]
pub struct CarouselOptions {
    /// Cumulative movement (units) that turns a gesture into a drag.
    pub drag_threshold: f32,
    /// Longest press (ms) still accepted as a click.
    pub click_max_ms: u64,
    /// Quiet period (ms) after an interaction before auto-scroll resumes.
    pub resume_delay_ms: u64,
    /// Auto-scroll speed in units per second; `None` disables the loop.
    pub auto_scroll_speed: Option<f32>,
    /// Gap (units) between adjacent cards.
    pub card_gap: f32,
    /// Card width (units) assumed until a real card is measured.
    pub default_card_width: f32,
    /// Cards per page when the viewport has not been measured yet.
    pub scroll_amount: usize,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            drag_threshold: 10.0,
            click_max_ms: 200,
            resume_delay_ms: 2500,
            auto_scroll_speed: None,
            card_gap: 16.0,
            default_card_width: 180.0,
            scroll_amount: 3,
        }
    }
}

/// An in-progress pointer gesture.
#[derive(Debug, Clone)]
struct DragState {
    kind: PointerKind,
    start_x: f32,
    start_offset: f32,
    started: Instant,
    dragged: bool,
}

/// A gesture that ended but whose click (if any) has not been dispatched.
#[derive(Debug, Clone)]
struct FinishedGesture {
    started: Instant,
    dragged: bool,
}

/// Horizontally scrollable card strip with drag, paging, and auto-scroll.
#[derive(Debug)]
pub struct Carousel<T> {
    items: Vec<T>,
    opts: CarouselOptions,
    offset: f32,
    viewport: Option<f32>,
    card_width: Option<f32>,
    drag: Option<DragState>,
    finished: Option<FinishedGesture>,
    paused_until: Option<Instant>,
    last_frame: Option<Instant>,
}

impl<T> Carousel<T> {
    /// Create a carousel over `items`.
    #[must_use]
    pub fn new(items: Vec<T>, opts: CarouselOptions) -> Self {
        Self {
            items,
            opts,
            offset: 0.0,
            viewport: None,
            card_width: None,
            drag: None,
            finished: None,
            paused_until: None,
            last_frame: None,
        }
    }

    /// Replace the card collection.
    ///
    /// The offset is reset: the old position is meaningless against new
    /// content.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.offset = 0.0;
    }

    /// Underlying items.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Current scroll offset in units.
    #[must_use]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// The carousel's tuning options.
    #[must_use]
    pub fn options(&self) -> &CarouselOptions {
        &self.opts
    }

    /// Record the measured viewport width.
    pub fn set_viewport(&mut self, width: f32) {
        self.viewport = Some(width);
    }

    /// Record the measured width of a rendered card.
    pub fn set_card_width(&mut self, width: f32) {
        self.card_width = Some(width);
    }

    /// Whether the auto-scroll loop is in effect.
    ///
    /// Requires a configured speed and at least two cards; a single card
    /// has no meaningful loop.
    #[must_use]
    pub fn auto_scroll_enabled(&self) -> bool {
        self.opts.auto_scroll_speed.is_some() && self.items.len() > 1
    }

    /// Whether auto-scroll is currently advancing (not paused).
    #[must_use]
    pub fn auto_scroll_running(&self, now: Instant) -> bool {
        self.auto_scroll_enabled() && !self.paused(now)
    }

    /// Whether the paging controls should render.
    ///
    /// Hidden only when there is nothing to show; a single-card strip
    /// keeps its controls.
    #[must_use]
    pub fn controls_visible(&self) -> bool {
        !self.items.is_empty()
    }

    /// Number of card slots to render.
    ///
    /// With auto-scroll in effect the data is doubled end-to-end so the
    /// wraparound is seamless; otherwise the data renders once.
    #[must_use]
    pub fn display_len(&self) -> usize {
        if self.auto_scroll_enabled() {
            self.items.len() * 2
        } else {
            self.items.len()
        }
    }

    /// Map a display slot back to its item.
    #[must_use]
    pub fn item_at(&self, display_index: usize) -> Option<&T> {
        if self.items.is_empty() {
            return None;
        }
        self.items.get(display_index % self.items.len())
    }

    /// Stride of one card slot: card width (measured or assumed) plus gap.
    #[must_use]
    pub fn card_stride(&self) -> f32 {
        self.card_width.unwrap_or(self.opts.default_card_width) + self.opts.card_gap
    }

    /// Width of one full copy of the data, the wraparound modulus.
    #[must_use]
    pub fn loop_width(&self) -> f32 {
        self.card_stride() * self.items.len() as f32
    }

    /// Display slots intersecting the viewport, as `(slot, x)` pairs.
    ///
    /// `x` is the slot's left edge relative to the viewport's left edge.
    /// With no measured viewport every slot is returned.
    #[must_use]
    pub fn visible_slots(&self) -> Vec<(usize, f32)> {
        let stride = self.card_stride();
        let card_width = stride - self.opts.card_gap;
        (0..self.display_len())
            .filter_map(|slot| {
                let x = slot as f32 * stride - self.offset;
                let visible = match self.viewport {
                    Some(width) => x + card_width > 0.0 && x < width,
                    None => true,
                };
                visible.then_some((slot, x))
            })
            .collect()
    }

    /// Begin a pointer gesture.
    ///
    /// Pauses auto-scroll immediately, whether or not the gesture turns
    /// into a drag.
    pub fn pointer_down(&mut self, kind: PointerKind, x: f32, now: Instant) {
        self.drag = Some(DragState {
            kind,
            start_x: x,
            start_offset: self.offset,
            started: now,
            dragged: false,
        });
        self.finished = None;
        // Held open while the gesture lasts; pointer-up re-arms it.
        self.paused_until = None;
    }

    /// Track pointer movement within a gesture.
    ///
    /// Once the cumulative movement crosses the drag threshold the gesture
    /// is a drag; on the mouse path the delta is applied to the offset,
    /// while the touch path leaves scrolling to native momentum.
    pub fn pointer_move(&mut self, x: f32) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };

        let walk = x - drag.start_x;
        if walk.abs() > self.opts.drag_threshold {
            drag.dragged = true;
            if drag.kind == PointerKind::Mouse {
                self.offset = drag.start_offset - walk;
                self.normalize_offset();
            }
        }
    }

    /// End a pointer gesture.
    ///
    /// The drag state resets now, but the suppression flag survives until
    /// [`finish_gesture`](Self::finish_gesture) because the platform's
    /// click arrives after pointer-up. Auto-scroll resumes after the quiet
    /// period.
    pub fn pointer_up(&mut self, now: Instant) {
        if let Some(drag) = self.drag.take() {
            self.finished = Some(FinishedGesture {
                started: drag.started,
                dragged: drag.dragged,
            });
        }
        if self.auto_scroll_enabled() {
            self.paused_until = Some(now + Duration::from_millis(self.opts.resume_delay_ms));
        }
    }

    /// Clear the deferred suppression flag.
    ///
    /// Must run after the platform has dispatched any click belonging to
    /// the gesture — in practice, on the event-loop tick after pointer-up.
    pub fn finish_gesture(&mut self) {
        self.finished = None;
    }

    /// Whether a click arriving now counts as a navigation intent.
    ///
    /// All three conditions must hold: the deferred drag flag is clear, no
    /// drag was flagged in the current gesture, and the click follows the
    /// gesture start within the click window. Neither flag timing nor
    /// duration alone separates a tap from a tap-and-drift.
    #[must_use]
    pub fn click_permitted(&self, now: Instant) -> bool {
        let click_window = Duration::from_millis(self.opts.click_max_ms);
        if let Some(drag) = &self.drag {
            return !drag.dragged && now.duration_since(drag.started) <= click_window;
        }
        match &self.finished {
            Some(gesture) => {
                !gesture.dragged && now.duration_since(gesture.started) <= click_window
            }
            // No gesture context (keyboard/programmatic activation).
            None => true,
        }
    }

    /// Resolve a click on a display slot.
    ///
    /// Returns the clicked item when the suppression gate passes, `None`
    /// when the click is swallowed as the tail of a drag.
    #[must_use]
    pub fn click(&self, display_index: usize, now: Instant) -> Option<&T> {
        if !self.click_permitted(now) {
            return None;
        }
        self.item_at(display_index)
    }

    /// Page the strip by however many cards fit the viewport.
    ///
    /// Falls back to the configured page size when the viewport has not
    /// been measured. Pauses auto-scroll exactly like a drag so manual
    /// paging does not fight the loop.
    pub fn scroll(&mut self, direction: ScrollDirection, now: Instant) {
        let stride = self.card_stride();
        let cards = match self.viewport {
            Some(width) => ((width / stride).floor() as usize).max(1),
            None => self.opts.scroll_amount.max(1),
        };
        let delta = stride * cards as f32;

        match direction {
            ScrollDirection::Left => self.offset -= delta,
            ScrollDirection::Right => self.offset += delta,
        }
        self.normalize_offset();

        if self.auto_scroll_enabled() {
            self.paused_until = Some(now + Duration::from_millis(self.opts.resume_delay_ms));
        }
    }

    /// Advance the auto-scroll loop by one frame.
    ///
    /// Called every frame regardless of state; a pause only gates whether
    /// the offset moves, so the loop never has to be re-acquired. The step
    /// is time-delta based and therefore frame-rate independent.
    pub fn advance(&mut self, now: Instant) {
        let dt = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last_frame = Some(now);

        if !self.auto_scroll_enabled() || self.paused(now) {
            return;
        }
        let Some(speed) = self.opts.auto_scroll_speed else {
            return;
        };

        self.offset += speed * dt.as_secs_f32();
        self.normalize_offset();
    }

    fn paused(&self, now: Instant) -> bool {
        if self.drag.is_some() {
            return true;
        }
        self.paused_until.is_some_and(|until| now < until)
    }

    /// Fold the offset back into the seamless-loop range.
    ///
    /// With doubled data, crossing one copy's width steps back by exactly
    /// that width (and symmetrically forward when negative), which is
    /// invisible because the second copy renders identical content.
    /// Without doubling, the offset clamps to the scrollable range.
    fn normalize_offset(&mut self) {
        if self.items.is_empty() {
            self.offset = 0.0;
            return;
        }

        if self.auto_scroll_enabled() {
            let loop_width = self.loop_width();
            if self.offset >= loop_width {
                self.offset -= loop_width;
            } else if self.offset < 0.0 {
                self.offset += loop_width;
            }
            return;
        }

        let content = self.card_stride() * self.items.len() as f32 - self.opts.card_gap;
        let max = match self.viewport {
            Some(width) => (content - width).max(0.0),
            None => content.max(0.0),
        };
        self.offset = self.offset.clamp(0.0, max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn opts_with_speed(speed: Option<f32>) -> CarouselOptions {
        CarouselOptions {
            auto_scroll_speed: speed,
            card_gap: 10.0,
            default_card_width: 90.0, // stride 100 for round numbers
            ..CarouselOptions::default()
        }
    }

    fn carousel(count: usize, speed: Option<f32>) -> Carousel<usize> {
        Carousel::new((0..count).collect(), opts_with_speed(speed))
    }

    #[test]
    fn test_drag_suppresses_click() {
        let mut c = carousel(5, None);
        let t0 = Instant::now();

        c.pointer_down(PointerKind::Mouse, 100.0, t0);
        c.pointer_move(115.0); // 15 units, past the threshold
        c.pointer_up(t0 + Duration::from_millis(40));

        // Click arrives 50ms after the gesture started, flag not yet cleared.
        assert_eq!(c.click(0, t0 + Duration::from_millis(50)), None);
    }

    #[test]
    fn test_clean_tap_navigates() {
        let mut c = carousel(5, None);
        let t0 = Instant::now();

        c.pointer_down(PointerKind::Mouse, 100.0, t0);
        c.pointer_up(t0 + Duration::from_millis(30));

        assert_eq!(c.click(2, t0 + Duration::from_millis(50)), Some(&2));
    }

    #[test]
    fn test_slow_press_is_not_a_click() {
        let mut c = carousel(5, None);
        let t0 = Instant::now();

        c.pointer_down(PointerKind::Mouse, 100.0, t0);
        c.pointer_up(t0 + Duration::from_millis(280));

        // Held past the click window even though nothing moved.
        assert_eq!(c.click(0, t0 + Duration::from_millis(300)), None);
    }

    #[test]
    fn test_finish_gesture_clears_suppression() {
        let mut c = carousel(5, None);
        let t0 = Instant::now();

        c.pointer_down(PointerKind::Mouse, 100.0, t0);
        c.pointer_move(150.0);
        c.pointer_up(t0 + Duration::from_millis(40));
        c.finish_gesture();

        // A later, unrelated click is fine again.
        assert_eq!(c.click(1, t0 + Duration::from_secs(5)), Some(&1));
    }

    #[test]
    fn test_sub_threshold_move_keeps_click() {
        let mut c = carousel(5, None);
        let t0 = Instant::now();

        c.pointer_down(PointerKind::Mouse, 100.0, t0);
        c.pointer_move(106.0); // under the 10-unit threshold
        c.pointer_up(t0 + Duration::from_millis(30));

        assert_eq!(c.offset(), 0.0);
        assert_eq!(c.click(0, t0 + Duration::from_millis(40)), Some(&0));
    }

    #[test]
    fn test_mouse_drag_moves_offset_touch_does_not() {
        let t0 = Instant::now();

        let mut mouse = carousel(5, None);
        mouse.pointer_down(PointerKind::Mouse, 200.0, t0);
        mouse.pointer_move(150.0);
        assert_eq!(mouse.offset(), 50.0);

        let mut touch = carousel(5, None);
        touch.pointer_down(PointerKind::Touch, 200.0, t0);
        touch.pointer_move(150.0);
        assert_eq!(touch.offset(), 0.0);
        // The flag still trips, so the click is still swallowed.
        touch.pointer_up(t0 + Duration::from_millis(40));
        assert_eq!(touch.click(0, t0 + Duration::from_millis(50)), None);
    }

    #[test]
    fn test_doubling_only_with_auto_scroll_and_multiple_items() {
        assert_eq!(carousel(4, Some(60.0)).display_len(), 8);
        assert_eq!(carousel(4, None).display_len(), 4);
        assert_eq!(carousel(1, Some(60.0)).display_len(), 1);
    }

    #[test]
    fn test_auto_scroll_wraps_at_loop_width() {
        let mut c = carousel(4, Some(100.0)); // loop width 400
        let t0 = Instant::now();

        c.advance(t0); // establishes the frame clock
        c.advance(t0 + Duration::from_secs(3));
        assert_eq!(c.offset(), 300.0);

        // Crossing the loop width steps back by exactly one copy.
        c.advance(t0 + Duration::from_secs(5)); // 300 + 200 = 500 -> 100
        assert_eq!(c.offset(), 100.0);
        assert!(c.offset() >= 0.0 && c.offset() < c.loop_width());
    }

    #[test]
    fn test_negative_offset_wraps_forward() {
        let mut c = carousel(4, Some(100.0));
        let t0 = Instant::now();

        c.pointer_down(PointerKind::Mouse, 0.0, t0);
        c.pointer_move(150.0); // drag right of the origin
        assert_eq!(c.offset(), 250.0); // -150 + 400
    }

    #[test]
    fn test_single_item_never_advances() {
        let mut c = carousel(1, Some(100.0));
        let t0 = Instant::now();

        c.advance(t0);
        c.advance(t0 + Duration::from_secs(10));
        assert_eq!(c.offset(), 0.0);
        assert!(c.controls_visible());
    }

    #[test]
    fn test_empty_shows_no_controls() {
        let c = carousel(0, Some(100.0));
        assert!(!c.controls_visible());
        assert_eq!(c.display_len(), 0);
        assert!(c.visible_slots().is_empty());
    }

    #[test]
    fn test_interaction_pauses_then_resumes_after_quiet_period() {
        let mut c = carousel(4, Some(100.0));
        let t0 = Instant::now();

        c.advance(t0);
        c.pointer_down(PointerKind::Mouse, 50.0, t0);
        c.pointer_up(t0 + Duration::from_millis(100));

        // Still inside the 2.5s quiet period: frames arrive, nothing moves.
        c.advance(t0 + Duration::from_secs(1));
        assert_eq!(c.offset(), 0.0);
        assert!(!c.auto_scroll_running(t0 + Duration::from_secs(1)));
        c.advance(t0 + Duration::from_secs(2));
        assert_eq!(c.offset(), 0.0);

        // Past the quiet period the loop picks up again, advancing only by
        // the time since the previous frame.
        let after = t0 + Duration::from_secs(3);
        c.advance(after);
        assert_eq!(c.offset(), 100.0);
        assert!(c.auto_scroll_running(after));
    }

    #[test]
    fn test_paging_uses_viewport_when_measured() {
        let mut c = carousel(10, None);
        let t0 = Instant::now();

        // 3 cards fit a 350-unit viewport at stride 100.
        c.set_viewport(350.0);
        c.scroll(ScrollDirection::Right, t0);
        assert_eq!(c.offset(), 300.0);

        c.scroll(ScrollDirection::Left, t0);
        assert_eq!(c.offset(), 0.0);
    }

    #[test]
    fn test_paging_falls_back_when_unmeasured() {
        let mut c = carousel(10, None);
        let t0 = Instant::now();

        // No viewport measured: the configured page size applies.
        c.scroll(ScrollDirection::Right, t0);
        assert_eq!(c.offset(), 300.0);
    }

    #[test]
    fn test_paging_reschedules_auto_scroll() {
        let mut c = carousel(4, Some(100.0));
        let t0 = Instant::now();

        c.advance(t0);
        c.scroll(ScrollDirection::Right, t0);
        let offset_after_page = c.offset();

        c.advance(t0 + Duration::from_secs(1));
        assert_eq!(c.offset(), offset_after_page);
    }

    #[test]
    fn test_clamping_without_auto_scroll() {
        let mut c = carousel(3, None); // content 290 at stride 100, gap 10
        let t0 = Instant::now();
        c.set_viewport(250.0);

        c.scroll(ScrollDirection::Right, t0);
        c.scroll(ScrollDirection::Right, t0);
        assert_eq!(c.offset(), 40.0); // clamped to content - viewport

        c.scroll(ScrollDirection::Left, t0);
        assert_eq!(c.offset(), 0.0);
    }

    #[test]
    fn test_visible_slots_window() {
        let mut c = carousel(10, None);
        c.set_viewport(250.0);

        let slots: Vec<usize> = c.visible_slots().iter().map(|(s, _)| *s).collect();
        assert_eq!(slots, vec![0, 1, 2]);

        c.scroll(ScrollDirection::Right, Instant::now());
        let slots: Vec<usize> = c.visible_slots().iter().map(|(s, _)| *s).collect();
        assert!(slots.contains(&3));
        assert!(!slots.contains(&0));
    }
}
