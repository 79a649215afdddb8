//! Navigation engine: one authoritative slide index fed by fragment,
//! scroll tracking, wheel, touch and keyboard intents.
//!
//! All inputs propose transitions; only the [`Navigator`] mutates the
//! index. The engine owns no pixels and never reads the clock. Hosts
//! pass event timestamps in and drain scroll commands out, which keeps
//! every timing rule deterministic under test.

pub mod keymap;
pub mod panels;
pub mod swipe;
pub mod tracker;
pub mod views;
pub mod wheel;

#[cfg(test)]
mod tests;

use std::time::Instant;

use tracing::debug;

use crate::deck::Deck;

use keymap::Key;
use panels::{EscapeOutcome, Panel, Panels};
use swipe::TouchSwipe;
use tracker::{VisibilityReport, VisibilityTracker};
use views::Views;
use wheel::{WheelThrottle, WheelVerdict};

/// Direction of a single-step transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// How the host should move the viewport to a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollStyle {
    /// Animated, for user-triggered transitions.
    Smooth,
    /// Immediate, for the startup jump.
    Instant,
}

/// Pending scroll-into-view command for the host to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub index: usize,
    pub style: ScrollStyle,
}

/// What the host should do with a raw wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDisposition {
    /// Not ours; default scrolling stays.
    PassThrough,
    /// Swallow the event without navigating.
    Consumed,
    /// Swallow the event; a transition was applied.
    Navigated,
}

/// Whether the engine handled a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    Consumed,
    Pass,
}

/// The authoritative index holder. Construction requires a validated
/// deck, so at least one slide always exists.
pub struct Navigator {
    deck: Deck,
    current: usize,
    presenting: bool,
    wheel: WheelThrottle,
    swipe: TouchSwipe,
    tracker: VisibilityTracker,
    panels: Panels,
    views: Views,
    scroll_request: Option<ScrollRequest>,
}

impl Navigator {
    pub fn new(deck: Deck) -> Self {
        let tracker = VisibilityTracker::new(deck.len());
        Self {
            deck,
            current: 0,
            presenting: false,
            wheel: WheelThrottle::new(),
            swipe: TouchSwipe::new(),
            tracker,
            panels: Panels::new(),
            views: Views::all(),
            scroll_request: None,
        }
    }

    /// Resolve the startup fragment, falling back to the first slide,
    /// and jump there without animation. The jump is emitted even for
    /// slide 0: the viewport may start anywhere.
    pub fn startup(&mut self, fragment: Option<&str>) {
        let target = fragment
            .and_then(|f| self.deck.resolve_fragment(f))
            .unwrap_or(0);
        self.current = target;
        self.scroll_request = Some(ScrollRequest {
            index: target,
            style: ScrollStyle::Instant,
        });
        self.views
            .sync(&self.deck, self.current, self.panels.notes_open());
        debug!(
            "nav: startup at slide {} ({})",
            target + 1,
            self.deck.slides[target].id
        );
    }

    /// Clamp and apply a transition. Idempotent: a same-index call
    /// skips the scroll but still refreshes dependent views, which
    /// also terminates the fragment echo loop.
    pub fn go_to(&mut self, target: usize, style: ScrollStyle) {
        let clamped = target.min(self.deck.len() - 1);
        if clamped != self.current {
            debug!("nav: slide {} -> {}", self.current + 1, clamped + 1);
            self.current = clamped;
            self.scroll_request = Some(ScrollRequest {
                index: clamped,
                style,
            });
        }
        self.views
            .sync(&self.deck, self.current, self.panels.notes_open());
    }

    /// One step forward or back, saturating at the deck ends.
    pub fn advance(&mut self, direction: Direction, style: ScrollStyle) {
        let target = match direction {
            Direction::Next => self.current.saturating_add(1),
            Direction::Previous => self.current.saturating_sub(1),
        };
        self.go_to(target, style);
    }

    pub fn first(&mut self) {
        self.go_to(0, ScrollStyle::Smooth);
    }

    pub fn last(&mut self) {
        self.go_to(self.deck.len() - 1, ScrollStyle::Smooth);
    }

    /// External fragment edit while running. Unknown ids are ignored
    /// so the deck stays where the user left it; only the startup read
    /// falls back to the first slide.
    pub fn on_fragment_changed(&mut self, fragment: &str) {
        match self.deck.resolve_fragment(fragment) {
            Some(index) => self.go_to(index, ScrollStyle::Smooth),
            None => debug!("nav: ignoring unknown fragment '{fragment}'"),
        }
    }

    /// Judge one wheel event. The overview has its own scroll
    /// semantics, so an open overview passes everything through.
    pub fn on_wheel(&mut self, delta_y: f32, now: Instant) -> WheelDisposition {
        if self.panels.overview_open() {
            return WheelDisposition::PassThrough;
        }
        match self.wheel.judge(delta_y, now) {
            WheelVerdict::Noise => WheelDisposition::PassThrough,
            WheelVerdict::Gated => WheelDisposition::Consumed,
            WheelVerdict::Advance(direction) => {
                self.advance(direction, ScrollStyle::Smooth);
                WheelDisposition::Navigated
            }
        }
    }

    pub fn on_touch_start(&mut self, y: f32, now: Instant) {
        self.swipe.begin(y, now);
    }

    /// Finish a touch gesture. The gesture always completes so no
    /// stale start survives, but an open overview suppresses the
    /// navigation just like it does for the wheel.
    pub fn on_touch_end(&mut self, y: f32, now: Instant) {
        let finished = self.swipe.finish(y, now);
        if self.panels.overview_open() {
            return;
        }
        if let Some(direction) = finished {
            self.advance(direction, ScrollStyle::Smooth);
        }
    }

    pub fn on_touch_cancel(&mut self) {
        self.swipe.cancel();
    }

    /// Feed one frame of visibility reports. A threshold crossing
    /// moves the index and refreshes views but never drives a scroll:
    /// the user is already scrolling and a programmatic scroll would
    /// fight the gesture.
    pub fn observe_visibility(&mut self, reports: &[VisibilityReport]) {
        if let Some(index) = self.tracker.observe(reports) {
            if index != self.current {
                debug!("nav: tracking slide {}", index + 1);
                self.current = index;
            }
            self.views
                .sync(&self.deck, self.current, self.panels.notes_open());
        }
    }

    /// Handle a normalized key press. Escape goes to the panels first;
    /// everything else through the flat keymap.
    pub fn on_key(&mut self, key: Key) -> KeyDisposition {
        if key == Key::Escape {
            return match self.panels.escape() {
                EscapeOutcome::ClosedOverview | EscapeOutcome::ClosedNotes => {
                    KeyDisposition::Consumed
                }
                EscapeOutcome::Ignored => KeyDisposition::Pass,
            };
        }
        let Some(command) = keymap::command_for(key) else {
            return KeyDisposition::Pass;
        };
        match command {
            keymap::KeyCommand::Next => self.advance(Direction::Next, ScrollStyle::Smooth),
            keymap::KeyCommand::Previous => self.advance(Direction::Previous, ScrollStyle::Smooth),
            keymap::KeyCommand::First => self.first(),
            keymap::KeyCommand::Last => self.last(),
            keymap::KeyCommand::ToggleOverview => self.toggle_overview(None),
            keymap::KeyCommand::ToggleNotes => self.toggle_notes(None),
            keymap::KeyCommand::TogglePresent => self.presenting = !self.presenting,
        }
        KeyDisposition::Consumed
    }

    /// Open, close or force the notes panel. Opening refreshes the
    /// panel against the slide that is current right now.
    pub fn toggle_notes(&mut self, force: Option<bool>) {
        if self.panels.toggle(Panel::Notes, force) {
            self.views.refresh_notes(&self.deck, self.current);
        }
    }

    /// Open, close or force the overview. Opening rebuilds the grid
    /// from the registry.
    pub fn toggle_overview(&mut self, force: Option<bool>) {
        if self.panels.toggle(Panel::Overview, force) {
            self.views.rebuild_overview(&self.deck);
        }
    }

    /// Overview card click: close the grid, then navigate.
    pub fn choose_from_overview(&mut self, index: usize) {
        self.toggle_overview(Some(false));
        self.go_to(index, ScrollStyle::Smooth);
    }

    /// Drain the pending scroll command. The host executes it; the
    /// engine only decides.
    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.scroll_request.take()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    pub fn views_mut(&mut self) -> &mut Views {
        &mut self.views
    }

    pub fn panels(&self) -> &Panels {
        &self.panels
    }

    pub fn presenting(&self) -> bool {
        self.presenting
    }
}
