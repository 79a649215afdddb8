use std::time::{Duration, Instant};

use super::Direction;

/// Longest press still read as a swipe. Anything slower is a
/// deliberate touch scroll.
pub const MAX_DURATION: Duration = Duration::from_millis(550);

/// Minimum vertical travel, in pixels, to count as a swipe rather
/// than a tap.
pub const MIN_DISTANCE: f32 = 40.0;

#[derive(Debug, Clone, Copy)]
struct TouchStart {
    y: f32,
    at: Instant,
}

/// Pairs touch starts and ends into discrete swipe intents. Starts are
/// recorded passively; the host must leave touch scrolling alone.
#[derive(Debug, Default)]
pub struct TouchSwipe {
    start: Option<TouchStart>,
}

impl TouchSwipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new touch discards any gesture still in flight.
    pub fn begin(&mut self, y: f32, now: Instant) {
        self.start = Some(TouchStart { y, at: now });
    }

    /// Resolve the gesture. Dragging the content up (end above start)
    /// advances to the next slide. Boundary values sit on the swipe
    /// side: exactly 550 ms or exactly 40 px still navigates.
    pub fn finish(&mut self, y: f32, now: Instant) -> Option<Direction> {
        let start = self.start.take()?;
        if now.duration_since(start.at) > MAX_DURATION {
            return None;
        }
        let dy = y - start.y;
        if dy.abs() < MIN_DISTANCE {
            return None;
        }
        Some(if dy < 0.0 {
            Direction::Next
        } else {
            Direction::Previous
        })
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_press_is_a_scroll() {
        let mut swipe = TouchSwipe::new();
        let t0 = Instant::now();
        swipe.begin(500.0, t0);
        assert_eq!(swipe.finish(400.0, t0 + Duration::from_millis(600)), None);
    }

    #[test]
    fn test_quick_long_swipe_navigates() {
        let mut swipe = TouchSwipe::new();
        let t0 = Instant::now();
        swipe.begin(500.0, t0);
        assert_eq!(
            swipe.finish(440.0, t0 + Duration::from_millis(200)),
            Some(Direction::Next)
        );
    }

    #[test]
    fn test_short_travel_is_a_tap() {
        let mut swipe = TouchSwipe::new();
        let t0 = Instant::now();
        swipe.begin(500.0, t0);
        assert_eq!(swipe.finish(480.0, t0 + Duration::from_millis(200)), None);
    }

    #[test]
    fn test_downward_swipe_goes_back() {
        let mut swipe = TouchSwipe::new();
        let t0 = Instant::now();
        swipe.begin(300.0, t0);
        assert_eq!(
            swipe.finish(390.0, t0 + Duration::from_millis(150)),
            Some(Direction::Previous)
        );
    }

    #[test]
    fn test_end_without_start_is_noop() {
        let mut swipe = TouchSwipe::new();
        assert_eq!(swipe.finish(100.0, Instant::now()), None);
    }

    #[test]
    fn test_new_start_discards_old_gesture() {
        let mut swipe = TouchSwipe::new();
        let t0 = Instant::now();
        swipe.begin(500.0, t0);
        swipe.begin(200.0, t0 + Duration::from_millis(700));
        // resolved against the second start, well within time
        assert_eq!(
            swipe.finish(140.0, t0 + Duration::from_millis(800)),
            Some(Direction::Next)
        );
    }

    #[test]
    fn test_gesture_consumed_once() {
        let mut swipe = TouchSwipe::new();
        let t0 = Instant::now();
        swipe.begin(500.0, t0);
        let end = t0 + Duration::from_millis(100);
        assert!(swipe.finish(400.0, end).is_some());
        assert_eq!(swipe.finish(400.0, end), None);
    }

    #[test]
    fn test_cancel_drops_gesture() {
        let mut swipe = TouchSwipe::new();
        let t0 = Instant::now();
        swipe.begin(500.0, t0);
        swipe.cancel();
        assert_eq!(swipe.finish(400.0, t0 + Duration::from_millis(100)), None);
    }

    #[test]
    fn test_boundary_values_navigate() {
        let mut swipe = TouchSwipe::new();
        let t0 = Instant::now();
        swipe.begin(500.0, t0);
        assert_eq!(
            swipe.finish(460.0, t0 + MAX_DURATION),
            Some(Direction::Next)
        );
    }
}
