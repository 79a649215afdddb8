use std::time::{Duration, Instant};

use super::Direction;

/// Deltas under this magnitude, in pixels, are trackpad noise and stay
/// with default scrolling.
pub const NOISE_FLOOR: f32 = 18.0;

/// Lock window after a wheel-driven transition, tuned to the scroll
/// animation so a burst of deltas maps to exactly one page.
pub const COOLDOWN: Duration = Duration::from_millis(680);

/// Verdict on a single wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelVerdict {
    /// Below the noise floor; not ours.
    Noise,
    /// Gate locked; swallow the event without navigating.
    Gated,
    /// Navigate one slide and swallow the event.
    Advance(Direction),
}

/// Converts the noisy wheel delta stream into at most one transition
/// per cool-down window. A wheel "click" fires a burst of deltas; the
/// lock turns the burst into a single page turn.
#[derive(Debug, Default)]
pub struct WheelThrottle {
    locked_until: Option<Instant>,
}

impl WheelThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Judge one wheel event. `delta_y` is in pixels with the page
    /// convention: positive scrolls toward the next slide. The lock
    /// releases at its deadline, so an event arriving exactly on it
    /// navigates.
    pub fn judge(&mut self, delta_y: f32, now: Instant) -> WheelVerdict {
        if delta_y.abs() < NOISE_FLOOR {
            return WheelVerdict::Noise;
        }
        if let Some(deadline) = self.locked_until {
            if now < deadline {
                return WheelVerdict::Gated;
            }
        }
        self.locked_until = Some(now + COOLDOWN);
        if delta_y > 0.0 {
            WheelVerdict::Advance(Direction::Next)
        } else {
            WheelVerdict::Advance(Direction::Previous)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_navigates_once() {
        let mut throttle = WheelThrottle::new();
        let t0 = Instant::now();
        assert_eq!(
            throttle.judge(120.0, t0),
            WheelVerdict::Advance(Direction::Next)
        );
        for ms in [5, 40, 200, 679] {
            assert_eq!(
                throttle.judge(120.0, t0 + Duration::from_millis(ms)),
                WheelVerdict::Gated
            );
        }
    }

    #[test]
    fn test_noise_floor() {
        let mut throttle = WheelThrottle::new();
        let t0 = Instant::now();
        for i in 0..50 {
            let verdict = throttle.judge(17.9, t0 + Duration::from_millis(i));
            assert_eq!(verdict, WheelVerdict::Noise);
        }
        // noise never arms the gate
        assert_eq!(
            throttle.judge(-30.0, t0 + Duration::from_millis(51)),
            WheelVerdict::Advance(Direction::Previous)
        );
    }

    #[test]
    fn test_release_at_deadline() {
        let mut throttle = WheelThrottle::new();
        let t0 = Instant::now();
        throttle.judge(50.0, t0);
        assert_eq!(
            throttle.judge(50.0, t0 + COOLDOWN),
            WheelVerdict::Advance(Direction::Next)
        );
    }

    #[test]
    fn test_advance_rearms_lock() {
        let mut throttle = WheelThrottle::new();
        let t0 = Instant::now();
        throttle.judge(50.0, t0);
        let t1 = t0 + COOLDOWN;
        throttle.judge(50.0, t1);
        assert_eq!(
            throttle.judge(50.0, t1 + Duration::from_millis(100)),
            WheelVerdict::Gated
        );
    }

    #[test]
    fn test_direction_follows_sign() {
        let mut throttle = WheelThrottle::new();
        let t0 = Instant::now();
        assert_eq!(
            throttle.judge(-60.0, t0),
            WheelVerdict::Advance(Direction::Previous)
        );
    }

    #[test]
    fn test_noise_during_lock_stays_noise() {
        let mut throttle = WheelThrottle::new();
        let t0 = Instant::now();
        throttle.judge(60.0, t0);
        assert_eq!(
            throttle.judge(5.0, t0 + Duration::from_millis(10)),
            WheelVerdict::Noise
        );
    }
}
