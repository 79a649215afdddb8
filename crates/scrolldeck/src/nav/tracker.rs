/// Fraction of a slide's area that must be visible before it counts
/// as engaged.
pub const ENGAGE_THRESHOLD: f32 = 0.35;

/// One slide's visible fraction for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityReport {
    pub index: usize,
    pub fraction: f32,
}

impl VisibilityReport {
    pub fn new(index: usize, fraction: f32) -> Self {
        Self { index, fraction }
    }
}

/// Follows the user's own scrolling by watching slide visibility.
/// Emits only when a slide crosses the engagement threshold while
/// growing, so a slide parked on screen does not re-emit every frame.
#[derive(Debug)]
pub struct VisibilityTracker {
    previous: Vec<f32>,
}

impl VisibilityTracker {
    pub fn new(slide_count: usize) -> Self {
        Self {
            previous: vec![0.0; slide_count],
        }
    }

    /// Feed one batch of reports. Returns the slide that should become
    /// current, if any crossed the threshold upward. When several
    /// cross in the same batch, the last one wins. Reports for unknown
    /// indices are dropped; fractions are clamped to 0..=1.
    pub fn observe(&mut self, reports: &[VisibilityReport]) -> Option<usize> {
        let mut engaged = None;
        for report in reports {
            let Some(prev) = self.previous.get_mut(report.index) else {
                continue;
            };
            let fraction = report.fraction.clamp(0.0, 1.0);
            if *prev < ENGAGE_THRESHOLD && fraction >= ENGAGE_THRESHOLD {
                engaged = Some(report.index);
            }
            *prev = fraction;
        }
        engaged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(index: usize, fraction: f32) -> VisibilityReport {
        VisibilityReport::new(index, fraction)
    }

    #[test]
    fn test_upward_crossing_emits() {
        let mut tracker = VisibilityTracker::new(3);
        assert_eq!(tracker.observe(&[report(1, 0.2)]), None);
        assert_eq!(tracker.observe(&[report(1, 0.5)]), Some(1));
    }

    #[test]
    fn test_parked_slide_does_not_re_emit() {
        let mut tracker = VisibilityTracker::new(3);
        tracker.observe(&[report(1, 0.8)]);
        for _ in 0..20 {
            assert_eq!(tracker.observe(&[report(1, 0.8)]), None);
        }
    }

    #[test]
    fn test_falling_below_does_not_emit() {
        let mut tracker = VisibilityTracker::new(3);
        tracker.observe(&[report(1, 0.9)]);
        assert_eq!(tracker.observe(&[report(1, 0.1)]), None);
    }

    #[test]
    fn test_re_engagement_after_leaving() {
        let mut tracker = VisibilityTracker::new(3);
        tracker.observe(&[report(1, 0.9)]);
        tracker.observe(&[report(1, 0.1)]);
        assert_eq!(tracker.observe(&[report(1, 0.6)]), Some(1));
    }

    #[test]
    fn test_last_crossing_in_batch_wins() {
        let mut tracker = VisibilityTracker::new(4);
        let batch = [report(1, 0.4), report(2, 0.5)];
        assert_eq!(tracker.observe(&batch), Some(2));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut tracker = VisibilityTracker::new(2);
        assert_eq!(tracker.observe(&[report(0, 0.35)]), Some(0));
    }

    #[test]
    fn test_out_of_range_reports_dropped() {
        let mut tracker = VisibilityTracker::new(2);
        assert_eq!(tracker.observe(&[report(9, 1.0)]), None);
    }

    #[test]
    fn test_fractions_clamped() {
        let mut tracker = VisibilityTracker::new(2);
        assert_eq!(tracker.observe(&[report(0, 3.0)]), Some(0));
        tracker.observe(&[report(0, -1.0)]);
        assert_eq!(tracker.observe(&[report(0, 0.5)]), Some(0));
    }
}
