/// The two overlay panels. Independent booleans: both may be open at
/// the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Notes,
    Overview,
}

/// Outcome of an Escape press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeOutcome {
    ClosedOverview,
    ClosedNotes,
    /// Neither panel was open; the host keeps the press.
    Ignored,
}

#[derive(Debug, Default)]
pub struct Panels {
    notes_open: bool,
    overview_open: bool,
}

impl Panels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes_open(&self) -> bool {
        self.notes_open
    }

    pub fn overview_open(&self) -> bool {
        self.overview_open
    }

    /// Flip or force a panel. Returns true when this call moved the
    /// panel from closed to open, which is the caller's cue to refresh
    /// the panel's content.
    pub fn toggle(&mut self, panel: Panel, force: Option<bool>) -> bool {
        let flag = match panel {
            Panel::Notes => &mut self.notes_open,
            Panel::Overview => &mut self.overview_open,
        };
        let next = force.unwrap_or(!*flag);
        let opened = next && !*flag;
        *flag = next;
        opened
    }

    /// Escape closes the overview first, then notes, one per press.
    pub fn escape(&mut self) -> EscapeOutcome {
        if self.overview_open {
            self.overview_open = false;
            EscapeOutcome::ClosedOverview
        } else if self.notes_open {
            self.notes_open = false;
            EscapeOutcome::ClosedNotes
        } else {
            EscapeOutcome::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_precedence() {
        let mut panels = Panels::new();
        panels.toggle(Panel::Notes, Some(true));
        panels.toggle(Panel::Overview, Some(true));

        assert_eq!(panels.escape(), EscapeOutcome::ClosedOverview);
        assert!(panels.notes_open());
        assert!(!panels.overview_open());

        assert_eq!(panels.escape(), EscapeOutcome::ClosedNotes);
        assert!(!panels.notes_open());

        assert_eq!(panels.escape(), EscapeOutcome::Ignored);
    }

    #[test]
    fn test_toggle_flips() {
        let mut panels = Panels::new();
        assert!(panels.toggle(Panel::Notes, None));
        assert!(panels.notes_open());
        assert!(!panels.toggle(Panel::Notes, None));
        assert!(!panels.notes_open());
    }

    #[test]
    fn test_force_open_when_already_open_is_not_a_transition() {
        let mut panels = Panels::new();
        assert!(panels.toggle(Panel::Overview, Some(true)));
        assert!(!panels.toggle(Panel::Overview, Some(true)));
        assert!(panels.overview_open());
    }

    #[test]
    fn test_force_close_never_reports_open() {
        let mut panels = Panels::new();
        assert!(!panels.toggle(Panel::Notes, Some(false)));
        panels.toggle(Panel::Notes, Some(true));
        assert!(!panels.toggle(Panel::Notes, Some(false)));
        assert!(!panels.notes_open());
    }

    #[test]
    fn test_panels_are_independent() {
        let mut panels = Panels::new();
        panels.toggle(Panel::Notes, Some(true));
        panels.toggle(Panel::Overview, Some(true));
        assert!(panels.notes_open() && panels.overview_open());
    }
}
