//! View bindings: the pieces of chrome that render the authoritative
//! index. Each binding stores its last rendered value; the shell
//! paints from here. Bindings are optional so a missing piece of
//! chrome degrades to a no-op without blocking the others.

use crate::deck::Deck;

/// Deep-link fragment, rewritten only when it actually changes.
#[derive(Debug, Default)]
pub struct FragmentView {
    value: String,
    changed: bool,
}

impl FragmentView {
    /// Current fragment including the leading `#`. Empty until the
    /// first sync.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// True when the last sync rewrote the fragment; reading clears
    /// the flag. The host mirrors fragment writes from here.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    fn update(&mut self, deck: &Deck, index: usize) {
        let next = deck.fragment_for(index);
        if next != self.value {
            self.value = next;
            self.changed = true;
        }
    }
}

/// Progress through the deck as a 0..=1 fraction. A single-slide deck
/// is always complete.
#[derive(Debug, Default)]
pub struct ProgressView {
    fraction: f32,
}

impl ProgressView {
    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    fn update(&mut self, deck: &Deck, index: usize) {
        self.fraction = if deck.len() <= 1 {
            1.0
        } else {
            index as f32 / (deck.len() - 1) as f32
        };
    }
}

/// One dot per slide with the active one highlighted.
#[derive(Debug, Default)]
pub struct DotsView {
    active: usize,
    count: usize,
}

impl DotsView {
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn count(&self) -> usize {
        self.count
    }

    fn update(&mut self, deck: &Deck, index: usize) {
        self.active = index;
        self.count = deck.len();
    }
}

/// Notes panel content. Refreshed when the panel opens and whenever
/// the index moves while it is open.
#[derive(Debug, Default)]
pub struct NotesView {
    heading: String,
    body: String,
}

impl NotesView {
    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    fn update(&mut self, deck: &Deck, index: usize) {
        self.heading = deck.notes_heading(index);
        self.body = deck.slides[index].notes_text().to_string();
    }
}

/// One overview card per slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumb {
    pub ordinal: String,
    pub title: String,
}

/// Overview grid content, rebuilt each time the panel opens.
#[derive(Debug, Default)]
pub struct OverviewView {
    thumbs: Vec<Thumb>,
}

impl OverviewView {
    pub fn thumbs(&self) -> &[Thumb] {
        &self.thumbs
    }

    fn rebuild(&mut self, deck: &Deck) {
        self.thumbs = deck
            .slides
            .iter()
            .enumerate()
            .map(|(i, slide)| Thumb {
                ordinal: format!("{:02}", i + 1),
                title: slide.display_title(i),
            })
            .collect();
    }
}

/// The full binding set, updated in a fixed order so the chrome never
/// shows a slide the URL does not.
#[derive(Debug, Default)]
pub struct Views {
    pub fragment: Option<FragmentView>,
    pub progress: Option<ProgressView>,
    pub dots: Option<DotsView>,
    pub notes: Option<NotesView>,
    pub overview: Option<OverviewView>,
}

impl Views {
    pub fn all() -> Self {
        Self {
            fragment: Some(FragmentView::default()),
            progress: Some(ProgressView::default()),
            dots: Some(DotsView::default()),
            notes: Some(NotesView::default()),
            overview: Some(OverviewView::default()),
        }
    }

    /// Apply the index in binding order: fragment, progress, dots,
    /// then notes only while that panel is open.
    pub fn sync(&mut self, deck: &Deck, index: usize, notes_open: bool) {
        if let Some(fragment) = &mut self.fragment {
            fragment.update(deck, index);
        }
        if let Some(progress) = &mut self.progress {
            progress.update(deck, index);
        }
        if let Some(dots) = &mut self.dots {
            dots.update(deck, index);
        }
        if notes_open {
            if let Some(notes) = &mut self.notes {
                notes.update(deck, index);
            }
        }
    }

    pub fn refresh_notes(&mut self, deck: &Deck, index: usize) {
        if let Some(notes) = &mut self.notes {
            notes.update(deck, index);
        }
    }

    pub fn rebuild_overview(&mut self, deck: &Deck) {
        if let Some(overview) = &mut self.overview {
            overview.rebuild(deck);
        }
    }
}
