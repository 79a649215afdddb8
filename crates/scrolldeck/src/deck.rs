use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Shown in the notes panel when a slide carries no notes text.
pub const NOTES_PLACEHOLDER: &str = "No presenter notes for this slide.";

#[derive(Debug, Clone)]
pub struct Deck {
    pub meta: DeckMeta,
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Default)]
pub struct DeckMeta {
    pub title: Option<String>,
    pub author: Option<String>,
    pub footer: Option<String>,
    pub theme: Option<String>,
}

/// One slide as supplied by the deck file. Immutable after the deck
/// is built; navigation refers to slides by index only.
#[derive(Debug, Clone)]
pub struct Slide {
    /// Stable identifier used for deep links. Restricted to letters,
    /// digits, `-` and `_` so a fragment round-trips verbatim.
    pub id: String,
    pub title: Option<String>,
    pub notes: Option<String>,
    /// Display text for the slide page. Opaque to navigation.
    pub body: Option<String>,
}

impl Slide {
    /// Title for chrome (dots, overview, notes heading), falling back
    /// to the slide's 1-based position.
    pub fn display_title(&self, index: usize) -> String {
        match &self.title {
            Some(t) if !t.trim().is_empty() => t.clone(),
            _ => format!("Slide {}", index + 1),
        }
    }

    pub fn notes_text(&self) -> &str {
        match &self.notes {
            Some(n) if !n.trim().is_empty() => n,
            _ => NOTES_PLACEHOLDER,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    footer: Option<String>,
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    slides: Vec<SlideRecord>,
}

/// Raw slide entry from the manifest, before ids are defaulted and
/// validated. Also the entry point for decks built in code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlideRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Deck {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
        Self::from_yaml(&content)
            .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let manifest: Manifest = serde_yaml::from_str(content)?;
        let meta = DeckMeta {
            title: manifest.title,
            author: manifest.author,
            footer: manifest.footer,
            theme: manifest.theme,
        };
        Self::from_records(meta, manifest.slides)
    }

    /// Build a validated deck from externally supplied slide records.
    /// Missing ids default to `slide-N` (1-based position).
    pub fn from_records(meta: DeckMeta, records: Vec<SlideRecord>) -> Result<Self> {
        if records.is_empty() {
            anyhow::bail!("No slides found");
        }

        let mut slides = Vec::with_capacity(records.len());
        for (i, record) in records.into_iter().enumerate() {
            let id = match record.id {
                Some(id) if !id.is_empty() => id,
                _ => format!("slide-{}", i + 1),
            };
            if !is_valid_id(&id) {
                anyhow::bail!(
                    "Invalid slide id '{id}' (slide {}): use letters, digits, '-' and '_'",
                    i + 1
                );
            }
            slides.push(Slide {
                id,
                title: record.title,
                notes: record.notes,
                body: record.body,
            });
        }

        for (i, slide) in slides.iter().enumerate() {
            if let Some(j) = slides[..i].iter().position(|s| s.id == slide.id) {
                anyhow::bail!(
                    "Duplicate slide id '{}' (slides {} and {})",
                    slide.id,
                    j + 1,
                    i + 1
                );
            }
        }

        Ok(Self { meta, slides })
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Map a URL fragment (with or without the leading `#`) back to a
    /// slide index. Empty or unknown fragments resolve to `None`.
    pub fn resolve_fragment(&self, fragment: &str) -> Option<usize> {
        let id = fragment.strip_prefix('#').unwrap_or(fragment);
        if id.is_empty() {
            return None;
        }
        self.slides.iter().position(|s| s.id == id)
    }

    /// Deep-link fragment for a slide, including the leading `#`.
    pub fn fragment_for(&self, index: usize) -> String {
        format!("#{}", self.slides[index].id)
    }

    /// Notes panel heading: zero-padded ordinal plus title.
    pub fn notes_heading(&self, index: usize) -> String {
        format!("{:02} · {}", index + 1, self.slides[index].display_title(index))
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck_from(yaml: &str) -> Deck {
        Deck::from_yaml(yaml).unwrap()
    }

    #[test]
    fn test_minimal_manifest() {
        let deck = deck_from(
            "title: Demo\nslides:\n  - id: intro\n    title: Welcome\n  - id: close\n",
        );
        assert_eq!(deck.meta.title.as_deref(), Some("Demo"));
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.slides[0].id, "intro");
    }

    #[test]
    fn test_missing_ids_defaulted_by_position() {
        let deck = deck_from("slides:\n  - title: One\n  - title: Two\n  - id: named\n");
        assert_eq!(deck.slides[0].id, "slide-1");
        assert_eq!(deck.slides[1].id, "slide-2");
        assert_eq!(deck.slides[2].id, "named");
    }

    #[test]
    fn test_empty_deck_rejected() {
        let err = Deck::from_yaml("title: Empty\nslides: []\n").unwrap_err();
        assert!(err.to_string().contains("No slides found"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = Deck::from_yaml("slides:\n  - id: a\n  - id: b\n  - id: a\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Duplicate slide id 'a'"), "{msg}");
        assert!(msg.contains("slides 1 and 3"), "{msg}");
    }

    #[test]
    fn test_invalid_id_rejected() {
        let err = Deck::from_yaml("slides:\n  - id: 'has space'\n").unwrap_err();
        assert!(err.to_string().contains("Invalid slide id"));
    }

    #[test]
    fn test_resolve_fragment_with_and_without_hash() {
        let deck = deck_from("slides:\n  - id: intro\n  - id: agenda\n");
        assert_eq!(deck.resolve_fragment("#agenda"), Some(1));
        assert_eq!(deck.resolve_fragment("agenda"), Some(1));
        assert_eq!(deck.resolve_fragment("#missing"), None);
        assert_eq!(deck.resolve_fragment(""), None);
        assert_eq!(deck.resolve_fragment("#"), None);
    }

    #[test]
    fn test_fragment_round_trip() {
        let deck = deck_from("slides:\n  - id: a\n  - id: b\n  - id: c\n");
        for i in 0..deck.len() {
            assert_eq!(deck.resolve_fragment(&deck.fragment_for(i)), Some(i));
        }
    }

    #[test]
    fn test_notes_placeholder() {
        let deck = deck_from("slides:\n  - id: a\n    notes: Remember the demo.\n  - id: b\n");
        assert_eq!(deck.slides[0].notes_text(), "Remember the demo.");
        assert_eq!(deck.slides[1].notes_text(), NOTES_PLACEHOLDER);
    }

    #[test]
    fn test_notes_heading_zero_padded() {
        let deck = deck_from("slides:\n  - id: a\n  - id: b\n  - id: c\n    title: Closing\n");
        assert_eq!(deck.notes_heading(2), "03 · Closing");
        assert_eq!(deck.notes_heading(0), "01 · Slide 1");
    }

    #[test]
    fn test_display_title_fallback() {
        let deck = deck_from("slides:\n  - id: a\n    title: Real Title\n  - id: b\n");
        assert_eq!(deck.slides[0].display_title(0), "Real Title");
        assert_eq!(deck.slides[1].display_title(1), "Slide 2");
    }
}
