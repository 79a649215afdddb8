mod panels;
mod startup;

use std::time::{Duration, Instant};

use crate::deck::{Deck, DeckMeta, SlideRecord};

use super::Navigator;

/// Build a deck of `n` slides with ids `s0..s{n-1}`.
fn deck(n: usize) -> Deck {
    let records = (0..n)
        .map(|i| SlideRecord {
            id: Some(format!("s{i}")),
            ..SlideRecord::default()
        })
        .collect();
    Deck::from_records(DeckMeta::default(), records).unwrap()
}

/// Navigator on a fresh `n`-slide deck, before startup.
fn nav(n: usize) -> Navigator {
    Navigator::new(deck(n))
}

/// Navigator after the startup jump, with the startup scroll command
/// already drained.
fn started(n: usize) -> Navigator {
    let mut nav = nav(n);
    nav.startup(None);
    nav.take_scroll_request();
    nav
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Synthetic event clock base; offsets are added per event.
fn t0() -> Instant {
    Instant::now()
}

/// Current fragment binding value.
fn fragment(nav: &Navigator) -> String {
    nav.views()
        .fragment
        .as_ref()
        .map(|f| f.value().to_string())
        .unwrap_or_default()
}
