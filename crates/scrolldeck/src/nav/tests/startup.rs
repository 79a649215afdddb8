use super::*;
use crate::nav::{Navigator, ScrollRequest, ScrollStyle};

#[test]
fn startup_without_fragment_lands_on_first_slide() {
    let mut nav = nav(6);
    nav.startup(None);
    assert_eq!(nav.current(), 0);
    assert_eq!(
        nav.take_scroll_request(),
        Some(ScrollRequest {
            index: 0,
            style: ScrollStyle::Instant
        })
    );
    assert_eq!(fragment(&nav), "#s0");
}

#[test]
fn startup_resolves_fragment() {
    let mut nav = nav(6);
    nav.startup(Some("#s3"));
    assert_eq!(nav.current(), 3);
    assert_eq!(
        nav.take_scroll_request(),
        Some(ScrollRequest {
            index: 3,
            style: ScrollStyle::Instant
        })
    );
}

#[test]
fn startup_accepts_fragment_without_hash() {
    let mut nav = nav(6);
    nav.startup(Some("s2"));
    assert_eq!(nav.current(), 2);
}

#[test]
fn startup_falls_back_on_unknown_fragment() {
    // Only the startup read degrades to the first slide.
    let mut nav = nav(6);
    nav.startup(Some("#no-such-slide"));
    assert_eq!(nav.current(), 0);
    assert_eq!(
        nav.take_scroll_request().map(|r| r.index),
        Some(0)
    );
}

#[test]
fn startup_fragment_write_happens_once() {
    let mut nav = nav(6);
    nav.startup(None);
    assert!(nav.views_mut().fragment.as_mut().unwrap().take_changed());
    assert!(!nav.views_mut().fragment.as_mut().unwrap().take_changed());
}

#[test]
fn rebuild_restores_position_through_fragment() {
    // Deck reloads keep no state; the fragment is the only carrier.
    let mut first = started(6);
    first.go_to(4, ScrollStyle::Smooth);
    let carried = fragment(&first);

    let mut second = Navigator::new(deck(6));
    second.startup(Some(&carried));
    assert_eq!(second.current(), 4);
}

#[test]
fn startup_views_are_in_sync() {
    let mut nav = nav(5);
    nav.startup(Some("#s4"));
    let views = nav.views();
    assert_eq!(views.dots.as_ref().unwrap().active(), 4);
    assert_eq!(views.progress.as_ref().unwrap().fraction(), 1.0);
}
