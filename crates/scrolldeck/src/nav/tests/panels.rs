use super::*;
use crate::nav::keymap::Key;
use crate::nav::{KeyDisposition, ScrollStyle};

#[test]
fn escape_closes_overview_before_notes() {
    // Both panels open: Escape peels the overview first, then notes,
    // then falls through to the host.
    let mut nav = started(6);
    assert_eq!(nav.on_key(Key::Char('n')), KeyDisposition::Consumed);
    assert_eq!(nav.on_key(Key::Char('o')), KeyDisposition::Consumed);
    assert!(nav.panels().notes_open() && nav.panels().overview_open());

    assert_eq!(nav.on_key(Key::Escape), KeyDisposition::Consumed);
    assert!(nav.panels().notes_open());
    assert!(!nav.panels().overview_open());

    assert_eq!(nav.on_key(Key::Escape), KeyDisposition::Consumed);
    assert!(!nav.panels().notes_open());

    assert_eq!(nav.on_key(Key::Escape), KeyDisposition::Pass);
}

#[test]
fn notes_refresh_on_open() {
    // Open at slide 1, close, navigate, reopen: the panel must show
    // the slide that is current at the moment of opening.
    let mut nav = started(6);
    nav.go_to(1, ScrollStyle::Smooth);
    nav.toggle_notes(Some(true));
    assert_eq!(nav.views().notes.as_ref().unwrap().heading(), "02 · Slide 2");

    nav.toggle_notes(Some(false));
    nav.go_to(3, ScrollStyle::Smooth);
    // closed panel holds stale content until reopened
    assert_eq!(nav.views().notes.as_ref().unwrap().heading(), "02 · Slide 2");

    nav.toggle_notes(Some(true));
    assert_eq!(nav.views().notes.as_ref().unwrap().heading(), "04 · Slide 4");
}

#[test]
fn notes_follow_index_while_open() {
    let mut nav = started(6);
    nav.toggle_notes(Some(true));
    assert_eq!(nav.views().notes.as_ref().unwrap().heading(), "01 · Slide 1");

    nav.go_to(2, ScrollStyle::Smooth);
    assert_eq!(nav.views().notes.as_ref().unwrap().heading(), "03 · Slide 3");
}

#[test]
fn notes_show_placeholder_when_slide_has_none() {
    use crate::deck::NOTES_PLACEHOLDER;

    let mut nav = started(3);
    nav.toggle_notes(Some(true));
    assert_eq!(nav.views().notes.as_ref().unwrap().body(), NOTES_PLACEHOLDER);
}

#[test]
fn overview_rebuilt_each_open() {
    let mut nav = started(3);
    nav.toggle_overview(Some(true));
    let thumbs = nav.views().overview.as_ref().unwrap().thumbs();
    assert_eq!(thumbs.len(), 3);
    assert_eq!(thumbs[0].ordinal, "01");
    assert_eq!(thumbs[2].title, "Slide 3");
}

#[test]
fn choose_from_overview_closes_and_navigates() {
    let mut nav = started(6);
    nav.toggle_overview(Some(true));
    nav.take_scroll_request();

    nav.choose_from_overview(4);
    assert!(!nav.panels().overview_open());
    assert_eq!(nav.current(), 4);
    assert_eq!(
        nav.take_scroll_request().map(|r| r.style),
        Some(ScrollStyle::Smooth)
    );
}

#[test]
fn present_mode_toggles_on_p() {
    let mut nav = started(3);
    assert!(!nav.presenting());
    nav.on_key(Key::Char('p'));
    assert!(nav.presenting());
    nav.on_key(Key::Char('P'));
    assert!(!nav.presenting());
}

#[test]
fn unbound_keys_pass_through() {
    let mut nav = started(3);
    assert_eq!(nav.on_key(Key::Char('x')), KeyDisposition::Pass);
    assert_eq!(nav.on_key(Key::ArrowDown), KeyDisposition::Consumed);
    assert_eq!(nav.current(), 1);
}

#[test]
fn navigation_keys_work_with_notes_open() {
    // Notes interception is limited to Escape; arrows still navigate.
    let mut nav = started(6);
    nav.on_key(Key::Char('n'));
    nav.on_key(Key::ArrowDown);
    assert_eq!(nav.current(), 1);
    assert!(nav.panels().notes_open());
}
