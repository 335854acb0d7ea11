// Integration tests for editing sessions.
//
// These drive an `EditingSession` the way a writing panel would: the user
// types, selects, runs AI operations and dictates, then undoes and redoes.

use std::time::{Duration, Instant};

use scribe_pad_core::{
    AiOperation, BufferInput, CaptureMode, EditingSession, InsertOptions, SelectionRange,
    SessionOptions, TextInputHandle, VersionCarousel,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ── Typing and dictation ───────────────────────────────────────────────

#[test]
fn test_dictation_fragments_merge_without_duplicates() {
    let mut session = EditingSession::new("");
    session.insert_at_cursor("i went to the", false, false);
    session.insert_at_cursor("the store. then i", false, false);
    session.insert_at_cursor("I came home", false, false);
    assert_eq!(session.text(), "I went to the store. Then i came home");
}

#[test]
fn test_typing_then_operation_then_undo_chain() {
    let t0 = Instant::now();
    let mut session = EditingSession::new("");
    for (i, c) in "Notes".chars().enumerate() {
        session.type_text(&c.to_string(), t0 + ms(40 * i as u64));
    }
    assert!(session.poll(t0 + ms(1000)));

    session.apply_operation_result(AiOperation::Generate, "about rust", InsertOptions::default());
    assert_eq!(session.text(), "Notes about rust");

    session.undo().unwrap();
    assert_eq!(session.text(), "Notes");
    session.undo().unwrap();
    assert_eq!(session.text(), "");
    assert!(session.undo().is_none());

    session.redo().unwrap();
    session.redo().unwrap();
    assert_eq!(session.text(), "Notes about rust");
    assert!(!session.can_redo());
}

#[test]
fn test_rewrite_selection_replaces_words() {
    let mut session = EditingSession::new("The quick brown fox jumps.");
    session.input_mut().set_selection(SelectionRange::new(6, 13));
    let captured = session.capture_selection(CaptureMode::Plain, Instant::now());
    assert_eq!(captured, SelectionRange::new(4, 15));

    let opts = InsertOptions {
        select_after_insert: true,
        replace_selection: true,
    };
    let outcome = session.apply_operation_result(AiOperation::Rewrite, "slow grey", opts);
    assert_eq!(session.text(), "The slow grey fox jumps.");
    assert_eq!(outcome.selection, SelectionRange::new(4, 13));

    session.undo().unwrap();
    assert_eq!(session.text(), "The quick brown fox jumps.");
}

#[test]
fn test_history_limit_from_options() {
    let mut options = SessionOptions::default();
    options.history.limit = 3;
    let mut session = EditingSession::with_input(BufferInput::new(""), options);
    for word in ["one", "two", "three", "four", "five"] {
        session.insert_at_cursor(word, false, false);
    }
    let mut undos = 0;
    while session.undo().is_some() {
        undos += 1;
    }
    assert_eq!(undos, 2);
    assert_eq!(session.text(), "One two three");
}

#[test]
fn test_input_edits_are_snapshotted_on_change() {
    let t0 = Instant::now();
    let mut session = EditingSession::new("abc");
    session.input_mut().set_text("abcd");
    session.on_input_changed(t0);
    assert!(!session.poll(t0 + ms(100)));
    assert!(session.poll(t0 + ms(300)));
    session.undo().unwrap();
    assert_eq!(session.text(), "abc");
}

// ── Carousel hand-off ──────────────────────────────────────────────────

#[test]
fn test_operation_results_feed_the_carousel() {
    let mut session = EditingSession::new("Hello world");
    let mut carousel = VersionCarousel::new(session.text());

    session.update_captured_selection(0, 11);
    let opts = InsertOptions {
        select_after_insert: false,
        replace_selection: true,
    };
    session.apply_operation_result(AiOperation::Rewrite, "Hello there, world!", opts);
    carousel.append_result(AiOperation::Rewrite, session.text());

    assert_eq!(carousel.len(), 2);
    assert_eq!(carousel.current().text, "Hello there, world!");
    assert_eq!(carousel.current().label, "Rewrite 2");
    assert_eq!(carousel.original().text, "Hello world");

    carousel.previous();
    session.push_to_history(&carousel.current().text, 0, 0);
    session.input_mut().set_text(&carousel.current().text);
    assert_eq!(session.end(), "Hello world");
}
