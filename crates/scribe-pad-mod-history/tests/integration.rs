// Integration tests for the history stack.
//
// These exercise full editing workflows: debounced typing, discrete
// pushes, and undo/redo with explicit restore modes.

use std::time::{Duration, Instant};

use scribe_pad_mod_history::{HistoryConfig, HistoryEntry, HistoryMode, HistoryStack};

fn entry(text: &str) -> HistoryEntry {
    HistoryEntry::with_caret(text, text.encode_utf16().count())
}

fn stack(limit: usize) -> HistoryStack {
    let config = HistoryConfig {
        limit,
        debounce_ms: 300,
    };
    HistoryStack::seeded(config, entry(""))
}

/// Applies an undo/redo result the way a session would.
fn restore(stack: &mut HistoryStack, restored: Option<HistoryEntry>) -> Option<String> {
    let entry = restored?;
    assert_ne!(stack.mode(), HistoryMode::Idle);
    stack.finish_restore();
    Some(entry.content)
}

// ── Typing Workflow ────────────────────────────────────────────────────

#[test]
fn test_typing_bursts_become_single_restore_points() {
    let t0 = Instant::now();
    let mut s = stack(10);

    for (i, text) in ["H", "He", "Hel", "Hell", "Hello"].iter().enumerate() {
        s.debounced_push(entry(text), t0 + Duration::from_millis(50 * i as u64));
    }
    assert!(s.poll(t0 + Duration::from_millis(600)));

    for (i, text) in ["Hello ", "Hello w", "Hello world"].iter().enumerate() {
        s.debounced_push(entry(text), t0 + Duration::from_millis(2000 + 50 * i as u64));
    }
    assert!(s.poll(t0 + Duration::from_millis(3000)));

    assert_eq!(s.past_len(), 3);
    let undone = s.undo();
    assert_eq!(restore(&mut s, undone).as_deref(), Some("Hello"));
    let undone = s.undo();
    assert_eq!(restore(&mut s, undone).as_deref(), Some(""));
    assert!(!s.can_undo());
}

#[test]
fn test_discrete_push_after_undo_discards_redo() {
    let mut s = stack(10);
    s.push_state(entry("a"));
    s.push_state(entry("ab"));
    let undone = s.undo();
    restore(&mut s, undone);
    assert!(s.can_redo());

    s.push_state(entry("ac"));
    assert!(!s.can_redo());
    assert_eq!(s.current().map(|e| e.content.as_str()), Some("ac"));
}

#[test]
fn test_limit_holds_across_long_session() {
    let mut s = stack(5);
    for i in 0..50 {
        s.push_state(entry(&i.to_string()));
    }
    assert_eq!(s.past_len(), 5);

    let mut seen = Vec::new();
    loop {
        let undone = s.undo();
        match restore(&mut s, undone) {
            Some(content) => seen.push(content),
            None => break,
        }
    }
    assert_eq!(seen, vec!["48", "47", "46", "45"]);
}

#[test]
fn test_full_undo_then_full_redo() {
    let mut s = stack(10);
    for text in ["one", "two", "three"] {
        s.push_state(entry(text));
    }
    while s.can_undo() {
        let undone = s.undo();
        restore(&mut s, undone);
    }
    let mut redone = Vec::new();
    while s.can_redo() {
        let entry = s.redo();
        redone.extend(restore(&mut s, entry));
    }
    assert_eq!(redone, vec!["one", "two", "three"]);
}

#[test]
fn test_pushes_during_restore_are_ignored() {
    let mut s = stack(10);
    s.push_state(entry("a"));
    s.push_state(entry("b"));

    let undone = s.undo();
    assert!(undone.is_some());
    // The restore itself triggers a change notification.
    assert!(!s.push_state(entry("a")));
    s.debounced_push(entry("a"), Instant::now());
    assert!(!s.has_pending());
    s.finish_restore();

    assert_eq!(s.past_len(), 2);
    assert!(s.can_redo());
}
