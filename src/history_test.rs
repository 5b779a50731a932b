use super::*;
use crate::doc::{Player, Team};

fn doc_with_players(n: usize) -> Document {
    let mut doc = Document::new();
    for i in 0..n {
        doc.players.push(Player::new(0.0, 0.0, (i + 1).to_string(), "#fff", Some(Team::Home)));
    }
    doc
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_history_has_single_entry() {
    let h = History::new(&Document::new(), 10);
    assert_eq!(h.len(), 1);
    assert_eq!(h.index(), 0);
    assert!(!h.can_undo());
    assert!(!h.can_redo());
    assert!(!h.is_empty());
}

#[test]
fn zero_max_len_is_raised_to_one() {
    let mut h = History::new(&Document::new(), 0);
    h.snapshot(&doc_with_players(1));
    assert_eq!(h.max_len(), 1);
    assert_eq!(h.len(), 1);
    assert_eq!(h.current().map(|d| d.players.len()), Some(1));
    assert!(!h.can_undo());
}

#[test]
fn default_uses_max_history_length() {
    assert_eq!(History::default().max_len(), MAX_HISTORY_LENGTH);
}

// =============================================================
// Snapshot
// =============================================================

#[test]
fn snapshot_advances_index_by_one() {
    let mut h = History::new(&Document::new(), 50);
    for i in 1..=5 {
        h.snapshot(&doc_with_players(i));
        assert_eq!(h.index(), i);
        assert!(h.can_undo());
        assert!(!h.can_redo());
    }
}

#[test]
fn snapshot_is_a_deep_copy() {
    let mut h = History::new(&Document::new(), 50);
    let mut doc = doc_with_players(1);
    h.snapshot(&doc);
    doc.players[0].x = 999.0;
    assert_ne!(h.current(), Some(&doc));
}

#[test]
fn snapshot_after_undo_discards_redo_branch() {
    let mut h = History::new(&Document::new(), 50);
    h.snapshot(&doc_with_players(1));
    h.snapshot(&doc_with_players(2));
    assert!(h.undo().is_some());
    assert!(h.can_redo());

    h.snapshot(&doc_with_players(3));
    assert!(!h.can_redo());
    assert!(h.redo().is_none());
    assert_eq!(h.len(), 3);
    assert_eq!(h.current().map(|d| d.players.len()), Some(3));
}

// =============================================================
// Undo / redo
// =============================================================

#[test]
fn undo_at_oldest_is_noop() {
    let mut h = History::new(&Document::new(), 50);
    assert!(h.undo().is_none());
    assert_eq!(h.index(), 0);
}

#[test]
fn redo_at_newest_is_noop() {
    let mut h = History::new(&Document::new(), 50);
    h.snapshot(&doc_with_players(1));
    assert!(h.redo().is_none());
    assert_eq!(h.index(), 1);
}

#[test]
fn undo_then_redo_returns_same_snapshot() {
    let mut h = History::new(&Document::new(), 50);
    let one = doc_with_players(1);
    let two = doc_with_players(2);
    h.snapshot(&one);
    h.snapshot(&two);

    assert_eq!(h.undo().map(|d| d.players.len()), Some(1));
    let redone = h.redo().cloned();
    assert_eq!(redone, Some(two));
}

#[test]
fn undo_walks_back_to_initial() {
    let mut h = History::new(&Document::new(), 50);
    h.snapshot(&doc_with_players(1));
    h.snapshot(&doc_with_players(2));
    assert!(h.undo().is_some());
    assert_eq!(h.undo().map(Document::is_empty), Some(true));
    assert!(h.undo().is_none());
}

// =============================================================
// Retention cap
// =============================================================

#[test]
fn overflow_evicts_oldest_first() {
    let max = 5;
    let mut h = History::new(&Document::new(), max);
    for i in 1..=max + 10 {
        h.snapshot(&doc_with_players(i));
    }
    assert_eq!(h.len(), max);
    assert_eq!(h.index(), max - 1);

    let mut oldest = None;
    while let Some(doc) = h.undo() {
        oldest = Some(doc.players.len());
    }
    assert_eq!(oldest, Some(11));
}

#[test]
fn default_cap_holds_exactly_max_history_length() {
    let mut h = History::default();
    for i in 0..MAX_HISTORY_LENGTH + 10 {
        h.snapshot(&doc_with_players(i % 3));
    }
    assert_eq!(h.len(), MAX_HISTORY_LENGTH);
    assert!(h.can_undo());
}

// =============================================================
// Reset
// =============================================================

#[test]
fn reset_leaves_single_entry() {
    let mut h = History::new(&Document::new(), 50);
    h.snapshot(&doc_with_players(1));
    h.snapshot(&doc_with_players(2));
    let loaded = doc_with_players(4);
    h.reset(&loaded);
    assert_eq!(h.len(), 1);
    assert_eq!(h.index(), 0);
    assert!(!h.can_undo());
    assert_eq!(h.current(), Some(&loaded));
}
