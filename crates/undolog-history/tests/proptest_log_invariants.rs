//! Property-based invariant tests for undo log recording and truncation.
//!
//! 1. Adjacent insertions within a unit collapse into one entry.
//! 2. A log never holds two boundaries in a row.
//! 3. Truncation always keeps the newest unit intact at the head.
//! 4. A truncated log stays under the strong limit (or its newest unit).
//! 5. Unit-limited sizes grow with the limit and never pass the full size.

mod common;

use proptest::prelude::*;
use undolog_history::{HistoryConfig, LogEntry, TruncateOutcome, UndoManager};

use common::Doc;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Type(usize),
    Backspace,
    Boundary,
    Move(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (1usize..6).prop_map(Op::Type),
        2 => Just(Op::Backspace),
        3 => Just(Op::Boundary),
        1 => (0usize..64).prop_map(Op::Move),
    ]
}

fn session(ops: &[Op]) -> (UndoManager, Doc) {
    let mut mgr = UndoManager::default();
    let mut doc = Doc::new("");
    for op in ops {
        match *op {
            Op::Type(n) => doc.type_str(&mut mgr, &"x".repeat(n)),
            Op::Backspace if doc.point > 0 => doc.backspace(&mut mgr),
            Op::Backspace => {}
            Op::Boundary => mgr.insert_boundary(&mut doc).unwrap(),
            Op::Move(pos) => doc.point = pos.min(doc.text.len()),
        }
    }
    (mgr, doc)
}

/// Entries of the newest unit, past a leading boundary.
fn newest_unit(entries: &[LogEntry]) -> Vec<LogEntry> {
    let skip = usize::from(entries.first().is_some_and(LogEntry::is_boundary));
    entries[skip..]
        .iter()
        .take_while(|e| !e.is_boundary())
        .cloned()
        .collect()
}

fn newest_unit_size(entries: &[LogEntry]) -> usize {
    let leading = entries
        .first()
        .filter(|e| e.is_boundary())
        .map_or(0, LogEntry::byte_cost);
    leading + newest_unit(entries).iter().map(LogEntry::byte_cost).sum::<usize>()
}

fn limits(soft: usize, strong: usize) -> HistoryConfig {
    HistoryConfig {
        undo_limit: soft,
        undo_strong_limit: strong,
        undo_outer_limit: None,
        inhibit_record_point: false,
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Adjacent insertions merge
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn adjacent_inserts_merge(
        start in 0usize..100,
        lengths in proptest::collection::vec(1usize..10, 1..20),
    ) {
        let mut mgr = UndoManager::default();
        let mut doc = Doc::new("");
        doc.ticks.modified = 1;

        let mut end = start;
        for len in &lengths {
            mgr.record_insert(&mut doc, end, *len).unwrap();
            end += len;
        }
        prop_assert_eq!(doc.entries(), vec![LogEntry::Insert { start, end }]);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. No adjacent boundaries
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn boundaries_never_adjacent(ops in proptest::collection::vec(op(), 0..80)) {
        let (_, doc) = session(&ops);
        let entries = doc.entries();
        for pair in entries.windows(2) {
            prop_assert!(
                !(pair[0].is_boundary() && pair[1].is_boundary()),
                "adjacent boundaries in {:?}", entries
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Newest unit survives truncation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn newest_unit_survives_truncation(
        ops in proptest::collection::vec(op(), 1..80),
        soft in 0usize..400,
        extra in 0usize..400,
    ) {
        let (mut mgr, mut doc) = session(&ops);
        let before = doc.entries();
        let leading = usize::from(before.first().is_some_and(LogEntry::is_boundary));
        let newest = newest_unit(&before);

        *mgr.config_mut() = limits(soft, soft + extra);
        mgr.truncate(&mut doc).unwrap();

        let after = doc.entries();
        prop_assert!(after.len() >= leading + newest.len());
        prop_assert_eq!(&after[leading..leading + newest.len()], newest.as_slice());
        // What remains is always a prefix of what was there.
        prop_assert_eq!(after.as_slice(), &before[..after.len()]);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Truncated size is bounded
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn truncated_log_respects_strong_limit(
        ops in proptest::collection::vec(op(), 1..120),
        soft in 0usize..400,
        extra in 0usize..400,
    ) {
        let (mut mgr, mut doc) = session(&ops);
        let newest = newest_unit_size(&doc.entries());
        let strong = soft + extra;

        *mgr.config_mut() = limits(soft, strong);
        let outcome = mgr.truncate(&mut doc).unwrap();

        if let TruncateOutcome::Truncated { kept, .. } = outcome {
            prop_assert_eq!(doc.log.len(), kept);
            // The kept log ends on the boundary that closed the last kept unit.
            let size = doc.log.compute_size(None).unwrap().unwrap();
            let boundary = LogEntry::Boundary.byte_cost();
            prop_assert!(
                size <= strong.max(newest) + boundary,
                "kept {} bytes, strong {}, newest unit {}", size, strong, newest
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Unit-limited size is monotone
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unit_limited_size_is_monotone(ops in proptest::collection::vec(op(), 0..80)) {
        let (_, doc) = session(&ops);
        let full = doc.log.compute_size(None).unwrap().unwrap();

        let mut previous = 0;
        for n in 1..10 {
            let size = doc.log.compute_size(Some(n)).unwrap().unwrap();
            prop_assert!(size >= previous);
            prop_assert!(size <= full);
            previous = size;
        }
    }
}
