// Unit tests for the bounded warning log
//
// The log keeps the 10 most recent warnings, filters the "No Warning"
// sentinel and empty strings, and never re-appends an entry it already
// holds.

use invigil::{WarningLog, NO_WARNING_SENTINEL};

fn warning(n: usize) -> String {
    format!("Warning #{}", n)
}

#[test]
fn append_preserves_insertion_order() {
    let mut log = WarningLog::new();

    let added = log.append(vec![
        "Looking Away".to_string(),
        "Multiple Faces".to_string(),
        "Drowsiness Detected".to_string(),
    ]);

    assert_eq!(added, 3);
    assert_eq!(
        log.current(),
        vec!["Looking Away", "Multiple Faces", "Drowsiness Detected"]
    );
}

#[test]
fn capacity_never_exceeds_ten() {
    let mut log = WarningLog::new();

    for n in 0..30 {
        log.append(vec![warning(n)]);
        assert!(log.len() <= 10);
    }

    assert_eq!(log.len(), 10);
}

#[test]
fn eleven_unique_warnings_evict_the_oldest() {
    let mut log = WarningLog::new();

    for n in 0..11 {
        let added = log.append(vec![warning(n)]);
        assert_eq!(added, 1);
    }

    let expected: Vec<String> = (1..11).map(warning).collect();
    assert_eq!(log.current(), expected);
}

#[test]
fn retained_entries_are_a_suffix_of_the_append_history() {
    let mut log = WarningLog::new();
    let mut history = Vec::new();

    for n in 0..25 {
        let w = warning(n);
        log.append(vec![w.clone()]);
        history.push(w);
    }

    let tail: Vec<String> = history[history.len() - 10..].to_vec();
    assert_eq!(log.current(), tail);
}

#[test]
fn sentinel_is_never_inserted() {
    let mut log = WarningLog::new();

    let added = log.append(vec![NO_WARNING_SENTINEL.to_string()]);
    assert_eq!(added, 0);
    assert!(log.is_empty());

    let added = log.append(vec![
        NO_WARNING_SENTINEL.to_string(),
        "Looking Away".to_string(),
        NO_WARNING_SENTINEL.to_string(),
    ]);
    assert_eq!(added, 1);
    assert_eq!(log.current(), vec!["Looking Away"]);
}

#[test]
fn empty_strings_are_filtered() {
    let mut log = WarningLog::new();

    let added = log.append(vec![String::new(), "Looking Away".to_string()]);
    assert_eq!(added, 1);
    assert_eq!(log.current(), vec!["Looking Away"]);
}

#[test]
fn duplicates_are_not_reappended() {
    let mut log = WarningLog::new();

    assert_eq!(log.append(vec!["Looking Away".to_string()]), 1);
    assert_eq!(log.append(vec!["Looking Away".to_string()]), 0);
    assert_eq!(log.len(), 1);

    // An adding append reports only the genuinely new entries
    let added = log.append(vec![
        "Looking Away".to_string(),
        "Multiple Faces".to_string(),
    ]);
    assert_eq!(added, 1);
    assert_eq!(log.current(), vec!["Looking Away", "Multiple Faces"]);
}

#[test]
fn evicted_warning_can_reappear_later() {
    let mut log = WarningLog::new();

    log.append(vec![warning(0)]);
    for n in 1..11 {
        log.append(vec![warning(n)]);
    }
    assert!(!log.current().contains(&warning(0)));

    // Warning #0 fell out of the window, so it counts as new again
    assert_eq!(log.append(vec![warning(0)]), 1);
    assert_eq!(log.current().last(), Some(&warning(0)));
}

#[test]
fn clear_empties_the_log() {
    let mut log = WarningLog::new();

    log.append(vec!["Looking Away".to_string()]);
    assert!(!log.is_empty());

    log.clear();
    assert!(log.is_empty());
    assert_eq!(log.current(), Vec::<String>::new());
}
