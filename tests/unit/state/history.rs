use super::*;

#[test]
fn undo_redo_walks_entries() {
    let mut h = History::new(0);
    h.push(1);
    h.push(2);
    assert!(h.undo());
    assert_eq!(*h.present(), 1);
    assert!(h.undo());
    assert_eq!(*h.present(), 0);
    assert!(!h.undo());
    assert!(h.redo());
    assert!(h.redo());
    assert_eq!(*h.present(), 2);
    assert!(!h.redo());
}

#[test]
fn push_after_undo_clears_future() {
    let mut h = History::new("a");
    h.push("b");
    h.undo();
    assert!(h.can_redo());
    h.push("c");
    assert!(!h.can_redo());
    assert_eq!(h.future().len(), 0);
    assert_eq!(h.past().copied().collect::<Vec<_>>(), vec!["a"]);
}

#[test]
fn past_is_bounded_and_drops_oldest() {
    let mut h = History::new(0usize);
    for i in 1..=MAX_HISTORY + 10 {
        h.push(i);
    }
    assert_eq!(h.past().len(), MAX_HISTORY);
    assert_eq!(h.past().next().copied(), Some(10));
    let mut undone = 0;
    while h.undo() {
        undone += 1;
    }
    assert_eq!(undone, MAX_HISTORY);
    assert_eq!(*h.present(), 10);
    assert_eq!(h.future().len(), MAX_HISTORY);
}

#[test]
fn clear_keeps_present() {
    let mut h = History::with_limit(1, 3);
    h.push(2);
    h.push(3);
    h.undo();
    h.clear();
    assert!(!h.can_undo());
    assert!(!h.can_redo());
    assert_eq!(*h.present(), 2);
}
