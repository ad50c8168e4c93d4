use std::time::{Duration, Instant};

use crate::store::NoteId;

/// Everything a gesture can ask the state to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    OpenEditor,
    CancelEditor,
    SaveDraft,
    UpdateDraft(String),
    DeleteNote(NoteId),
    SelectNote(NoteId),
    /// Linear move through the newest-first card order
    MoveSelection(isize),
    Hover(Option<NoteId>),
}

/// Detects the "activate twice" gesture on a card: two activations of the
/// same target inside `window`. Firing resets the tracker so a third click
/// starts a new pair.
#[derive(Debug, Clone)]
pub struct DoubleActivation {
    window: Duration,
    last: Option<(NoteId, Instant)>,
}

impl DoubleActivation {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub fn register(&mut self, target: &NoteId, at: Instant) -> bool {
        let fired = match &self.last {
            Some((previous, when)) => {
                previous == target && at.saturating_duration_since(*when) <= self.window
            }
            None => false,
        };
        if fired {
            self.last = None;
        } else {
            self.last = Some((target.clone(), at));
        }
        fired
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn is_armed_for(&self, target: &NoteId) -> bool {
        matches!(&self.last, Some((previous, _)) if previous == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NoteStore;

    fn two_ids() -> (NoteId, NoteId) {
        let mut store = NoteStore::new();
        let a = store.add_note("a").expect("note id");
        let b = store.add_note("b").expect("note id");
        (a, b)
    }

    #[test]
    fn fires_on_second_activation_within_window() {
        let (a, _) = two_ids();
        let mut tracker = DoubleActivation::new(Duration::from_millis(400));
        let start = Instant::now();
        assert!(!tracker.register(&a, start));
        assert!(tracker.is_armed_for(&a));
        assert!(tracker.register(&a, start + Duration::from_millis(150)));
        assert!(!tracker.is_armed_for(&a));
    }

    #[test]
    fn slow_second_activation_rearms_instead() {
        let (a, _) = two_ids();
        let mut tracker = DoubleActivation::new(Duration::from_millis(400));
        let start = Instant::now();
        tracker.register(&a, start);
        assert!(!tracker.register(&a, start + Duration::from_millis(900)));
        assert!(tracker.register(&a, start + Duration::from_millis(1000)));
    }

    #[test]
    fn different_targets_do_not_pair() {
        let (a, b) = two_ids();
        let mut tracker = DoubleActivation::new(Duration::from_millis(400));
        let start = Instant::now();
        tracker.register(&a, start);
        assert!(!tracker.register(&b, start + Duration::from_millis(10)));
        assert!(tracker.is_armed_for(&b));
    }

    #[test]
    fn third_activation_starts_a_new_pair() {
        let (a, _) = two_ids();
        let mut tracker = DoubleActivation::new(Duration::from_millis(400));
        let start = Instant::now();
        tracker.register(&a, start);
        assert!(tracker.register(&a, start + Duration::from_millis(50)));
        assert!(!tracker.register(&a, start + Duration::from_millis(100)));
    }
}
