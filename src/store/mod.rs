use std::fmt;

use crossbeam_channel::{unbounded, Receiver, Sender};
use indexmap::IndexMap;
use time::OffsetDateTime;
use uuid::Uuid;

/// Opaque identifier for a note, unique for the lifetime of a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(String);

impl NoteId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An immutable record of user-authored text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    id: NoteId,
    content: String,
    timestamp: OffsetDateTime,
}

impl Note {
    pub fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Added { id: NoteId, index: usize },
    Removed { id: NoteId, index: usize },
}

/// Newest-first collection of notes. Mutated only through `add_note` and
/// `delete_note`; observers learn about changes through `subscribe`.
#[derive(Debug, Default)]
pub struct NoteStore {
    notes: IndexMap<NoteId, Note>,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get_index(index).map(|(_, note)| note)
    }

    pub fn first(&self) -> Option<&Note> {
        self.get(0)
    }

    pub fn position(&self, id: &NoteId) -> Option<usize> {
        self.notes.get_index_of(id)
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.notes.contains_key(id)
    }

    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Creates a note stamped with the current time. Blank content is ignored.
    pub fn add_note(&mut self, content: &str) -> Option<NoteId> {
        self.add_note_at(content, OffsetDateTime::now_utc())
    }

    pub fn add_note_at(&mut self, content: &str, timestamp: OffsetDateTime) -> Option<NoteId> {
        let content = content.trim();
        if content.is_empty() {
            tracing::debug!("ignoring blank note content");
            return None;
        }
        let mut id = NoteId::generate();
        while self.notes.contains_key(&id) {
            id = NoteId::generate();
        }
        let note = Note {
            id: id.clone(),
            content: content.to_string(),
            timestamp,
        };
        self.notes.shift_insert(0, id.clone(), note);
        tracing::debug!(note_id = %id, total = self.notes.len(), "note added");
        self.notify(StoreEvent::Added {
            id: id.clone(),
            index: 0,
        });
        Some(id)
    }

    /// Removes the note with `id`, keeping the order of the rest. Unknown ids
    /// are ignored.
    pub fn delete_note(&mut self, id: &NoteId) -> bool {
        let Some((index, key, _)) = self.notes.shift_remove_full(id) else {
            tracing::debug!(note_id = %id, "delete ignored, note not found");
            return false;
        };
        tracing::debug!(note_id = %key, total = self.notes.len(), "note deleted");
        self.notify(StoreEvent::Removed { id: key, index });
        true
    }

    fn notify(&mut self, event: StoreEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn contents(store: &NoteStore) -> Vec<String> {
        store.iter().map(|note| note.content().to_string()).collect()
    }

    #[test]
    fn add_prepends_and_grows_by_one() {
        let mut store = NoteStore::new();
        for (idx, text) in ["first", "second", "third"].iter().enumerate() {
            store.add_note(text).expect("note id");
            assert_eq!(store.len(), idx + 1);
            assert_eq!(store.first().map(Note::content), Some(*text));
        }
        assert_eq!(contents(&store), vec!["third", "second", "first"]);
    }

    #[test]
    fn blank_content_is_ignored() {
        let mut store = NoteStore::new();
        store.add_note("keep").expect("note id");
        for blank in ["", "   ", "\n\t"] {
            assert!(store.add_note(blank).is_none());
        }
        assert_eq!(contents(&store), vec!["keep"]);
    }

    #[test]
    fn content_is_stored_trimmed() {
        let mut store = NoteStore::new();
        store.add_note("  line one\nline two \n").expect("note id");
        assert_eq!(store.first().map(Note::content), Some("line one\nline two"));
    }

    #[test]
    fn ids_are_unique() {
        let mut store = NoteStore::new();
        let ids: Vec<_> = (0..50)
            .filter_map(|i| store.add_note(&format!("note {i}")))
            .collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn delete_unknown_id_leaves_store_untouched() {
        let mut store = NoteStore::new();
        store.add_note("a");
        store.add_note("b");
        let before: Vec<Note> = store.iter().cloned().collect();

        assert!(!store.delete_note(&NoteId("missing".into())));

        let after: Vec<Note> = store.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn delete_removes_exactly_one_and_keeps_order() {
        let mut store = NoteStore::new();
        store.add_note("a");
        let middle = store.add_note("b").expect("note id");
        store.add_note("c");
        store.add_note("d");

        assert!(store.delete_note(&middle));
        assert_eq!(contents(&store), vec!["d", "c", "a"]);
        assert!(!store.contains(&middle));
    }

    #[test]
    fn deleting_twice_matches_deleting_once() {
        let mut store = NoteStore::new();
        let target = store.add_note("a").expect("note id");
        store.add_note("b");

        assert!(store.delete_note(&target));
        let once: Vec<Note> = store.iter().cloned().collect();
        assert!(!store.delete_note(&target));
        let twice: Vec<Note> = store.iter().cloned().collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn subscribers_see_successful_mutations_only() {
        let mut store = NoteStore::new();
        let events = store.subscribe();

        let id = store.add_note("hello").expect("note id");
        store.add_note("  ");
        store.delete_note(&NoteId("nope".into()));
        store.delete_note(&id);

        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert_matches!(&received[0], StoreEvent::Added { id: added, index: 0 } if *added == id);
        assert_matches!(&received[1], StoreEvent::Removed { id: removed, index: 0 } if *removed == id);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut store = NoteStore::new();
        let kept = store.subscribe();
        drop(store.subscribe());

        store.add_note("x");
        assert_eq!(store.subscribers.len(), 1);
        assert_eq!(kept.try_iter().count(), 1);
    }
}
