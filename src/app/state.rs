use crossbeam_channel::Receiver;
use time::UtcOffset;

use crate::app::actions::Action;
use crate::app::editor::{DraftEditor, EditorMode};
use crate::config::{AppConfig, ClockStyle, ThemeName};
use crate::store::{Note, NoteId, NoteStore, StoreEvent};

/// Everything the renderer projects: the note store, the draft editor, and a
/// little view chrome (selection, hover, status line).
#[derive(Debug)]
pub struct AppState {
    store: NoteStore,
    editor: DraftEditor,
    selected: usize,
    hovered: Option<NoteId>,
    status_message: Option<String>,
    pub theme: ThemeName,
    pub clock: ClockStyle,
    pub display_offset: UtcOffset,
    pub max_columns: u16,
    pub card_height: u16,
}

impl AppState {
    pub fn new(config: &AppConfig, display_offset: UtcOffset) -> Self {
        Self {
            store: NoteStore::new(),
            editor: DraftEditor::default(),
            selected: 0,
            hovered: None,
            status_message: None,
            theme: config.theme,
            clock: config.clock,
            display_offset,
            max_columns: config.grid.max_columns,
            card_height: config.grid.card_height,
        }
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut NoteStore {
        &mut self.store
    }

    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        self.store.subscribe()
    }

    pub fn editor(&self) -> &DraftEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut DraftEditor {
        &mut self.editor
    }

    pub fn editor_mode(&self) -> EditorMode {
        self.editor.mode()
    }

    pub fn is_editor_open(&self) -> bool {
        self.editor.is_open()
    }

    pub fn draft(&self) -> &str {
        self.editor.text()
    }

    pub fn can_save(&self) -> bool {
        self.editor.can_save()
    }

    /// Applies a state-changing action and reports whether anything changed.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => false,
            Action::OpenEditor => self.open_editor(),
            Action::CancelEditor => self.cancel_editor(),
            Action::SaveDraft => self.save_draft(),
            Action::UpdateDraft(text) => self.update_draft(&text),
            Action::DeleteNote(id) => self.delete_note(&id),
            Action::SelectNote(id) => self.select_note(&id),
            Action::MoveSelection(delta) => self.move_selection(delta),
            Action::Hover(target) => self.set_hovered(target),
        }
    }

    pub fn add_note(&mut self, content: &str) -> Option<NoteId> {
        let id = self.store.add_note(content)?;
        self.selected = 0;
        Some(id)
    }

    /// Removes a note. The selection stays on the same note when that note
    /// survives; otherwise it lands on the card that took the removed slot.
    pub fn delete_note(&mut self, id: &NoteId) -> bool {
        let selected = self.selected_note().map(|note| note.id().clone());
        if !self.store.delete_note(id) {
            return false;
        }
        if self.hovered.as_ref() == Some(id) {
            self.hovered = None;
        }
        match selected.and_then(|keep| self.store.position(&keep)) {
            Some(index) => self.selected = index,
            None => self.normalize_selection(),
        }
        true
    }

    pub fn open_editor(&mut self) -> bool {
        self.editor.open()
    }

    pub fn update_draft(&mut self, text: &str) -> bool {
        self.editor.update(text)
    }

    pub fn cancel_editor(&mut self) -> bool {
        self.editor.cancel()
    }

    /// Commits a non-blank draft as a new note. Blank drafts change nothing.
    pub fn save_draft(&mut self) -> bool {
        let Some(text) = self.editor.take_committable() else {
            return false;
        };
        self.add_note(&text);
        true
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.store.iter()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.store.get(self.selected)
    }

    pub fn select_note(&mut self, id: &NoteId) -> bool {
        match self.store.position(id) {
            Some(index) if index != self.selected => {
                self.selected = index;
                true
            }
            _ => false,
        }
    }

    pub fn move_selection(&mut self, delta: isize) -> bool {
        if self.store.is_empty() {
            return false;
        }
        let last = self.store.len() as isize - 1;
        let next = (self.selected as isize + delta).clamp(0, last) as usize;
        if next == self.selected {
            return false;
        }
        self.selected = next;
        true
    }

    pub fn hovered(&self) -> Option<&NoteId> {
        self.hovered.as_ref()
    }

    pub fn set_hovered(&mut self, target: Option<NoteId>) -> bool {
        if self.hovered == target {
            return false;
        }
        self.hovered = target;
        true
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status_message<S: Into<String>>(&mut self, message: Option<S>) {
        self.status_message = message.map(Into::into);
    }

    fn normalize_selection(&mut self) {
        if self.store.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.store.len() {
            self.selected = self.store.len() - 1;
        }
    }
}
