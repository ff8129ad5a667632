use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require_text, resolve_index};
use crate::error::{Result, ValidationError};
use crate::storage::{load_or_default, save, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteBook {
    notes: Vec<Note>,
}

impl NoteBook {
    pub const STORE_KEY: &'static str = "notes";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        load_or_default(store, Self::STORE_KEY)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        save(store, Self::STORE_KEY, self)
    }

    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// # Errors
    /// Both title and content must be non-blank.
    pub fn add(&mut self, title: &str, content: &str) -> Result<&Note, ValidationError> {
        let title = require_text("title", title)?;
        let content = require_text("content", content)?;
        self.notes.push(Note {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            created_at: Utc::now(),
        });
        Ok(&self.notes[self.notes.len() - 1])
    }

    /// Merge the given fields into an existing note. `None` keeps the old value.
    pub fn update(
        &mut self,
        id: &str,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<&Note, ValidationError> {
        let idx = self.resolve(id)?;
        let title = title.map(|t| require_text("title", t)).transpose()?;
        let content = content.map(|c| require_text("content", c)).transpose()?;

        let note = &mut self.notes[idx];
        if let Some(title) = title {
            note.title = title;
        }
        if let Some(content) = content {
            note.content = content;
        }
        Ok(note)
    }

    pub fn delete(&mut self, id: &str) -> Result<Note, ValidationError> {
        let idx = self.resolve(id)?;
        Ok(self.notes.remove(idx))
    }

    pub fn get(&self, id: &str) -> Result<&Note, ValidationError> {
        Ok(&self.notes[self.resolve(id)?])
    }

    fn resolve(&self, id: &str) -> Result<usize, ValidationError> {
        resolve_index(&self.notes, |n| n.id.as_str(), id, "note")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn add_requires_title_and_content() {
        let mut book = NoteBook::new();
        assert!(book.add("", "body").is_err());
        assert!(book.add("title", "  ").is_err());
        assert!(book.add("Cell biology", "mitochondria").is_ok());
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn update_merges_fields() {
        let mut book = NoteBook::new();
        let id = book.add("Draft", "first pass").unwrap().id.clone();

        let note = book.update(&id, None, Some("second pass")).unwrap();
        assert_eq!(note.title, "Draft");
        assert_eq!(note.content, "second pass");

        let note = book.update(&id, Some("Final"), None).unwrap();
        assert_eq!(note.title, "Final");
        assert_eq!(note.content, "second pass");
    }

    #[test]
    fn blank_update_leaves_note_untouched() {
        let mut book = NoteBook::new();
        let id = book.add("Keep", "me").unwrap().id.clone();
        assert!(book.update(&id, Some(" "), Some("changed")).is_err());
        assert_eq!(book.get(&id).unwrap().content, "me");
    }

    #[test]
    fn delete_and_round_trip() {
        let mut store = MemoryStore::new();
        let mut book = NoteBook::new();
        let gone = book.add("a", "1").unwrap().id.clone();
        book.add("b", "2").unwrap();
        book.delete(&gone).unwrap();
        book.save(&mut store).unwrap();

        let loaded = NoteBook::load(&store);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.list()[0].title, "b");
    }

    #[test]
    fn malformed_store_gives_empty_book() {
        let mut store = MemoryStore::new();
        store.set(NoteBook::STORE_KEY, "[{\"id\": 3}]").unwrap();
        assert!(NoteBook::load(&store).is_empty());
    }
}
