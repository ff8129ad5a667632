use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require_text, resolve_index};
use crate::error::{Result, ValidationError};
use crate::storage::{load_or_default, save, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Ordered to-do list; new tasks go to the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub const STORE_KEY: &'static str = "tasks";

    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `store`; missing or malformed data gives an empty list.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        load_or_default(store, Self::STORE_KEY)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        save(store, Self::STORE_KEY, self)
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// # Errors
    /// Rejects text that is empty after trimming.
    pub fn add(&mut self, text: &str) -> Result<&Task, ValidationError> {
        let text = require_text("text", text)?;
        self.tasks.push(Task {
            id: Uuid::new_v4().to_string(),
            text,
            completed: false,
            created_at: Utc::now(),
        });
        tracing::debug!(count = self.tasks.len(), "task added");
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Flip the completion flag of the task matching `id` (or a unique prefix).
    pub fn toggle(&mut self, id: &str) -> Result<&Task, ValidationError> {
        let idx = self.resolve(id)?;
        let task = &mut self.tasks[idx];
        task.completed = !task.completed;
        Ok(task)
    }

    pub fn delete(&mut self, id: &str) -> Result<Task, ValidationError> {
        let idx = self.resolve(id)?;
        Ok(self.tasks.remove(idx))
    }

    pub fn get(&self, id: &str) -> Result<&Task, ValidationError> {
        Ok(&self.tasks[self.resolve(id)?])
    }

    fn resolve(&self, id: &str) -> Result<usize, ValidationError> {
        resolve_index(&self.tasks, |t| t.id.as_str(), id, "task")
    }
}
