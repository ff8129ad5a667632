//! Task list and notebook kept next to the timer.
//!
//! Both are plain in-memory collections. Hosts load them from a
//! [`KeyValueStore`](crate::storage::KeyValueStore) on start and save after
//! every successful change.

mod notes;
mod tasks;

pub use notes::{Note, NoteBook};
pub use tasks::{Task, TaskList};

use crate::error::ValidationError;

/// Find the item whose id equals `id`, or failing that the single item
/// whose id starts with it.
fn resolve_index<T>(
    items: &[T],
    id_of: impl Fn(&T) -> &str,
    id: &str,
    kind: &str,
) -> Result<usize, ValidationError> {
    let not_found = || ValidationError::NotFound {
        kind: kind.to_string(),
        id: id.to_string(),
    };
    if id.is_empty() {
        return Err(not_found());
    }
    if let Some(idx) = items.iter().position(|item| id_of(item) == id) {
        return Ok(idx);
    }

    let mut matches = items
        .iter()
        .enumerate()
        .filter(|&(_, item)| id_of(item).starts_with(id))
        .map(|(idx, _)| idx);
    match (matches.next(), matches.count()) {
        (None, _) => Err(not_found()),
        (Some(idx), 0) => Ok(idx),
        (Some(_), rest) => Err(ValidationError::Ambiguous {
            kind: kind.to_string(),
            id: id.to_string(),
            matches: rest + 1,
        }),
    }
}

fn require_text(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank {
            field: field.to_string(),
        });
    }
    Ok(trimmed.to_string())
}
