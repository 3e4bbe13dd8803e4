//! To-do list state

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Text shown when no incomplete task is left
pub const NO_TASK_PLACEHOLDER: &str = "Plans for today?";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

/// Ordered to-do items; the first incomplete one is the current task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoList {
    items: Vec<TodoItem>,
}

impl TodoList {
    pub fn new(items: Vec<TodoItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Append a task. Blank text is rejected.
    ///
    /// Ids are creation timestamps in milliseconds, bumped past the largest
    /// existing id so two adds in the same millisecond stay distinct.
    pub fn add(&mut self, text: &str) -> Option<TodoItem> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let now = Utc::now().timestamp_millis();
        let id = match self.items.iter().map(|item| item.id).max() {
            Some(max) if max >= now => max + 1,
            _ => now,
        };

        let item = TodoItem {
            id,
            text: text.to_string(),
            completed: false,
        };
        self.items.push(item.clone());
        Some(item)
    }

    /// Flip the completed flag; returns the updated item
    pub fn toggle(&mut self, id: i64) -> Option<TodoItem> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        item.completed = !item.completed;
        Some(item.clone())
    }

    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Text of the first incomplete item, if any
    pub fn current_task(&self) -> Option<&str> {
        self.items
            .iter()
            .find(|item| !item.completed)
            .map(|item| item.text.as_str())
    }

    /// Headline text: the current task or the placeholder
    pub fn headline(&self) -> &str {
        self.current_task().unwrap_or(NO_TASK_PLACEHOLDER)
    }
}
