//! In-memory application state held by the task store.

use crate::model::task::{Task, TaskId};
use crate::model::user::User;
use chrono::NaiveDate;

/// Full store state.
///
/// Only `tasks` and `user` are persisted; `selected_date` is ephemeral and
/// reset to the rehydration day on every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    /// Task collection in insertion order.
    pub tasks: Vec<Task>,
    /// Store owner.
    pub user: User,
    /// Day currently focused by agenda views.
    pub selected_date: NaiveDate,
}

impl AppState {
    pub fn new(tasks: Vec<Task>, user: User, selected_date: NaiveDate) -> Self {
        Self {
            tasks,
            user,
            selected_date,
        }
    }

    /// Returns the task with `id`, if present.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub(crate) fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    pub(crate) fn contains_id(&self, id: &TaskId) -> bool {
        self.tasks.iter().any(|task| &task.id == id)
    }
}
